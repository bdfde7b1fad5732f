// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{active_notes, declare_envelope, envelope_from};
use crate::{
    colors::Color,
    composition::MidiBlock,
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::{ObjectKind, ObjectProperties, Scale, VisualObject},
    traits::Synthesizer,
    types::{Beats, Tempo},
};
use std::f64::consts::TAU;

/// Notes arranged on a clock face: pitch class picks the angle, octave
/// lifts the object off the plane, velocity and amplitude drive scale.
#[derive(Clone, Debug)]
pub struct RingSynth {
    props: PropertySet,
}
impl RingSynth {
    pub const KEY: &'static str = "ring";

    pub const RADIUS: &'static str = "radius";
    pub const OBJECT_SIZE: &'static str = "object-size";
    pub const OCTAVE_LIFT: &'static str = "octave-lift";
}
impl Default for RingSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::RADIUS,
                PropertyValue::Float(3.0),
                PropertyMetadata::slider("Radius", 0.5, 10.0, 0.1),
            )
            .with(
                Self::OBJECT_SIZE,
                PropertyValue::Float(0.5),
                PropertyMetadata::slider("Object size", 0.05, 2.0, 0.05),
            )
            .with(
                Self::OCTAVE_LIFT,
                PropertyValue::Float(0.5),
                PropertyMetadata::slider("Octave lift", 0.0, 2.0, 0.05),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(RingSynth);
impl Synthesizer for RingSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let radius = self.props.float(Self::RADIUS);
        let object_size = self.props.float(Self::OBJECT_SIZE);
        let octave_lift = self.props.float(Self::OCTAVE_LIFT);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let angle = note.pitch_class() as f64 / 12.0 * TAU;
                let scale =
                    object_size * (0.4 + 0.6 * note.velocity_normal().0) * active.amplitude.0;
                VisualObject::new_with(
                    ObjectKind::Icosahedron,
                    ObjectProperties {
                        position: Some([
                            radius * angle.cos(),
                            (note.octave() as f64 - 4.0) * octave_lift,
                            radius * angle.sin(),
                        ]),
                        scale: Some(Scale::Uniform(scale.max(0.001))),
                        color: Color::from_hsl(angle.to_degrees(), 0.7, 0.55),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn Synthesizer> {
        Box::new(self.clone())
    }
}

/// One monolithic cube at the origin that swells with the combined loudness
/// of everything playing. Good as a background heartbeat layer.
#[derive(Clone, Debug)]
pub struct PulseCubeSynth {
    props: PropertySet,
}
impl PulseCubeSynth {
    pub const KEY: &'static str = "pulse-cube";

    pub const BASE_SCALE: &'static str = "base-scale";
    pub const GAIN: &'static str = "gain";
}
impl Default for PulseCubeSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::BASE_SCALE,
                PropertyValue::Float(1.0),
                PropertyMetadata::slider("Base scale", 0.1, 5.0, 0.1),
            )
            .with(
                Self::GAIN,
                PropertyValue::Float(2.0),
                PropertyMetadata::slider("Gain", 0.0, 8.0, 0.1),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(PulseCubeSynth);
impl Synthesizer for PulseCubeSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let active = active_notes(time, blocks, tempo, &envelope);
        if active.is_empty() {
            return Vec::default();
        }

        let loudness: f64 = active
            .iter()
            .map(|a| a.amplitude.0 * a.note.velocity_normal().0)
            .sum();
        let highest = active.iter().map(|a| a.note.key).max().unwrap_or(64);
        let base_scale = self.props.float(Self::BASE_SCALE);
        let gain = self.props.float(Self::GAIN);

        vec![VisualObject::new_with(
            ObjectKind::Cube,
            ObjectProperties {
                position: Some([0.0, 0.0, 0.0]),
                scale: Some(Scale::Uniform(base_scale + gain * loudness.min(1.5))),
                color: Color::from_hsl(highest as f64 * 2.8, 0.6, 0.5),
                ..Default::default()
            },
        )]
    }

    fn make_another(&self) -> Box<dyn Synthesizer> {
        Box::new(self.clone())
    }
}
