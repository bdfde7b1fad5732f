// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{active_notes, declare_envelope, envelope_from};
use crate::{
    colors::Color,
    composition::MidiBlock,
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::{ObjectKind, ObjectProperties, VisualObject},
    traits::Synthesizer,
    types::{Beats, Tempo},
};
use std::f64::consts::TAU;

/// Notes riding a traveling sine wave. Horizontal position tracks the note's
/// distance from the playhead, vertical position follows the wave.
#[derive(Clone, Debug)]
pub struct WaveSynth {
    props: PropertySet,
}
impl WaveSynth {
    pub const KEY: &'static str = "wave";

    pub const SPACING: &'static str = "spacing";
    pub const HEIGHT: &'static str = "height";
    pub const SPEED: &'static str = "speed";
    pub const WAVELENGTH: &'static str = "wavelength";
}
impl Default for WaveSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::SPACING,
                PropertyValue::Float(0.6),
                PropertyMetadata::slider("Spacing", 0.1, 3.0, 0.05),
            )
            .with(
                Self::HEIGHT,
                PropertyValue::Float(1.2),
                PropertyMetadata::slider("Wave height", 0.0, 5.0, 0.05),
            )
            .with(
                Self::SPEED,
                PropertyValue::Float(1.0),
                PropertyMetadata::slider("Cycles per beat", 0.0, 8.0, 0.1),
            )
            .with(
                Self::WAVELENGTH,
                PropertyValue::Float(4.0),
                PropertyMetadata::slider("Wavelength", 0.5, 16.0, 0.5),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(WaveSynth);
impl Synthesizer for WaveSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let spacing = self.props.float(Self::SPACING);
        let height = self.props.float(Self::HEIGHT);
        let speed = self.props.float(Self::SPEED);
        let wavelength = self.props.float(Self::WAVELENGTH).max(1e-6);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let x = (active.start.0 - time.0) * spacing;
                let phase = TAU * (time.0 * speed + x / wavelength);
                let y = height * active.amplitude.0 * phase.sin();
                VisualObject::new_with(
                    ObjectKind::Sphere,
                    ObjectProperties {
                        position: Some([x, y, 0.0]),
                        size: Some(0.4 * (0.5 + 0.5 * note.velocity_normal().0)),
                        color: Color::from_hsl(note.key as f64 * 2.8, 0.7, 0.6),
                        opacity: Some(active.amplitude),
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

/// Comets: each note streaks along +x as it ages, so held notes draw long
/// trajectories. Age is measured from the note's own start, making the path
/// identical no matter how the transport got to the query time.
#[derive(Clone, Debug)]
pub struct CometSynth {
    props: PropertySet,
}
impl CometSynth {
    pub const KEY: &'static str = "comets";

    pub const SPEED: &'static str = "speed";
    pub const SIZE: &'static str = "size";
    pub const ORIGIN: &'static str = "origin";
}
impl Default for CometSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::SPEED,
                PropertyValue::Float(2.0),
                PropertyMetadata::slider("Speed (units/beat)", 0.1, 10.0, 0.1),
            )
            .with(
                Self::SIZE,
                PropertyValue::Float(0.5),
                PropertyMetadata::slider("Size", 0.05, 2.0, 0.05),
            )
            .with(
                Self::ORIGIN,
                PropertyValue::Vec3([-6.0, 0.0, 0.0]),
                PropertyMetadata::vector("Launch origin"),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(CometSynth);
impl Synthesizer for CometSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let speed = self.props.float(Self::SPEED);
        let size = self.props.float(Self::SIZE);
        let origin = self.props.vec3(Self::ORIGIN);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let age = (time.0 - active.start.0).max(0.0);
                VisualObject::new_with(
                    ObjectKind::Sphere,
                    ObjectProperties {
                        position: Some([
                            origin[0] + age * speed,
                            origin[1] + (note.key as f64 - 64.0) * 0.08,
                            origin[2],
                        ]),
                        size: Some(size * (0.5 + 0.5 * note.velocity_normal().0)),
                        color: Color::from_hsl(30.0 + note.key as f64 * 2.0, 0.85, 0.6),
                        opacity: Some(active.amplitude),
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
