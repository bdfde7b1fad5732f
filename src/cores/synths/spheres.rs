// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{active_notes, declare_envelope, envelope_from};
use crate::{
    colors::Color,
    composition::MidiBlock,
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::{ObjectKind, ObjectProperties, VisualObject},
    rng::Rng,
    traits::Synthesizer,
    types::{Beats, Tempo},
};

/// Floating spheres on a pitch-class/octave lattice. Velocity sets size,
/// amplitude sets opacity.
#[derive(Clone, Debug)]
pub struct BallSynth {
    props: PropertySet,
}
impl BallSynth {
    pub const KEY: &'static str = "balls";

    pub const SPREAD: &'static str = "spread";
    pub const BASE_SIZE: &'static str = "base-size";
}
impl Default for BallSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::SPREAD,
                PropertyValue::Float(0.5),
                PropertyMetadata::slider("Spread", 0.1, 3.0, 0.05),
            )
            .with(
                Self::BASE_SIZE,
                PropertyValue::Float(0.6),
                PropertyMetadata::slider("Base size", 0.05, 3.0, 0.05),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(BallSynth);
impl Synthesizer for BallSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let spread = self.props.float(Self::SPREAD);
        let base_size = self.props.float(Self::BASE_SIZE);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let x = (note.pitch_class() as f64 - 5.5) * spread;
                let y = (note.octave() as f64 - 4.0) * spread * 2.0;
                VisualObject::new_with(
                    ObjectKind::Sphere,
                    ObjectProperties {
                        position: Some([x, y, 0.0]),
                        size: Some(base_size * (0.3 + 0.7 * note.velocity_normal().0)),
                        color: Color::from_hsl(note.key as f64 * 2.8, 0.8, 0.6),
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

/// Scattered stars: each note is placed at a pseudo-random point derived from
/// the seed property and the note's id, so the layout is stable across
/// frames, scrubbing, and repeated queries.
#[derive(Clone, Debug)]
pub struct StarfieldSynth {
    props: PropertySet,
}
impl StarfieldSynth {
    pub const KEY: &'static str = "starfield";

    pub const SEED: &'static str = "seed";
    pub const SPREAD: &'static str = "spread";
    pub const BASE_SIZE: &'static str = "base-size";

    fn star_position(&self, seed: i64, note_id: usize, spread: f64) -> [f64; 3] {
        let mixed = (seed as u64 as u128) << 64 | (note_id as u64 as u128);
        let mut rng = Rng::new_with_seed(mixed.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        [
            rng.rand_bipolar() * spread,
            rng.rand_bipolar() * spread,
            rng.rand_bipolar() * spread,
        ]
    }
}
impl Default for StarfieldSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::SEED,
                PropertyValue::Int(17),
                PropertyMetadata::number("Seed"),
            )
            .with(
                Self::SPREAD,
                PropertyValue::Float(8.0),
                PropertyMetadata::slider("Spread", 1.0, 30.0, 0.5),
            )
            .with(
                Self::BASE_SIZE,
                PropertyValue::Float(0.3),
                PropertyMetadata::slider("Star size", 0.02, 2.0, 0.02),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(StarfieldSynth);
impl Synthesizer for StarfieldSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let seed = self.props.int(Self::SEED);
        let spread = self.props.float(Self::SPREAD);
        let base_size = self.props.float(Self::BASE_SIZE);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let position = self.star_position(seed, note.id.0, spread);
                let hue = (note.id.0 as f64 * 47.0) % 360.0;
                VisualObject::new_with(
                    ObjectKind::Sphere,
                    ObjectProperties {
                        position: Some(position),
                        size: Some(base_size * (0.4 + 0.6 * note.velocity_normal().0)),
                        color: Color::from_hsl(hue, 0.3, 0.8),
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
