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

/// A 12-column lattice of cubes: pitch class picks the column, octave the
/// row, and the envelope lights the cell up through opacity.
#[derive(Clone, Debug)]
pub struct GridSynth {
    props: PropertySet,
}
impl GridSynth {
    pub const KEY: &'static str = "grid";

    pub const CELL_SIZE: &'static str = "cell-size";
    pub const GAP: &'static str = "gap";
}
impl Default for GridSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::CELL_SIZE,
                PropertyValue::Float(0.8),
                PropertyMetadata::slider("Cell size", 0.1, 2.0, 0.05),
            )
            .with(
                Self::GAP,
                PropertyValue::Float(0.15),
                PropertyMetadata::slider("Gap", 0.0, 1.0, 0.05),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(GridSynth);
impl Synthesizer for GridSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let cell = self.props.float(Self::CELL_SIZE);
        let pitch = cell + self.props.float(Self::GAP);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let x = (note.pitch_class() as f64 - 5.5) * pitch;
                let y = (note.octave() as f64 - 4.0) * pitch;
                VisualObject::new_with(
                    ObjectKind::Cube,
                    ObjectProperties {
                        position: Some([x, y, 0.0]),
                        scale: Some(Scale::Uniform(cell)),
                        color: Color::from_hsl(note.pitch_class() as f64 * 30.0, 0.65, 0.55),
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

/// Concentric rings receding into the screen: lower notes sit deeper, and
/// the whole tunnel spins at a constant rate per beat. The spin is a pure
/// function of the query time, so scrubbing backwards unwinds it.
#[derive(Clone, Debug)]
pub struct TunnelSynth {
    props: PropertySet,
}
impl TunnelSynth {
    pub const KEY: &'static str = "tunnel";

    pub const DEPTH_SPACING: &'static str = "depth-spacing";
    pub const RADIUS: &'static str = "radius";
    pub const SPIN: &'static str = "spin";
}
impl Default for TunnelSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::DEPTH_SPACING,
                PropertyValue::Float(1.5),
                PropertyMetadata::slider("Depth spacing", 0.2, 5.0, 0.1),
            )
            .with(
                Self::RADIUS,
                PropertyValue::Float(2.0),
                PropertyMetadata::slider("Ring radius", 0.2, 8.0, 0.1),
            )
            .with(
                Self::SPIN,
                PropertyValue::Float(15.0),
                PropertyMetadata::slider("Spin (deg/beat)", 0.0, 180.0, 1.0),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(TunnelSynth);
impl Synthesizer for TunnelSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let depth_spacing = self.props.float(Self::DEPTH_SPACING);
        let radius = self.props.float(Self::RADIUS);
        let spin = self.props.float(Self::SPIN);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let depth = -(9.0 - note.octave() as f64) * depth_spacing;
                let angle = spin * time.0 + note.pitch_class() as f64 * 30.0;
                VisualObject::new_with(
                    ObjectKind::Torus,
                    ObjectProperties {
                        position: Some([0.0, 0.0, depth]),
                        rotation: Some([0.0, 0.0, angle]),
                        scale: Some(Scale::Uniform(
                            radius * (0.5 + 0.5 * note.velocity_normal().0),
                        )),
                        color: Color::from_hsl(note.key as f64 * 3.3, 0.75, 0.5),
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

#[cfg(test)]
mod tests {
    use super::super::tests::{exercise_synthesizer, single_note_blocks};
    use super::*;

    #[test]
    fn grid_synth_contract() {
        exercise_synthesizer(&GridSynth::default());
    }

    #[test]
    fn tunnel_synth_contract() {
        exercise_synthesizer(&TunnelSynth::default());
    }

    #[test]
    fn grid_opacity_follows_envelope() {
        let synth = GridSynth::default();
        let blocks = single_note_blocks();
        let tempo = Tempo(60.0);
        // Sustain phase vs. deep into the release.
        let sustained = synth.synthesize(Beats(2.0), &blocks, tempo);
        let releasing = synth.synthesize(Beats(3.25), &blocks, tempo);
        assert!(releasing[0].opacity() < sustained[0].opacity());
    }

    #[test]
    fn tunnel_spin_advances_with_time() {
        let synth = TunnelSynth::default();
        let blocks = single_note_blocks();
        let tempo = Tempo(60.0);
        let a = synth.synthesize(Beats(1.5), &blocks, tempo);
        let b = synth.synthesize(Beats(2.5), &blocks, tempo);
        assert_ne!(a[0].rotation(), b[0].rotation());
    }
}
