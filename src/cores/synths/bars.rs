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

/// Piano-roll bars: one cube per active note, keyed left-to-right by pitch,
/// growing upward with velocity and envelope amplitude.
#[derive(Clone, Debug)]
pub struct BarSynth {
    props: PropertySet,
}
impl BarSynth {
    pub const KEY: &'static str = "bars";

    pub const SPACING: &'static str = "spacing";
    pub const WIDTH: &'static str = "width";
    pub const MAX_HEIGHT: &'static str = "max-height";
    pub const HUE_START: &'static str = "hue-start";
}
impl Default for BarSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::SPACING,
                PropertyValue::Float(0.4),
                PropertyMetadata::slider("Spacing", 0.05, 2.0, 0.05),
            )
            .with(
                Self::WIDTH,
                PropertyValue::Float(0.3),
                PropertyMetadata::slider("Bar width", 0.05, 2.0, 0.05),
            )
            .with(
                Self::MAX_HEIGHT,
                PropertyValue::Float(4.0),
                PropertyMetadata::slider("Max height", 0.5, 10.0, 0.1),
            )
            .with(
                Self::HUE_START,
                PropertyValue::Float(200.0),
                PropertyMetadata::slider("Hue start", 0.0, 360.0, 1.0),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(BarSynth);
impl Synthesizer for BarSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let spacing = self.props.float(Self::SPACING);
        let width = self.props.float(Self::WIDTH);
        let max_height = self.props.float(Self::MAX_HEIGHT);
        let hue_start = self.props.float(Self::HUE_START);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let height =
                    (max_height * note.velocity_normal().0 * active.amplitude.0).max(0.01);
                let x = (note.key as f64 - 64.0) * spacing;
                VisualObject::new_with(
                    ObjectKind::Cube,
                    ObjectProperties {
                        position: Some([x, height / 2.0, 0.0]),
                        scale: Some(Scale::Vector([width, height, width])),
                        color: Color::from_hsl(
                            hue_start + note.pitch_class() as f64 * 30.0,
                            0.7,
                            0.55,
                        ),
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

/// Horizontal ribbons: one flat plane per note, stretched to the note's
/// length in beats and scrolling left as time advances, so a long note reads
/// as a long streak.
#[derive(Clone, Debug)]
pub struct RibbonSynth {
    props: PropertySet,
}
impl RibbonSynth {
    pub const KEY: &'static str = "ribbons";

    pub const BEAT_WIDTH: &'static str = "beat-width";
    pub const THICKNESS: &'static str = "thickness";
    pub const PITCH_SPACING: &'static str = "pitch-spacing";
}
impl Default for RibbonSynth {
    fn default() -> Self {
        let props = PropertySet::default()
            .with(
                Self::BEAT_WIDTH,
                PropertyValue::Float(1.0),
                PropertyMetadata::slider("Width per beat", 0.1, 4.0, 0.1),
            )
            .with(
                Self::THICKNESS,
                PropertyValue::Float(0.2),
                PropertyMetadata::slider("Thickness", 0.02, 1.0, 0.02),
            )
            .with(
                Self::PITCH_SPACING,
                PropertyValue::Float(0.15),
                PropertyMetadata::slider("Pitch spacing", 0.02, 1.0, 0.01),
            );
        Self {
            props: declare_envelope(props),
        }
    }
}
impl_has_properties!(RibbonSynth);
impl Synthesizer for RibbonSynth {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject> {
        let envelope = envelope_from(&self.props);
        let beat_width = self.props.float(Self::BEAT_WIDTH);
        let thickness = self.props.float(Self::THICKNESS);
        let pitch_spacing = self.props.float(Self::PITCH_SPACING);

        active_notes(time, blocks, tempo, &envelope)
            .iter()
            .map(|active| {
                let note = active.note;
                let length = (active.end.0 - active.start.0) * beat_width;
                let center = (active.start.0 + active.end.0) / 2.0 - time.0;
                VisualObject::new_with(
                    ObjectKind::Plane,
                    ObjectProperties {
                        position: Some([
                            center * beat_width,
                            (note.key as f64 - 64.0) * pitch_spacing,
                            0.0,
                        ]),
                        scale: Some(Scale::Vector([length, thickness, thickness])),
                        color: Color::from_hsl(note.key as f64 * 2.8, 0.6, 0.5),
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
    use float_cmp::approx_eq;
    use more_asserts::assert_gt;

    #[test]
    fn bar_synth_contract() {
        exercise_synthesizer(&BarSynth::default());
    }

    #[test]
    fn ribbon_synth_contract() {
        exercise_synthesizer(&RibbonSynth::default());
    }

    #[test]
    fn bars_scale_with_velocity() {
        let synth = BarSynth::default();
        let tempo = Tempo(60.0);
        let mut soft_blocks = single_note_blocks();
        soft_blocks[0].notes[0].velocity = 30;

        // Sustain phase, well past attack/decay.
        let loud = synth.synthesize(Beats(2.0), &single_note_blocks(), tempo);
        let soft = synth.synthesize(Beats(2.0), &soft_blocks, tempo);
        let height = |objects: &[VisualObject]| match objects[0].scale() {
            Scale::Vector([_, y, _]) => y,
            _ => panic!("bars should have vector scale"),
        };
        assert_gt!(height(&loud), height(&soft));
    }

    #[test]
    fn ribbon_length_tracks_duration() {
        let synth = RibbonSynth::default();
        let objects = synth.synthesize(Beats(2.0), &single_note_blocks(), Tempo(60.0));
        assert_eq!(objects.len(), 1);
        // The single test note lasts 2 beats; beat-width defaults to 1.0.
        match objects[0].scale() {
            Scale::Vector([x, _, _]) => assert!(approx_eq!(f64, x, 2.0, epsilon = 1e-9)),
            _ => panic!("ribbons should have vector scale"),
        }
    }
}
