// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Concrete synthesizers. Each one walks the same active-note window (see
//! [active_notes]) and differs only in how it maps pitch, velocity, and
//! envelope amplitude to object attributes.

pub use bars::{BarSynth, RibbonSynth};
pub use grid::{GridSynth, TunnelSynth};
pub use ring::{PulseCubeSynth, RingSynth};
pub use spheres::{BallSynth, StarfieldSynth};
pub use wave::{CometSynth, WaveSynth};

mod bars;
mod grid;
mod ring;
mod spheres;
mod wave;

use crate::{
    composition::{MidiBlock, MidiNote},
    elements::EnvelopeParams,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    types::{Beats, Normal, Tempo},
};

/// Amplitudes below this produce no object. Emitting invisible geometry just
/// wastes the renderer's time.
pub const MIN_VISIBLE_AMPLITUDE: f64 = 1e-3;

/// Standard envelope property names that every synthesizer declares.
pub(crate) const ATTACK: &str = "attack";
pub(crate) const DECAY: &str = "decay";
pub(crate) const SUSTAIN: &str = "sustain";
pub(crate) const RELEASE: &str = "release";

/// Appends the four envelope properties to a [PropertySet] under
/// construction. Declared last by convention so synth-specific properties
/// lead the UI.
pub(crate) fn declare_envelope(props: PropertySet) -> PropertySet {
    props
        .with(
            ATTACK,
            PropertyValue::Float(0.05),
            PropertyMetadata::slider("Attack (s)", 0.0, 2.0, 0.01),
        )
        .with(
            DECAY,
            PropertyValue::Float(0.1),
            PropertyMetadata::slider("Decay (s)", 0.0, 2.0, 0.01),
        )
        .with(
            SUSTAIN,
            PropertyValue::Float(0.8),
            PropertyMetadata::slider("Sustain", 0.0, 1.0, 0.01),
        )
        .with(
            RELEASE,
            PropertyValue::Float(0.3),
            PropertyMetadata::slider("Release (s)", 0.0, 4.0, 0.01),
        )
}

/// Reads the envelope properties back out of a synthesizer's [PropertySet].
pub(crate) fn envelope_from(props: &PropertySet) -> EnvelopeParams {
    EnvelopeParams::new_with(
        props.float(ATTACK).into(),
        props.float(DECAY).into(),
        Normal::new(props.float(SUSTAIN)),
        props.float(RELEASE).into(),
    )
}

/// A note that is sounding (or releasing) at the query time, with its
/// absolute placement and current envelope amplitude.
#[derive(Debug)]
pub struct ActiveNote<'a> {
    pub note: &'a MidiNote,
    /// Absolute start in track beats.
    pub start: Beats,
    /// Absolute note-off in track beats (release extends past this).
    pub end: Beats,
    pub amplitude: Normal,
}

/// Collects every note audible at `time` across `blocks`, skipping malformed
/// blocks/notes and notes whose amplitude falls below
/// [MIN_VISIBLE_AMPLITUDE]. Blocks are pre-filtered by their span extended
/// with the envelope's release tail.
pub fn active_notes<'a>(
    time: Beats,
    blocks: &'a [MidiBlock],
    tempo: Tempo,
    envelope: &EnvelopeParams,
) -> Vec<ActiveNote<'a>> {
    let release_tail = envelope.release_tail().to_beats(tempo);
    let t = time.to_seconds(tempo);
    let mut found = Vec::new();
    for block in blocks {
        if !block.contains(time, release_tail) {
            continue;
        }
        for note in &block.notes {
            let Some((start, end)) = note.absolute_span(block.start) else {
                continue;
            };
            let amplitude =
                envelope.amplitude(t, start.to_seconds(tempo), end.to_seconds(tempo));
            if amplitude.0 < MIN_VISIBLE_AMPLITUDE {
                continue;
            }
            found.push(ActiveNote {
                note,
                start,
                end,
                amplitude,
            });
        }
    }
    found
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        composition::MidiBlockBuilder,
        traits::{HasProperties, Synthesizer},
        types::Seconds,
        uid::Uid,
    };

    /// One block spanning beats 0..8 holding a single note: key 60, velocity
    /// 100, beats 1..3.
    pub(crate) fn single_note_blocks() -> Vec<MidiBlock> {
        vec![MidiBlockBuilder::default()
            .id(Uid(1))
            .start(Beats(0.0))
            .end(Beats(8.0))
            .note(MidiNote::new_with(
                Uid(10),
                60,
                100,
                Beats(1.0),
                Beats(2.0),
            ))
            .build()
            .unwrap()]
    }

    /// A block that claims to end before it starts, plus a note with a
    /// negative duration: both must act as if they don't exist.
    pub(crate) fn malformed_blocks() -> Vec<MidiBlock> {
        vec![
            MidiBlockBuilder::default()
                .id(Uid(1))
                .start(Beats(8.0))
                .end(Beats(0.0))
                .note(MidiNote::new_with(
                    Uid(10),
                    60,
                    100,
                    Beats(0.0),
                    Beats(4.0),
                ))
                .build()
                .unwrap(),
            MidiBlockBuilder::default()
                .id(Uid(2))
                .start(Beats(0.0))
                .end(Beats(8.0))
                .note(MidiNote::new_with(
                    Uid(11),
                    64,
                    100,
                    Beats(0.0),
                    Beats(-1.0),
                ))
                .build()
                .unwrap(),
        ]
    }

    /// The shared purity/robustness checks every synthesizer must satisfy.
    pub(crate) fn exercise_synthesizer(synth: &dyn Synthesizer) {
        let tempo = Tempo(60.0);
        let blocks = single_note_blocks();

        // Active inside the note: at least one object.
        let objects = synth.synthesize(Beats(2.0), &blocks, tempo);
        assert!(
            !objects.is_empty(),
            "{}: no output for an active note",
            synth.type_key()
        );

        // Purity: same inputs, same instance, deep-equal output.
        let again = synth.synthesize(Beats(2.0), &blocks, tempo);
        assert_eq!(objects, again, "{}: output is not pure", synth.type_key());

        // Outside every window: silence.
        assert!(
            synth.synthesize(Beats(20.0), &blocks, tempo).is_empty(),
            "{}: output long after the block ended",
            synth.type_key()
        );

        // Malformed data: no objects, no panic, at any time.
        let bad = malformed_blocks();
        for t in [0.0, 1.0, 4.0, 100.0] {
            assert!(
                synth.synthesize(Beats(t), &bad, tempo).is_empty(),
                "{}: emitted objects for malformed data",
                synth.type_key()
            );
        }

        // make_another: independent property storage.
        let mut copy = synth.make_another();
        let names: Vec<String> = synth
            .property_set()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(
            copy.serialize_properties().len(),
            names.len(),
            "{}: clone dropped properties",
            synth.type_key()
        );
        copy.property_set_mut()
            .update(ATTACK, PropertyValue::Float(1.9));
        assert_eq!(
            synth.property_set().float(ATTACK),
            0.05,
            "{}: clone aliases the original's properties",
            synth.type_key()
        );
    }

    #[test]
    fn active_notes_window_and_release_tail() {
        let blocks = single_note_blocks();
        let tempo = Tempo(60.0);
        let envelope = EnvelopeParams::new_with(
            Seconds(0.0),
            Seconds(0.0),
            Normal::new(0.8),
            Seconds(1.0),
        );

        // Before the note.
        assert!(active_notes(Beats(0.5), &blocks, tempo, &envelope).is_empty());
        // Inside.
        let active = active_notes(Beats(2.0), &blocks, tempo, &envelope);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].start, Beats(1.0));
        assert_eq!(active[0].end, Beats(3.0));
        assert_eq!(active[0].amplitude, Normal::new(0.8));
        // In the release tail (1s = 1 beat at 60 bpm): still present,
        // quieter.
        let tail = active_notes(Beats(3.5), &blocks, tempo, &envelope);
        assert_eq!(tail.len(), 1);
        assert!(tail[0].amplitude.0 < 0.8);
        // Past the tail.
        assert!(active_notes(Beats(4.5), &blocks, tempo, &envelope).is_empty());
    }

    #[test]
    fn active_notes_skips_malformed() {
        let envelope = EnvelopeParams::default();
        for t in [0.0, 2.0, 9.0] {
            assert!(active_notes(Beats(t), &malformed_blocks(), Tempo(60.0), &envelope).is_empty());
        }
    }

    #[test]
    fn overlapping_identical_notes_stay_independent() {
        // Two notes with the same pitch and time yield two active entries;
        // there is no voice merging.
        let blocks = vec![MidiBlockBuilder::default()
            .id(Uid(1))
            .start(Beats(0.0))
            .end(Beats(4.0))
            .note(MidiNote::new_with(Uid(10), 60, 100, Beats(0.0), Beats(2.0)))
            .note(MidiNote::new_with(Uid(11), 60, 100, Beats(0.0), Beats(2.0)))
            .build()
            .unwrap()];
        let envelope = EnvelopeParams::default();
        assert_eq!(
            active_notes(Beats(1.0), &blocks, Tempo(60.0), &envelope).len(),
            2
        );
    }
}
