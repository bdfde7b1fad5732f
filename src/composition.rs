// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The note data model that synthesizers read. Blocks and notes arrive from
//! the editor's track model; this core only queries them.

use crate::{
    types::{Beats, Normal},
    uid::Uid,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A single note inside a [MidiBlock]. `start` is relative to the block's
/// placement on the track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MidiNote {
    pub id: Uid,
    /// MIDI key code, 0..=127. 69 is (usually) A4.
    pub key: u8,
    /// MIDI velocity, 0..=127.
    pub velocity: u8,
    /// Start, in beats relative to the owning block's start.
    pub start: Beats,
    /// Length in beats.
    pub duration: Beats,
}
impl MidiNote {
    pub fn new_with(id: Uid, key: u8, velocity: u8, start: Beats, duration: Beats) -> Self {
        Self {
            id,
            key,
            velocity,
            start,
            duration,
        }
    }

    /// Velocity scaled to 0..=1.
    pub fn velocity_normal(&self) -> Normal {
        Normal::new(self.velocity as f64 / 127.0)
    }

    /// Pitch class 0..=11 (0 = C).
    pub fn pitch_class(&self) -> u8 {
        self.key % 12
    }

    /// Octave number, -1..=9 in the usual MIDI convention.
    pub fn octave(&self) -> i32 {
        self.key as i32 / 12 - 1
    }

    /// The note's absolute (start, end) on the track given its block's start,
    /// or None if the note is malformed and therefore never active.
    pub fn absolute_span(&self, block_start: Beats) -> Option<(Beats, Beats)> {
        if !self.start.0.is_finite() || !self.duration.0.is_finite() || self.duration.0 <= 0.0 {
            return None;
        }
        let start = Beats(block_start.0 + self.start.0);
        let end = Beats(start.0 + self.duration.0);
        Some((start, end))
    }
}

/// A placed region of notes on a track. `start`/`end` are absolute track
/// beats.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct MidiBlock {
    pub id: Uid,
    pub start: Beats,
    pub end: Beats,
    pub notes: Vec<MidiNote>,
}
impl MidiBlock {
    /// A block with `end < start` (or a non-finite bound) contains nothing,
    /// ever. Malformed data never panics.
    pub fn is_well_formed(&self) -> bool {
        self.start.0.is_finite() && self.end.0.is_finite() && self.end.0 >= self.start.0
    }

    /// Whether the block's span, extended by the synthesizer's release tail,
    /// contains `time`. This is the coarse filter before per-note windows.
    pub fn contains(&self, time: Beats, release_tail: Beats) -> bool {
        self.is_well_formed()
            && time.0 >= self.start.0
            && time.0 <= self.end.0 + release_tail.0.max(0.0)
    }
}
impl MidiBlockBuilder {
    /// Adds one note to the block under construction.
    pub fn note(&mut self, note: MidiNote) -> &mut Self {
        self.notes.get_or_insert_with(Vec::default).push(note);
        self
    }
}
