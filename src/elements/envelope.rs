// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::types::{Normal, Seconds};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// An attack/decay/sustain/release amplitude envelope, evaluated as a pure
/// function of time. Unlike an audio envelope generator, there is no internal
/// phase state: the transport scrubs freely in both directions, so every
/// query computes amplitude directly from the note's absolute start and end.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct EnvelopeParams {
    #[derivative(Default(value = "Seconds(0.05)"))]
    pub attack: Seconds,
    #[derivative(Default(value = "Seconds(0.1)"))]
    pub decay: Seconds,
    #[derivative(Default(value = "Normal::new_const(0.8)"))]
    pub sustain: Normal,
    #[derivative(Default(value = "Seconds(0.3)"))]
    pub release: Seconds,
}
impl EnvelopeParams {
    pub fn new_with(attack: Seconds, decay: Seconds, sustain: Normal, release: Seconds) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// How long a note remains audible past its end.
    pub fn release_tail(&self) -> Seconds {
        Seconds(self.release.0.max(0.0))
    }

    /// Amplitude in 0.0..=1.0 at time `t` for a note sounding from
    /// `note_start` to `note_end` (all in absolute seconds).
    ///
    /// Phases:
    /// - before `note_start`: 0
    /// - attack: linear 0 → 1 over `attack` seconds (instantly 1 if zero)
    /// - decay: linear 1 → `sustain` over `decay` seconds (instant if zero),
    ///   truncated at `note_end` if the note is shorter than attack + decay
    /// - sustain: constant until `note_end` inclusive
    /// - release: linear `sustain` → 0 over `release` seconds after
    ///   `note_end` (instantly 0 if zero)
    ///
    /// Zero-length phases are special-cased; no input produces NaN.
    pub fn amplitude(&self, t: Seconds, note_start: Seconds, note_end: Seconds) -> Normal {
        let (t, start, end) = (t.0, note_start.0, note_end.0);
        if !t.is_finite() || !start.is_finite() || !end.is_finite() || end < start {
            return Normal::ZERO;
        }
        if t < start {
            return Normal::ZERO;
        }

        let attack = self.attack.0.max(0.0);
        let decay = self.decay.0.max(0.0);
        let sustain = self.sustain.0.clamp(0.0, 1.0);
        let release = self.release.0.max(0.0);

        if t <= end {
            let since_start = t - start;
            // since_start < attack implies attack > 0, so the divisions below
            // can't hit a zero-length phase.
            if since_start < attack {
                return Normal::new(since_start / attack);
            }
            let since_decay = since_start - attack;
            if since_decay < decay {
                return Normal::new(1.0 - (1.0 - sustain) * (since_decay / decay));
            }
            return Normal::new(sustain);
        }

        let since_end = t - end;
        if since_end < release {
            return Normal::new(sustain * (1.0 - since_end / release));
        }
        Normal::ZERO
    }
}
