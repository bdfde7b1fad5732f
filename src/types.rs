// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Common value types used throughout the system.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A [Normal] is a floating-point value in the range 0.0..=1.0. Construction
/// clamps, so a Normal obtained through [Normal::new] is always in range.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Normal(pub f64);
impl Normal {
    /// The highest valid value.
    pub const MAX: Self = Self(1.0);
    /// The lowest valid value.
    pub const ZERO: Self = Self(0.0);

    /// Creates a [Normal], clamping out-of-range values.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Creates a [Normal] in const contexts. The caller vouches for the range.
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }
}
impl Default for Normal {
    // A Normal defaults to 1.0. Most uses here are amplitudes and opacities,
    // and a default-constructed zero silently blanks the scene.
    fn default() -> Self {
        Self(1.0)
    }
}
impl From<f64> for Normal {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
impl From<Normal> for f64 {
    fn from(value: Normal) -> Self {
        value.0
    }
}
impl Mul for Normal {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}
impl Mul<f64> for Normal {
    type Output = f64;

    fn mul(self, rhs: f64) -> Self::Output {
        self.0 * rhs
    }
}

/// Musical time in fractional beats. The transport scrubs continuously, so
/// beats are `f64` rather than a tick count, and queries may run backwards.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct Beats(pub f64);
impl Beats {
    /// Converts to wall-clock time at the given [Tempo].
    pub fn to_seconds(self, tempo: Tempo) -> Seconds {
        Seconds(self.0 * tempo.seconds_per_beat())
    }
}
impl Add for Beats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl Sub for Beats {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl From<f64> for Beats {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Wall-clock time in seconds.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct Seconds(pub f64);
impl Seconds {
    /// Converts to musical time at the given [Tempo].
    pub fn to_beats(self, tempo: Tempo) -> Beats {
        Beats(self.0 / tempo.seconds_per_beat())
    }
}
impl Add for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl Sub for Seconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Beats per minute.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Tempo(pub f64);
impl Tempo {
    /// Tempos at or below this are treated as this value, so that a malformed
    /// bpm can't produce an infinite or negative beat length.
    pub const MIN_BPM: f64 = 0.001;

    /// Seconds per beat: 60 / bpm.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.0.max(Self::MIN_BPM)
    }
}
impl Default for Tempo {
    fn default() -> Self {
        Self(128.0)
    }
}
impl From<f64> for Tempo {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
