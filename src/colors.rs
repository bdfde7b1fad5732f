// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Renderer-facing color values and the HSL math that synths and effects use
//! to derive them from pitch and amplitude.

use anyhow::anyhow;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// An sRGB color. Serializes as a `#rrggbb` hex string, which is the form the
/// renderer consumes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Color {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a [Color] from hue (degrees, any value; wraps), saturation and
    /// lightness (both 0.0..=1.0, clamped).
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = (hue.rem_euclid(360.0)) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let r = Self::hue_to_rgb(p, q, h + 1.0 / 3.0);
        let g = Self::hue_to_rgb(p, q, h);
        let b = Self::hue_to_rgb(p, q, h - 1.0 / 3.0);
        Self::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }

    fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    /// (hue degrees 0..360, saturation 0..=1, lightness 0..=1).
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h * 60.0, s, l)
    }

    /// The same color with its hue rotated by `degrees`.
    pub fn shifted_hue(&self, degrees: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h + degrees, s, l)
    }

    /// The same color with saturation and lightness each multiplied by the
    /// given factor (clamped to valid range).
    pub fn rebalanced(&self, saturation_factor: f64, lightness_factor: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s * saturation_factor, l * lightness_factor)
    }

    pub fn hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn from_hex(value: &str) -> anyhow::Result<Self> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("color {value} doesn't start with '#'"))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(anyhow!("color {value} isn't #rrggbb"));
        }
        Ok(Self::new(
            u8::from_str_radix(&digits[0..2], 16)?,
            u8::from_str_radix(&digits[2..4], 16)?,
            u8::from_str_radix(&digits[4..6], 16)?,
        ))
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex_string())
    }
}
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex_string())
    }
}
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}
