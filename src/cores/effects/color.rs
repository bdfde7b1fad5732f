// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::VisualObject,
    traits::VisualEffect,
    types::{Beats, Normal, Tempo},
};

/// Rotates every object's hue and rebalances saturation/lightness.
#[derive(Clone, Debug)]
pub struct ColorShiftEffect {
    props: PropertySet,
}
impl ColorShiftEffect {
    pub const KEY: &'static str = "color-shift";

    pub const HUE_SHIFT: &'static str = "hue-shift";
    pub const SATURATION_SCALE: &'static str = "saturation-scale";
    pub const LIGHTNESS_SCALE: &'static str = "lightness-scale";

    pub fn new_with(hue_shift: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::HUE_SHIFT, PropertyValue::Float(hue_shift));
        e
    }
}
impl Default for ColorShiftEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::HUE_SHIFT,
                    PropertyValue::Float(0.0),
                    PropertyMetadata::slider("Hue shift (deg)", -180.0, 180.0, 1.0),
                )
                .with(
                    Self::SATURATION_SCALE,
                    PropertyValue::Float(1.0),
                    PropertyMetadata::slider("Saturation", 0.0, 2.0, 0.05),
                )
                .with(
                    Self::LIGHTNESS_SCALE,
                    PropertyValue::Float(1.0),
                    PropertyMetadata::slider("Lightness", 0.0, 2.0, 0.05),
                ),
        }
    }
}
impl_has_properties!(ColorShiftEffect);
impl VisualEffect for ColorShiftEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let hue_shift = self.props.float(Self::HUE_SHIFT);
        let saturation = self.props.float(Self::SATURATION_SCALE);
        let lightness = self.props.float(Self::LIGHTNESS_SCALE);
        objects
            .iter()
            .map(|o| {
                let color = o
                    .properties
                    .color
                    .shifted_hue(hue_shift)
                    .rebalanced(saturation, lightness);
                o.clone().with_color(color)
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// Multiplies every object's opacity by a constant factor.
#[derive(Clone, Debug)]
pub struct OpacityEffect {
    props: PropertySet,
}
impl OpacityEffect {
    pub const KEY: &'static str = "opacity";

    pub const FACTOR: &'static str = "factor";
    pub const DEFAULT_FACTOR: f64 = 0.5;

    pub fn new_with(factor: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::FACTOR, PropertyValue::Float(factor));
        e
    }
}
impl Default for OpacityEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default().with(
                Self::FACTOR,
                PropertyValue::Float(Self::DEFAULT_FACTOR),
                PropertyMetadata::slider("Factor", 0.0, 1.0, 0.01),
            ),
        }
    }
}
impl_has_properties!(OpacityEffect);
impl VisualEffect for OpacityEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let factor = self.props.float(Self::FACTOR);
        objects
            .iter()
            .map(|o| {
                let opacity = Normal::new(o.opacity().0 * factor);
                o.clone().with_opacity(opacity)
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// A beat-synced opacity gate. For each cycle of `rate` beats, objects show
/// at full opacity for the `duty` fraction and drop to the `floor` fraction
/// for the rest. Phase is computed from absolute time, so the flash pattern
/// is stable under scrubbing.
#[derive(Clone, Debug)]
pub struct StrobeEffect {
    props: PropertySet,
}
impl StrobeEffect {
    pub const KEY: &'static str = "strobe";

    pub const RATE: &'static str = "rate";
    pub const DUTY: &'static str = "duty";
    pub const FLOOR: &'static str = "floor";

    pub fn new_with(rate: f64, duty: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::RATE, PropertyValue::Float(rate));
        e.props.update(Self::DUTY, PropertyValue::Float(duty));
        e
    }
}
impl Default for StrobeEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::RATE,
                    PropertyValue::Float(0.5),
                    PropertyMetadata::slider("Rate (beats)", 0.05, 4.0, 0.05),
                )
                .with(
                    Self::DUTY,
                    PropertyValue::Float(0.5),
                    PropertyMetadata::slider("Duty", 0.0, 1.0, 0.05),
                )
                .with(
                    Self::FLOOR,
                    PropertyValue::Float(0.0),
                    PropertyMetadata::slider("Off opacity", 0.0, 1.0, 0.05),
                ),
        }
    }
}
impl_has_properties!(StrobeEffect);
impl VisualEffect for StrobeEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let rate = self.props.float(Self::RATE);
        let duty = self.props.float(Self::DUTY);
        let floor = self.props.float(Self::FLOOR);

        // A degenerate rate can't gate anything; pass through.
        let factor = if rate > 0.0 {
            let phase = (time.0 / rate).rem_euclid(1.0);
            if phase < duty {
                1.0
            } else {
                floor
            }
        } else {
            1.0
        };

        objects
            .iter()
            .map(|o| {
                let opacity = Normal::new(o.opacity().0 * factor);
                o.clone().with_opacity(opacity)
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}
