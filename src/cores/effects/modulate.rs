// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::VisualObject,
    rng::Rng,
    traits::VisualEffect,
    types::{Beats, Tempo},
};
use std::f64::consts::TAU;

/// Beat-synced breathing: object scale (not position) swells and shrinks
/// sinusoidally with the beat clock.
#[derive(Clone, Debug)]
pub struct PulseEffect {
    props: PropertySet,
}
impl PulseEffect {
    pub const KEY: &'static str = "pulse";

    pub const RATE: &'static str = "rate";
    pub const DEPTH: &'static str = "depth";

    pub fn new_with(rate: f64, depth: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::RATE, PropertyValue::Float(rate));
        e.props.update(Self::DEPTH, PropertyValue::Float(depth));
        e
    }
}
impl Default for PulseEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::RATE,
                    PropertyValue::Float(1.0),
                    PropertyMetadata::slider("Rate (beats)", 0.1, 8.0, 0.1),
                )
                .with(
                    Self::DEPTH,
                    PropertyValue::Float(0.3),
                    PropertyMetadata::slider("Depth", 0.0, 1.0, 0.05),
                ),
        }
    }
}
impl_has_properties!(PulseEffect);
impl VisualEffect for PulseEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let rate = self.props.float(Self::RATE);
        let depth = self.props.float(Self::DEPTH);
        let factor = if rate > 0.0 {
            1.0 + depth * (TAU * time.0 / rate).sin()
        } else {
            1.0
        };

        objects
            .iter()
            .map(|o| {
                let mut out = o.clone().with_scale(o.scale().scaled_by(factor));
                if let Some(size) = out.properties.size {
                    out.properties.size = Some(size * factor);
                }
                out
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// Deterministic shake: each object is displaced by a pseudo-random offset
/// derived from the seed, the object's index, and the quantized query time.
/// No hidden state, so a given frame always shakes the same way.
#[derive(Clone, Debug)]
pub struct JitterEffect {
    props: PropertySet,
}
impl JitterEffect {
    pub const KEY: &'static str = "jitter";

    pub const AMOUNT: &'static str = "amount";
    pub const SEED: &'static str = "seed";
    pub const RATE: &'static str = "rate";

    pub fn new_with(amount: f64, seed: i64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::AMOUNT, PropertyValue::Float(amount));
        e.props.update(Self::SEED, PropertyValue::Int(seed));
        e
    }
}
impl Default for JitterEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::AMOUNT,
                    PropertyValue::Float(0.3),
                    PropertyMetadata::slider("Amount", 0.0, 3.0, 0.05),
                )
                .with(
                    Self::SEED,
                    PropertyValue::Int(1),
                    PropertyMetadata::number("Seed"),
                )
                .with(
                    Self::RATE,
                    PropertyValue::Float(8.0),
                    PropertyMetadata::slider("Jumps per beat", 0.5, 32.0, 0.5),
                ),
        }
    }
}
impl_has_properties!(JitterEffect);
impl VisualEffect for JitterEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let amount = self.props.float(Self::AMOUNT);
        let seed = self.props.int(Self::SEED);
        let rate = self.props.float(Self::RATE).max(0.0);
        let step = (time.0 * rate).floor() as i64;

        objects
            .iter()
            .enumerate()
            .map(|(index, o)| {
                let mixed = ((seed as u64 as u128) << 64)
                    | ((index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
                        ^ (step as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f))
                        as u128;
                let mut rng = Rng::new_with_seed(mixed);
                let [x, y, z] = o.position();
                o.clone().with_position([
                    x + rng.rand_bipolar() * amount,
                    y + rng.rand_bipolar() * amount,
                    z + rng.rand_bipolar() * amount,
                ])
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{assert_input_unchanged, origin_object};
    use super::*;
    use crate::render::Scale;
    use float_cmp::approx_eq;

    #[test]
    fn modulators_never_mutate_input() {
        assert_input_unchanged(&mut PulseEffect::new_with(1.0, 0.5));
        assert_input_unchanged(&mut JitterEffect::new_with(0.5, 7));
    }

    #[test]
    fn pulse_peaks_a_quarter_cycle_in() {
        let mut effect = PulseEffect::new_with(1.0, 0.5);
        let out = effect.apply(&[origin_object()], Beats(0.25), Tempo(120.0));
        match out[0].scale() {
            Scale::Uniform(s) => assert!(approx_eq!(f64, s, 1.5, epsilon = 1e-9)),
            _ => panic!("expected uniform scale"),
        }
        // Position is untouched, unlike ScaleEffect.
        assert_eq!(out[0].position(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn jitter_is_deterministic_per_frame() {
        let mut effect = JitterEffect::new_with(1.0, 42);
        let input = [origin_object()];
        let a = effect.apply(&input, Beats(1.3), Tempo(120.0));
        let b = effect.apply(&input, Beats(1.3), Tempo(120.0));
        assert_eq!(a, b);
        // And actually moves things.
        assert_ne!(a[0].position(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn jitter_varies_between_steps_and_objects() {
        let mut effect = JitterEffect::new_with(1.0, 42);
        let input = [origin_object(), origin_object()];
        let out = effect.apply(&input, Beats(0.0), Tempo(120.0));
        assert_ne!(out[0].position(), out[1].position());

        let later = effect.apply(&input, Beats(4.0), Tempo(120.0));
        assert_ne!(out[0].position(), later[0].position());
    }
}
