// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Concrete effects and the per-track [EffectChain] that applies them in
//! order. Every effect produces a fresh object list; none mutates its input.

pub use array::{LinearArrayEffect, MirrorEffect, RadialArrayEffect};
pub use color::{ColorShiftEffect, OpacityEffect, StrobeEffect};
pub use echo::EchoEffect;
pub use modulate::{JitterEffect, PulseEffect};
pub use transform::{PositionOffsetEffect, RotateEffect, ScaleEffect};

mod array;
mod color;
mod echo;
mod modulate;
mod transform;

use crate::{
    render::VisualObject,
    traits::VisualEffect,
    types::{Beats, Tempo},
};
use delegate::delegate;

/// The ordered list of effects belonging to one track. The position in the
/// list *is* the application order; there is no separate order field.
#[derive(Debug, Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn VisualEffect>>,
}
impl EffectChain {
    delegate! {
        to self.effects {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
        }
    }

    /// Folds the synthesizer's output through every effect in order.
    pub fn evaluate(
        &mut self,
        objects: Vec<VisualObject>,
        time: Beats,
        tempo: Tempo,
    ) -> Vec<VisualObject> {
        self.effects
            .iter_mut()
            .fold(objects, |objects, effect| effect.apply(&objects, time, tempo))
    }

    /// Inserts a clone of `template` at `index` (clamped to the end). The
    /// template itself is never stored, so two tracks can build chains from
    /// the same template without ever sharing effect state.
    pub fn insert(&mut self, template: &dyn VisualEffect, index: usize) {
        self.insert_instance(template.make_another(), index);
    }

    /// Appends a clone of `template`.
    pub fn push(&mut self, template: &dyn VisualEffect) {
        self.insert(template, self.effects.len());
    }

    /// Inserts an owned instance, e.g. one freshly minted by the factory.
    pub fn insert_instance(&mut self, effect: Box<dyn VisualEffect>, index: usize) {
        let index = index.min(self.effects.len());
        self.effects.insert(index, effect);
    }

    /// Appends an owned instance.
    pub fn push_instance(&mut self, effect: Box<dyn VisualEffect>) {
        self.effects.push(effect);
    }

    /// Removes and returns the effect at `index`; the rest keep their
    /// relative order.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn VisualEffect>> {
        if index < self.effects.len() {
            Some(self.effects.remove(index))
        } else {
            None
        }
    }

    /// Moves the effect at `from` to position `to` without cloning or
    /// resetting it: a reorder is a rearrangement, not a new configuration.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.effects.len() || to >= self.effects.len() {
            return;
        }
        let effect = self.effects.remove(from);
        self.effects.insert(to, effect);
    }

    pub fn effect(&self, index: usize) -> Option<&dyn VisualEffect> {
        self.effects.get(index).map(|e| e.as_ref())
    }

    pub fn effect_mut(&mut self, index: usize) -> Option<&mut Box<dyn VisualEffect>> {
        self.effects.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Box<dyn VisualEffect>> {
        self.effects.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        colors::Color,
        properties::PropertyValue,
        render::{ObjectKind, ObjectProperties, Scale},
        traits::HasProperties,
        types::Normal,
    };
    use float_cmp::approx_eq;

    /// One default-scale object at the origin.
    pub(crate) fn origin_object() -> VisualObject {
        VisualObject::new_with(
            ObjectKind::Cube,
            ObjectProperties {
                position: Some([0.0, 0.0, 0.0]),
                scale: Some(Scale::Uniform(1.0)),
                color: Color::new(255, 0, 0),
                opacity: Some(Normal::new(1.0)),
                ..Default::default()
            },
        )
    }

    /// Checks that `apply` left the input list untouched, in both identity
    /// and value, and that outputs share no storage with inputs. Positions
    /// and scales are plain copyable arrays here, so value equality is the
    /// meaningful check.
    pub(crate) fn assert_input_unchanged(effect: &mut dyn VisualEffect) {
        let input = vec![origin_object(), origin_object().with_position([1.0, 2.0, 3.0])];
        let snapshot = input.clone();
        let _ = effect.apply(&input, Beats(0.5), Tempo(120.0));
        assert_eq!(input, snapshot, "{} mutated its input", effect.type_key());
    }

    #[test]
    fn chain_order_changes_the_result() {
        // Offset-then-scale lands at (2,0,0); scale-then-offset at (1,0,0).
        let offset = PositionOffsetEffect::new_with([1.0, 0.0, 0.0]);
        let scale = ScaleEffect::new_with(2.0);

        let mut chain = EffectChain::default();
        chain.push(&offset);
        chain.push(&scale);
        let moved_first = chain.evaluate(vec![origin_object()], Beats(0.0), Tempo(120.0));
        assert_eq!(moved_first[0].position(), [2.0, 0.0, 0.0]);

        let mut chain = EffectChain::default();
        chain.push(&scale);
        chain.push(&offset);
        let scaled_first = chain.evaluate(vec![origin_object()], Beats(0.0), Tempo(120.0));
        assert_eq!(scaled_first[0].position(), [1.0, 0.0, 0.0]);

        assert_ne!(moved_first[0].position(), scaled_first[0].position());
    }

    #[test]
    fn insert_clones_the_template() {
        let mut template = OpacityEffect::default();
        let mut chain = EffectChain::default();
        chain.push(&template);

        // Changing the template afterwards must not reach into the chain.
        template
            .set_property(OpacityEffect::FACTOR, PropertyValue::Float(0.0))
            .unwrap();
        let out = chain.evaluate(vec![origin_object()], Beats(0.0), Tempo(120.0));
        assert!(
            approx_eq!(
                f64,
                out[0].opacity().0,
                OpacityEffect::DEFAULT_FACTOR,
                epsilon = 1e-9
            ),
            "chain should hold a clone made before the template changed"
        );
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut chain = EffectChain::default();
        chain.push(&PositionOffsetEffect::new_with([1.0, 0.0, 0.0]));
        chain.push(&ScaleEffect::new_with(2.0));
        chain.push(&OpacityEffect::default());
        assert_eq!(chain.len(), 3);

        let removed = chain.remove(1).unwrap();
        assert_eq!(removed.type_key(), ScaleEffect::KEY);
        assert_eq!(chain.effect(0).unwrap().type_key(), PositionOffsetEffect::KEY);
        assert_eq!(chain.effect(1).unwrap().type_key(), OpacityEffect::KEY);
        assert!(chain.remove(5).is_none());
    }

    #[test]
    fn reorder_moves_without_resetting_state() {
        let mut chain = EffectChain::default();
        chain.push(&EchoEffect::default());
        chain.push(&ScaleEffect::new_with(2.0));

        // Give the echo effect something to buffer.
        let _ = chain.evaluate(vec![origin_object()], Beats(0.0), Tempo(120.0));

        chain.reorder(0, 1);
        assert_eq!(chain.effect(1).unwrap().type_key(), EchoEffect::KEY);
        // The buffered snapshot from before the reorder still echoes.
        let delay = EchoEffect::DEFAULT_DELAY_BEATS;
        let out = chain.evaluate(
            vec![],
            Beats(delay),
            Tempo(120.0),
        );
        assert!(
            !out.is_empty(),
            "echo state must survive a reorder of the chain"
        );
    }

    #[test]
    fn evaluate_with_no_effects_is_identity() {
        let mut chain = EffectChain::default();
        let input = vec![origin_object()];
        let out = chain.evaluate(input.clone(), Beats(3.0), Tempo(90.0));
        assert_eq!(out, input);
    }
}
