// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The type factory that sits at the persistence boundary: stable string keys
//! in, default-configured instances out. The factory is an explicit,
//! constructed table, built once at startup and passed to whoever needs it.
//! It is never a module-level global.

use crate::{
    cores::{
        effects::{
            ColorShiftEffect, EchoEffect, JitterEffect, LinearArrayEffect, MirrorEffect,
            OpacityEffect, PositionOffsetEffect, PulseEffect, RadialArrayEffect, RotateEffect,
            ScaleEffect, StrobeEffect,
        },
        synths::{
            BallSynth, BarSynth, CometSynth, GridSynth, PulseCubeSynth, RibbonSynth, RingSynth,
            StarfieldSynth, TunnelSynth, WaveSynth,
        },
    },
    traits::{Synthesizer, VisualEffect},
};
use derive_more::Display;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A globally unique identifier for a kind of entity, such as the bars
/// synthesizer or the echo effect.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct EntityKey(String);
impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        EntityKey(value.to_string())
    }
}
impl From<&String> for EntityKey {
    fn from(value: &String) -> Self {
        EntityKey(value.to_string())
    }
}

/// The factory was asked for a key nobody registered. The persistence
/// collaborator decides what to do about it; the core doesn't guess.
#[derive(Debug, Error, PartialEq)]
#[error("unknown entity type \"{0}\"")]
pub struct UnknownTypeError(pub EntityKey);

type SynthFactoryFn = fn() -> Box<dyn Synthesizer>;
type EffectFactoryFn = fn() -> Box<dyn VisualEffect>;

/// [EntityFactory] accepts [EntityKey]s and creates synthesizers and
/// effects with default properties.
#[derive(Debug, Default)]
pub struct EntityFactory {
    synths: FxHashMap<EntityKey, SynthFactoryFn>,
    effects: FxHashMap<EntityKey, EffectFactoryFn>,

    is_registration_complete: bool,
    sorted_synth_keys: Vec<EntityKey>,
    sorted_effect_keys: Vec<EntityKey>,
}
impl EntityFactory {
    /// Registers a synthesizer type. Panics on a duplicate key or after
    /// registration completed; both are programming errors.
    pub fn register_synth(&mut self, key: EntityKey, f: SynthFactoryFn) {
        if self.is_registration_complete {
            panic!("attempt to register a synth after registration completed");
        }
        if self.synths.insert(key.clone(), f).is_some() {
            panic!("register_synth({key}): duplicate key");
        }
    }

    /// Registers an effect type. Same rules as [EntityFactory::register_synth].
    pub fn register_effect(&mut self, key: EntityKey, f: EffectFactoryFn) {
        if self.is_registration_complete {
            panic!("attempt to register an effect after registration completed");
        }
        if self.effects.insert(key.clone(), f).is_some() {
            panic!("register_effect({key}): duplicate key");
        }
    }

    /// Tells the factory that we won't be registering any more entities,
    /// allowing it to do some final housekeeping.
    pub fn complete_registration(&mut self) {
        self.is_registration_complete = true;
        self.sorted_synth_keys = self.synths.keys().cloned().collect();
        self.sorted_synth_keys.sort();
        self.sorted_effect_keys = self.effects.keys().cloned().collect();
        self.sorted_effect_keys.sort();
    }

    /// Creates a new synthesizer of the registered type.
    pub fn new_synth(&self, key: &EntityKey) -> Result<Box<dyn Synthesizer>, UnknownTypeError> {
        self.synths
            .get(key)
            .map(|f| f())
            .ok_or_else(|| UnknownTypeError(key.clone()))
    }

    /// Creates a new effect of the registered type.
    pub fn new_effect(&self, key: &EntityKey) -> Result<Box<dyn VisualEffect>, UnknownTypeError> {
        self.effects
            .get(key)
            .map(|f| f())
            .ok_or_else(|| UnknownTypeError(key.clone()))
    }

    /// All synth keys in sorted order, for stable display.
    pub fn synth_keys(&self) -> &[EntityKey] {
        if !self.is_registration_complete {
            panic!("synth_keys() can be called only after registration is complete");
        }
        &self.sorted_synth_keys
    }

    /// All effect keys in sorted order, for stable display.
    pub fn effect_keys(&self) -> &[EntityKey] {
        if !self.is_registration_complete {
            panic!("effect_keys() can be called only after registration is complete");
        }
        &self.sorted_effect_keys
    }
}

/// Registers every built-in entity. The function returns the factory rather
/// than operating on an `&mut`, encouraging one-and-done creation:
///
/// ```
/// use luminare::entities::{register_builtin_entities, EntityFactory};
///
/// let factory = register_builtin_entities(EntityFactory::default());
/// ```
#[must_use]
pub fn register_builtin_entities(mut factory: EntityFactory) -> EntityFactory {
    // Synthesizers
    factory.register_synth(EntityKey::from(BarSynth::KEY), || {
        Box::<BarSynth>::default()
    });
    factory.register_synth(EntityKey::from(BallSynth::KEY), || {
        Box::<BallSynth>::default()
    });
    factory.register_synth(EntityKey::from(CometSynth::KEY), || {
        Box::<CometSynth>::default()
    });
    factory.register_synth(EntityKey::from(GridSynth::KEY), || {
        Box::<GridSynth>::default()
    });
    factory.register_synth(EntityKey::from(PulseCubeSynth::KEY), || {
        Box::<PulseCubeSynth>::default()
    });
    factory.register_synth(EntityKey::from(RibbonSynth::KEY), || {
        Box::<RibbonSynth>::default()
    });
    factory.register_synth(EntityKey::from(RingSynth::KEY), || {
        Box::<RingSynth>::default()
    });
    factory.register_synth(EntityKey::from(StarfieldSynth::KEY), || {
        Box::<StarfieldSynth>::default()
    });
    factory.register_synth(EntityKey::from(TunnelSynth::KEY), || {
        Box::<TunnelSynth>::default()
    });
    factory.register_synth(EntityKey::from(WaveSynth::KEY), || {
        Box::<WaveSynth>::default()
    });

    // Effects
    factory.register_effect(EntityKey::from(ColorShiftEffect::KEY), || {
        Box::<ColorShiftEffect>::default()
    });
    factory.register_effect(EntityKey::from(EchoEffect::KEY), || {
        Box::<EchoEffect>::default()
    });
    factory.register_effect(EntityKey::from(JitterEffect::KEY), || {
        Box::<JitterEffect>::default()
    });
    factory.register_effect(EntityKey::from(LinearArrayEffect::KEY), || {
        Box::<LinearArrayEffect>::default()
    });
    factory.register_effect(EntityKey::from(MirrorEffect::KEY), || {
        Box::<MirrorEffect>::default()
    });
    factory.register_effect(EntityKey::from(OpacityEffect::KEY), || {
        Box::<OpacityEffect>::default()
    });
    factory.register_effect(EntityKey::from(PositionOffsetEffect::KEY), || {
        Box::<PositionOffsetEffect>::default()
    });
    factory.register_effect(EntityKey::from(PulseEffect::KEY), || {
        Box::<PulseEffect>::default()
    });
    factory.register_effect(EntityKey::from(RadialArrayEffect::KEY), || {
        Box::<RadialArrayEffect>::default()
    });
    factory.register_effect(EntityKey::from(RotateEffect::KEY), || {
        Box::<RotateEffect>::default()
    });
    factory.register_effect(EntityKey::from(ScaleEffect::KEY), || {
        Box::<ScaleEffect>::default()
    });
    factory.register_effect(EntityKey::from(StrobeEffect::KEY), || {
        Box::<StrobeEffect>::default()
    });

    factory.complete_registration();

    factory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{properties::PropertyValue, traits::HasProperties};

    #[test]
    fn factory_creates_registered_types() {
        let factory = register_builtin_entities(EntityFactory::default());
        let synth = factory.new_synth(&EntityKey::from("bars")).unwrap();
        assert_eq!(synth.type_key(), "bars");
        let effect = factory.new_effect(&EntityKey::from("echo")).unwrap();
        assert_eq!(effect.type_key(), "echo");
    }

    #[test]
    fn unknown_keys_are_typed_errors() {
        let factory = register_builtin_entities(EntityFactory::default());
        let err = factory
            .new_synth(&EntityKey::from("theremin"))
            .err()
            .unwrap();
        assert_eq!(err, UnknownTypeError(EntityKey::from("theremin")));
        assert!(factory.new_effect(&EntityKey::from("bars")).is_err());
    }

    #[test]
    fn each_creation_is_a_fresh_instance() {
        let factory = register_builtin_entities(EntityFactory::default());
        let key = EntityKey::from("scale");
        let mut a = factory.new_effect(&key).unwrap();
        let b = factory.new_effect(&key).unwrap();
        a.set_property("factor", PropertyValue::Float(7.0)).unwrap();
        assert_ne!(
            a.get_property("factor"),
            b.get_property("factor"),
            "factory instances must not share property storage"
        );
    }

    #[test]
    fn keys_are_sorted_and_complete() {
        let factory = register_builtin_entities(EntityFactory::default());
        assert_eq!(factory.synth_keys().len(), 10);
        assert_eq!(factory.effect_keys().len(), 12);
        let mut sorted = factory.effect_keys().to_vec();
        sorted.sort();
        assert_eq!(factory.effect_keys(), sorted.as_slice());
    }

    #[test]
    fn every_registered_key_matches_its_instance_type_key() {
        let factory = register_builtin_entities(EntityFactory::default());
        for key in factory.synth_keys() {
            assert_eq!(factory.new_synth(key).unwrap().type_key(), key.as_str());
        }
        for key in factory.effect_keys() {
            assert_eq!(factory.new_effect(key).unwrap().type_key(), key.as_str());
        }
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn duplicate_registration_panics() {
        let mut factory = EntityFactory::default();
        factory.register_synth(EntityKey::from("bars"), || Box::<BarSynth>::default());
        factory.register_synth(EntityKey::from("bars"), || Box::<BarSynth>::default());
    }
}
