// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The traits that define the pluggable parts of the synthesis pipeline.

use crate::{
    composition::MidiBlock,
    properties::{PropertySet, PropertyValue},
    render::VisualObject,
    types::{Beats, Tempo},
};
use std::fmt::Debug;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{HasProperties, Synthesizer, VisualEffect};
}

/// Access to an entity's declared [PropertySet]. This is the only way any
/// caller (UI, persistence, tests) reads or writes configuration; there is
/// no per-type branching anywhere else.
pub trait HasProperties: Debug {
    fn property_set(&self) -> &PropertySet;
    fn property_set_mut(&mut self) -> &mut PropertySet;

    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        self.property_set().get(name).map(|p| p.value.clone())
    }

    /// Sets one property value. Unknown names are an error; values outside
    /// the advisory bounds are accepted.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> anyhow::Result<()> {
        self.property_set_mut().set_value(name, value)
    }

    /// The ordered name/plain-value pairs for the persistence boundary.
    fn serialize_properties(&self) -> Vec<(String, PropertyValue)> {
        self.property_set().serialized()
    }

    /// The inverse of [HasProperties::serialize_properties]: missing names
    /// keep their defaults, unknown names are ignored.
    fn apply_serialized_properties(&mut self, entries: &[(String, PropertyValue)]) {
        self.property_set_mut().apply_serialized(entries);
    }
}

/// A [Synthesizer] converts the notes active at a query time into visual
/// object descriptors. It is a pure function of its arguments and its own
/// configuration: same inputs, same output, every time, in any order of
/// calls.
pub trait Synthesizer: HasProperties + Send {
    /// The factory key this instance was (or could have been) created under.
    fn type_key(&self) -> &'static str;

    /// Produces the objects for all notes in `blocks` that are active at
    /// `time`, including notes still inside their release tail. Malformed
    /// blocks and notes are treated as never active.
    fn synthesize(&self, time: Beats, blocks: &[MidiBlock], tempo: Tempo) -> Vec<VisualObject>;

    /// Makes a new instance carrying this one's configuration. Like
    /// [Clone], but smarter: properties are value-copied, while any per-frame
    /// cache stays behind. Callers replace an instance with a fresh
    /// `make_another()` whenever a property changes, so reference equality
    /// doubles as change detection.
    fn make_another(&self) -> Box<dyn Synthesizer>;
}

/// A [VisualEffect] transforms a list of visual objects into a new list. It
/// may move, recolor, duplicate, or drop objects, but it never mutates its
/// input: every changed object is a fresh value.
///
/// Effects are applied in chain order, and order matters: offset-then-scale
/// is not scale-then-offset.
pub trait VisualEffect: HasProperties + Send {
    /// The factory key this instance was (or could have been) created under.
    fn type_key(&self) -> &'static str;

    /// Transforms `objects` at the given time. Takes `&mut self` because some
    /// effects (delay lines) keep private temporal buffers; pure effects
    /// simply don't touch theirs.
    fn apply(&mut self, objects: &[VisualObject], time: Beats, tempo: Tempo) -> Vec<VisualObject>;

    /// Makes a new instance carrying this one's configuration. A stateful
    /// effect's clone starts with empty buffers: a clone is a new
    /// configuration, not a temporal continuation.
    fn make_another(&self) -> Box<dyn VisualEffect>;
}

/// Implements [HasProperties] for a type whose property set lives in a
/// `props` field, which is every entity in this crate.
#[macro_export]
macro_rules! impl_has_properties {
    ($t:ty) => {
        impl $crate::traits::HasProperties for $t {
            fn property_set(&self) -> &$crate::properties::PropertySet {
                &self.props
            }
            fn property_set_mut(&mut self) -> &mut $crate::properties::PropertySet {
                &mut self.props
            }
        }
    };
}
