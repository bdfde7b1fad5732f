// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Luminare turns MIDI notes into visuals. For any query time, a per-track
//! [Synthesizer](crate::traits::Synthesizer) maps the notes active in that
//! track's blocks to renderable 3D-object descriptors, and an ordered chain
//! of [VisualEffect](crate::traits::VisualEffect)s transforms the list before
//! it crosses to the renderer.
//!
//! The whole pipeline is a pure function of (time, note data,
//! configuration): no I/O, no playback clock, no hidden state apart from the
//! explicitly stateful delay-style effects. Tracks are independent, so hosts
//! may evaluate them in parallel.

/// The note data model that synthesizers read.
pub mod composition;
/// The concrete synthesizers and effects that ship with the crate.
pub mod cores;
/// Color values and HSL conversions.
pub mod colors;
/// Building blocks that synthesizers share.
pub mod elements;
/// The type factory at the persistence boundary.
pub mod entities;
/// Per-track evaluation and error isolation.
pub mod orchestration;
/// The serializable project document.
pub mod project;
/// The property model: the one configuration surface for every entity.
pub mod properties;
/// The renderer-facing output contract.
pub mod render;
/// A seeded random-number generator for reproducible scatter.
pub mod rng;
/// The traits that define the pluggable parts of the pipeline.
pub mod traits;
/// Common value types.
pub mod types;
/// Unique identifiers.
pub mod uid;

/// A collection of imports that are useful to users of this crate.
pub mod prelude {
    pub use crate::{
        colors::Color,
        composition::{MidiBlock, MidiBlockBuilder, MidiNote},
        cores::{
            effects::{
                ColorShiftEffect, EchoEffect, EffectChain, JitterEffect, LinearArrayEffect,
                MirrorEffect, OpacityEffect, PositionOffsetEffect, PulseEffect,
                RadialArrayEffect, RotateEffect, ScaleEffect, StrobeEffect,
            },
            synths::{
                active_notes, ActiveNote, BallSynth, BarSynth, CometSynth, GridSynth,
                PulseCubeSynth, RibbonSynth, RingSynth, StarfieldSynth, TunnelSynth, WaveSynth,
                MIN_VISIBLE_AMPLITUDE,
            },
        },
        elements::EnvelopeParams,
        entities::{register_builtin_entities, EntityFactory, EntityKey, UnknownTypeError},
        orchestration::{Track, TrackRenderError},
        project::{EntitySpec, Project, RealizedTrack, TrackSpec},
        properties::{Property, PropertyMetadata, PropertySet, PropertyValue, UiType},
        render::{ObjectKind, ObjectProperties, Scale, VisualObject},
        rng::Rng,
        traits::prelude::*,
        types::{Beats, Normal, Seconds, Tempo},
        uid::{Uid, UidFactory},
    };
}
