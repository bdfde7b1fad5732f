// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The serializable project document and its round trip through the
//! [EntityFactory](crate::entities::EntityFactory). The core does no I/O;
//! the persistence collaborator hands a deserialized [Project] in and gets a
//! snapshot back out.

use crate::{
    composition::MidiBlock,
    entities::{EntityFactory, EntityKey},
    orchestration::Track,
    properties::PropertyValue,
    traits::{HasProperties, Synthesizer, VisualEffect},
    types::Tempo,
    uid::UidFactory,
};
use serde::{Deserialize, Serialize};

/// A persisted synthesizer or effect: its factory key and the ordered
/// property values that differ from (or restate) the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EntitySpec {
    pub key: String,
    #[serde(default)]
    pub properties: Vec<(String, PropertyValue)>,
}
impl EntitySpec {
    pub fn from_synth(synth: &dyn Synthesizer) -> Self {
        Self {
            key: synth.type_key().to_string(),
            properties: synth.serialize_properties(),
        }
    }

    pub fn from_effect(effect: &dyn VisualEffect) -> Self {
        Self {
            key: effect.type_key().to_string(),
            properties: effect.serialize_properties(),
        }
    }

    /// Mints a synthesizer from the factory and applies the stored
    /// properties. Missing names keep defaults; unknown names are ignored.
    pub fn create_synth(&self, factory: &EntityFactory) -> anyhow::Result<Box<dyn Synthesizer>> {
        let mut synth = factory.new_synth(&EntityKey::from(&self.key))?;
        synth.apply_serialized_properties(&self.properties);
        Ok(synth)
    }

    /// Mints an effect from the factory and applies the stored properties.
    pub fn create_effect(&self, factory: &EntityFactory) -> anyhow::Result<Box<dyn VisualEffect>> {
        let mut effect = factory.new_effect(&EntityKey::from(&self.key))?;
        effect.apply_serialized_properties(&self.properties);
        Ok(effect)
    }
}

/// A persisted track: synthesizer, ordered effects, and the MIDI blocks the
/// editor placed on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackSpec {
    pub name: String,
    pub synthesizer: EntitySpec,
    #[serde(default)]
    pub effects: Vec<EntitySpec>,
    #[serde(default)]
    pub blocks: Vec<MidiBlock>,
}

/// The whole document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Project {
    pub title: String,
    pub tempo: Tempo,
    #[serde(default)]
    pub tracks: Vec<TrackSpec>,
}

/// A [Track] ready to render, paired with its note data.
#[derive(Debug)]
pub struct RealizedTrack {
    pub track: Track,
    pub blocks: Vec<MidiBlock>,
}

impl Project {
    /// Builds live tracks from the document. Fails on the first unknown
    /// entity key; the caller decides whether that's fatal or worth retrying
    /// with the offending entity dropped.
    pub fn instantiate(&self, factory: &EntityFactory) -> anyhow::Result<Vec<RealizedTrack>> {
        let uids = UidFactory::default();
        let mut realized = Vec::with_capacity(self.tracks.len());
        for spec in &self.tracks {
            let mut track = Track::new_with(
                uids.mint_next(),
                &spec.name,
                spec.synthesizer.create_synth(factory)?,
            );
            for effect_spec in &spec.effects {
                track
                    .effects_mut()
                    .push_instance(effect_spec.create_effect(factory)?);
            }
            realized.push(RealizedTrack {
                track,
                blocks: spec.blocks.clone(),
            });
        }
        Ok(realized)
    }

    /// The inverse of [Project::instantiate]: captures live tracks back into
    /// a document.
    pub fn snapshot(title: &str, tempo: Tempo, tracks: &[RealizedTrack]) -> Self {
        Self {
            title: title.to_string(),
            tempo,
            tracks: tracks
                .iter()
                .map(|rt| TrackSpec {
                    name: rt.track.name().to_string(),
                    synthesizer: EntitySpec::from_synth(rt.track.synthesizer()),
                    effects: rt
                        .track
                        .effects()
                        .iter()
                        .map(|e| EntitySpec::from_effect(e.as_ref()))
                        .collect(),
                    blocks: rt.blocks.clone(),
                })
                .collect(),
        }
    }
}
