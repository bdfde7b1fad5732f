// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Per-track evaluation. A [Track] owns one synthesizer and one effect
//! chain; rendering folds the synth's output through the chain and keeps any
//! failure inside the track, so one broken entity can't take down the frame.

use crate::{
    composition::MidiBlock,
    cores::effects::EffectChain,
    render::VisualObject,
    traits::Synthesizer,
    types::{Beats, Tempo},
    uid::Uid,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// A track's pipeline failed at this frame. Other tracks are unaffected;
/// the host decides whether to show a placeholder or skip the track.
#[derive(Debug, Error)]
pub enum TrackRenderError {
    #[error("synthesizer or effect panicked: {0}")]
    EntityPanic(String),
}

/// One track's slice of the pipeline: a synthesizer, an ordered effect
/// chain, and a render boundary.
#[derive(Debug)]
pub struct Track {
    uid: Uid,
    name: String,
    synthesizer: Box<dyn Synthesizer>,
    effects: EffectChain,
}
impl Track {
    pub fn new_with(uid: Uid, name: &str, synthesizer: Box<dyn Synthesizer>) -> Self {
        Self {
            uid,
            name: name.to_string(),
            synthesizer,
            effects: EffectChain::default(),
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn synthesizer(&self) -> &dyn Synthesizer {
        self.synthesizer.as_ref()
    }

    pub fn synthesizer_mut(&mut self) -> &mut Box<dyn Synthesizer> {
        &mut self.synthesizer
    }

    /// Swaps in a different synthesizer, discarding the old instance. This is
    /// the type-switch path; property edits instead replace the instance with
    /// a configured `make_another()`.
    pub fn set_synthesizer(&mut self, synthesizer: Box<dyn Synthesizer>) {
        self.synthesizer = synthesizer;
    }

    pub fn effects(&self) -> &EffectChain {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectChain {
        &mut self.effects
    }

    /// Evaluates this track at `time`: synthesize, then fold through the
    /// effect chain. A panic anywhere in the pipeline is caught here and
    /// surfaced as a [TrackRenderError] instead of unwinding into the caller,
    /// so sibling tracks still render their frame.
    pub fn render(
        &mut self,
        time: Beats,
        blocks: &[MidiBlock],
        tempo: Tempo,
    ) -> Result<Vec<VisualObject>, TrackRenderError> {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let objects = self.synthesizer.synthesize(time, blocks, tempo);
            self.effects.evaluate(objects, time, tempo)
        }));
        match result {
            Ok(objects) => Ok(objects),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                log::warn!("track {} ({}) failed to render: {message}", self.uid, self.name);
                Err(TrackRenderError::EntityPanic(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cores::{
            effects::ScaleEffect,
            synths::{tests::single_note_blocks, BarSynth},
        },
        impl_has_properties,
        properties::PropertySet,
    };

    /// A synthesizer that panics on every call, standing in for a buggy
    /// third-party entity.
    #[derive(Clone, Debug, Default)]
    struct FaultySynth {
        props: PropertySet,
    }
    impl_has_properties!(FaultySynth);
    impl Synthesizer for FaultySynth {
        fn type_key(&self) -> &'static str {
            "faulty"
        }

        fn synthesize(
            &self,
            _time: Beats,
            _blocks: &[MidiBlock],
            _tempo: Tempo,
        ) -> Vec<VisualObject> {
            panic!("synth exploded");
        }

        fn make_another(&self) -> Box<dyn Synthesizer> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn track_renders_through_its_chain() {
        let mut track = Track::new_with(Uid(1), "lead", Box::<BarSynth>::default());
        track.effects_mut().push(&ScaleEffect::new_with(2.0));
        let objects = track
            .render(Beats(2.0), &single_note_blocks(), Tempo(60.0))
            .unwrap();
        assert!(!objects.is_empty());
    }

    #[test]
    fn panic_is_contained_at_the_track_boundary() {
        let mut faulty = Track::new_with(Uid(1), "broken", Box::<FaultySynth>::default());
        let mut healthy = Track::new_with(Uid(2), "fine", Box::<BarSynth>::default());
        let blocks = single_note_blocks();

        let err = faulty.render(Beats(2.0), &blocks, Tempo(60.0));
        assert!(matches!(err, Err(TrackRenderError::EntityPanic(_))));
        if let Err(e) = err {
            assert!(e.to_string().contains("synth exploded"));
        }

        // The sibling track is untouched by the neighbor's failure.
        assert!(healthy.render(Beats(2.0), &blocks, Tempo(60.0)).is_ok());
    }

    #[test]
    fn set_synthesizer_discards_the_old_instance() {
        let mut track = Track::new_with(Uid(1), "lead", Box::<BarSynth>::default());
        track.set_synthesizer(Box::<FaultySynth>::default());
        assert_eq!(track.synthesizer().type_key(), "faulty");
    }
}
