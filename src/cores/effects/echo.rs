// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::VisualObject,
    traits::VisualEffect,
    types::{Beats, Normal, Tempo},
};

/// One buffered snapshot: the object as it looked when it arrived, and the
/// absolute time it arrived.
#[derive(Clone, Debug)]
struct EchoEntry {
    object: VisualObject,
    emission: Beats,
}

/// The delay line of the visual world: objects that pass through reappear as
/// fading copies every `delay` beats, up to `copies` times, each scaled by
/// `feedback^k` in opacity.
///
/// This is the one stateful effect in the crate. The buffer is keyed by
/// absolute emission time, not by call order, so non-monotonic query times
/// don't corrupt it. Seeking backwards after echoes were buffered can still
/// resurface them, since their scheduled times become due again.
#[derive(Debug)]
pub struct EchoEffect {
    props: PropertySet,
    buffer: Vec<EchoEntry>,
}
impl EchoEffect {
    pub const KEY: &'static str = "echo";

    pub const DELAY: &'static str = "delay";
    pub const FEEDBACK: &'static str = "feedback";
    pub const COPIES: &'static str = "copies";

    pub const DEFAULT_DELAY_BEATS: f64 = 0.5;

    /// How close (in beats) a scheduled echo time must be to the query time
    /// to fire. Frame queries are fractional, so exact equality would never
    /// match.
    pub const MATCH_TOLERANCE: f64 = 0.05;

    pub fn new_with(delay: f64, feedback: f64, copies: i64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::DELAY, PropertyValue::Float(delay));
        e.props.update(Self::FEEDBACK, PropertyValue::Float(feedback));
        e.props.update(Self::COPIES, PropertyValue::Int(copies));
        e
    }

    /// Number of buffered snapshots. Exposed for tests and diagnostics.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}
impl Default for EchoEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::DELAY,
                    PropertyValue::Float(Self::DEFAULT_DELAY_BEATS),
                    PropertyMetadata::slider("Delay (beats)", 0.1, 4.0, 0.1),
                )
                .with(
                    Self::FEEDBACK,
                    PropertyValue::Float(0.6),
                    PropertyMetadata::slider("Feedback", 0.0, 1.0, 0.05),
                )
                .with(
                    Self::COPIES,
                    PropertyValue::Int(3),
                    PropertyMetadata::slider("Copies", 1.0, 8.0, 1.0),
                ),
            buffer: Vec::default(),
        }
    }
}
impl_has_properties!(EchoEffect);
impl VisualEffect for EchoEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let delay = self.props.float(Self::DELAY);
        let feedback = self.props.float(Self::FEEDBACK);
        let copies = self.props.int(Self::COPIES).max(0);

        let mut out: Vec<VisualObject> = objects.to_vec();

        // A delay inside the match window would echo an object onto itself
        // forever; treat it as a passthrough.
        if delay <= Self::MATCH_TOLERANCE || copies == 0 {
            return out;
        }

        // (a) Snapshot the incoming objects at this emission time.
        self.buffer.extend(objects.iter().map(|o| EchoEntry {
            object: o.clone(),
            emission: time,
        }));

        // (b) Emit every copy whose scheduled time matches now.
        for entry in &self.buffer {
            for k in 1..=copies {
                let scheduled = entry.emission.0 + k as f64 * delay;
                if (time.0 - scheduled).abs() <= Self::MATCH_TOLERANCE {
                    let opacity =
                        Normal::new(entry.object.opacity().0 * feedback.powi(k as i32));
                    out.push(entry.object.clone().with_opacity(opacity));
                }
            }
        }

        // (c) Drop entries whose last possible echo has passed, bounding
        // memory no matter how long the transport runs.
        self.buffer.retain(|entry| {
            entry.emission.0 + copies as f64 * delay >= time.0 - Self::MATCH_TOLERANCE
        });

        out
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        // Configuration travels; the temporal buffer does not. A clone is a
        // new configuration, not a continuation.
        Box::new(Self {
            props: self.props.clone(),
            buffer: Vec::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{assert_input_unchanged, origin_object};
    use super::*;
    use float_cmp::approx_eq;
    use more_asserts::assert_le;

    #[test]
    fn echo_never_mutates_input() {
        assert_input_unchanged(&mut EchoEffect::new_with(0.5, 0.6, 3));
    }

    #[test]
    fn echoes_fire_at_multiples_of_the_delay() {
        let mut effect = EchoEffect::new_with(1.0, 0.5, 2);
        let tempo = Tempo(120.0);

        // Beat 0: one object in, nothing due yet.
        let out = effect.apply(&[origin_object()], Beats(0.0), tempo);
        assert_eq!(out.len(), 1);

        // Beat 0.5: no input, nothing scheduled.
        let out = effect.apply(&[], Beats(0.5), tempo);
        assert!(out.is_empty());

        // Beat 1: first echo, opacity scaled by feedback^1.
        let out = effect.apply(&[], Beats(1.0), tempo);
        assert_eq!(out.len(), 1);
        assert!(approx_eq!(f64, out[0].opacity().0, 0.5, epsilon = 1e-9));

        // Beat 2: second echo, feedback^2.
        let out = effect.apply(&[], Beats(2.0), tempo);
        assert_eq!(out.len(), 1);
        assert!(approx_eq!(f64, out[0].opacity().0, 0.25, epsilon = 1e-9));

        // Beat 3: past the last copy; silent and the buffer is drained.
        let out = effect.apply(&[], Beats(3.0), tempo);
        assert!(out.is_empty());
        assert_eq!(effect.buffered_len(), 0);
    }

    #[test]
    fn echoes_match_within_tolerance() {
        let mut effect = EchoEffect::new_with(1.0, 0.5, 2);
        let tempo = Tempo(120.0);
        let _ = effect.apply(&[origin_object()], Beats(0.0), tempo);
        // A frame lands slightly off the exact echo time.
        let out = effect.apply(&[], Beats(1.0 + EchoEffect::MATCH_TOLERANCE / 2.0), tempo);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn pruning_bounds_the_buffer() {
        let mut effect = EchoEffect::new_with(0.5, 0.6, 3);
        let tempo = Tempo(120.0);
        for frame in 0..200 {
            let time = Beats(frame as f64 * 0.1);
            let _ = effect.apply(&[origin_object()], time, tempo);
            // Entries older than copies*delay = 1.5 beats must be gone, so
            // the buffer can never hold more than ~16 frames of history.
            assert_le!(effect.buffered_len(), 17);
        }
    }

    #[test]
    fn clone_starts_with_an_empty_buffer() {
        let mut effect = EchoEffect::new_with(1.0, 0.5, 2);
        let _ = effect.apply(&[origin_object()], Beats(0.0), Tempo(120.0));
        assert_eq!(effect.buffered_len(), 1);

        // The copy has the same configuration but no buffered history, so
        // the echo that the original would emit at beat 1 doesn't exist.
        let mut copy = effect.make_another();
        let out = copy.apply(&[], Beats(1.0), Tempo(120.0));
        assert!(out.is_empty());
    }

    #[test]
    fn degenerate_delay_is_a_passthrough() {
        let mut effect = EchoEffect::new_with(0.0, 0.9, 4);
        let out = effect.apply(&[origin_object()], Beats(0.0), Tempo(120.0));
        assert_eq!(out.len(), 1);
        assert_eq!(effect.buffered_len(), 0);
    }

    #[test]
    fn backward_seek_can_resurface_buffered_echoes() {
        // Documented behavior for the open question: buffers are keyed by
        // absolute emission time, so a backward seek makes old schedules due
        // again.
        let mut effect = EchoEffect::new_with(1.0, 0.5, 2);
        let tempo = Tempo(120.0);
        let _ = effect.apply(&[origin_object()], Beats(0.0), tempo);
        let first = effect.apply(&[], Beats(1.0), tempo);
        assert_eq!(first.len(), 1);
        // Seek back before the echo and play through it again.
        let replay = effect.apply(&[], Beats(1.0), tempo);
        assert_eq!(replay.len(), 1);
    }
}
