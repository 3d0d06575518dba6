//! Timed cue playback
//!
//! The simulation never waits. Delayed sounds and panels come out as
//! `GameEvent::Cue { cue, delay }` and the presentation layer queues them
//! here, advancing with the same frame deltas it feeds the game.

use super::state::{Cue, GameEvent};

#[derive(Debug, Clone, Copy)]
struct Pending {
    cue: Cue,
    /// Seconds until due
    remaining: f32,
    /// Insertion order, keeps equal-time cues stable
    seq: u64,
}

/// Queue of cues waiting for their delay to elapse
#[derive(Debug, Clone, Default)]
pub struct CueScheduler {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl CueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a cue to fire after `delay` seconds (negative means now)
    pub fn push(&mut self, cue: Cue, delay: f32) {
        let remaining = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.pending.push(Pending {
            cue,
            remaining,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Queue every cue in an event batch; other events are ignored
    pub fn extend_from_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if let GameEvent::Cue { cue, delay } = *event {
                self.push(cue, delay);
            }
        }
    }

    /// Advance time and return the cues that came due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<Cue> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        for pending in &mut self.pending {
            pending.remaining -= dt;
        }

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.remaining <= 0.0 {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|p| p.cue).collect()
    }

    /// Drop everything queued (restart, scene unload)
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
