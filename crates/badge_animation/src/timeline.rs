//! Cue timelines
//!
//! A [`Timeline`] holds cues at fixed offsets from its start. Advancing the
//! timeline returns the cues whose offsets were crossed, each exactly once.
//! Cancelling the timeline drops every pending cue as a unit; a cancelled
//! timeline never fires again.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct CueId;
}

/// Lifecycle of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineState {
    /// Created but not started
    Idle,
    /// Advancing with each tick
    Playing,
    /// Every cue has fired
    Finished,
    /// Cancelled before finishing; pending cues were discarded
    Cancelled,
}

/// An entry in a timeline
#[derive(Clone, Debug)]
struct TimelineEntry<C> {
    /// Offset in milliseconds from timeline start
    offset_ms: f64,
    cue: C,
    fired: bool,
}

/// A cancellable schedule of one-shot cues
#[derive(Clone, Debug)]
pub struct Timeline<C> {
    entries: SlotMap<CueId, TimelineEntry<C>>,
    current_time: f64,
    state: TimelineState,
}

impl<C: Copy> Timeline<C> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            current_time: 0.0,
            state: TimelineState::Idle,
        }
    }

    /// Add a cue at `offset_ms` from the timeline start
    pub fn add(&mut self, offset_ms: f64, cue: C) -> CueId {
        self.entries.insert(TimelineEntry {
            offset_ms: offset_ms.max(0.0),
            cue,
            fired: false,
        })
    }

    /// Start playing from time zero. Has no effect once started or cancelled.
    pub fn start(&mut self) {
        if self.state == TimelineState::Idle {
            self.current_time = 0.0;
            self.state = TimelineState::Playing;
        }
    }

    /// Discard all pending cues
    pub fn cancel(&mut self) {
        if matches!(self.state, TimelineState::Idle | TimelineState::Playing) {
            tracing::trace!(
                at_ms = self.current_time,
                dropped = self.pending(),
                "timeline cancelled"
            );
            self.state = TimelineState::Cancelled;
        }
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TimelineState::Playing
    }

    /// Milliseconds elapsed since start
    pub fn elapsed_ms(&self) -> f64 {
        self.current_time
    }

    /// Number of cues that have not fired yet
    pub fn pending(&self) -> usize {
        if self.state == TimelineState::Cancelled {
            return 0;
        }
        self.entries.values().filter(|e| !e.fired).count()
    }

    /// Whether a cue has fired
    pub fn has_fired(&self, id: CueId) -> bool {
        self.entries.get(id).is_some_and(|e| e.fired)
    }

    /// Advance the timeline and collect the cues crossed, in offset order
    pub fn tick(&mut self, dt_ms: f64) -> SmallVec<[(C, f64); 2]> {
        let mut fired: SmallVec<[(C, f64); 2]> = SmallVec::new();
        if self.state != TimelineState::Playing {
            return fired;
        }

        if dt_ms > 0.0 {
            self.current_time += dt_ms;
        }

        for entry in self.entries.values_mut() {
            if !entry.fired && entry.offset_ms <= self.current_time {
                entry.fired = true;
                fired.push((entry.cue, entry.offset_ms));
            }
        }
        fired.sort_by(|a, b| a.1.total_cmp(&b.1));
        if !fired.is_empty() {
            tracing::trace!(at_ms = self.current_time, fired = fired.len(), "timeline cues fired");
        }

        if self.entries.values().all(|e| e.fired) {
            self.state = TimelineState::Finished;
        }

        fired
    }
}

impl<C: Copy> Default for Timeline<C> {
    fn default() -> Self {
        Self::new()
    }
}
