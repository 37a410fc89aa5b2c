//! Finite state machines with timestamped transitions
//!
//! States and events are small `Copy` types (usually fieldless enums). Every
//! transition taken is recorded together with the time it happened, so
//! callers can tell when a machine changed state, not only that it did.
//!
//! A state with no outgoing transitions is terminal: events sent to it are
//! ignored and the machine stays put.

use smallvec::SmallVec;
use std::fmt::Debug;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
}

impl<S, E> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// A transition that was taken, with the time (ms) it was taken at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionRecord<S, E> {
    pub from: S,
    pub event: E,
    pub to: S,
    pub at_ms: f64,
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: SmallVec<[Transition<S, E>; 4]>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Debug,
    E: Copy + Eq + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: SmallVec::new(),
        }
    }

    /// Add a transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            history: SmallVec::new(),
        }
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: SmallVec<[Transition<S, E>; 4]>,
    history: SmallVec<[TransitionRecord<S, E>; 4]>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Debug,
    E: Copy + Eq + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Transitions taken so far, oldest first
    pub fn history(&self) -> &[TransitionRecord<S, E>] {
        &self.history
    }

    /// Check if an event can trigger a transition from the current state
    pub fn can_send(&self, event: E) -> bool {
        self.find(event).is_some()
    }

    /// Send an event at time `at_ms`.
    ///
    /// Returns the record of the transition taken, or `None` when the event
    /// has no transition from the current state.
    pub fn send(&mut self, event: E, at_ms: f64) -> Option<TransitionRecord<S, E>> {
        let transition = self.find(event)?;
        let record = TransitionRecord {
            from: transition.from_state,
            event,
            to: transition.to_state,
            at_ms,
        };

        tracing::trace!(from = ?record.from, to = ?record.to, event = ?event, at_ms, "state transition");
        self.current_state = record.to;
        self.history.push(record);
        Some(record)
    }

    fn find(&self, event: E) -> Option<Transition<S, E>> {
        let current = self.current_state;
        self.transitions
            .iter()
            .find(|t| t.from_state == current && t.event == event)
            .copied()
    }
}
