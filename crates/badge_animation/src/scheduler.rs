//! Animation scheduler
//!
//! Owns the springs of one animated object and steps them each frame.
//! A spring can be held: it keeps its value and target but is not stepped
//! until released.

use crate::spring::Spring;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct SpringId;
}

#[derive(Debug)]
struct ScheduledSpring {
    spring: Spring,
    held: bool,
}

/// Steps a set of springs with a shared frame delta
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, ScheduledSpring>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            springs: SlotMap::with_key(),
        }
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringId {
        self.springs.insert(ScheduledSpring {
            spring,
            held: false,
        })
    }

    /// Add a spring that is not stepped until [`release`](Self::release)d
    pub fn add_held_spring(&mut self, spring: Spring) -> SpringId {
        self.springs.insert(ScheduledSpring { spring, held: true })
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id).map(|s| &s.spring)
    }

    /// Current value of a spring
    pub fn value(&self, id: SpringId) -> Option<f32> {
        self.get_spring(id).map(Spring::value)
    }

    /// Run a closure against a spring, if it exists
    pub fn with_spring_mut<R>(&mut self, id: SpringId, f: impl FnOnce(&mut Spring) -> R) -> Option<R> {
        self.springs.get_mut(id).map(|s| f(&mut s.spring))
    }

    /// Retarget a spring. Returns false if the spring does not exist.
    pub fn set_target(&mut self, id: SpringId, target: f32) -> bool {
        self.with_spring_mut(id, |spring| spring.set_target(target))
            .is_some()
    }

    /// Let a held spring start moving
    pub fn release(&mut self, id: SpringId) {
        if let Some(scheduled) = self.springs.get_mut(id) {
            scheduled.held = false;
        }
    }

    pub fn is_held(&self, id: SpringId) -> bool {
        self.springs.get(id).is_some_and(|s| s.held)
    }

    pub fn remove_spring(&mut self, id: SpringId) -> Option<Spring> {
        self.springs.remove(id).map(|s| s.spring)
    }

    /// Step every released spring by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        for (_, scheduled) in self.springs.iter_mut() {
            if !scheduled.held {
                scheduled.spring.step(dt);
            }
        }
    }

    /// Step a single spring by `dt` seconds, held or not
    pub fn step_spring(&mut self, id: SpringId, dt: f32) -> bool {
        self.with_spring_mut(id, |spring| spring.step(dt)).is_some()
    }

    /// Check if any released spring is still moving
    pub fn has_active_animations(&self) -> bool {
        self.springs
            .values()
            .any(|s| !s.held && !s.spring.is_settled())
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Drop every spring
    pub fn clear(&mut self) {
        self.springs.clear();
    }
}
