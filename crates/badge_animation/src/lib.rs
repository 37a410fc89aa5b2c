//! Badge Animation System
//!
//! Spring physics, per-object scheduling, and cue timelines.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Scheduling**: springs stepped together per frame, optionally held
//! - **Timelines**: one-shot cues at fixed offsets, cancellable as a unit
//! - **Interruptible**: retargeted springs keep their velocity

pub mod scheduler;
pub mod spring;
pub mod timeline;

pub use scheduler::{AnimationScheduler, SpringId};
pub use spring::{Spring, SpringConfig};
pub use timeline::{CueId, Timeline, TimelineState};
