//! Entrance animation of a freshly mounted badge
//!
//! A mounted badge starts half a turn away from its rest orientation and
//! holds there. After the mount delay the phase machine flips to
//! [`AnimationPhase::Entered`] and the rotation is retargeted to rest; after
//! the motion-start delay the spring is released and swings the badge into
//! place.
//!
//! Both delays are cues on a single [`Timeline`], so tearing the view down
//! cancels every pending step at once.

use badge_animation::{AnimationScheduler, Spring, SpringId, Timeline, TimelineState};
use badge_core::fsm::{StateMachine, TransitionRecord};

use crate::config::AnimationConfig;

/// Phase of a mounted badge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Mounted, waiting out the mount delay; pointer input is ignored
    PreEntrance,
    /// Entrance triggered; pointer input drives the secondary rotation
    Entered,
}

impl AnimationPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationPhase::PreEntrance => "pre-entrance",
            AnimationPhase::Entered => "entered",
        }
    }
}

/// Events driving the phase machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    MountDelayElapsed,
}

/// Cues on the entrance timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntranceCue {
    MountDelayElapsed,
    MotionStart,
}

/// What changed during one [`EntranceAnimator::advance`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntranceUpdate {
    /// The phase flipped to `Entered` during this advance
    pub entered: bool,
    /// The entrance spring was released during this advance
    pub motion_started: bool,
}

/// Drives the one-shot entrance rotation of a mounted badge
#[derive(Debug)]
pub struct EntranceAnimator {
    phase: StateMachine<AnimationPhase, PhaseEvent>,
    timeline: Timeline<EntranceCue>,
    spring: SpringId,
    rest_angle: f32,
}

impl EntranceAnimator {
    /// Start the entrance: a held spring at the initial angle and a running
    /// cue timeline.
    pub fn mount(config: &AnimationConfig, scheduler: &mut AnimationScheduler) -> Self {
        let spring = scheduler.add_held_spring(Spring::new(config.entrance_spring, config.initial_angle));

        let mount_delay = config.mount_delay_ms as f64;
        let mut timeline = Timeline::new();
        timeline.add(mount_delay, EntranceCue::MountDelayElapsed);
        timeline.add(
            mount_delay + config.motion_start_delay_ms as f64,
            EntranceCue::MotionStart,
        );
        timeline.start();

        let phase = StateMachine::builder(AnimationPhase::PreEntrance)
            .on(
                AnimationPhase::PreEntrance,
                PhaseEvent::MountDelayElapsed,
                AnimationPhase::Entered,
            )
            .build();

        Self {
            phase,
            timeline,
            spring,
            rest_angle: config.rest_angle,
        }
    }

    /// Advance the timeline by `dt_ms` and apply every cue it crosses.
    ///
    /// Call after stepping `scheduler` for the same interval. A spring
    /// released partway through the interval is stepped here for the time
    /// after its cue only.
    pub fn advance(&mut self, dt_ms: f64, scheduler: &mut AnimationScheduler) -> EntranceUpdate {
        let mut update = EntranceUpdate::default();
        for (cue, at_ms) in self.timeline.tick(dt_ms) {
            if !self.handle_cue(cue, at_ms, scheduler) {
                continue;
            }
            match cue {
                EntranceCue::MountDelayElapsed => update.entered = true,
                EntranceCue::MotionStart => {
                    let moving_ms = (self.timeline.elapsed_ms() - at_ms).max(0.0);
                    scheduler.step_spring(self.spring, (moving_ms / 1000.0) as f32);
                    update.motion_started = true;
                }
            }
        }
        update
    }

    /// Apply a cue at elapsed time `at_ms`.
    ///
    /// Returns false when the cue has no effect: the phase already flipped,
    /// or the spring is already moving.
    pub fn handle_cue(&mut self, cue: EntranceCue, at_ms: f64, scheduler: &mut AnimationScheduler) -> bool {
        match cue {
            EntranceCue::MountDelayElapsed => {
                let Some(record) = self.phase.send(PhaseEvent::MountDelayElapsed, at_ms) else {
                    tracing::trace!(at_ms, "entrance already triggered");
                    return false;
                };
                scheduler.set_target(self.spring, self.rest_angle);
                tracing::debug!(at_ms = record.at_ms, target = self.rest_angle, "badge entered");
                true
            }
            EntranceCue::MotionStart => {
                if !self.phase.is_in(AnimationPhase::Entered) || !scheduler.is_held(self.spring) {
                    return false;
                }
                scheduler.release(self.spring);
                tracing::debug!(at_ms, "entrance motion started");
                true
            }
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase.current_state()
    }

    /// Elapsed time (ms since mount) at which the phase flipped
    pub fn entered_at_ms(&self) -> Option<f64> {
        self.phase
            .history()
            .iter()
            .find(|record| record.to == AnimationPhase::Entered)
            .map(|record| record.at_ms)
    }

    pub fn transitions(&self) -> &[TransitionRecord<AnimationPhase, PhaseEvent>] {
        self.phase.history()
    }

    /// Current entrance rotation in radians
    pub fn angle(&self, scheduler: &AnimationScheduler) -> f32 {
        scheduler.value(self.spring).unwrap_or(self.rest_angle)
    }

    pub fn target(&self, scheduler: &AnimationScheduler) -> f32 {
        scheduler
            .get_spring(self.spring)
            .map(Spring::target)
            .unwrap_or(self.rest_angle)
    }

    /// Whether the entrance spring is still waiting for the motion-start cue
    pub fn is_holding(&self, scheduler: &AnimationScheduler) -> bool {
        scheduler.is_held(self.spring)
    }

    /// Drop every pending cue
    pub fn cancel(&mut self) {
        self.timeline.cancel();
    }

    pub fn timeline_state(&self) -> TimelineState {
        self.timeline.state()
    }

    /// Milliseconds since mount, as seen by the timeline
    pub fn elapsed_ms(&self) -> f64 {
        self.timeline.elapsed_ms()
    }
}
