//! Pointer-driven secondary rotation
//!
//! While subscribed, pointer movement over the render surface sets tilt and
//! yaw targets proportional to the pointer's offset from the surface center.
//! Two springs chase those targets so the badge follows the pointer smoothly.

use badge_animation::{AnimationScheduler, Spring, SpringConfig, SpringId};
use badge_core::events::{event_types, EventDispatcher, ListenerId, RenderSurface, SurfaceId};
use badge_core::geometry::{Point, Rect};
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

use crate::config::PointerConfig;

/// Pointer position normalized to the surface, `[-1, 1]` on both axes with
/// `+y` pointing up
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub const NEUTRAL: PointerSample = PointerSample { x: 0.0, y: 0.0 };

    /// Normalize a client-space position against the surface rectangle.
    ///
    /// Returns `None` when the surface has no drawable area or the position
    /// is not finite. Positions outside the rectangle are clamped to its edge.
    pub fn from_client(point: Point, bounds: Rect) -> Option<Self> {
        if !bounds.size.is_drawable() || !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let x = ((point.x - bounds.x()) / bounds.width()) * 2.0 - 1.0;
        let y = -((point.y - bounds.y()) / bounds.height()) * 2.0 + 1.0;
        Some(Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        })
    }
}

/// Rotation targets derived from the latest pointer sample (radians)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TiltTargets {
    /// Rotation about Z, from vertical pointer offset
    pub tilt: f32,
    /// Rotation about Y, from horizontal pointer offset
    pub yaw: f32,
}

impl TiltTargets {
    pub const NEUTRAL: TiltTargets = TiltTargets { tilt: 0.0, yaw: 0.0 };

    pub fn from_sample(sample: PointerSample, gains: PointerConfig) -> Self {
        Self {
            tilt: sample.y * gains.tilt_gain,
            yaw: sample.x * gains.yaw_gain,
        }
    }
}

/// Listeners registered on a dispatcher for one surface.
///
/// Must be handed back to [`PointerSubscription::remove`]; dropping it leaves
/// the listeners registered.
#[must_use = "pointer listeners stay registered until the subscription is removed"]
#[derive(Debug)]
pub struct PointerSubscription {
    surface: SurfaceId,
    listeners: SmallVec<[ListenerId; 2]>,
}

impl PointerSubscription {
    fn register(
        dispatcher: &mut EventDispatcher,
        surface: Rc<dyn RenderSurface>,
        gains: PointerConfig,
        targets: Rc<Cell<TiltTargets>>,
    ) -> Self {
        let surface_id = surface.id();
        let mut listeners = SmallVec::new();

        let move_targets = Rc::clone(&targets);
        listeners.push(dispatcher.register(surface_id, event_types::POINTER_MOVE, move |event| {
            let Some(position) = event.pointer_position() else {
                return;
            };
            match PointerSample::from_client(position, surface.bounds()) {
                Some(sample) => move_targets.set(TiltTargets::from_sample(sample, gains)),
                None => tracing::trace!(surface = surface_id.0, "pointer move on undrawable surface"),
            }
        }));

        listeners.push(dispatcher.register(surface_id, event_types::POINTER_LEAVE, move |_| {
            targets.set(TiltTargets::NEUTRAL);
        }));

        Self {
            surface: surface_id,
            listeners,
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Unregister every listener of this subscription
    pub fn remove(self, dispatcher: &mut EventDispatcher) {
        for id in self.listeners {
            dispatcher.unregister(id);
        }
    }
}

/// Maps pointer movement over an injected surface to tilt and yaw springs
pub struct PointerTiltController {
    surface: Rc<dyn RenderSurface>,
    gains: PointerConfig,
    targets: Rc<Cell<TiltTargets>>,
    tilt: SpringId,
    yaw: SpringId,
    subscription: Option<PointerSubscription>,
}

impl PointerTiltController {
    /// Create the controller with both springs at rest on zero
    pub fn new(
        surface: Rc<dyn RenderSurface>,
        gains: PointerConfig,
        spring: SpringConfig,
        scheduler: &mut AnimationScheduler,
    ) -> Self {
        Self {
            surface,
            gains,
            targets: Rc::new(Cell::new(TiltTargets::NEUTRAL)),
            tilt: scheduler.add_spring(Spring::new(spring, 0.0)),
            yaw: scheduler.add_spring(Spring::new(spring, 0.0)),
            subscription: None,
        }
    }

    /// Start listening for pointer events on the surface.
    ///
    /// Returns false if already subscribed.
    pub fn subscribe(&mut self, dispatcher: &mut EventDispatcher) -> bool {
        if self.subscription.is_some() {
            return false;
        }
        let subscription = PointerSubscription::register(
            dispatcher,
            Rc::clone(&self.surface),
            self.gains,
            Rc::clone(&self.targets),
        );
        tracing::debug!(surface = subscription.surface().0, "pointer tilt subscribed");
        self.subscription = Some(subscription);
        true
    }

    /// Stop listening and return the targets to neutral
    pub fn unsubscribe(&mut self, dispatcher: &mut EventDispatcher) {
        if let Some(subscription) = self.subscription.take() {
            tracing::debug!(surface = subscription.surface().0, "pointer tilt unsubscribed");
            subscription.remove(dispatcher);
        }
        self.targets.set(TiltTargets::NEUTRAL);
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Latest targets set by pointer events
    pub fn targets(&self) -> TiltTargets {
        self.targets.get()
    }

    /// Push the latest targets into the springs
    pub fn sync(&self, scheduler: &mut AnimationScheduler) {
        let targets = self.targets.get();
        scheduler.set_target(self.tilt, targets.tilt);
        scheduler.set_target(self.yaw, targets.yaw);
    }

    /// Current tilt (rotation about Z) in radians
    pub fn tilt(&self, scheduler: &AnimationScheduler) -> f32 {
        scheduler.value(self.tilt).unwrap_or(0.0)
    }

    /// Current yaw (rotation about Y) in radians
    pub fn yaw(&self, scheduler: &AnimationScheduler) -> f32 {
        scheduler.value(self.yaw).unwrap_or(0.0)
    }
}

impl std::fmt::Debug for PointerTiltController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerTiltController")
            .field("surface", &self.surface.id())
            .field("targets", &self.targets.get())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}
