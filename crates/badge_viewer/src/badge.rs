//! A single mounted badge
//!
//! [`BadgeView`] owns everything that lives for one mount: the springs, the
//! entrance animator, the pointer controller and the loaded scene. Unmounting
//! consumes the view, so a torn-down badge cannot be ticked again.

use badge_animation::{AnimationScheduler, TimelineState};
use badge_core::events::{EventDispatcher, RenderSurface};
use badge_scene::SceneGraph;
use std::rc::Rc;

use crate::catalog::BadgeEntry;
use crate::composer::{BadgeTransform, FrameComposer};
use crate::config::ViewerConfig;
use crate::entrance::{AnimationPhase, EntranceAnimator};
use crate::pointer::{PointerTiltController, TiltTargets};

/// Animation state of one mounted badge
#[derive(Debug)]
pub struct BadgeView {
    index: usize,
    entry: BadgeEntry,
    scene: Option<SceneGraph>,
    scheduler: AnimationScheduler,
    entrance: EntranceAnimator,
    pointer: PointerTiltController,
    composer: FrameComposer,
    frames: u64,
}

impl BadgeView {
    /// Mount a badge and start its entrance.
    ///
    /// `scene` is `None` when the asset could not be loaded; the badge still
    /// animates and the renderer draws a placeholder.
    pub fn mount(
        index: usize,
        entry: BadgeEntry,
        scene: Option<SceneGraph>,
        surface: Rc<dyn RenderSurface>,
        config: &ViewerConfig,
    ) -> Self {
        let mut scheduler = AnimationScheduler::new();
        let entrance = EntranceAnimator::mount(&config.animation, &mut scheduler);
        let pointer = PointerTiltController::new(
            surface,
            config.pointer,
            config.animation.pointer_spring,
            &mut scheduler,
        );

        tracing::debug!(
            index,
            badge = %entry.display_name,
            has_scene = scene.is_some(),
            "badge mounted"
        );

        Self {
            index,
            entry,
            scene,
            scheduler,
            entrance,
            pointer,
            composer: FrameComposer::new(&config.transform),
            frames: 0,
        }
    }

    /// Advance by `dt` seconds and compose this frame's transform.
    ///
    /// Springs are stepped before the entrance cues are applied, so a spring
    /// released mid-frame only moves for the rest of the frame. Entering the
    /// `Entered` phase subscribes the pointer listeners on `dispatcher`.
    /// Negative or non-finite deltas count as zero.
    pub fn frame(&mut self, dt: f32, dispatcher: &mut EventDispatcher) -> BadgeTransform {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.pointer.sync(&mut self.scheduler);
        self.scheduler.step(dt);

        let update = self.entrance.advance(f64::from(dt) * 1000.0, &mut self.scheduler);
        if update.entered {
            self.pointer.subscribe(dispatcher);
        }
        self.frames += 1;

        let transform = self.transform();
        tracing::trace!(
            frame = self.frames,
            yaw = transform.rotation_y,
            tilt = transform.rotation_z,
            "badge frame"
        );
        transform
    }

    /// Transform for the current spring values, without advancing time
    pub fn transform(&self) -> BadgeTransform {
        self.composer.compose(
            self.entrance.angle(&self.scheduler),
            self.pointer.yaw(&self.scheduler),
            self.pointer.tilt(&self.scheduler),
        )
    }

    /// Tear the badge down: pending cues are cancelled, pointer listeners
    /// removed and every spring dropped.
    pub fn unmount(mut self, dispatcher: &mut EventDispatcher) {
        self.entrance.cancel();
        self.pointer.unsubscribe(dispatcher);
        self.scheduler.clear();
        tracing::debug!(index = self.index, frames = self.frames, "badge unmounted");
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entry(&self) -> &BadgeEntry {
        &self.entry
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.entrance.phase()
    }

    pub fn entrance(&self) -> &EntranceAnimator {
        &self.entrance
    }

    /// Current entrance rotation in radians
    pub fn entrance_angle(&self) -> f32 {
        self.entrance.angle(&self.scheduler)
    }

    pub fn entrance_target(&self) -> f32 {
        self.entrance.target(&self.scheduler)
    }

    pub fn pointer_targets(&self) -> TiltTargets {
        self.pointer.targets()
    }

    pub fn pointer_yaw(&self) -> f32 {
        self.pointer.yaw(&self.scheduler)
    }

    pub fn pointer_tilt(&self) -> f32 {
        self.pointer.tilt(&self.scheduler)
    }

    pub fn is_pointer_subscribed(&self) -> bool {
        self.pointer.is_subscribed()
    }

    pub fn timeline_state(&self) -> TimelineState {
        self.entrance.timeline_state()
    }

    /// Whether any spring is still moving or waiting to move
    pub fn is_animating(&self) -> bool {
        self.entrance.is_holding(&self.scheduler)
            || self.scheduler.has_active_animations()
            || self.timeline_state() == TimelineState::Playing
    }

    /// Frames rendered since mount
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_animation::Spring;
    use badge_core::events::{Event, Surface, SurfaceId};
    use badge_core::geometry::Rect;
    use std::f32::consts::PI;

    const ID: SurfaceId = SurfaceId(3);
    const FRAME: f32 = 1.0 / 60.0;

    fn mount() -> BadgeView {
        let surface = Rc::new(Surface::new(ID, Rect::new(0.0, 0.0, 400.0, 400.0)));
        BadgeView::mount(
            0,
            BadgeEntry::new("Food", "/badge-food.glb"),
            None,
            surface,
            &ViewerConfig::default(),
        )
    }

    fn run(view: &mut BadgeView, dispatcher: &mut EventDispatcher, seconds: f32) {
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            view.frame(FRAME, dispatcher);
        }
    }

    #[test]
    fn test_first_frame_faces_away() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();

        let transform = view.frame(FRAME, &mut dispatcher);
        assert_eq!(transform.rotation_y, PI);
        assert_eq!(transform.rotation_z, 0.0);
        assert_eq!(view.phase(), AnimationPhase::PreEntrance);
        assert!(!view.is_pointer_subscribed());
        assert!(view.is_animating());
    }

    #[test]
    fn test_subscribes_on_entry() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();

        run(&mut view, &mut dispatcher, 0.45);
        assert!(dispatcher.is_empty());

        run(&mut view, &mut dispatcher, 0.1);
        assert_eq!(view.phase(), AnimationPhase::Entered);
        assert!(view.is_pointer_subscribed());
        assert_eq!(dispatcher.listener_count(ID), 2);
        assert_eq!(view.entrance_target(), 0.0);
    }

    #[test]
    fn test_entrance_settles_at_rest() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();

        run(&mut view, &mut dispatcher, 1.4);
        assert_eq!(view.entrance_angle(), PI, "held until motion start");

        run(&mut view, &mut dispatcher, 6.0);
        assert_eq!(view.entrance_angle(), 0.0);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_motion_start_mid_frame_steps_remainder() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();

        // 80 ms frames: motion starts at 1500 ms, inside the frame ending at 1520 ms
        for _ in 0..18 {
            view.frame(0.08, &mut dispatcher);
        }
        assert_eq!(view.entrance_angle(), PI);
        view.frame(0.08, &mut dispatcher);

        let config = ViewerConfig::default().animation;
        let mut partial = Spring::new(config.entrance_spring, config.initial_angle);
        partial.set_target(config.rest_angle);
        partial.step(0.02);
        let mut whole = Spring::new(config.entrance_spring, config.initial_angle);
        whole.set_target(config.rest_angle);
        whole.step(0.08);

        let angle = view.entrance_angle();
        assert!((angle - partial.value()).abs() < 1e-4, "{angle} vs {}", partial.value());
        assert!((angle - whole.value()).abs() > 1e-2);
    }

    #[test]
    fn test_pointer_yaw_adds_to_entrance() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();
        run(&mut view, &mut dispatcher, 8.0);

        dispatcher.dispatch(&Event::pointer_move(ID, 400.0, 0.0));
        run(&mut view, &mut dispatcher, 3.0);

        let transform = view.transform();
        assert!((transform.rotation_y - 0.20).abs() < 1e-3, "{transform:?}");
        assert!((transform.rotation_z - 0.15).abs() < 1e-3, "{transform:?}");
    }

    #[test]
    fn test_bad_delta_does_not_advance() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();

        view.frame(f32::NAN, &mut dispatcher);
        view.frame(-1.0, &mut dispatcher);
        view.frame(f32::INFINITY, &mut dispatcher);
        assert_eq!(view.entrance().elapsed_ms(), 0.0);
        assert_eq!(view.frame_count(), 3);
    }

    #[test]
    fn test_unmount_cleans_up_listeners() {
        let mut dispatcher = EventDispatcher::new();
        let mut view = mount();
        run(&mut view, &mut dispatcher, 1.0);
        assert!(!dispatcher.is_empty());

        view.unmount(&mut dispatcher);
        assert!(dispatcher.is_empty());
    }
}
