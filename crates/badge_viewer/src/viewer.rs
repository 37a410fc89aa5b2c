//! Selection boundary: one surface, one catalog, one mounted badge at a time

use badge_core::events::{Event, EventDispatcher, RenderSurface};
use badge_scene::{AssetLibrary, AssetSource, SceneGraph};
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::time::Instant;

use crate::badge::BadgeView;
use crate::catalog::{BadgeCatalog, BadgeEntry, BadgeSelection};
use crate::composer::BadgeTransform;
use crate::config::ViewerConfig;
use crate::entrance::AnimationPhase;
use crate::error::{Result, ViewerError};

/// What the renderer needs to draw one frame
#[derive(Clone, Copy, Debug)]
pub struct BadgeFrame<'a> {
    pub index: usize,
    pub badge: &'a BadgeEntry,
    pub transform: BadgeTransform,
    /// `None` when the asset failed to load; draw a placeholder
    pub scene: Option<&'a SceneGraph>,
    pub phase: AnimationPhase,
}

/// Hosts the mounted badge on a render surface and switches between badges
pub struct BadgeViewer<S> {
    config: ViewerConfig,
    catalog: BadgeCatalog,
    surface: Rc<dyn RenderSurface>,
    dispatcher: EventDispatcher,
    assets: AssetLibrary<S>,
    selection: BadgeSelection,
    view: Option<BadgeView>,
    last_frame: Option<Instant>,
}

impl<S: AssetSource> BadgeViewer<S> {
    /// Validate the config and mount the first badge of the catalog
    pub fn new(
        config: ViewerConfig,
        catalog: BadgeCatalog,
        source: S,
        surface: Rc<dyn RenderSurface>,
    ) -> Result<Self> {
        Self::with_selection(config, catalog, source, surface, 0)
    }

    /// Validate the config and mount the badge at `index`. Nothing is loaded
    /// when `index` is out of range.
    pub fn with_selection(
        config: ViewerConfig,
        catalog: BadgeCatalog,
        source: S,
        surface: Rc<dyn RenderSurface>,
        index: usize,
    ) -> Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.asset_cache_capacity).ok_or_else(|| {
            ViewerError::InvalidConfig("asset_cache_capacity must be at least 1".to_string())
        })?;
        let selection = catalog.selection(index)?;

        let mut viewer = Self {
            config,
            catalog,
            surface,
            dispatcher: EventDispatcher::new(),
            assets: AssetLibrary::new(source, capacity),
            selection,
            view: None,
            last_frame: None,
        };
        viewer.mount(selection);
        Ok(viewer)
    }

    /// Switch to the badge at `index`.
    ///
    /// Returns `Ok(false)` when `index` is already shown; the running entrance
    /// is left alone. Otherwise the current badge is torn down before the new
    /// one is loaded and mounted.
    pub fn select(&mut self, index: usize) -> Result<bool> {
        let selection = self.catalog.selection(index)?;
        if selection == self.selection && self.view.is_some() {
            tracing::trace!(index, "badge already selected");
            return Ok(false);
        }

        self.teardown();
        self.mount(selection);
        Ok(true)
    }

    /// Switch to a badge by display name, ignoring case
    pub fn select_by_name(&mut self, name: &str) -> Result<bool> {
        let index = self.catalog.position_by_name(name)?;
        self.select(index)
    }

    /// Deliver a host event to the listeners on the surface
    pub fn dispatch(&self, event: &Event) -> usize {
        self.dispatcher.dispatch(event)
    }

    /// Advance the mounted badge by `dt` seconds
    pub fn frame(&mut self, dt: f32) -> Option<BadgeFrame<'_>> {
        let view = self.view.as_mut()?;
        let transform = view.frame(dt, &mut self.dispatcher);
        let view = &*view;
        Some(BadgeFrame {
            index: view.index(),
            badge: view.entry(),
            transform,
            scene: view.scene(),
            phase: view.phase(),
        })
    }

    /// Advance using wall-clock time since the previous tick; the first tick
    /// advances by zero.
    pub fn tick(&mut self, now: Instant) -> Option<BadgeFrame<'_>> {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.frame(dt)
    }

    pub fn selected(&self) -> usize {
        self.selection.index()
    }

    pub fn view(&self) -> Option<&BadgeView> {
        self.view.as_ref()
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn surface(&self) -> &Rc<dyn RenderSurface> {
        &self.surface
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn assets(&self) -> &AssetLibrary<S> {
        &self.assets
    }

    fn teardown(&mut self) {
        if let Some(view) = self.view.take() {
            view.unmount(&mut self.dispatcher);
        }
        self.last_frame = None;
    }

    fn mount(&mut self, selection: BadgeSelection) {
        let index = selection.index();
        let Some(entry) = self.catalog.get(index).cloned() else {
            return;
        };

        let scene = match self.assets.fetch(&entry.asset_path) {
            Ok(scene) => Some(scene),
            Err(err) => {
                tracing::warn!(
                    badge = %entry.display_name,
                    path = %entry.asset_path,
                    error = %err,
                    "failed to load badge asset, showing placeholder"
                );
                None
            }
        };

        self.selection = selection;
        self.view = Some(BadgeView::mount(
            index,
            entry,
            scene,
            Rc::clone(&self.surface),
            &self.config,
        ));
    }
}

impl<S> Drop for BadgeViewer<S> {
    fn drop(&mut self) {
        if let Some(view) = self.view.take() {
            view.unmount(&mut self.dispatcher);
        }
    }
}

impl<S> std::fmt::Debug for BadgeViewer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeViewer")
            .field("selected", &self.selection.index())
            .field("view", &self.view)
            .field("dispatcher", &self.dispatcher)
            .field("assets", &self.assets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_core::events::{Surface, SurfaceId};
    use badge_core::geometry::Rect;
    use badge_scene::{EmptySource, MemorySource};
    use std::time::Duration;

    fn surface() -> Rc<dyn RenderSurface> {
        Rc::new(Surface::new(SurfaceId(1), Rect::new(0.0, 0.0, 300.0, 300.0)))
    }

    fn viewer() -> BadgeViewer<EmptySource> {
        BadgeViewer::new(
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
            surface(),
        )
        .unwrap()
    }

    #[test]
    fn test_mounts_first_badge() {
        let mut viewer = viewer();
        assert_eq!(viewer.selected(), 0);

        let frame = viewer.frame(0.016).unwrap();
        assert_eq!(frame.badge.display_name, "Food");
        assert_eq!(frame.phase, AnimationPhase::PreEntrance);
        assert!(frame.scene.is_some());
    }

    #[test]
    fn test_reselecting_current_badge_is_noop() {
        let mut viewer = viewer();
        for _ in 0..40 {
            viewer.frame(1.0 / 60.0);
        }
        assert!(!viewer.select(0).unwrap());
        assert_eq!(viewer.view().unwrap().frame_count(), 40);
    }

    #[test]
    fn test_out_of_range_selection_keeps_current() {
        let mut viewer = viewer();
        let err = viewer.select(6).unwrap_err();
        assert!(matches!(err, ViewerError::SelectionOutOfRange { index: 6, len: 6 }));
        assert_eq!(viewer.selected(), 0);
        assert!(viewer.view().is_some());
    }

    #[test]
    fn test_with_selection_mounts_requested_badge() {
        let mut viewer = BadgeViewer::with_selection(
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
            surface(),
            4,
        )
        .unwrap();
        assert_eq!(viewer.selected(), 4);
        assert_eq!(viewer.frame(0.016).unwrap().badge.display_name, "Travel");
        assert_eq!(viewer.assets().load_count(), 1);

        let err = BadgeViewer::with_selection(
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
            surface(),
            6,
        )
        .unwrap_err();
        assert!(matches!(err, ViewerError::SelectionOutOfRange { index: 6, len: 6 }));
    }

    #[test]
    fn test_select_by_name() {
        let mut viewer = viewer();
        assert!(viewer.select_by_name("sport").unwrap());
        assert_eq!(viewer.selected(), 2);
    }

    #[test]
    fn test_missing_asset_mounts_placeholder() {
        let mut viewer = BadgeViewer::new(
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            MemorySource::new(),
            surface(),
        )
        .unwrap();

        let frame = viewer.frame(0.6).unwrap();
        assert!(frame.scene.is_none());
        assert_eq!(frame.phase, AnimationPhase::Entered);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ViewerConfig::default();
        config.pointer.yaw_gain = f32::NAN;
        let result = BadgeViewer::new(config, BadgeCatalog::default_badges(), EmptySource, surface());
        assert!(matches!(result, Err(ViewerError::InvalidConfig(_))));
    }

    #[test]
    fn test_tick_uses_elapsed_wall_time() {
        let mut viewer = viewer();
        let start = Instant::now();

        viewer.tick(start);
        assert_eq!(viewer.view().unwrap().entrance().elapsed_ms(), 0.0);

        viewer.tick(start + Duration::from_millis(600));
        assert_eq!(viewer.view().unwrap().phase(), AnimationPhase::Entered);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let surface = surface();
        let mut viewer = BadgeViewer::new(
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
            Rc::clone(&surface),
        )
        .unwrap();
        viewer.frame(0.6);
        assert_eq!(viewer.dispatcher().len(), 2);
        drop(viewer);
        assert_eq!(Rc::strong_count(&surface), 1);
    }
}
