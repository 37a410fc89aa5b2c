//! Surface-scoped event dispatch
//!
//! Pointer events are delivered to listeners registered for a specific render
//! surface. Listeners are owned by the dispatcher and addressed by
//! [`ListenerId`], so a component can remove exactly the listeners it added.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::Cell;

use crate::geometry::{Point, Rect};

/// Event type identifier
pub type EventType = u32;

/// Event types understood by the viewer
pub mod event_types {
    use super::EventType;

    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_LEAVE: EventType = 5;
}

/// Identifier of a render surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// A render surface the viewer draws into and receives pointer input from
pub trait RenderSurface {
    /// Stable identifier used to scope event listeners
    fn id(&self) -> SurfaceId;

    /// Current bounding rectangle in client coordinates
    fn bounds(&self) -> Rect;
}

/// A surface whose bounds the host updates on resize
#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    bounds: Cell<Rect>,
}

impl Surface {
    pub fn new(id: SurfaceId, bounds: Rect) -> Self {
        Self {
            id,
            bounds: Cell::new(bounds),
        }
    }

    /// Update the bounding rectangle (layout change, scroll, resize)
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }
}

impl RenderSurface for Surface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds.get()
    }
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Surface the event originated on, if any
    pub target: Option<SurfaceId>,
    pub data: EventData,
    /// Milliseconds since the host's epoch
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    /// Pointer position in client coordinates
    Pointer { x: f32, y: f32 },
    None,
}

impl Event {
    /// Pointer-move at client position `(x, y)` over `target`
    pub fn pointer_move(target: SurfaceId, x: f32, y: f32) -> Self {
        Self {
            event_type: event_types::POINTER_MOVE,
            target: Some(target),
            data: EventData::Pointer { x, y },
            timestamp: 0,
        }
    }

    /// Pointer-leave for `target`
    pub fn pointer_leave(target: SurfaceId) -> Self {
        Self {
            event_type: event_types::POINTER_LEAVE,
            target: Some(target),
            data: EventData::None,
            timestamp: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Client-space pointer position, when the event carries one
    pub fn pointer_position(&self) -> Option<Point> {
        match self.data {
            EventData::Pointer { x, y } => Some(Point::new(x, y)),
            EventData::None => None,
        }
    }
}

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&Event)>;

struct Listener {
    key: (SurfaceId, EventType),
    handler: EventHandler,
}

/// Dispatches events to listeners registered per surface and event type
pub struct EventDispatcher {
    listeners: SlotMap<ListenerId, Listener>,
    routes: FxHashMap<(SurfaceId, EventType), SmallVec<[ListenerId; 2]>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            routes: FxHashMap::default(),
        }
    }

    /// Register an event handler for a surface and event type
    pub fn register<F>(&mut self, surface: SurfaceId, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        let key = (surface, event_type);
        let id = self.listeners.insert(Listener {
            key,
            handler: Box::new(handler),
        });
        self.routes.entry(key).or_default().push(id);
        id
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(route) = self.routes.get_mut(&listener.key) {
            route.retain(|l| *l != id);
            if route.is_empty() {
                self.routes.remove(&listener.key);
            }
        }
        true
    }

    /// Dispatch an event to the listeners of its target surface.
    ///
    /// Returns the number of handlers invoked. Events without a target
    /// surface are dropped.
    pub fn dispatch(&self, event: &Event) -> usize {
        let Some(target) = event.target else {
            tracing::trace!(event_type = event.event_type, "dropping event without target surface");
            return 0;
        };
        let Some(route) = self.routes.get(&(target, event.event_type)) else {
            return 0;
        };
        let mut invoked = 0;
        for id in route {
            if let Some(listener) = self.listeners.get(*id) {
                (listener.handler)(event);
                invoked += 1;
            }
        }
        invoked
    }

    /// Number of live listeners on a surface
    pub fn listener_count(&self, surface: SurfaceId) -> usize {
        self.listeners
            .values()
            .filter(|listener| listener.key.0 == surface)
            .count()
    }

    /// Total number of live listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    const SURFACE: SurfaceId = SurfaceId(1);
    const OTHER: SurfaceId = SurfaceId(2);

    #[test]
    fn test_dispatch_reaches_registered_surface_only() {
        let hits = Rc::new(Cell::new(0));
        let mut dispatcher = EventDispatcher::new();

        let hits_clone = hits.clone();
        dispatcher.register(SURFACE, event_types::POINTER_MOVE, move |_| {
            hits_clone.set(hits_clone.get() + 1);
        });

        assert_eq!(dispatcher.dispatch(&Event::pointer_move(SURFACE, 1.0, 1.0)), 1);
        assert_eq!(dispatcher.dispatch(&Event::pointer_move(OTHER, 1.0, 1.0)), 0);
        assert_eq!(dispatcher.dispatch(&Event::pointer_leave(SURFACE)), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_event_without_target_is_dropped() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(SURFACE, event_types::POINTER_MOVE, |_| panic!("must not run"));

        let mut event = Event::pointer_move(SURFACE, 0.0, 0.0);
        event.target = None;
        assert_eq!(dispatcher.dispatch(&event), 0);
    }

    #[test]
    fn test_unregister_removes_listener() {
        let mut dispatcher = EventDispatcher::new();
        let move_id = dispatcher.register(SURFACE, event_types::POINTER_MOVE, |_| {});
        let leave_id = dispatcher.register(SURFACE, event_types::POINTER_LEAVE, |_| {});
        assert_eq!(dispatcher.listener_count(SURFACE), 2);

        assert!(dispatcher.unregister(move_id));
        assert!(!dispatcher.unregister(move_id));
        assert_eq!(dispatcher.dispatch(&Event::pointer_move(SURFACE, 0.0, 0.0)), 0);

        assert!(dispatcher.unregister(leave_id));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_surface_bounds_update() {
        let surface = Surface::new(SURFACE, Rect::new(0.0, 0.0, 400.0, 400.0));
        surface.set_bounds(Rect::new(10.0, 10.0, 200.0, 100.0));
        assert_eq!(surface.bounds(), Rect::new(10.0, 10.0, 200.0, 100.0));
        assert_eq!(surface.id(), SURFACE);
    }

    #[test]
    fn test_pointer_position() {
        let event = Event::pointer_move(SURFACE, 3.0, 4.0).with_timestamp(16);
        assert_eq!(event.pointer_position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(event.timestamp, 16);
        assert_eq!(Event::pointer_leave(SURFACE).pointer_position(), None);
    }
}
