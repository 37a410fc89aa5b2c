//! Badge Core Runtime
//!
//! Foundational primitives for the badge viewer:
//!
//! - **Geometry**: screen rectangles for render surfaces, vectors and matrices
//!   for the badge transform
//! - **Events**: render surfaces and surface-scoped pointer event dispatch
//! - **State Machines**: typed state machines with timestamped transitions
//!
//! # Example
//!
//! ```rust
//! use badge_core::events::{event_types, Event, EventDispatcher, SurfaceId};
//!
//! let surface = SurfaceId(7);
//! let mut dispatcher = EventDispatcher::new();
//! let listener = dispatcher.register(surface, event_types::POINTER_LEAVE, |_| {});
//!
//! assert_eq!(dispatcher.dispatch(&Event::pointer_leave(surface)), 1);
//! dispatcher.unregister(listener);
//! assert_eq!(dispatcher.dispatch(&Event::pointer_leave(surface)), 0);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{
    Event, EventData, EventDispatcher, EventType, ListenerId, RenderSurface, Surface, SurfaceId,
};
pub use fsm::{StateMachine, StateMachineBuilder, Transition, TransitionRecord};
pub use geometry::{Mat4, Point, Rect, Size, Vec3};
