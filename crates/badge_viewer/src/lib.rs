//! Badge Viewer
//!
//! Animation state for a viewport that shows one 3D badge at a time:
//!
//! - **Entrance**: a spring-driven half turn into place, started on every
//!   mount and gated by a phase machine
//! - **Pointer tilt**: pointer position over the surface mapped to a small
//!   secondary tilt and yaw, honored only after the entrance phase flips
//! - **Composition**: both rotation sources summed into one transform per
//!   frame
//! - **Selection**: a fixed catalog of badges; switching tears the current
//!   badge down before the next one mounts
//!
//! # Example
//!
//! ```rust
//! use badge_core::events::{Event, Surface, SurfaceId};
//! use badge_core::geometry::Rect;
//! use badge_scene::EmptySource;
//! use badge_viewer::{AnimationPhase, BadgeCatalog, BadgeViewer, ViewerConfig};
//! use std::rc::Rc;
//!
//! let surface = Rc::new(Surface::new(SurfaceId(1), Rect::new(0.0, 0.0, 400.0, 400.0)));
//! let mut viewer = BadgeViewer::new(
//!     ViewerConfig::default(),
//!     BadgeCatalog::default_badges(),
//!     EmptySource,
//!     surface,
//! )
//! .unwrap();
//!
//! let frame = viewer.frame(0.6).unwrap();
//! assert_eq!(frame.phase, AnimationPhase::Entered);
//!
//! viewer.dispatch(&Event::pointer_move(SurfaceId(1), 400.0, 200.0));
//! viewer.select(3).unwrap();
//! assert_eq!(viewer.frame(0.0).unwrap().phase, AnimationPhase::PreEntrance);
//! ```

pub mod badge;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod entrance;
pub mod error;
pub mod pointer;
pub mod viewer;

pub use badge::BadgeView;
pub use catalog::{BadgeCatalog, BadgeEntry, BadgeSelection};
pub use composer::{BadgeTransform, FrameComposer};
pub use config::{AnimationConfig, PointerConfig, TransformConfig, ViewerConfig};
pub use entrance::{AnimationPhase, EntranceAnimator, EntranceCue, EntranceUpdate, PhaseEvent};
pub use error::{Result, ViewerError};
pub use pointer::{PointerSample, PointerSubscription, PointerTiltController, TiltTargets};
pub use viewer::{BadgeFrame, BadgeViewer};
