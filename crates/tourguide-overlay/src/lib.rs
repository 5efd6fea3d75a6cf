#![forbid(unsafe_code)]

//! Visual collaborators for tourguide.
//!
//! Everything a host needs to turn "step 3 is visible" into something on
//! screen, as plain state objects a renderer can read:
//!
//! - [`position`]: tip placement math and the highlight frame.
//! - [`surface`]: a tip's show/hide/position state and its target element.
//! - [`backdrop`]: the backdrop and highlight lifecycle.
//! - [`viewport`]: page scroll offset and namespaced resize listeners.
//! - [`scroll`]: the scroll-to-element service.
//! - [`timer`]: one-shot deferred tasks.

pub mod backdrop;
pub mod geometry;
pub mod position;
pub mod scroll;
pub mod surface;
pub mod timer;
pub mod viewport;

pub use backdrop::OverlayController;
pub use geometry::{Bounds, Position, Size};
pub use position::{HighlightFrame, TipMetrics, tip_position};
pub use scroll::{NoopScroll, ScrollRequest, ScrollService, ViewportScroll};
pub use surface::{Display, StaticTarget, TargetElement, TipSurface};
pub use timer::{ManualScheduler, RealtimeScheduler, Scheduler, Task, TimerId};
pub use viewport::Viewport;
