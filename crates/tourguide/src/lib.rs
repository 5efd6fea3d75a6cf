#![forbid(unsafe_code)]

//! tourguide public facade crate.
//!
//! Re-exports the step engine and overlay collaborators, and adds the two
//! hosts an application touches: [`TourHost`] for the tour as a whole and
//! [`TipHost`] for each callout.
//!
//! ```
//! use std::rc::Rc;
//! use tourguide::prelude::*;
//!
//! let binding = StepBinding::new(None);
//! let scheduler = Rc::new(ManualScheduler::new());
//! let host = TourHost::builder()
//!     .binding(binding.clone())
//!     .scheduler(scheduler.clone())
//!     .build()?;
//!
//! let target: Rc<dyn TargetElement> = Rc::new(StaticTarget::new(Bounds::new(10.0, 80.0, 120.0, 30.0)));
//! let metrics = TipMetrics::new(Size::new(200.0, 60.0), 10.0);
//! let first = host.register_tip(&TipAttributes::new("Welcome").step("0"), target.clone(), metrics);
//! let _second = host.register_tip(&TipAttributes::new("Settings").step("1"), target, metrics);
//!
//! scheduler.advance(WATCH_DELAY);
//! binding.set(Some(0));
//! assert!(first.surface().is_attached());
//! # Ok::<(), tourguide::TourError>(())
//! ```

pub mod host;
pub mod logging;
pub mod tip;

// --- Core re-exports -------------------------------------------------------

pub use tourguide_core::{
    ConfigError, Observable, OrderedSteps, Placement, Result, Step, StepIdentity, Subscription,
    TourConfig, TourEngine, TourError, TourPhase,
};

// --- Overlay re-exports ----------------------------------------------------

pub use tourguide_overlay::{
    Bounds, Display, HighlightFrame, ManualScheduler, NoopScroll, OverlayController, Position,
    RealtimeScheduler, Scheduler, ScrollRequest, ScrollService, Size, StaticTarget,
    TargetElement, TipMetrics, TipSurface, Viewport, ViewportScroll,
};

// --- Hosts -----------------------------------------------------------------

pub use host::{StepBinding, TourHost, TourHostBuilder};
pub use tip::{TipAttributes, TipHost, TipSettings, WATCH_DELAY};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bounds, ManualScheduler, Placement, Result, Size, StaticTarget, StepBinding,
        TargetElement, TipAttributes, TipHost, TipMetrics, TourConfig, TourError, TourHost,
        TourPhase, WATCH_DELAY,
    };

    pub use crate::{core, overlay};
}

pub use tourguide_core as core;
pub use tourguide_overlay as overlay;
