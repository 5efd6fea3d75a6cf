#![forbid(unsafe_code)]

//! Core: step ordering and the tour state engine.
//!
//! # Role in tourguide
//! `tourguide-core` is the state layer. It knows nothing about pixels,
//! overlays, or scrolling; it tracks which steps exist, in which order, and
//! which one is visible.
//!
//! # Primary responsibilities
//! - **OrderedSteps**: sparse key-ordered step collection.
//! - **TourEngine**: current-step pointer, first/last bounds, and the
//!   select / open / cancel protocol with post-step and post-tour callbacks.
//! - **Observable**: single-threaded change notification used for the
//!   current step, step visibility, and host bindings.
//! - **TourConfig**: host-overridable defaults (placement, labels, offsets).
//!
//! # How it fits in the system
//! `tourguide-overlay` provides the visual collaborators, and the
//! `tourguide` facade wires both together into tour and tip hosts.

pub mod config;
pub mod engine;
pub mod error;
pub mod reactive;
pub mod step;
pub mod steps;

pub use config::{ConfigError, Placement, TourConfig};
pub use engine::{TourEngine, TourPhase};
pub use error::{Result, TourError};
pub use reactive::{Observable, Subscription};
pub use step::{Step, parse_step_index};
pub use steps::{OrderedSteps, StepIdentity, step_key};
