#![forbid(unsafe_code)]

//! Logging setup for applications embedding a tour.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! application's choice. [`init`] installs a `tracing-subscriber` fmt
//! subscriber filtered by `TOURGUIDE_LOG` (default `info`), with JSON lines
//! when the `tracing-json` feature is on.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "TOURGUIDE_LOG";

/// Filter used when `TOURGUIDE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter from `TOURGUIDE_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init() -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    #[cfg(feature = "tracing-json")]
    let builder = builder.json();
    builder.try_init().is_ok()
}
