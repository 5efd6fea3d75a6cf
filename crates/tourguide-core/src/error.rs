#![forbid(unsafe_code)]

//! Error types for the tour engine.

use thiserror::Error;

/// Standard result type for engine APIs.
pub type Result<T> = std::result::Result<T, TourError>;

/// Loud failures raised by the engine and its host wiring.
///
/// "Not found" lookups return `Option` instead, and selecting past the last
/// step is the finish signal, so neither appears here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// `remove` was called with a key that is not registered.
    #[error("step key does not exist: {key}")]
    KeyNotFound { key: i64 },

    /// Required host setup is missing.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl TourError {
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
