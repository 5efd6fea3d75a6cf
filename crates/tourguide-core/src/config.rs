#![forbid(unsafe_code)]

//! Tour configuration.
//!
//! [`TourConfig`] holds the host-overridable defaults shared by every tip of
//! a tour. With the `config-files` feature it can be loaded from TOML or
//! JSON:
//!
//! ```toml
//! placement = "bottom"
//! animation = false
//! scroll_speed_ms = 250
//! offset = 16.0
//! ```
//!
//! Missing fields fall back to [`TourConfig::default`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a tip sits relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "lowercase"))]
pub enum Placement {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl Placement {
    pub const ALL: [Placement; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Parse a placement attribute, falling back to `default` when the value
    /// is empty or unknown.
    #[must_use]
    pub fn parse_or(value: &str, default: Placement) -> Placement {
        value.parse().unwrap_or(default)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown placement name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown placement: {0:?}")]
pub struct ParsePlacementError(pub String);

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            _ => Err(ParsePlacementError(s.to_string())),
        }
    }
}

/// Host-overridable tour defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct TourConfig {
    /// Default placement relative to the target.
    pub placement: Placement,
    /// Fade tips in instead of showing them at once.
    pub animation: bool,
    /// Text of the "next" button.
    pub next_label: String,
    /// Text of the "previous" button.
    pub previous_label: String,
    /// Text of the "finish" button.
    pub finish_label: String,
    /// Page scroll animation length in milliseconds.
    pub scroll_speed_ms: u64,
    /// Pixel distance between tip and target.
    pub offset: f64,
    /// Dim the page behind the active tip.
    pub backdrop: bool,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            placement: Placement::Top,
            animation: true,
            next_label: "Next".to_string(),
            previous_label: "Previous".to_string(),
            finish_label: "Finish".to_string(),
            scroll_speed_ms: 500,
            offset: 28.0,
            backdrop: true,
        }
    }
}

impl TourConfig {
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn next_label(mut self, label: impl Into<String>) -> Self {
        self.next_label = label.into();
        self
    }

    #[must_use]
    pub fn previous_label(mut self, label: impl Into<String>) -> Self {
        self.previous_label = label.into();
        self
    }

    #[must_use]
    pub fn finish_label(mut self, label: impl Into<String>) -> Self {
        self.finish_label = label.into();
        self
    }

    #[must_use]
    pub fn scroll_speed(mut self, speed: Duration) -> Self {
        self.scroll_speed_ms = u64::try_from(speed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Scroll animation length.
    #[must_use]
    pub fn scroll_speed_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_speed_ms)
    }

    /// Validate field ranges. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.offset.is_finite() || self.offset < 0.0 {
            errors.push(format!("offset must be finite and >= 0, got {}", self.offset));
        }
        for (name, label) in [
            ("next_label", &self.next_label),
            ("previous_label", &self.previous_label),
            ("finish_label", &self.finish_label),
        ] {
            if label.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }
        errors
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`TourConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-files")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),
}
