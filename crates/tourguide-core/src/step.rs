#![forbid(unsafe_code)]

//! Step records registered by host tips.

use crate::reactive::{Observable, Subscription};
use crate::steps::StepIdentity;

/// One registered callout.
///
/// The engine does not interpret step content; it only reads the requested
/// index and flips `visible`. Clones are handles to the same step: they share
/// the `visible` flag and compare as the same step under [`StepIdentity`].
#[derive(Debug, Clone)]
pub struct Step {
    index: Option<i64>,
    visible: Observable<bool>,
}

impl Default for Step {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Step {
    /// Create a hidden step. `None` lets the engine assign the next key.
    #[must_use]
    pub fn new(index: Option<i64>) -> Self {
        Self {
            index,
            visible: Observable::new(false),
        }
    }

    #[must_use]
    pub fn with_index(index: i64) -> Self {
        Self::new(Some(index))
    }

    /// Create a step from a raw step attribute (`"3"`, `" 2nd"`, `""`).
    #[must_use]
    pub fn from_attribute(attribute: &str) -> Self {
        Self::new(parse_step_index(attribute))
    }

    /// Index requested at registration.
    #[must_use]
    pub fn index(&self) -> Option<i64> {
        self.index
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Returns whether the flag changed.
    pub fn set_visible(&self, visible: bool) -> bool {
        self.visible.set(visible)
    }

    /// Watch the `visible` flag.
    pub fn watch_visibility(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        self.visible.subscribe(move |visible| callback(*visible))
    }

    #[must_use]
    pub fn visibility(&self) -> &Observable<bool> {
        &self.visible
    }
}

impl StepIdentity for Step {
    fn same_step(&self, other: &Self) -> bool {
        self.visible.ptr_eq(&other.visible)
    }
}

/// Parse a step attribute the way hosts read integer attributes: skip
/// leading whitespace, accept an optional sign, then take the longest run of
/// ASCII digits. Anything else (including an empty run) has no index.
#[must_use]
pub fn parse_step_index(attribute: &str) -> Option<i64> {
    let trimmed = attribute.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
