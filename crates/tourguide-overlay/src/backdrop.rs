#![forbid(unsafe_code)]

//! Backdrop and highlight lifecycle.
//!
//! One [`OverlayController`] per tour host. The engine never touches it; the
//! host shows it when the bound step enters the tour range and hides it
//! from the post-tour callback.

use tracing::debug;

use crate::position::HighlightFrame;

/// Owner of the full-page backdrop and the highlight frame above it.
#[derive(Debug, Clone, Default)]
pub struct OverlayController {
    shown: bool,
    highlight: Option<HighlightFrame>,
    shows: u32,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount backdrop and highlight. Returns `false` if already shown.
    pub fn show(&mut self) -> bool {
        if self.shown {
            return false;
        }
        self.shown = true;
        self.shows += 1;
        debug!(shows = self.shows, "backdrop shown");
        true
    }

    /// Unmount backdrop and highlight. Returns `false` if not shown.
    pub fn hide(&mut self) -> bool {
        if !self.shown {
            return false;
        }
        self.shown = false;
        self.highlight = None;
        debug!("backdrop hidden");
        true
    }

    /// Move the highlight frame. Ignored while hidden.
    pub fn set_highlight(&mut self, frame: HighlightFrame) {
        if self.shown {
            self.highlight = Some(frame);
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn highlight(&self) -> Option<HighlightFrame> {
        self.highlight
    }

    /// How many times the backdrop has been mounted.
    pub fn show_count(&self) -> u32 {
        self.shows
    }
}
