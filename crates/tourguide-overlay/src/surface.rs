#![forbid(unsafe_code)]

//! Visual surface of one tip, plus the target element it points at.
//!
//! The surface is a state object: a renderer (DOM, canvas, terminal) reads
//! [`TipSurface::display`], [`TipSurface::position`] and
//! [`TipSurface::blocker`] and draws accordingly.

use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::{Bounds, Position};
use crate::position::{HighlightFrame, TipMetrics};
use crate::viewport::Viewport;

/// The page element a tip is attached to.
pub trait TargetElement {
    /// Current box relative to the viewport.
    fn bounding_rect(&self) -> Bounds;

    /// Lift the element above the backdrop (or restore it).
    fn set_raised(&self, raised: bool);
}

/// Target with a box set by the host.
///
/// A target created with [`StaticTarget::in_document`] keeps document
/// coordinates and reports its viewport box relative to the page scroll, so
/// it moves on screen when the page scrolls, like a real element.
#[derive(Debug, Default)]
pub struct StaticTarget {
    rect: Cell<Bounds>,
    viewport: Option<Rc<Viewport>>,
    raised: Cell<bool>,
}

impl StaticTarget {
    /// Target fixed at `rect` in viewport coordinates.
    pub fn new(rect: Bounds) -> Self {
        Self {
            rect: Cell::new(rect),
            viewport: None,
            raised: Cell::new(false),
        }
    }

    /// Target at `rect` in document coordinates of `viewport`'s page.
    pub fn in_document(rect: Bounds, viewport: Rc<Viewport>) -> Self {
        Self {
            rect: Cell::new(rect),
            viewport: Some(viewport),
            raised: Cell::new(false),
        }
    }

    /// Move the element (layout change, resize).
    pub fn set_rect(&self, rect: Bounds) {
        self.rect.set(rect);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.get()
    }
}

impl TargetElement for StaticTarget {
    fn bounding_rect(&self) -> Bounds {
        let rect = self.rect.get();
        match &self.viewport {
            Some(viewport) => Bounds::new(
                rect.x - viewport.page_x_offset(),
                rect.y - viewport.page_y_offset(),
                rect.width,
                rect.height,
            ),
            None => rect,
        }
    }

    fn set_raised(&self, raised: bool) {
        self.raised.set(raised);
    }
}

/// How the tip is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Hidden,
    /// Appearing with a fade transition.
    FadingIn,
    /// Fully shown.
    Block,
}

/// Show/hide/position state of a tip bubble.
#[derive(Debug, Clone, Default)]
pub struct TipSurface {
    attached: bool,
    removed: bool,
    display: Display,
    position: Option<Position>,
    metrics: TipMetrics,
    blocker: Option<HighlightFrame>,
}

impl TipSurface {
    pub fn new(metrics: TipMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Attach and display the surface, fading in when `animation` is on.
    /// A removed surface stays removed.
    pub fn show(&mut self, animation: bool) {
        if self.removed {
            return;
        }
        self.attached = true;
        self.display = if animation {
            Display::FadingIn
        } else {
            Display::Block
        };
    }

    /// Complete a running fade.
    pub fn finish_fade(&mut self) {
        if self.display == Display::FadingIn {
            self.display = Display::Block;
        }
    }

    /// Detach from the page, keeping the surface reusable.
    pub fn hide(&mut self) {
        self.attached = false;
        self.display = Display::Hidden;
        self.blocker = None;
    }

    /// Destroy the surface for good.
    pub fn remove(&mut self) {
        self.hide();
        self.position = None;
        self.removed = true;
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = Some(position);
    }

    /// Cover the target with a click-blocking layer matching `frame`.
    pub fn set_blocker(&mut self, frame: HighlightFrame) {
        self.blocker = Some(frame);
    }

    /// Update the measured size (after content or label changes).
    pub fn set_metrics(&mut self, metrics: TipMetrics) {
        self.metrics = metrics;
    }

    pub fn metrics(&self) -> TipMetrics {
        self.metrics
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn blocker(&self) -> Option<HighlightFrame> {
        self.blocker
    }
}
