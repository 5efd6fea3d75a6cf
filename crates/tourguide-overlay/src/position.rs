#![forbid(unsafe_code)]

//! Tip and highlight placement math.
//!
//! # Invariants
//!
//! 1. Positions are absolute document coordinates: the target's viewport
//!    top plus the page's vertical scroll offset.
//! 2. `offset` is the gap between the tip and the target edge it faces.
//! 3. Side placements (left/right) align the tip's arrow with the target's
//!    vertical middle.

use tourguide_core::Placement;

use crate::geometry::{Bounds, Position, Size};

/// Padding between the target and the highlight frame around it.
pub const HIGHLIGHT_PADDING: f64 = 14.0;

/// Stacking order of the overlay layers, bottom to top.
pub mod layer {
    pub const BACKDROP: i32 = 1000;
    pub const HIGHLIGHT: i32 = 1001;
    /// Raised target element.
    pub const TARGET: i32 = 1002;
    /// Transparent layer blocking clicks on the target.
    pub const BLOCKER: i32 = 1003;
}

/// Measured tip surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TipMetrics {
    /// Rendered size of the tip bubble.
    pub size: Size,
    /// Distance from the tip's top edge to its arrow.
    pub arrow_top: f64,
}

impl TipMetrics {
    pub const fn new(size: Size, arrow_top: f64) -> Self {
        Self { size, arrow_top }
    }
}

/// Where to put a tip for `target` (viewport-relative) given the page
/// scroll offset.
pub fn tip_position(
    placement: Placement,
    target: Bounds,
    page_y_offset: f64,
    tip: TipMetrics,
    offset: f64,
) -> Position {
    let top = target.y + page_y_offset;
    match placement {
        Placement::Right => Position::new(
            top - tip.arrow_top - target.height / 2.0,
            target.x + target.width + offset,
        ),
        Placement::Bottom => Position::new(top + target.height + offset, target.x),
        Placement::Left => Position::new(
            top - tip.arrow_top - target.height / 2.0,
            target.x - tip.size.width - offset,
        ),
        Placement::Top => Position::new(top - tip.size.height - offset, target.x),
    }
}

/// Frame drawn above the backdrop around the active target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightFrame {
    /// Document position of the frame's outer top-left corner.
    pub origin: Position,
    /// Target size inside the padding.
    pub inner: Size,
    pub padding: f64,
}

impl HighlightFrame {
    /// Frame around `target` (viewport-relative) with the standard padding.
    pub fn around(target: Bounds, page_y_offset: f64) -> Self {
        let top = target.y + page_y_offset;
        Self {
            origin: Position::new(top - HIGHLIGHT_PADDING, target.x - HIGHLIGHT_PADDING),
            inner: target.size(),
            padding: HIGHLIGHT_PADDING,
        }
    }

    /// Outer box including padding, in document coordinates.
    pub fn outer(&self) -> Bounds {
        Bounds::new(
            self.origin.left,
            self.origin.top,
            self.inner.width + self.padding * 2.0,
            self.inner.height + self.padding * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Bounds = Bounds::new(100.0, 200.0, 80.0, 40.0);
    const TIP: TipMetrics = TipMetrics::new(Size::new(120.0, 60.0), 10.0);

    #[test]
    fn top_places_above_with_offset() {
        let pos = tip_position(Placement::Top, TARGET, 0.0, TIP, 28.0);
        assert_eq!(pos, Position::new(200.0 - 60.0 - 28.0, 100.0));
    }

    #[test]
    fn bottom_places_below_with_offset() {
        let pos = tip_position(Placement::Bottom, TARGET, 0.0, TIP, 28.0);
        assert_eq!(pos, Position::new(200.0 + 40.0 + 28.0, 100.0));
    }

    #[test]
    fn right_aligns_arrow_with_middle() {
        let pos = tip_position(Placement::Right, TARGET, 0.0, TIP, 28.0);
        assert_eq!(pos, Position::new(200.0 - 10.0 - 20.0, 100.0 + 80.0 + 28.0));
    }

    #[test]
    fn left_accounts_for_tip_width() {
        let pos = tip_position(Placement::Left, TARGET, 0.0, TIP, 28.0);
        assert_eq!(pos, Position::new(200.0 - 10.0 - 20.0, 100.0 - 120.0 - 28.0));
    }

    #[test]
    fn page_scroll_shifts_top_only() {
        let still = tip_position(Placement::Bottom, TARGET, 0.0, TIP, 28.0);
        let scrolled = tip_position(Placement::Bottom, TARGET, 500.0, TIP, 28.0);
        assert_eq!(scrolled.top - still.top, 500.0);
        assert_eq!(scrolled.left, still.left);
    }

    #[test]
    fn highlight_pads_target() {
        let frame = HighlightFrame::around(TARGET, 50.0);
        assert_eq!(frame.origin, Position::new(250.0 - 14.0, 86.0));
        assert_eq!(frame.outer(), Bounds::new(86.0, 236.0, 108.0, 68.0));
    }
}
