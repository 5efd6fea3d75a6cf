#![forbid(unsafe_code)]

//! Scroll-to-element service.
//!
//! Best effort and fire-and-forget: implementations report nothing back.

use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::geometry::Position;
use crate::viewport::Viewport;

/// Offset applied when a request leaves an offset at zero.
pub const DEFAULT_SCROLL_OFFSET: f64 = -100.0;
/// Animation length applied when a request leaves the speed at zero.
pub const DEFAULT_SCROLL_SPEED: Duration = Duration::from_millis(500);

/// One scroll request with defaults resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Element to bring into view; `None` scrolls to the top of the page.
    pub target: Option<Position>,
    pub offset_y: f64,
    pub offset_x: f64,
    pub speed: Duration,
}

impl ScrollRequest {
    /// Zero offsets and a zero speed fall back to the defaults.
    pub fn new(target: Option<Position>, offset_y: f64, offset_x: f64, speed: Duration) -> Self {
        let or_default = |v: f64| if v == 0.0 || v.is_nan() { DEFAULT_SCROLL_OFFSET } else { v };
        Self {
            target,
            offset_y: or_default(offset_y),
            offset_x: or_default(offset_x),
            speed: if speed.is_zero() {
                DEFAULT_SCROLL_SPEED
            } else {
                speed
            },
        }
    }

    /// Scroll position the page should end at.
    pub fn destination(&self) -> Position {
        match self.target {
            Some(target) => Position::new(target.top + self.offset_y, target.left + self.offset_x),
            None => Position::new(0.0, 0.0),
        }
    }
}

/// Something that can scroll the page.
pub trait ScrollService {
    fn scroll_to(&self, request: ScrollRequest);
}

/// Ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScroll;

impl ScrollService for NoopScroll {
    fn scroll_to(&self, _request: ScrollRequest) {}
}

/// Jumps a [`Viewport`] straight to the destination, without animation.
#[derive(Debug, Clone)]
pub struct ViewportScroll {
    viewport: Rc<Viewport>,
}

impl ViewportScroll {
    pub fn new(viewport: Rc<Viewport>) -> Self {
        Self { viewport }
    }
}

impl ScrollService for ViewportScroll {
    fn scroll_to(&self, request: ScrollRequest) {
        let destination = request.destination();
        trace!(
            top = destination.top,
            left = destination.left,
            speed_ms = request.speed.as_millis() as u64,
            "scroll"
        );
        self.viewport.set_scroll(destination);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_take_defaults() {
        let req = ScrollRequest::new(Some(Position::new(10.0, 10.0)), 0.0, 0.0, Duration::ZERO);
        assert_eq!(req.offset_y, DEFAULT_SCROLL_OFFSET);
        assert_eq!(req.offset_x, DEFAULT_SCROLL_OFFSET);
        assert_eq!(req.speed, DEFAULT_SCROLL_SPEED);
    }

    #[test]
    fn explicit_values_are_kept() {
        let req = ScrollRequest::new(
            Some(Position::new(900.0, 400.0)),
            -200.0,
            -300.0,
            Duration::from_millis(250),
        );
        assert_eq!(req.destination(), Position::new(700.0, 100.0));
        assert_eq!(req.speed, Duration::from_millis(250));
    }

    #[test]
    fn no_target_scrolls_to_top() {
        let req = ScrollRequest::new(None, -200.0, -300.0, Duration::ZERO);
        assert_eq!(req.destination(), Position::new(0.0, 0.0));
    }

    #[test]
    fn viewport_scroll_moves_page() {
        let viewport = Rc::new(Viewport::default());
        let scroll = ViewportScroll::new(Rc::clone(&viewport));
        scroll.scroll_to(ScrollRequest::new(
            Some(Position::new(1000.0, 50.0)),
            -200.0,
            -300.0,
            Duration::ZERO,
        ));
        // Left clamps at zero.
        assert_eq!(viewport.scroll_position(), Position::new(800.0, 0.0));
    }
}
