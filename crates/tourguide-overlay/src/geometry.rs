#![forbid(unsafe_code)]

//! Geometric primitives in page pixels.

/// An axis-aligned box, origin at top-left.
///
/// Target boxes are viewport-relative (what the host measures on screen);
/// add the page scroll offset to get document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the box has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the box.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Grow the box by `pad` on every side.
    pub fn expand(&self, pad: f64) -> Bounds {
        Bounds::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// Shift vertically (viewport to document coordinates and back).
    pub fn offset_y(&self, dy: f64) -> Bounds {
        Bounds::new(self.x, self.y + dy, self.width, self.height)
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Absolute document position of a surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// CSS-style `(top, left)` strings, e.g. `("12px", "40px")`.
    pub fn to_css(self) -> (String, String) {
        (format!("{}px", self.top), format!("{}px", self.left))
    }
}
