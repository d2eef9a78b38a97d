//! Foundation types and constants.
//!
//! The integer rectangle every region is built from, and the run type used
//! by the scanline encoding.

// ============================================================================
// Runs
// ============================================================================

/// One integer of the scanline encoding: a y-bound, an interval count, or an
/// x-bound.
pub type Run = i32;

/// Reserved run value marking the end of an interval list or of the whole
/// encoding. Never a valid coordinate.
pub const SENTINEL: Run = i32::MAX;

/// Number of runs in the encoding of a single rectangle:
/// `top, bottom, 1, left, right, SENTINEL, SENTINEL`.
pub const RECT_REGION_RUNS: usize = 7;

/// Number of runs in the encoding of an empty result: `top, SENTINEL`.
pub const EMPTY_REGION_RUNS: usize = 2;

// ============================================================================
// Rect
// ============================================================================

/// A half-open integer rectangle `[left, right) x [top, bottom)`.
///
/// A rectangle is empty when it has no width or no height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The canonical empty rectangle.
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` if the rectangle covers no points.
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Returns `true` if the point (x, y) is inside the rectangle.
    /// The right and bottom edges are exclusive.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Returns `true` if `r` is non-empty and lies entirely inside `self`.
    pub fn contains_rect(&self, r: &Rect) -> bool {
        !r.is_empty()
            && !self.is_empty()
            && self.left <= r.left
            && self.top <= r.top
            && self.right >= r.right
            && self.bottom >= r.bottom
    }

    /// Returns `true` if the two rectangles share at least one point.
    pub fn intersects(&self, r: &Rect) -> bool {
        self.left.max(r.left) < self.right.min(r.right)
            && self.top.max(r.top) < self.bottom.min(r.bottom)
    }

    /// The overlap of the two rectangles, or `None` if they are disjoint.
    pub fn intersect(&self, r: &Rect) -> Option<Rect> {
        let out = Rect::new(
            self.left.max(r.left),
            self.top.max(r.top),
            self.right.min(r.right),
            self.bottom.min(r.bottom),
        );
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    /// The bounding box of both rectangles. Empty operands are ignored.
    pub fn join(&self, r: &Rect) -> Rect {
        if r.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *r;
        }
        Rect::new(
            self.left.min(r.left),
            self.top.min(r.top),
            self.right.max(r.right),
            self.bottom.max(r.bottom),
        )
    }

    /// The rectangle shifted by (dx, dy).
    ///
    /// # Panics
    ///
    /// Panics in debug builds if a shifted edge overflows `i32`.
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Area in square units. Widened so large rectangles cannot overflow.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (i64::from(self.right) - i64::from(self.left))
                * (i64::from(self.bottom) - i64::from(self.top))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
