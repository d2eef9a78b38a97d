//! Region decomposition iterators.
//!
//! - `RegionIter` yields the rectangles of a region, one per stored interval,
//!   each spanning exactly its scanline.
//! - `Cliperator` yields those rectangles clipped to a rectangle.
//! - `Spanerator` yields the x-spans covered on a single row.
//!
//! All three borrow the region, so it cannot change while they walk it. A
//! walk cannot be resumed, but a fresh iterator over the same region starts
//! over from the top.

use crate::basics::{Rect, Run, SENTINEL};
use crate::region::Region;

// ============================================================================
// RegionIter
// ============================================================================

enum Walk<'a> {
    Done,
    Single(Rect),
    Runs {
        runs: &'a [Run],
        // Next run to read: a left edge or an x-sentinel.
        pos: usize,
        top: i32,
        bottom: i32,
    },
}

/// Rectangles of a region, top to bottom and left to right.
pub struct RegionIter<'a> {
    walk: Walk<'a>,
}

impl<'a> RegionIter<'a> {
    pub fn new(region: &'a Region) -> Self {
        let walk = if region.is_empty() {
            Walk::Done
        } else if let Some(head) = region.run_head() {
            let runs = head.runs();
            Walk::Runs {
                runs,
                pos: 3,
                top: runs[0],
                bottom: runs[1],
            }
        } else {
            Walk::Single(region.bounds())
        };
        Self { walk }
    }

    /// Returns `true` once every rectangle has been produced.
    pub fn done(&self) -> bool {
        matches!(self.walk, Walk::Done)
    }
}

impl Iterator for RegionIter<'_> {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        match &mut self.walk {
            Walk::Done => None,
            Walk::Single(rect) => {
                let rect = *rect;
                self.walk = Walk::Done;
                Some(rect)
            }
            Walk::Runs {
                runs,
                pos,
                top,
                bottom,
            } => loop {
                let left = runs[*pos];
                if left < SENTINEL {
                    let right = runs[*pos + 1];
                    *pos += 2;
                    return Some(Rect::new(left, *top, right, *bottom));
                }
                // End of a scanline: the next run is either the following
                // scanline's bottom or the end of the encoding. Empty
                // scanlines fall through to the next pass.
                let next_bottom = runs[*pos + 1];
                if next_bottom == SENTINEL {
                    self.walk = Walk::Done;
                    return None;
                }
                *top = *bottom;
                *bottom = next_bottom;
                *pos += 3;
            },
        }
    }
}

impl core::iter::FusedIterator for RegionIter<'_> {}

// ============================================================================
// Cliperator
// ============================================================================

/// Rectangles of a region intersected with a clip rectangle. Pieces outside
/// the clip are skipped; the walk ends at the first scanline below it.
pub struct Cliperator<'a> {
    iter: RegionIter<'a>,
    clip: Rect,
}

impl<'a> Cliperator<'a> {
    pub fn new(region: &'a Region, clip: Rect) -> Self {
        let iter = if region.quick_reject_rect(&clip) {
            RegionIter { walk: Walk::Done }
        } else {
            RegionIter::new(region)
        };
        Self { iter, clip }
    }
}

impl Iterator for Cliperator<'_> {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        loop {
            let r = self.iter.next()?;
            if r.top >= self.clip.bottom {
                self.iter.walk = Walk::Done;
                return None;
            }
            if let Some(sect) = r.intersect(&self.clip) {
                return Some(sect);
            }
        }
    }
}

impl core::iter::FusedIterator for Cliperator<'_> {}

// ============================================================================
// Spanerator
// ============================================================================

enum Spans<'a> {
    Done,
    Single(i32, i32),
    Runs { runs: &'a [Run], pos: usize },
}

/// The `[left, right)` spans the region covers on row `y`, clipped to
/// `[left, right)`.
pub struct Spanerator<'a> {
    spans: Spans<'a>,
    left: i32,
    right: i32,
}

impl<'a> Spanerator<'a> {
    pub fn new(region: &'a Region, y: i32, left: i32, right: i32) -> Self {
        let b = region.bounds();
        let spans = if region.is_empty()
            || y < b.top
            || y >= b.bottom
            || right <= b.left
            || left >= b.right
            || left >= right
        {
            Spans::Done
        } else if let Some(head) = region.run_head() {
            let runs = head.runs();
            let mut pos = head.find_scanline(y) + 2;
            // Skip intervals that end at or before the clip.
            while runs[pos] < SENTINEL && runs[pos + 1] <= left {
                pos += 2;
            }
            Spans::Runs { runs, pos }
        } else {
            Spans::Single(b.left.max(left), b.right.min(right))
        };
        Self { spans, left, right }
    }
}

impl Iterator for Spanerator<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        match &mut self.spans {
            Spans::Done => None,
            Spans::Single(l, r) => {
                let span = (*l, *r);
                self.spans = Spans::Done;
                Some(span)
            }
            Spans::Runs { runs, pos } => {
                let l = runs[*pos];
                if l == SENTINEL || l >= self.right {
                    self.spans = Spans::Done;
                    return None;
                }
                let r = runs[*pos + 1];
                *pos += 2;
                Some((l.max(self.left), r.min(self.right)))
            }
        }
    }
}

impl core::iter::FusedIterator for Spanerator<'_> {}

// ============================================================================
// Tests
// ============================================================================
