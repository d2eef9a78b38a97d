//! Scanline run storage for complex regions.
//!
//! A `RunHead` owns the run encoding of a region that needs more than one
//! rectangle:
//!
//! ```text
//! top
//! bottom, interval_count, left0, right0, left1, right1, ..., SENTINEL
//! bottom, interval_count, ...,                               SENTINEL
//! SENTINEL
//! ```
//!
//! Each scanline covers `[previous bottom, bottom)`. Intervals are half-open,
//! sorted, and never touch or overlap. An interior scanline may carry zero
//! intervals to describe a vertical gap.

use crate::array::RunArray;
use crate::basics::{Rect, Run, SENTINEL};

/// Runs from a scanline's `bottom` field to the next scanline's `bottom`.
#[inline]
pub fn scanline_len(interval_count: usize) -> usize {
    2 + interval_count * 2 + 1
}

/// Run encoding of a complex region plus cached statistics.
#[derive(Debug, Clone)]
pub struct RunHead {
    runs: RunArray,
    interval_count: usize,
    scanline_count: usize,
}

impl RunHead {
    /// Build a run head from a well-formed encoding of `count` runs.
    /// Returns the run head and the tight bounds of the encoded shape.
    pub fn from_runs(runs: RunArray, count: usize) -> (Self, Rect) {
        let mut head = Self {
            runs: RunArray::new(),
            interval_count: 0,
            scanline_count: 0,
        };
        let bounds = head.set_runs(runs, count);
        (head, bounds)
    }

    /// Install a new encoding and recompute the cached statistics.
    /// Returns the tight bounds of the new shape.
    pub fn set_runs(&mut self, mut runs: RunArray, count: usize) -> Rect {
        runs.set_count(count);
        self.runs = runs;
        self.compute_run_bounds()
    }

    /// The committed runs.
    pub fn runs(&self) -> &[Run] {
        self.runs.as_slice()
    }

    pub fn count(&self) -> usize {
        self.runs.count()
    }

    /// Total number of stored intervals across all scanlines.
    pub fn interval_count(&self) -> usize {
        self.interval_count
    }

    /// Number of scanlines, including interior empty ones.
    pub fn scanline_count(&self) -> usize {
        self.scanline_count
    }

    pub fn top(&self) -> i32 {
        self.runs[0]
    }

    /// Walk the encoding once: recompute the bounding box and cached counts,
    /// and check every structural invariant on the way.
    ///
    /// # Panics
    ///
    /// Panics if the encoding is malformed: misplaced sentinels, bottoms that
    /// do not strictly increase, unsorted or touching intervals, a count that
    /// disagrees with the encoding, or a leading/trailing empty scanline.
    pub fn compute_run_bounds(&mut self) -> Rect {
        let runs = self.runs.as_slice();
        assert!(runs.len() >= 2, "run encoding too short: {}", runs.len());

        let top = runs[0];
        assert!(top < SENTINEL, "top is a sentinel");

        let mut i = 1;
        let mut prev_bottom = top;
        let mut left = i32::MAX;
        let mut right = i32::MIN;
        let mut scanlines = 0usize;
        let mut intervals = 0usize;
        let mut last_was_empty = false;

        while runs[i] < SENTINEL {
            let bottom = runs[i];
            assert!(
                bottom > prev_bottom,
                "scanline bottom {} does not exceed {} at run {}",
                bottom,
                prev_bottom,
                i
            );
            let n = runs[i + 1];
            assert!(n >= 0 && n < SENTINEL, "bad interval count {} at run {}", n, i + 1);
            let n = n as usize;
            if n == 0 {
                assert!(scanlines > 0, "leading empty scanline");
            }

            let mut x = i + 2;
            let mut prev_right: Option<i32> = None;
            for _ in 0..n {
                let l = runs[x];
                let r = runs[x + 1];
                assert!(l < r && r < SENTINEL, "improper interval [{}, {}) at run {}", l, r, x);
                if let Some(pr) = prev_right {
                    assert!(pr < l, "interval at run {} touches or overlaps its neighbour", x);
                }
                prev_right = Some(r);
                x += 2;
            }
            assert!(runs[x] == SENTINEL, "missing interval sentinel at run {}", x);

            if n > 0 {
                left = left.min(runs[i + 2]);
                right = right.max(runs[x - 1]);
            }

            scanlines += 1;
            intervals += n;
            last_was_empty = n == 0;
            prev_bottom = bottom;
            i = x + 1;
        }

        assert!(scanlines > 0, "encoding has no scanlines");
        assert!(!last_was_empty, "trailing empty scanline");
        assert!(
            i + 1 == runs.len(),
            "encoding ends at run {} but count is {}",
            i + 1,
            runs.len()
        );

        self.scanline_count = scanlines;
        self.interval_count = intervals;
        Rect::new(left, top, right, prev_bottom)
    }

    /// Find the scanline containing row `y` and return the index of its
    /// `bottom` run. `y` must already lie within the region's bounds.
    pub fn find_scanline(&self, y: i32) -> usize {
        let runs = self.runs.as_slice();
        debug_assert!(y >= runs[0]);
        let mut i = 1;
        loop {
            let bottom = runs[i];
            // Walking off the end means the caller skipped its bounds check.
            assert!(bottom < SENTINEL, "row {} is below the region", y);
            if y < bottom {
                return i;
            }
            i += scanline_len(runs[i + 1] as usize);
        }
    }

    /// Shift every coordinate by (dx, dy), leaving structure untouched.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        let runs = self.runs.as_mut_slice();
        runs[0] += dy;
        let mut i = 1;
        while runs[i] < SENTINEL {
            runs[i] += dy;
            let n = runs[i + 1] as usize;
            for x in &mut runs[i + 2..i + 2 + n * 2] {
                *x += dx;
            }
            i += scanline_len(n);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const S: Run = SENTINEL;

    // Two stacked bands: [0,10)x[0,5) and [0,3),[7,10)x[5,8).
    fn notch() -> RunArray {
        RunArray::from_slice(&[0, 5, 1, 0, 10, S, 8, 2, 0, 3, 7, 10, S, S])
    }

    #[test]
    fn test_scanline_len() {
        assert_eq!(scanline_len(0), 3);
        assert_eq!(scanline_len(1), 5);
        assert_eq!(scanline_len(3), 9);
    }

    #[test]
    fn test_compute_run_bounds() {
        let runs = notch();
        let n = runs.count();
        let (head, bounds) = RunHead::from_runs(runs, n);
        assert_eq!(bounds, Rect::new(0, 0, 10, 8));
        assert_eq!(head.scanline_count(), 2);
        assert_eq!(head.interval_count(), 3);
        assert_eq!(head.top(), 0);
    }

    #[test]
    fn test_bounds_with_interior_gap() {
        let runs = RunArray::from_slice(&[0, 2, 1, 4, 6, S, 5, 0, S, 9, 1, 1, 3, S, S]);
        let (head, bounds) = RunHead::from_runs(runs, 15);
        assert_eq!(bounds, Rect::new(1, 0, 6, 9));
        assert_eq!(head.scanline_count(), 3);
        assert_eq!(head.interval_count(), 2);
    }

    #[test]
    fn test_count_may_be_shorter_than_buffer() {
        let mut runs = notch();
        runs.resize_to_at_least(64);
        let (head, _) = RunHead::from_runs(runs, 14);
        assert_eq!(head.count(), 14);
        assert_eq!(head.runs().len(), 14);
    }

    #[test]
    fn test_find_scanline() {
        let (head, _) = RunHead::from_runs(notch(), 14);
        assert_eq!(head.find_scanline(0), 1);
        assert_eq!(head.find_scanline(4), 1);
        assert_eq!(head.find_scanline(5), 6);
        assert_eq!(head.find_scanline(7), 6);
    }

    #[test]
    #[should_panic]
    fn test_find_scanline_below_region_panics() {
        let (head, _) = RunHead::from_runs(notch(), 14);
        head.find_scanline(8);
    }

    #[test]
    fn test_translate() {
        let (mut head, _) = RunHead::from_runs(notch(), 14);
        head.translate(3, -2);
        assert_eq!(
            head.runs(),
            &[-2, 3, 1, 3, 13, S, 6, 2, 3, 6, 10, 13, S, S]
        );
        let bounds = head.compute_run_bounds();
        assert_eq!(bounds, Rect::new(3, -2, 13, 6));
    }

    #[test]
    fn test_clone_is_deep() {
        let (head, _) = RunHead::from_runs(notch(), 14);
        let mut other = head.clone();
        other.translate(1, 1);
        assert_eq!(head.top(), 0);
        assert_eq!(other.top(), 1);
    }

    #[test]
    #[should_panic(expected = "does not exceed")]
    fn test_non_monotonic_bottoms_panic() {
        let runs = RunArray::from_slice(&[0, 5, 1, 0, 10, S, 5, 1, 0, 3, S, S]);
        RunHead::from_runs(runs, 12);
    }

    #[test]
    #[should_panic(expected = "touches or overlaps")]
    fn test_touching_intervals_panic() {
        let runs = RunArray::from_slice(&[0, 5, 2, 0, 4, 4, 8, S, S]);
        RunHead::from_runs(runs, 9);
    }

    #[test]
    #[should_panic(expected = "missing interval sentinel")]
    fn test_misplaced_sentinel_panics() {
        let runs = RunArray::from_slice(&[0, 5, 1, 0, 10, 11, S, S]);
        RunHead::from_runs(runs, 8);
    }

    #[test]
    #[should_panic(expected = "trailing empty scanline")]
    fn test_trailing_empty_scanline_panics() {
        let runs = RunArray::from_slice(&[0, 5, 1, 0, 10, S, 8, 0, S, S]);
        RunHead::from_runs(runs, 10);
    }
}
