//! Scanline boolean algebra.
//!
//! Combines two run encodings (see [`crate::run_head`]) under a boolean
//! operator without decoding either to rectangles. Two cursors walk the
//! operands' scanlines top to bottom; for every shared y-range the two
//! sorted interval lists are merged in a single pass, and identical adjacent
//! output rows are coalesced into one scanline.

use crate::array::RunArray;
use crate::basics::{Run, SENTINEL};
use crate::run_head::scanline_len;

/// Boolean operation applied by [`crate::region::Region::op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionOp {
    /// `a - b`
    Difference,
    /// `a & b`
    Intersect,
    /// `a | b`
    Union,
    /// `a ^ b`
    Xor,
    /// `b - a`
    ReverseDifference,
    /// `b`
    Replace,
}

/// The four operators the sweep itself implements. `ReverseDifference` and
/// `Replace` are resolved by the caller before sweeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOp {
    Difference = 0,
    Intersect = 1,
    Union = 2,
    Xor = 3,
}

// Sub-interval classes produced by the interval merge.
const IN_A: u8 = 1;
const IN_B: u8 = 2;
const IN_BOTH: u8 = 3;

/// Classes kept by each operator, as a bit set over `1 << class`.
const KEEP_CLASSES: [u8; 4] = [
    1 << IN_A,                                  // Difference
    1 << IN_BOTH,                               // Intersect
    (1 << IN_A) | (1 << IN_B) | (1 << IN_BOTH), // Union
    (1 << IN_A) | (1 << IN_B),                  // Xor
];

impl SweepOp {
    #[inline]
    fn keeps(self, class: u8) -> bool {
        KEEP_CLASSES[self as usize] & (1 << class) != 0
    }
}

/// An interval list holding nothing but its terminating sentinel. Stands in
/// for an operand that has no scanline over the current y-range.
const NO_INTERVALS: [Run; 1] = [SENTINEL];

// ============================================================================
// Interval merge
// ============================================================================

/// Read the interval starting at `i`. The list's sentinel reads as a pair of
/// sentinels so the merge never looks past the end of the list.
#[inline]
fn interval_at(runs: &[Run], i: usize) -> (Run, Run) {
    let left = runs[i];
    if left == SENTINEL {
        (SENTINEL, SENTINEL)
    } else {
        (left, runs[i + 1])
    }
}

/// Runs before the sentinel of an interval list.
#[inline]
fn distance_to_sentinel(runs: &[Run]) -> usize {
    let mut i = 0;
    while runs[i] != SENTINEL {
        i += 2;
    }
    i
}

/// Single forward pass over two sorted interval lists, yielding
/// `(left, right, class)` pieces that tile their union.
struct SpanMerge<'a> {
    a_runs: &'a [Run],
    b_runs: &'a [Run],
    a_pos: usize,
    b_pos: usize,
    a_left: Run,
    a_right: Run,
    b_left: Run,
    b_right: Run,
}

impl<'a> SpanMerge<'a> {
    fn new(a_runs: &'a [Run], b_runs: &'a [Run]) -> Self {
        let (a_left, a_right) = interval_at(a_runs, 0);
        let (b_left, b_right) = interval_at(b_runs, 0);
        Self {
            a_runs,
            b_runs,
            a_pos: 2,
            b_pos: 2,
            a_left,
            a_right,
            b_left,
            b_right,
        }
    }
}

impl Iterator for SpanMerge<'_> {
    type Item = (Run, Run, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.a_left == SENTINEL && self.b_left == SENTINEL {
            return None;
        }

        let class;
        let left;
        let right;
        let mut a_flush = false;
        let mut b_flush = false;

        if self.a_left < self.b_left {
            class = IN_A;
            left = self.a_left;
            if self.a_right <= self.b_left {
                right = self.a_right;
                a_flush = true;
            } else {
                right = self.b_left;
                self.a_left = self.b_left;
            }
        } else if self.b_left < self.a_left {
            class = IN_B;
            left = self.b_left;
            if self.b_right <= self.a_left {
                right = self.b_right;
                b_flush = true;
            } else {
                right = self.a_left;
                self.b_left = self.a_left;
            }
        } else {
            class = IN_BOTH;
            left = self.a_left;
            let a_right = self.a_right;
            let b_right = self.b_right;
            let mut r = a_right;
            if a_right <= b_right {
                self.b_left = a_right;
                a_flush = true;
            }
            if b_right <= a_right {
                r = b_right;
                self.a_left = b_right;
                b_flush = true;
            }
            right = r;
        }

        if a_flush {
            let (l, r) = interval_at(self.a_runs, self.a_pos);
            self.a_left = l;
            self.a_right = r;
            self.a_pos += 2;
        }
        if b_flush {
            let (l, r) = interval_at(self.b_runs, self.b_pos);
            self.b_left = l;
            self.b_right = r;
            self.b_pos += 2;
        }

        debug_assert!(left <= right);
        Some((left, right, class))
    }
}

/// Merge one row of intervals from each operand into `dst` starting at
/// `start`, keeping the classes `op` selects. Zero-width pieces are dropped
/// and touching pieces are joined. Writes the row's sentinel and returns
/// the index just past it.
fn operate_on_span(a_runs: &[Run], b_runs: &[Run], dst: &mut RunArray, start: usize, op: SweepOp) -> usize {
    dst.resize_to_at_least(start + distance_to_sentinel(a_runs) + distance_to_sentinel(b_runs) + 1);

    let mut d = start;
    for (left, right, class) in SpanMerge::new(a_runs, b_runs) {
        if !op.keeps(class) || left >= right {
            continue;
        }
        if d == start || dst[d - 1] < left {
            dst[d] = left;
            dst[d + 1] = right;
            d += 2;
        } else {
            dst[d - 1] = right;
        }
    }
    dst[d] = SENTINEL;
    d + 1
}

// ============================================================================
// Output builder
// ============================================================================

/// Appends output rows to a run buffer, coalescing a row into the previous
/// scanline when their interval lists are identical.
struct RgnOper<'a> {
    op: SweepOp,
    array: &'a mut RunArray,
    // Index of the first interval of the last accepted scanline.
    prev_dst: usize,
    // Runs in that scanline's interval list, sentinel included. Zero before
    // the first non-empty row.
    prev_len: usize,
    top: Run,
}

impl<'a> RgnOper<'a> {
    fn new(top: Run, array: &'a mut RunArray, op: SweepOp) -> Self {
        array.resize_to_at_least(crate::basics::RECT_REGION_RUNS);
        array[0] = top;
        Self {
            op,
            array,
            prev_dst: 1,
            prev_len: 0,
            top,
        }
    }

    /// Emit the row ending at `bottom` built from the two interval lists.
    fn add_span(&mut self, bottom: Run, a_runs: &[Run], b_runs: &[Run]) {
        // Leave room for this row's bottom and interval count.
        let start = self.prev_dst + self.prev_len + 2;
        let stop = operate_on_span(a_runs, b_runs, self.array, start, self.op);
        let len = stop - start;
        debug_assert!(len >= 1 && len % 2 == 1);
        debug_assert!(self.array[stop - 1] == SENTINEL);

        let buf = self.array.buffer();
        let same_as_prev = self.prev_len == len
            && (len == 1 || buf[self.prev_dst..self.prev_dst + len - 1] == buf[start..start + len - 1]);

        if same_as_prev {
            self.array[self.prev_dst - 2] = bottom;
        } else if len == 1 && self.prev_len == 0 {
            // Nothing emitted yet: an empty row only moves the top down.
            self.top = bottom;
        } else {
            self.array[start - 2] = bottom;
            self.array[start - 1] = (len >> 1) as Run;
            self.prev_dst = start;
            self.prev_len = len;
        }
    }

    fn is_empty(&self) -> bool {
        self.prev_len == 0
    }

    /// Terminate the encoding and return its run count.
    fn flush(self) -> usize {
        let end = self.prev_dst + self.prev_len;
        self.array.resize_to_at_least(end + 1);
        self.array[end] = SENTINEL;
        self.array[0] = self.top;
        end + 1
    }
}

// ============================================================================
// Scanline cursor
// ============================================================================

/// Walks the scanlines of one operand. An exhausted cursor reports
/// `top == bottom == SENTINEL`.
struct ScanCursor<'a> {
    runs: &'a [Run],
    top: Run,
    bottom: Run,
    // Index of the current scanline's `bottom` run.
    pos: usize,
}

impl<'a> ScanCursor<'a> {
    fn new(runs: &'a [Run]) -> Self {
        let mut cursor = Self {
            runs,
            top: runs[0],
            bottom: runs[1],
            pos: 1,
        };
        if cursor.bottom == SENTINEL {
            cursor.top = SENTINEL;
        }
        cursor
    }

    fn intervals(&self) -> &'a [Run] {
        &self.runs[self.pos + 2..]
    }

    fn advance(&mut self) {
        let n = self.runs[self.pos + 1] as usize;
        self.pos += scanline_len(n);
        self.top = self.bottom;
        self.bottom = self.runs[self.pos];
        if self.bottom == SENTINEL {
            self.top = SENTINEL;
        }
    }
}

// ============================================================================
// Sweep
// ============================================================================

enum Sweep {
    /// The result was written; this many runs are valid.
    Done(usize),
    /// Early exit: the result is known to be non-empty.
    NonEmpty,
}

fn operate(a_runs: &[Run], b_runs: &[Run], dst: &mut RunArray, op: SweepOp, quick_exit: bool) -> Sweep {
    let mut a = ScanCursor::new(a_runs);
    let mut b = ScanCursor::new(b_runs);

    let mut oper = RgnOper::new(a.top.min(b.top), dst, op);
    // Sentinel start so the first row never looks like it follows a gap.
    let mut prev_bottom = SENTINEL;

    while a.bottom < SENTINEL || b.bottom < SENTINEL {
        let top;
        let bottom;
        let mut run0: &[Run] = &NO_INTERVALS;
        let mut run1: &[Run] = &NO_INTERVALS;
        let mut a_flush = false;
        let mut b_flush = false;

        if a.top < b.top {
            top = a.top;
            run0 = a.intervals();
            if a.bottom <= b.top {
                bottom = a.bottom;
                a_flush = true;
            } else {
                bottom = b.top;
                a.top = b.top;
            }
        } else if b.top < a.top {
            top = b.top;
            run1 = b.intervals();
            if b.bottom <= a.top {
                bottom = b.bottom;
                b_flush = true;
            } else {
                bottom = a.top;
                b.top = a.top;
            }
        } else {
            top = a.top;
            run0 = a.intervals();
            run1 = b.intervals();
            let a_bottom = a.bottom;
            let b_bottom = b.bottom;
            let mut bot = a_bottom;
            if a_bottom <= b_bottom {
                b.top = a_bottom;
                a_flush = true;
            }
            if b_bottom <= a_bottom {
                bot = b_bottom;
                a.top = b_bottom;
                b_flush = true;
            }
            bottom = bot;
        }

        if top > prev_bottom {
            oper.add_span(top, &NO_INTERVALS, &NO_INTERVALS);
        }
        oper.add_span(bottom, run0, run1);
        if quick_exit && !oper.is_empty() {
            return Sweep::NonEmpty;
        }

        if a_flush {
            a.advance();
        }
        if b_flush {
            b.advance();
        }
        prev_bottom = bottom;
    }

    Sweep::Done(oper.flush())
}

/// Initial buffer size for combining two encodings. Each output row holds at
/// most the intervals of both input rows, and the two operands' rows can
/// interleave; rows past the estimate still grow the buffer on demand.
fn estimate_count(a_runs: &[Run], a_intervals: usize, b_runs: &[Run], b_intervals: usize) -> usize {
    a_runs.len() + b_runs.len() + 2 * (a_intervals + b_intervals) + 2
}

/// Combine two well-formed, non-empty run encodings. The returned buffer's
/// `count` is the length of the result encoding, which may still carry a
/// leading or trailing empty scanline for the caller to trim.
pub fn combine_runs(
    a_runs: &[Run],
    a_intervals: usize,
    b_runs: &[Run],
    b_intervals: usize,
    op: SweepOp,
) -> RunArray {
    let mut array = RunArray::new();
    array.resize_to_at_least(estimate_count(a_runs, a_intervals, b_runs, b_intervals));
    let count = match operate(a_runs, b_runs, &mut array, op, false) {
        Sweep::Done(count) => count,
        Sweep::NonEmpty => unreachable!("sweep without early exit returned early"),
    };
    array.set_count(count);
    tracing::trace!(?op, count, "sweep complete");
    array
}

/// Returns `true` if combining the encodings under `op` yields anything,
/// stopping at the first non-empty row.
pub fn runs_combine_non_empty(a_runs: &[Run], b_runs: &[Run], op: SweepOp) -> bool {
    let mut array = RunArray::new();
    match operate(a_runs, b_runs, &mut array, op, true) {
        Sweep::NonEmpty => true,
        Sweep::Done(count) => count > crate::basics::EMPTY_REGION_RUNS,
    }
}

/// The encoding of a single rectangle, used to feed rect operands through
/// the sweep.
pub fn rect_runs(left: i32, top: i32, right: i32, bottom: i32) -> [Run; crate::basics::RECT_REGION_RUNS] {
    [top, bottom, 1, left, right, SENTINEL, SENTINEL]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const S: Run = SENTINEL;

    fn combine(a: &[Run], b: &[Run], op: SweepOp) -> Vec<Run> {
        combine_runs(a, 0, b, 0, op).as_slice().to_vec()
    }

    fn merge(a: &[Run], b: &[Run]) -> Vec<(Run, Run, u8)> {
        SpanMerge::new(a, b).collect()
    }

    #[test]
    fn test_keep_table() {
        assert!(SweepOp::Union.keeps(IN_A));
        assert!(SweepOp::Union.keeps(IN_B));
        assert!(SweepOp::Union.keeps(IN_BOTH));
        assert!(SweepOp::Intersect.keeps(IN_BOTH));
        assert!(!SweepOp::Intersect.keeps(IN_A));
        assert!(SweepOp::Difference.keeps(IN_A));
        assert!(!SweepOp::Difference.keeps(IN_B));
        assert!(!SweepOp::Difference.keeps(IN_BOTH));
        assert!(SweepOp::Xor.keeps(IN_A));
        assert!(SweepOp::Xor.keeps(IN_B));
        assert!(!SweepOp::Xor.keeps(IN_BOTH));
    }

    #[test]
    fn test_span_merge_classifies_pieces() {
        let pieces = merge(&[0, 10, S], &[5, 15, S]);
        assert_eq!(pieces, vec![(0, 5, IN_A), (5, 10, IN_BOTH), (10, 15, IN_B)]);
    }

    #[test]
    fn test_span_merge_disjoint_and_empty() {
        assert_eq!(merge(&[0, 2, S], &[4, 6, S]), vec![(0, 2, IN_A), (4, 6, IN_B)]);
        assert_eq!(merge(&[0, 2, 3, 4, S], &NO_INTERVALS), vec![(0, 2, IN_A), (3, 4, IN_A)]);
        assert!(merge(&NO_INTERVALS, &NO_INTERVALS).is_empty());
    }

    #[test]
    fn test_span_merge_shared_edges() {
        // Same left, different rights.
        assert_eq!(merge(&[0, 4, S], &[0, 8, S]), vec![(0, 4, IN_BOTH), (4, 8, IN_B)]);
        // Identical intervals.
        assert_eq!(merge(&[2, 6, S], &[2, 6, S]), vec![(2, 6, IN_BOTH)]);
    }

    #[test]
    fn test_operate_on_span_joins_touching_pieces() {
        let mut dst = RunArray::new();
        let stop = operate_on_span(&[0, 5, S], &[5, 9, S], &mut dst, 0, SweepOp::Union);
        assert_eq!(stop, 3);
        assert_eq!(&[dst[0], dst[1], dst[2]], &[0, 9, S]);
    }

    #[test]
    fn test_operate_on_span_xor_of_equal_is_empty() {
        let mut dst = RunArray::new();
        let stop = operate_on_span(&[1, 4, S], &[1, 4, S], &mut dst, 2, SweepOp::Xor);
        assert_eq!(stop, 3);
        assert_eq!(dst[2], S);
    }

    #[test]
    fn test_union_of_overlapping_rects() {
        let a = rect_runs(0, 0, 10, 10);
        let b = rect_runs(5, 5, 15, 15);
        assert_eq!(
            combine(&a, &b, SweepOp::Union),
            vec![0, 5, 1, 0, 10, S, 10, 1, 0, 15, S, 15, 1, 5, 15, S, S]
        );
    }

    #[test]
    fn test_intersect_of_overlapping_rects() {
        let a = rect_runs(0, 0, 10, 10);
        let b = rect_runs(5, 5, 15, 15);
        assert_eq!(combine(&a, &b, SweepOp::Intersect), rect_runs(5, 5, 10, 10).to_vec());
    }

    #[test]
    fn test_disjoint_rows_leave_gap_scanline() {
        let a = rect_runs(0, 0, 5, 5);
        let b = rect_runs(10, 10, 15, 15);
        assert_eq!(
            combine(&a, &b, SweepOp::Union),
            vec![0, 5, 1, 0, 5, S, 10, 0, S, 15, 1, 10, 15, S, S]
        );
    }

    #[test]
    fn test_identical_rows_coalesce() {
        // Two rects stacked with the same x-extent become one scanline.
        let a = rect_runs(0, 0, 10, 5);
        let b = rect_runs(0, 5, 10, 9);
        assert_eq!(combine(&a, &b, SweepOp::Union), rect_runs(0, 0, 10, 9).to_vec());
    }

    #[test]
    fn test_difference_leaves_trailing_empty_row() {
        // Bottom half of `a` removed: the sweep reports the empty tail row and
        // the region layer trims it.
        let a = rect_runs(0, 0, 10, 10);
        let b = rect_runs(0, 5, 10, 10);
        assert_eq!(
            combine(&a, &b, SweepOp::Difference),
            vec![0, 5, 1, 0, 10, S, 10, 0, S, S]
        );
    }

    #[test]
    fn test_leading_empty_rows_move_top() {
        let a = rect_runs(0, 0, 10, 10);
        let b = rect_runs(0, 0, 10, 5);
        assert_eq!(combine(&a, &b, SweepOp::Difference), rect_runs(0, 5, 10, 10).to_vec());
    }

    #[test]
    fn test_empty_result() {
        let a = rect_runs(0, 0, 10, 10);
        // Every row came out empty, so the top slid to the last bottom.
        assert_eq!(combine(&a, &a, SweepOp::Xor), vec![10, S]);
        assert_eq!(combine(&a, &a, SweepOp::Difference), vec![10, S]);
    }

    #[test]
    fn test_complex_operand() {
        // Annulus: [0,10)^2 minus [2,8)^2.
        let annulus = [0, 2, 1, 0, 10, S, 8, 2, 0, 2, 8, 10, S, 10, 1, 0, 10, S, S];
        let hole = rect_runs(2, 2, 8, 8);
        assert_eq!(combine(&annulus, &hole, SweepOp::Union), rect_runs(0, 0, 10, 10).to_vec());
        assert_eq!(combine(&annulus, &hole, SweepOp::Intersect), vec![10, S]);
    }

    #[test]
    fn test_large_output_grows_past_estimate() {
        // A comb of 200 teeth xor a bar covering all of them.
        let mut comb = vec![0, 10, 200];
        for i in 0..200 {
            comb.push(i * 4);
            comb.push(i * 4 + 2);
        }
        comb.push(S);
        comb.push(S);
        let bar = rect_runs(0, 0, 800, 10);
        let out = combine(&comb, &bar, SweepOp::Xor);
        assert_eq!(out[2], 200);
        assert_eq!(out[3], 2);
        assert_eq!(out[4], 4);
        assert_eq!(out.len(), 3 + 400 + 2);
    }

    #[test]
    fn test_non_empty_early_exit() {
        let a = rect_runs(0, 0, 10, 10);
        let b = rect_runs(5, 5, 15, 15);
        let c = rect_runs(20, 20, 30, 30);
        assert!(runs_combine_non_empty(&a, &b, SweepOp::Intersect));
        assert!(!runs_combine_non_empty(&a, &c, SweepOp::Intersect));
        assert!(!runs_combine_non_empty(&a, &a, SweepOp::Xor));
    }
}
