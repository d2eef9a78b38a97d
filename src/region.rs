//! Planar regions.
//!
//! A `Region` is a possibly disconnected set of integer points made of
//! axis-aligned rectangles. It is stored in one of three states: empty, a
//! single rectangle, or a run-length scanline encoding (see
//! [`crate::run_head`]) for anything more complex. Every mutating operation
//! collapses the state to the simplest one that describes the result, so a
//! complex region always holds at least two rectangles.
//!
//! Mutating operations return `true` when the result is non-empty.

use crate::array::RunArray;
use crate::basics::{Rect, Run, EMPTY_REGION_RUNS, RECT_REGION_RUNS, SENTINEL};
use crate::region_iterator::RegionIter;
use crate::run_head::{scanline_len, RunHead};
use crate::scanline_boolean_algebra::{combine_runs, rect_runs, runs_combine_non_empty, RegionOp, SweepOp};

#[derive(Debug, Clone, Default)]
enum RegionState {
    #[default]
    Empty,
    Rect,
    Complex(RunHead),
}

/// A set of integer points built from axis-aligned rectangles.
#[derive(Debug, Clone, Default)]
pub struct Region {
    bounds: Rect,
    state: RegionState,
}

impl Region {
    /// An empty region.
    pub fn new() -> Self {
        Self {
            bounds: Rect::EMPTY,
            state: RegionState::Empty,
        }
    }

    /// A region covering exactly `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let mut r = Self::new();
        r.set_rect(rect);
        r
    }

    /// The union of all `rects`.
    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut r = Self::new();
        r.set_rects(rects);
        r
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// Clear the region. Always returns `false`.
    pub fn set_empty(&mut self) -> bool {
        self.bounds = Rect::EMPTY;
        self.state = RegionState::Empty;
        false
    }

    /// Make the region exactly `rect`. An empty rect, or one whose right or
    /// bottom edge is the run sentinel, empties the region.
    pub fn set_rect(&mut self, rect: Rect) -> bool {
        if rect.is_empty() || rect.right == SENTINEL || rect.bottom == SENTINEL {
            return self.set_empty();
        }
        self.bounds = rect;
        self.state = RegionState::Rect;
        true
    }

    /// Make the region a deep copy of `other`.
    pub fn set_region(&mut self, other: &Region) -> bool {
        self.bounds = other.bounds;
        self.state = other.state.clone();
        self.is_not_empty()
    }

    /// Make the region the union of all `rects`.
    pub fn set_rects(&mut self, rects: &[Rect]) -> bool {
        self.set_empty();
        for r in rects {
            self.op_rect(*r, RegionOp::Union);
        }
        self.is_not_empty()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, RegionState::Empty)
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Returns `true` if the region is exactly one non-empty rectangle.
    pub fn is_rect(&self) -> bool {
        matches!(self.state, RegionState::Rect)
    }

    /// Returns `true` if the region needs more than one rectangle.
    pub fn is_complex(&self) -> bool {
        matches!(self.state, RegionState::Complex(_))
    }

    /// Tight bounding box, or `Rect::EMPTY` for an empty region.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn run_head(&self) -> Option<&RunHead> {
        match &self.state {
            RegionState::Complex(head) => Some(head),
            _ => None,
        }
    }

    /// Exchange contents with `other`.
    pub fn swap(&mut self, other: &mut Region) {
        core::mem::swap(self, other);
    }

    /// The run encoding of a non-empty region. A rect region is encoded into
    /// `tmp`. Also returns the number of intervals in the encoding.
    fn runs<'a>(&'a self, tmp: &'a mut [Run; RECT_REGION_RUNS]) -> (&'a [Run], usize) {
        match &self.state {
            RegionState::Complex(head) => (head.runs(), head.interval_count()),
            _ => {
                let b = self.bounds;
                *tmp = rect_runs(b.left, b.top, b.right, b.bottom);
                (&tmp[..], 1)
            }
        }
    }

    /// Install a sweep result: trim a leading or trailing empty scanline and
    /// collapse to the simplest state that holds it.
    fn set_runs(&mut self, mut runs: RunArray) -> bool {
        let count = runs.count();
        if count <= EMPTY_REGION_RUNS {
            return self.set_empty();
        }

        let mut start = 0;
        let mut stop = count;
        if count > RECT_REGION_RUNS {
            // An empty first scanline has the sentinel where its first left
            // would be. Its bottom becomes the new top.
            if runs[3] == SENTINEL {
                runs[3] = runs[1];
                start = 3;
            }
            // An empty last scanline ends `x-sentinel, bottom, 0, x-sentinel,
            // y-sentinel`. Drop it and end the encoding after the row above.
            if runs[stop - 5] == SENTINEL {
                runs[stop - 4] = SENTINEL;
                stop -= 3;
            }
        }

        let len = stop - start;
        assert!(len >= RECT_REGION_RUNS, "sweep produced a truncated encoding of {} runs", len);

        if len == RECT_REGION_RUNS {
            let r = &runs.buffer()[start..stop];
            return self.set_rect(Rect::new(r[3], r[0], r[4], r[1]));
        }

        let trimmed = if start == 0 && stop == count {
            runs
        } else {
            runs.sub_list(start, stop)
        };
        let (head, bounds) = RunHead::from_runs(trimmed, len);
        self.bounds = bounds;
        self.state = RegionState::Complex(head);
        true
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns `true` if the point (x, y) is inside the region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if !self.bounds.contains(x, y) {
            return false;
        }
        let head = match &self.state {
            RegionState::Empty => return false,
            RegionState::Rect => return true,
            RegionState::Complex(head) => head,
        };

        let runs = head.runs();
        // Skip the bottom and interval count. The x-sentinel reads as a left
        // edge past every x and ends the walk.
        let mut i = head.find_scanline(y) + 2;
        loop {
            if x < runs[i] {
                return false;
            }
            if x < runs[i + 1] {
                return true;
            }
            i += 2;
        }
    }

    /// Returns `true` if every point of the non-empty `rect` is inside the
    /// region.
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        if !self.bounds.contains_rect(rect) {
            return false;
        }
        let head = match &self.state {
            RegionState::Empty => return false,
            RegionState::Rect => return true,
            RegionState::Complex(head) => head,
        };

        let runs = head.runs();
        let mut i = head.find_scanline(rect.top);
        loop {
            if !scanline_contains(runs, i, rect.left, rect.right) {
                return false;
            }
            if rect.bottom <= runs[i] {
                return true;
            }
            i += scanline_len(runs[i + 1] as usize);
        }
    }

    /// Returns `true` if every point of `other` is inside the region. Empty
    /// regions contain nothing and are contained by nothing.
    pub fn contains_region(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() || !self.bounds.contains_rect(&other.bounds) {
            return false;
        }
        if self.is_rect() {
            return true;
        }
        if other.is_rect() {
            return self.contains_rect(&other.bounds);
        }
        // a contains b exactly when b - a is empty.
        let mut tmp_a = [0; RECT_REGION_RUNS];
        let mut tmp_b = [0; RECT_REGION_RUNS];
        let (a_runs, _) = other.runs(&mut tmp_a);
        let (b_runs, _) = self.runs(&mut tmp_b);
        !runs_combine_non_empty(a_runs, b_runs, SweepOp::Difference)
    }

    /// Returns `true` if the region and `rect` share at least one point.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let sect = match self.bounds.intersect(rect) {
            Some(sect) => sect,
            None => return false,
        };
        let head = match &self.state {
            RegionState::Empty => return false,
            RegionState::Rect => return true,
            RegionState::Complex(head) => head,
        };

        let runs = head.runs();
        let mut i = head.find_scanline(sect.top);
        loop {
            if scanline_intersects(runs, i, sect.left, sect.right) {
                return true;
            }
            if sect.bottom <= runs[i] {
                return false;
            }
            i += scanline_len(runs[i + 1] as usize);
        }
    }

    /// Returns `true` if the two regions share at least one point. Stops at
    /// the first overlapping row without building the intersection.
    pub fn intersects(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() || !self.bounds.intersects(&other.bounds) {
            return false;
        }
        match (self.is_rect(), other.is_rect()) {
            (true, true) => true,
            (true, false) => other.intersects_rect(&self.bounds),
            (false, true) => self.intersects_rect(&other.bounds),
            (false, false) => {
                let mut tmp_a = [0; RECT_REGION_RUNS];
                let mut tmp_b = [0; RECT_REGION_RUNS];
                let (a_runs, _) = self.runs(&mut tmp_a);
                let (b_runs, _) = other.runs(&mut tmp_b);
                runs_combine_non_empty(a_runs, b_runs, SweepOp::Intersect)
            }
        }
    }

    /// Cheap containment test: `true` only when the region is a single
    /// rectangle containing `rect`. A `false` answer is inconclusive.
    pub fn quick_contains(&self, rect: &Rect) -> bool {
        self.is_rect() && self.bounds.contains_rect(rect)
    }

    /// Cheap disjointness test on bounds alone. A `false` answer is
    /// inconclusive.
    pub fn quick_reject_rect(&self, rect: &Rect) -> bool {
        self.is_empty() || rect.is_empty() || !self.bounds.intersects(rect)
    }

    /// Cheap disjointness test on bounds alone. A `false` answer is
    /// inconclusive.
    pub fn quick_reject(&self, other: &Region) -> bool {
        self.is_empty() || other.is_empty() || !self.bounds.intersects(&other.bounds)
    }

    /// A rough measure of the region's cost: 0 when empty, 1 for a single
    /// rectangle, otherwise the number of stored intervals.
    pub fn compute_region_complexity(&self) -> usize {
        match &self.state {
            RegionState::Empty => 0,
            RegionState::Rect => 1,
            RegionState::Complex(head) => head.interval_count(),
        }
    }

    /// Rectangles of the region, top to bottom and left to right within a
    /// scanline.
    pub fn iter(&self) -> RegionIter<'_> {
        RegionIter::new(self)
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Move the region by (dx, dy) in place. Shifted coordinates must stay
    /// below the run sentinel.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        if self.is_empty() {
            return;
        }
        self.bounds = self.bounds.offset(dx, dy);
        if let RegionState::Complex(head) = &mut self.state {
            head.translate(dx, dy);
        }
    }

    /// A copy of the region moved by (dx, dy).
    pub fn translated(&self, dx: i32, dy: i32) -> Region {
        let mut r = self.clone();
        r.translate(dx, dy);
        r
    }

    // ------------------------------------------------------------------------
    // Boolean operations
    // ------------------------------------------------------------------------

    /// `self = self <op> other`.
    pub fn op(&mut self, other: &Region, op: RegionOp) -> bool {
        let result = combine(self, other, op);
        *self = result;
        self.is_not_empty()
    }

    /// `self = self <op> rect`.
    pub fn op_rect(&mut self, rect: Rect, op: RegionOp) -> bool {
        let other = Region::from_rect(rect);
        self.op(&other, op)
    }

    /// `self = a <op> b`.
    pub fn op_regions(&mut self, a: &Region, b: &Region, op: RegionOp) -> bool {
        *self = combine(a, b, op);
        self.is_not_empty()
    }

    /// `self = rect <op> region`.
    pub fn op_rect_region(&mut self, rect: Rect, region: &Region, op: RegionOp) -> bool {
        let a = Region::from_rect(rect);
        self.op_regions(&a, region, op)
    }

    /// `self = region <op> rect`.
    pub fn op_region_rect(&mut self, region: &Region, rect: Rect, op: RegionOp) -> bool {
        let b = Region::from_rect(rect);
        self.op_regions(region, &b, op)
    }

    /// `self = self | other`.
    pub fn union(&mut self, other: &Region) -> bool {
        self.op(other, RegionOp::Union)
    }

    /// `self = self & other`.
    pub fn intersect(&mut self, other: &Region) -> bool {
        self.op(other, RegionOp::Intersect)
    }

    /// `self = self ^ other`.
    pub fn xor(&mut self, other: &Region) -> bool {
        self.op(other, RegionOp::Xor)
    }

    /// Set difference: `self = self - other`.
    pub fn minus(&mut self, other: &Region) -> bool {
        self.op(other, RegionOp::Difference)
    }
}

/// `L..R` lies inside one interval of the scanline at `i`.
fn scanline_contains(runs: &[Run], i: usize, left: i32, right: i32) -> bool {
    let mut x = i + 2;
    loop {
        if left < runs[x] {
            return false;
        }
        if right <= runs[x + 1] {
            return true;
        }
        x += 2;
    }
}

/// `L..R` overlaps some interval of the scanline at `i`.
fn scanline_intersects(runs: &[Run], i: usize, left: i32, right: i32) -> bool {
    let mut x = i + 2;
    loop {
        if right <= runs[x] {
            return false;
        }
        if left < runs[x + 1] {
            return true;
        }
        x += 2;
    }
}

/// Results the bounds alone decide. Each matches what the full sweep would
/// produce for the same operands.
fn shortcut(a: &Region, b: &Region, op: SweepOp) -> Option<Region> {
    match op {
        SweepOp::Difference => {
            if a.is_empty() {
                return Some(Region::new());
            }
            if b.is_empty() || !a.bounds.intersects(&b.bounds) {
                return Some(a.clone());
            }
            if b.is_rect() && b.bounds.contains_rect(&a.bounds) {
                return Some(Region::new());
            }
        }
        SweepOp::Intersect => {
            let bounds = match a.bounds.intersect(&b.bounds) {
                Some(bounds) if a.is_not_empty() && b.is_not_empty() => bounds,
                _ => return Some(Region::new()),
            };
            if a.is_rect() && b.is_rect() {
                return Some(Region::from_rect(bounds));
            }
            if a.is_rect() && a.bounds.contains_rect(&b.bounds) {
                return Some(b.clone());
            }
            if b.is_rect() && b.bounds.contains_rect(&a.bounds) {
                return Some(a.clone());
            }
        }
        SweepOp::Union => {
            if a.is_empty() {
                return Some(b.clone());
            }
            if b.is_empty() {
                return Some(a.clone());
            }
            if a.is_rect() && a.bounds.contains_rect(&b.bounds) {
                return Some(a.clone());
            }
            if b.is_rect() && b.bounds.contains_rect(&a.bounds) {
                return Some(b.clone());
            }
        }
        SweepOp::Xor => {
            if a.is_empty() {
                return Some(b.clone());
            }
            if b.is_empty() {
                return Some(a.clone());
            }
        }
    }
    None
}

/// `a <op> b` as a fresh region. Operands are only read, so either may be a
/// copy of the region the caller is about to overwrite.
fn combine(a: &Region, b: &Region, op: RegionOp) -> Region {
    let (a, b, op) = match op {
        RegionOp::Replace => return b.clone(),
        RegionOp::ReverseDifference => (b, a, SweepOp::Difference),
        RegionOp::Difference => (a, b, SweepOp::Difference),
        RegionOp::Intersect => (a, b, SweepOp::Intersect),
        RegionOp::Union => (a, b, SweepOp::Union),
        RegionOp::Xor => (a, b, SweepOp::Xor),
    };

    if let Some(result) = shortcut(a, b, op) {
        tracing::trace!(?op, "region op resolved from bounds");
        return result;
    }

    let mut tmp_a = [0; RECT_REGION_RUNS];
    let mut tmp_b = [0; RECT_REGION_RUNS];
    let (a_runs, a_intervals) = a.runs(&mut tmp_a);
    let (b_runs, b_intervals) = b.runs(&mut tmp_b);
    let runs = combine_runs(a_runs, a_intervals, b_runs, b_intervals, op);

    let mut result = Region::new();
    result.set_runs(runs);
    result
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::from_rect(rect)
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        let mut r = Region::new();
        for rect in iter {
            r.op_rect(rect, RegionOp::Union);
        }
        r
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = Rect;
    type IntoIter = RegionIter<'a>;

    fn into_iter(self) -> RegionIter<'a> {
        self.iter()
    }
}

/// Regions are equal when they decompose into the same rectangles in the
/// same order.
impl PartialEq for Region {
    fn eq(&self, other: &Region) -> bool {
        self.bounds == other.bounds && self.iter().eq(other.iter())
    }
}

impl Eq for Region {}

impl core::hash::Hash for Region {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        for r in self.iter() {
            r.hash(state);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
