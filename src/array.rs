//! Run buffer storage.
//!
//! `RunArray` is the physical storage behind a region's scanline encoding.
//! Short encodings live inline; longer ones spill to the heap. The buffer
//! tracks a logical length (`count`) separately from its physical size so
//! the sweep can write ahead of the data it has committed.

use smallvec::SmallVec;

use crate::basics::Run;

/// Runs kept inline before the buffer spills to the heap.
pub const INLINE_RUNS: usize = 256;

/// A growable buffer of runs with a logical length distinct from its size.
///
/// Physical slots past `count` are always initialized (zero-filled on
/// growth), so they may be written through `IndexMut` before being
/// committed with `set_count`.
#[derive(Debug, Clone, Default)]
pub struct RunArray {
    runs: SmallVec<[Run; INLINE_RUNS]>,
    count: usize,
}

impl RunArray {
    pub fn new() -> Self {
        Self {
            runs: SmallVec::new(),
            count: 0,
        }
    }

    /// Create a buffer holding a copy of `runs`, with `count == runs.len()`.
    pub fn from_slice(runs: &[Run]) -> Self {
        Self {
            runs: SmallVec::from_slice(runs),
            count: runs.len(),
        }
    }

    /// Logical length.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Set the logical length. The physical buffer must already hold
    /// `count` slots.
    pub fn set_count(&mut self, count: usize) {
        assert!(
            count <= self.runs.len(),
            "run count {} exceeds buffer size {}",
            count,
            self.runs.len()
        );
        self.count = count;
    }

    /// Physical size: number of addressable slots.
    pub fn capacity(&self) -> usize {
        self.runs.len()
    }

    /// Returns `true` if the buffer has not spilled to the heap.
    pub fn is_inline(&self) -> bool {
        !self.runs.spilled()
    }

    /// Make at least `n` slots addressable. When the buffer is too small it
    /// grows to `n + n / 2`; existing runs are preserved and new slots are
    /// zero. Never shrinks.
    pub fn resize_to_at_least(&mut self, n: usize) {
        if n > self.runs.len() {
            let target = n + n / 2;
            self.runs.resize(target, 0);
        }
    }

    /// Independent copy of the physical range `start..stop`. The copy's
    /// logical length is `stop - start`.
    pub fn sub_list(&self, start: usize, stop: usize) -> RunArray {
        assert!(
            start <= stop && stop <= self.runs.len(),
            "sub_list {}..{} out of range for buffer of {}",
            start,
            stop,
            self.runs.len()
        );
        RunArray::from_slice(&self.runs[start..stop])
    }

    /// The committed runs, `0..count`.
    pub fn as_slice(&self) -> &[Run] {
        &self.runs[..self.count]
    }

    /// Every addressable slot, committed or not.
    pub fn buffer(&self) -> &[Run] {
        &self.runs
    }

    /// Mutable access to the committed runs.
    pub fn as_mut_slice(&mut self) -> &mut [Run] {
        &mut self.runs[..self.count]
    }
}

impl core::ops::Index<usize> for RunArray {
    type Output = Run;

    fn index(&self, i: usize) -> &Run {
        &self.runs[i]
    }
}

impl core::ops::IndexMut<usize> for RunArray {
    fn index_mut(&mut self, i: usize) -> &mut Run {
        &mut self.runs[i]
    }
}

// ============================================================================
// Tests
// ============================================================================
