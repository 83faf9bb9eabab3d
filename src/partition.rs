//! Work partitioning for the pipeline passes.
//!
//! Two interchangeable policies split an index range across workers:
//! static precomputes one contiguous range per worker, dynamic hands out
//! fixed-size chunks through a shared atomic cursor. Either way every
//! index in `[0, total)` is claimed by exactly one worker, exactly once.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Compute one contiguous range per worker.
///
/// With `base = total / workers` and `extra = total % workers`, the first
/// `extra` workers receive one extra item each, so ranges cover `[0, total)`
/// exactly with a maximum imbalance of one item. Trailing workers get empty
/// ranges when there are more workers than items.
pub fn static_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
    let base = total / workers;
    let extra = total % workers;

    (0..workers)
        .map(|k| {
            let start = k * base + k.min(extra);
            let end = (k + 1) * base + (k + 1).min(extra);
            start..end
        })
        .collect()
}

/// Shared work-stealing cursor for dynamic partitioning.
///
/// Each `claim` advances the cursor by the fixed chunk size and returns the
/// claimed range, clipped to `total`. Returns `None` once the range is
/// exhausted. Lock-free; the fetch-add is the only synchronization.
#[derive(Debug)]
pub struct ChunkCursor {
    next: AtomicUsize,
    total: usize,
    chunk_size: usize,
}

impl ChunkCursor {
    pub fn new(total: usize, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            next: AtomicUsize::new(0),
            total,
            chunk_size,
        }
    }

    /// Claim the next chunk, or `None` when all work is handed out.
    pub fn claim(&self) -> Option<Range<usize>> {
        let start = self.next.fetch_add(self.chunk_size, Ordering::Relaxed);
        if start >= self.total {
            return None;
        }
        let end = (start + self.chunk_size).min(self.total);
        Some(start..end)
    }
}
