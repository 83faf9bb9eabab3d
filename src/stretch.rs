//! Pipeline orchestration: accumulate, resolve, remap.
//!
//! Both passes fork a fixed set of worker threads with `std::thread::scope`
//! and join them before the next pass begins; the calling thread always
//! works as worker 0. Histograms travel by ownership out of the scan
//! threads, so the accumulation pass holds no lock anywhere. A worker
//! count of 1 bypasses partitioning entirely and runs sequentially; both
//! paths are bit-identical for the same input.

use crate::config::{Channels, PartitionMode, StretchConfig};
use crate::error::{Error, Result};
use crate::histogram::{self, resolve_bounds, Bounds, Histogram};
use crate::partition::{static_ranges, ChunkCursor};
use crate::remap;

/// Wrapper to send a raw buffer pointer into dynamic-mode remap workers.
///
/// SAFETY: every chunk claimed through the `ChunkCursor` is disjoint, so
/// no two threads ever write the same index. Access the inner value via
/// `.get()` so closures capture `&UnsafeSendPtr` rather than the pointer.
#[derive(Debug, Clone, Copy)]
struct UnsafeSendPtr<T: Copy>(T);
unsafe impl<T: Copy> Send for UnsafeSendPtr<T> {}
unsafe impl<T: Copy> Sync for UnsafeSendPtr<T> {}

impl<T: Copy> UnsafeSendPtr<T> {
    fn new(ptr: T) -> Self {
        Self(ptr)
    }

    fn get(&self) -> T {
        self.0
    }
}

/// Result of an end-to-end stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StretchOutcome {
    /// Global bounds the remap was (or would have been) based on.
    pub bounds: Bounds,
    /// False when the bounds were degenerate and the buffer was left
    /// unchanged.
    pub remapped: bool,
}

/// Build merged per-channel histograms of the buffer.
///
/// The accumulation result is invariant across worker counts and partition
/// modes. Assumes a well-formed buffer (`len % channels == 0`).
pub fn compute_histograms(
    buffer: &[u8],
    channels: Channels,
    config: &StretchConfig,
) -> Result<Vec<Histogram>> {
    config.validate()?;

    let stride = channels.stride();
    debug_assert_eq!(buffer.len() % stride, 0);
    let pixel_count = buffer.len() / stride;

    if config.workers == 1 {
        return Ok(histogram::scan_range(buffer, 0, buffer.len(), channels));
    }

    let merged = match config.partition {
        PartitionMode::Static => {
            let ranges = static_ranges(pixel_count, config.workers);
            std::thread::scope(|scope| {
                let handles: Vec<_> = ranges[1..]
                    .iter()
                    .map(|range| {
                        let (start, end) = (range.start * stride, range.end * stride);
                        scope.spawn(move || histogram::scan_range(buffer, start, end, channels))
                    })
                    .collect();

                let own = histogram::scan_range(buffer, 0, ranges[0].end * stride, channels);
                let locals = handles
                    .into_iter()
                    .map(|handle| handle.join().expect("histogram worker panicked"))
                    .collect();
                histogram::merge_sets(own, locals)
            })
        }
        PartitionMode::Dynamic => {
            let cursor = ChunkCursor::new(pixel_count, config.chunk_size);
            std::thread::scope(|scope| {
                let handles: Vec<_> = (1..config.workers)
                    .map(|_| scope.spawn(|| scan_dynamic(buffer, &cursor, channels)))
                    .collect();

                let own = scan_dynamic(buffer, &cursor, channels);
                let locals = handles
                    .into_iter()
                    .map(|handle| handle.join().expect("histogram worker panicked"))
                    .collect();
                histogram::merge_sets(own, locals)
            })
        }
    };

    Ok(merged)
}

/// One dynamic-mode worker: drain the cursor into thread-local histograms.
fn scan_dynamic(buffer: &[u8], cursor: &ChunkCursor, channels: Channels) -> Vec<Histogram> {
    let stride = channels.stride();
    let mut local = vec![Histogram::new(); stride];
    while let Some(range) = cursor.claim() {
        histogram::scan_range_into(
            buffer,
            range.start * stride,
            range.end * stride,
            channels,
            &mut local,
        );
    }
    local
}

/// Linearly rescale every byte of the buffer in place so that
/// `[bounds.min, bounds.max]` maps onto `[0, 255]`.
///
/// Channel-agnostic: the same global stretch is applied to every byte.
/// Degenerate bounds (min == max) have no defined scale; the buffer is
/// left unchanged and a warning is logged.
pub fn remap_buffer(buffer: &mut [u8], bounds: Bounds, config: &StretchConfig) -> Result<()> {
    config.validate()?;

    if bounds.min > bounds.max {
        return Err(Error::InvalidBounds {
            min: bounds.min,
            max: bounds.max,
        });
    }
    if bounds.is_degenerate() {
        tracing::warn!(
            "Degenerate bounds ({}, {}): no scale exists, buffer left unchanged",
            bounds.min,
            bounds.max
        );
        return Ok(());
    }

    let division = remap::division(bounds);

    if config.workers == 1 {
        remap::remap_slice(buffer, bounds.min, division);
        return Ok(());
    }

    match config.partition {
        PartitionMode::Static => {
            let ranges = static_ranges(buffer.len(), config.workers);
            std::thread::scope(|scope| {
                // Ranges are consecutive, so the buffer splits into one
                // disjoint sub-slice per worker.
                let mut tail = &mut *buffer;
                let mut slices = Vec::with_capacity(ranges.len());
                for range in &ranges {
                    let (head, rest) = std::mem::take(&mut tail).split_at_mut(range.len());
                    slices.push(head);
                    tail = rest;
                }

                let mut slices = slices.into_iter();
                let own = slices.next();
                for slice in slices {
                    scope.spawn(move || remap::remap_slice(slice, bounds.min, division));
                }
                if let Some(slice) = own {
                    remap::remap_slice(slice, bounds.min, division);
                }
            });
        }
        PartitionMode::Dynamic => {
            let cursor = ChunkCursor::new(buffer.len(), config.chunk_size);
            let ptr = UnsafeSendPtr::new(buffer.as_mut_ptr());
            std::thread::scope(|scope| {
                for _ in 1..config.workers {
                    scope.spawn(|| remap_dynamic(&ptr, &cursor, bounds.min, division));
                }
                remap_dynamic(&ptr, &cursor, bounds.min, division);
            });
        }
    }

    Ok(())
}

/// One dynamic-mode remap worker: drain the cursor, writing claimed chunks.
fn remap_dynamic(ptr: &UnsafeSendPtr<*mut u8>, cursor: &ChunkCursor, min: u8, division: f32) {
    while let Some(range) = cursor.claim() {
        // SAFETY: chunks claimed from the cursor never overlap, and the
        // buffer outlives the scope this runs in.
        let chunk = unsafe {
            std::slice::from_raw_parts_mut(ptr.get().add(range.start), range.len())
        };
        remap::remap_slice(chunk, min, division);
    }
}

/// Run the full two-pass pipeline: accumulate histograms, resolve and
/// combine per-channel bounds, then remap the buffer in place.
pub fn stretch(
    buffer: &mut [u8],
    channels: Channels,
    config: &StretchConfig,
) -> Result<StretchOutcome> {
    config.validate()?;

    let histograms = compute_histograms(buffer, channels, config)?;

    let ignore_count = config.ignore_count(buffer.len() / channels.stride()) as u64;
    let bounds = histograms
        .iter()
        .map(|histogram| resolve_bounds(histogram, ignore_count))
        .reduce(Bounds::combine)
        .unwrap_or(Bounds::FULL);

    tracing::debug!(
        "Resolved bounds ({}, {}) with ignore count {} ({} workers, {} partitioning)",
        bounds.min,
        bounds.max,
        ignore_count,
        config.workers,
        config.partition
    );

    if bounds.is_degenerate() {
        tracing::warn!(
            "Flat intensity range at {}: buffer left unchanged",
            bounds.min
        );
        return Ok(StretchOutcome {
            bounds,
            remapped: false,
        });
    }

    remap_buffer(buffer, bounds, config)?;

    Ok(StretchOutcome {
        bounds,
        remapped: true,
    })
}
