//! Contrastium - parallel histogram contrast stretching.
//!
//! This library stretches the contrast of raw 8-bit pixel buffers:
//! - Per-channel 256-bucket intensity histograms, accumulated in parallel
//! - Clipping bounds resolved with a configurable outlier-ignore fraction
//! - A single global linear rescale of every byte onto [0, 255]
//!
//! Work is split across a fixed set of fork-joined worker threads under one
//! of two interchangeable partitioning policies (static ranges or a dynamic
//! atomic chunk cursor); results are bit-identical for any worker count and
//! either policy. File formats and I/O are the caller's concern - the
//! engine only sees a byte buffer and its channel layout.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use contrastium::{stretch, Channels, StretchConfig};
//!
//! let mut pixels = std::fs::read("frame.raw")?;
//! let config = StretchConfig::with_coefficient(0.01);
//! let outcome = stretch(&mut pixels, Channels::Rgb, &config)?;
//!
//! println!("stretched from {:?}", outcome.bounds);
//! ```

mod config;
mod error;
mod histogram;
mod partition;
mod remap;
mod stretch;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{Channels, PartitionMode, StretchConfig, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};

// ============================================================================
// Pipeline stages
// ============================================================================

pub use histogram::{resolve_bounds, Bounds, Histogram, BUCKETS};
pub use partition::{static_ranges, ChunkCursor};
pub use stretch::{compute_histograms, remap_buffer, stretch, StretchOutcome};
