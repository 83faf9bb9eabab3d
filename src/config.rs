//! Stretch configuration.
//!
//! A single `StretchConfig` carries everything the pipeline needs beyond the
//! buffer itself: the outlier-ignore coefficient, the worker count, and the
//! work-partitioning policy. Validation happens once, up front, in every
//! public entry point.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{Error, Result};

/// Default chunk size for dynamic partitioning, in work items.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Channel layout of a pixel buffer.
///
/// Discriminants double as the interleave stride: a sample at buffer index
/// `i` belongs to channel `i % stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channels {
    /// Single grayscale plane.
    Gray = 1,
    /// Interleaved RGB triplets.
    Rgb = 3,
}

impl Channels {
    /// Number of interleaved channels, which is also the sample stride.
    #[inline]
    pub fn stride(self) -> usize {
        self as usize
    }
}

/// How an index range is split across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartitionMode {
    /// Precomputed contiguous ranges, one per worker.
    #[default]
    Static,
    /// Shared atomic cursor advanced in fixed-size chunks.
    Dynamic,
}

/// Configuration for a contrast-stretch run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StretchConfig {
    /// Fraction of darkest/brightest samples ignored when resolving
    /// clipping bounds. Valid range [0.0, 0.5).
    pub coefficient: f32,
    /// Number of worker threads, including the calling thread. Minimum 1;
    /// 1 runs a plain sequential scan and remap.
    pub workers: usize,
    /// Work-partitioning policy used by both pipeline passes.
    pub partition: PartitionMode,
    /// Items claimed per cursor advance in dynamic mode.
    pub chunk_size: usize,
}

impl Default for StretchConfig {
    fn default() -> Self {
        Self {
            coefficient: 0.0,
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            partition: PartitionMode::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StretchConfig {
    /// Create a config with the given coefficient and defaults elsewhere.
    pub fn with_coefficient(coefficient: f32) -> Self {
        Self {
            coefficient,
            ..Default::default()
        }
    }

    /// Check every field, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.coefficient) {
            return Err(Error::InvalidCoefficient {
                value: self.coefficient,
            });
        }
        if self.workers == 0 {
            return Err(Error::NoWorkers);
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        Ok(())
    }

    /// Number of samples per channel ignored at each end of the histogram.
    pub(crate) fn ignore_count(&self, samples_per_channel: usize) -> usize {
        (samples_per_channel as f64 * self.coefficient as f64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StretchConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.workers >= 1);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn coefficient_range_is_half_open() {
        assert!(StretchConfig::with_coefficient(0.0).validate().is_ok());
        assert!(StretchConfig::with_coefficient(0.49).validate().is_ok());

        assert_eq!(
            StretchConfig::with_coefficient(0.5).validate(),
            Err(Error::InvalidCoefficient { value: 0.5 })
        );
        assert_eq!(
            StretchConfig::with_coefficient(-0.1).validate(),
            Err(Error::InvalidCoefficient { value: -0.1 })
        );
    }

    #[test]
    fn zero_workers_rejected() {
        let config = StretchConfig {
            workers: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(Error::NoWorkers));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let config = StretchConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(Error::InvalidChunkSize));
    }

    #[test]
    fn ignore_count_floors() {
        let config = StretchConfig::with_coefficient(0.1);
        assert_eq!(config.ignore_count(99), 9);
        assert_eq!(config.ignore_count(100), 10);
        assert_eq!(StretchConfig::with_coefficient(0.0).ignore_count(100), 0);
    }

    #[test]
    fn partition_mode_display() {
        assert_eq!(PartitionMode::Static.to_string(), "static");
        assert_eq!(PartitionMode::Dynamic.to_string(), "dynamic");
        assert_eq!("dynamic".parse(), Ok(PartitionMode::Dynamic));
    }

    #[test]
    fn channels_stride() {
        assert_eq!(Channels::Gray.stride(), 1);
        assert_eq!(Channels::Rgb.stride(), 3);
    }
}
