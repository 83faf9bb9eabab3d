//! Error types for the stretch pipeline.

use thiserror::Error;

/// Errors that can occur when configuring or running a stretch.
///
/// Configuration errors are detected before any processing begins;
/// no partial work is ever performed.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Coefficient {value} is outside the valid range [0.0, 0.5)")]
    InvalidCoefficient { value: f32 },

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Chunk size must be greater than 0")]
    InvalidChunkSize,

    #[error("Invalid remap bounds: min {min} exceeds max {max}")]
    InvalidBounds { min: u8, max: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
