//! Error types for glyphseg-core
//!
//! Geometry queries on shapes never fail: coordinates outside a shape are
//! simply white, and degenerate shapes yield empty results. Errors are
//! reserved for constructing pixel sources and shapes from bad input.

use thiserror::Error;

/// glyphseg-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid bitmap dimensions
    #[error("invalid bitmap dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel buffer length does not match the bitmap dimensions
    #[error("pixel buffer length mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for glyphseg-core operations
pub type Result<T> = std::result::Result<T, Error>;
