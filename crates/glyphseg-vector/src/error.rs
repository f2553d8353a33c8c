//! Error types for glyphseg-vector

use thiserror::Error;

/// Errors that can occur while building line definitions or vectorizers
#[derive(Debug, Error)]
pub enum VectorError {
    /// A line definition with an unusable sector or step pattern
    #[error("invalid line definition: {0}")]
    InvalidLineDefinition(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for vectorization operations
pub type VectorResult<T> = Result<T, VectorError>;
