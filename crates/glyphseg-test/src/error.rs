//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Fixture rows are empty or ragged
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    /// Bitmap construction failed
    #[error("core error: {0}")]
    Core(#[from] glyphseg_core::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
