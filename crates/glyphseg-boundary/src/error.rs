//! Error types for glyphseg-boundary
//!
//! Only construction can fail: loading a classifier, checking it against
//! a feature extractor, or validating options. Once built, splitters,
//! mergers and detectors never return errors; degenerate candidates are
//! skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring boundary detection
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Vectorizer configuration error
    #[error("vectorizer error: {0}")]
    Vector(#[from] glyphseg_vector::VectorError),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Classifier label set lacks an outcome the decision needs
    #[error("classifier has no '{label}' outcome (labels: {labels:?})")]
    MissingOutcome { label: String, labels: Vec<String> },

    /// Feature extractor and classifier disagree on the feature list
    #[error("feature descriptors differ: classifier expects {expected:?}, extractor gives {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Structurally inconsistent classifier model
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for boundary detection setup
pub type BoundaryResult<T> = Result<T, BoundaryError>;
