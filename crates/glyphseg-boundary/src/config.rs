//! Boundary detection configuration
//!
//! [`BoundaryConfig`] gathers the options of every component under one
//! JSON document:
//!
//! ```json
//! {
//!   "candidates": { "min-distance-between-splits": 5, "strategy": "line-convergence" },
//!   "splitter": { "min-width-ratio": 1.1, "beam-width": 5, "max-depth": 2 },
//!   "merger": { "max-width-ratio": 1.2, "max-distance-ratio": 0.15 },
//!   "detector": { "strategy": "letter-by-letter", "beam-width": 5 },
//!   "evaluation": { "tolerance": 4, "split-label-tolerance": 5 }
//! }
//! ```
//!
//! Every section and every field is optional; missing values take their
//! defaults.

use std::fmt::Display;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::candidates::CandidateOptions;
use crate::detector::DetectorOptions;
use crate::error::{BoundaryError, BoundaryResult};
use crate::evaluate::EvaluationOptions;
use crate::merger::MergerOptions;
use crate::splitter::SplitterOptions;

/// Validates that a float value is finite (not NaN or infinite).
#[inline]
pub fn validate_finite(value: f64, param_name: &str) -> BoundaryResult<()> {
    if !value.is_finite() {
        return Err(BoundaryError::InvalidConfig(format!(
            "'{}' must be finite, got: {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Validates that a value is within a specified range (inclusive).
#[inline]
pub fn validate_range<T: PartialOrd + Display>(
    value: T,
    min: T,
    max: T,
    param_name: &str,
) -> BoundaryResult<()> {
    if !(value >= min && value <= max) {
        return Err(BoundaryError::InvalidConfig(format!(
            "'{}' must be in range [{}, {}], got: {}",
            param_name, min, max, value
        )));
    }
    Ok(())
}

/// Validates that a value is positive (> 0).
#[inline]
pub fn validate_positive<T: PartialOrd + Display + Default>(
    value: T,
    param_name: &str,
) -> BoundaryResult<()> {
    if !(value > T::default()) {
        return Err(BoundaryError::InvalidConfig(format!(
            "'{}' must be positive, got: {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Options of every boundary detection component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BoundaryConfig {
    pub candidates: CandidateOptions,
    pub splitter: SplitterOptions,
    pub merger: MergerOptions,
    pub detector: DetectorOptions,
    pub evaluation: EvaluationOptions,
}

impl BoundaryConfig {
    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Json`] for malformed JSON and
    /// [`BoundaryError::InvalidConfig`] for out-of-range values.
    pub fn from_json_str(json: &str) -> BoundaryResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// As [`from_json_str`](Self::from_json_str), plus
    /// [`BoundaryError::Io`] if the file cannot be read.
    pub fn from_json_path(path: impl AsRef<Path>) -> BoundaryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every section
    pub fn validate(&self) -> BoundaryResult<()> {
        self.candidates.validate()?;
        self.splitter.validate()?;
        self.merger.validate()?;
        self.detector.validate()?;
        self.evaluation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_helpers() {
        assert!(validate_finite(1.0, "x").is_ok());
        assert!(validate_finite(f64::NAN, "x").is_err());
        assert!(validate_range(0.5, 0.0, 1.0, "p").is_ok());
        assert!(validate_range(f64::NAN, 0.0, 1.0, "p").is_err());
        assert!(validate_range(1.5, 0.0, 1.0, "p").is_err());
        assert!(validate_positive(0usize, "n").is_err());
        assert!(validate_positive(3usize, "n").is_ok());
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = BoundaryConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BoundaryConfig::default());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = BoundaryConfig::from_json_str(r#"{"detector": {"beam-width": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("beam-width"));
    }
}
