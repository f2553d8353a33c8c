//! Probabilistic classifiers
//!
//! Splitters and mergers only need a function from a feature vector to a
//! distribution over outcome labels; [`Classifier`] is that function.
//! [`LogisticModel`] is the bundled implementation, a multinomial logistic
//! regression read from JSON:
//!
//! ```json
//! {
//!   "labels": ["DO_SPLIT", "DO_NOT_SPLIT"],
//!   "feature-descriptors": ["split-width-ratio", "split-relative-position"],
//!   "weights": [[1.5, -0.5], [-1.5, 0.5]],
//!   "biases": [0.0, 0.0]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BoundaryError, BoundaryResult};

/// A trained decision function
pub trait Classifier {
    /// Outcome labels, in the order of [`decide`](Self::decide)'s result
    fn labels(&self) -> &[String];

    /// Names of the features expected by [`decide`](Self::decide), in order
    fn feature_descriptors(&self) -> &[String];

    /// One probability per label, summing to 1
    fn decide(&self, features: &[f64]) -> Vec<f64>;
}

/// Multinomial logistic regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LogisticModel {
    labels: Vec<String>,
    feature_descriptors: Vec<String>,
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl LogisticModel {
    /// Create a model
    ///
    /// # Arguments
    ///
    /// * `labels` - Outcome labels
    /// * `feature_descriptors` - Feature names
    /// * `weights` - One row per label, one column per feature
    /// * `biases` - One per label
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::InvalidModel`] if the dimensions disagree
    /// or a parameter is not finite.
    pub fn new(
        labels: Vec<String>,
        feature_descriptors: Vec<String>,
        weights: Vec<Vec<f64>>,
        biases: Vec<f64>,
    ) -> BoundaryResult<Self> {
        let model = Self {
            labels,
            feature_descriptors,
            weights,
            biases,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model from JSON
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Json`] for malformed JSON and
    /// [`BoundaryError::InvalidModel`] for an inconsistent model.
    pub fn from_json_str(json: &str) -> BoundaryResult<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Read a model from a JSON file
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

    /// Serialize the model to JSON
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> BoundaryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> BoundaryResult<()> {
        if self.labels.is_empty() {
            return Err(BoundaryError::InvalidModel("no labels".to_string()));
        }
        if self.weights.len() != self.labels.len() {
            return Err(BoundaryError::InvalidModel(format!(
                "{} weight rows for {} labels",
                self.weights.len(),
                self.labels.len()
            )));
        }
        if self.biases.len() != self.labels.len() {
            return Err(BoundaryError::InvalidModel(format!(
                "{} biases for {} labels",
                self.biases.len(),
                self.labels.len()
            )));
        }
        let features = self.feature_descriptors.len();
        if let Some((i, row)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != features)
        {
            return Err(BoundaryError::InvalidModel(format!(
                "weight row {} has {} entries for {} features",
                i,
                row.len(),
                features
            )));
        }
        let finite = self
            .weights
            .iter()
            .flatten()
            .chain(&self.biases)
            .all(|w| w.is_finite());
        if !finite {
            return Err(BoundaryError::InvalidModel(
                "weights must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Classifier for LogisticModel {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn feature_descriptors(&self) -> &[String] {
        &self.feature_descriptors
    }

    /// Softmax over `weights · features + biases`
    ///
    /// Missing trailing features count as zero.
    fn decide(&self, features: &[f64]) -> Vec<f64> {
        let scores: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                bias + row
                    .iter()
                    .zip(features)
                    .map(|(w, f)| w * f)
                    .sum::<f64>()
            })
            .collect();
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        exp.into_iter().map(|e| e / total).collect()
    }
}
