//! Shape merger
//!
//! Decides whether two neighbouring shapes are fragments of one letter.
//! Only pairs that are narrow and close enough (the merge gate) are shown
//! to the classifier; any other pair is never merged.

use std::fmt;

use glyphseg_core::PixelShape;
use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::config::{validate_finite, validate_positive};
use crate::error::BoundaryResult;
use crate::features::{MergeFeatureExtractor, check_descriptors};
use crate::outcome::{MergeOutcome, MergeOutcomes};
use crate::pair::ShapePair;

/// Options of the [`ShapeMerger`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MergerOptions {
    /// Widest pair considered, in x-heights
    pub max_width_ratio: f64,
    /// Largest gap considered, in x-heights
    pub max_distance_ratio: f64,
}

impl Default for MergerOptions {
    fn default() -> Self {
        Self {
            max_width_ratio: 1.2,
            max_distance_ratio: 0.15,
        }
    }
}

impl MergerOptions {
    pub fn with_max_width_ratio(mut self, ratio: f64) -> Self {
        self.max_width_ratio = ratio;
        self
    }

    pub fn with_max_distance_ratio(mut self, ratio: f64) -> Self {
        self.max_distance_ratio = ratio;
        self
    }

    pub fn validate(&self) -> BoundaryResult<()> {
        validate_positive(self.max_width_ratio, "max-width-ratio")?;
        validate_finite(self.max_width_ratio, "max-width-ratio")?;
        validate_finite(self.max_distance_ratio, "max-distance-ratio")?;
        Ok(())
    }

    /// True if the pair is narrow and close enough to be considered
    pub fn within_gate(&self, pair: &ShapePair<'_>) -> bool {
        pair.width_ratio() <= self.max_width_ratio && pair.distance_ratio() <= self.max_distance_ratio
    }
}

/// Classifier-driven merge decisions
pub struct ShapeMerger {
    options: MergerOptions,
    classifier: Box<dyn Classifier>,
    features: Box<dyn MergeFeatureExtractor>,
    outcomes: MergeOutcomes,
}

impl ShapeMerger {
    /// Create a merger
    ///
    /// # Errors
    ///
    /// Fails if the options do not validate, if the classifier has no
    /// `DO_MERGE`/`DO_NOT_MERGE` labels, or if it was trained on other
    /// features than `features` provides.
    pub fn new(
        options: MergerOptions,
        classifier: Box<dyn Classifier>,
        features: Box<dyn MergeFeatureExtractor>,
    ) -> BoundaryResult<Self> {
        options.validate()?;
        let outcomes = MergeOutcomes::resolve(classifier.as_ref())?;
        check_descriptors(classifier.as_ref(), features.descriptors())?;
        Ok(Self {
            options,
            classifier,
            features,
            outcomes,
        })
    }

    pub fn options(&self) -> &MergerOptions {
        &self.options
    }

    /// True if `first` and `second` pass the merge gate
    pub fn within_gate(&self, first: &PixelShape, second: &PixelShape) -> bool {
        self.options.within_gate(&ShapePair::new(first, second))
    }

    /// Probability that `first` and `second` form one letter
    ///
    /// The gate is not applied here; see [`merge_probability`](Self::merge_probability).
    pub fn check_merge(&self, first: &PixelShape, second: &PixelShape) -> f64 {
        let pair = ShapePair::new(first, second);
        let features = self.features.extract(&pair);
        let result = self.classifier.decide(&features);
        let prob = self.outcomes.probability(MergeOutcome::DoMerge, &result);
        tracing::trace!(pair = %pair, prob, "merge probability");
        prob
    }

    /// [`check_merge`](Self::check_merge) for pairs within the gate, 0
    /// for any other pair
    pub fn merge_probability(&self, first: &PixelShape, second: &PixelShape) -> f64 {
        if self.within_gate(first, second) {
            self.check_merge(first, second)
        } else {
            0.0
        }
    }

    /// The shape covering both, with the text metrics of `first`
    pub fn merge(first: &PixelShape, second: &PixelShape) -> PixelShape {
        PixelShape::union(first, second)
    }
}

impl fmt::Debug for ShapeMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeMerger")
            .field("options", &self.options)
            .field("features", &self.features.descriptors())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glyphseg_core::{GrayBitmap, PixelSource};

    use super::*;
    use crate::classifier::LogisticModel;
    use crate::error::BoundaryError;
    use crate::features::GeometricMergeFeatures;

    fn model(labels: [&str; 2], descriptors: &[&str]) -> Box<dyn Classifier> {
        let n = descriptors.len();
        Box::new(
            LogisticModel::new(
                labels.iter().map(|l| l.to_string()).collect(),
                descriptors.iter().map(|d| d.to_string()).collect(),
                vec![vec![0.0; n]; 2],
                vec![0.0, -1000.0],
            )
            .unwrap(),
        )
    }

    const DESCRIPTORS: [&str; 3] = ["merged-width", "merge-distance", "merged-height"];

    #[test]
    fn test_gate_and_probability() {
        let merger = ShapeMerger::new(
            MergerOptions::default(),
            model(["DO_MERGE", "DO_NOT_MERGE"], &DESCRIPTORS),
            Box::new(GeometricMergeFeatures::default()),
        )
        .unwrap();
        let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::new(60, 20).unwrap());
        let a = PixelShape::new(Arc::clone(&source), 0, 0, 4, 9).with_lines(0, 10);
        let b = PixelShape::new(Arc::clone(&source), 5, 0, 9, 9).with_lines(0, 10);
        let far = PixelShape::new(source, 30, 0, 34, 9).with_lines(0, 10);

        assert!(merger.within_gate(&a, &b));
        assert_eq!(merger.merge_probability(&a, &b), 1.0);
        assert!(!merger.within_gate(&a, &far));
        assert_eq!(merger.merge_probability(&a, &far), 0.0);

        let merged = ShapeMerger::merge(&a, &b);
        assert_eq!((merged.left(), merged.right()), (0, 9));
    }

    #[test]
    fn test_rejects_mismatched_model() {
        let wrong_labels = ShapeMerger::new(
            MergerOptions::default(),
            model(["DO_SPLIT", "DO_NOT_SPLIT"], &DESCRIPTORS),
            Box::new(GeometricMergeFeatures::default()),
        );
        assert!(matches!(wrong_labels, Err(BoundaryError::MissingOutcome { .. })));

        let wrong_features = ShapeMerger::new(
            MergerOptions::default(),
            model(["DO_MERGE", "DO_NOT_MERGE"], &["merged-width"]),
            Box::new(GeometricMergeFeatures::default()),
        );
        assert!(matches!(wrong_features, Err(BoundaryError::FeatureMismatch { .. })));
    }
}
