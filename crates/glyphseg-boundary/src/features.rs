//! Feature extraction for split and merge decisions
//!
//! A classifier is only meaningful together with the features it was
//! trained on, so every extractor names its features and splitters and
//! mergers refuse a classifier whose descriptor list differs.
//!
//! The geometric extractors below read per-shape quantities (contours,
//! ink per column) through the shape's own cache, so a shape seen in many
//! candidate sequences is measured once.

use glyphseg_core::{FeatureKey, PixelShape};
use glyphseg_vector::LineDefinition;

use crate::classifier::Classifier;
use crate::error::{BoundaryError, BoundaryResult};
use crate::pair::ShapePair;
use crate::split::SplitCandidate;

/// Feature vector of a candidate split
pub trait SplitFeatureExtractor {
    /// Feature names, in the order of [`extract`](Self::extract)
    fn descriptors(&self) -> Vec<String>;

    fn extract(&self, candidate: &SplitCandidate<'_>) -> Vec<f64>;
}

/// Feature vector of a pair of shapes
pub trait MergeFeatureExtractor {
    /// Feature names, in the order of [`extract`](Self::extract)
    fn descriptors(&self) -> Vec<String>;

    fn extract(&self, pair: &ShapePair<'_>) -> Vec<f64>;
}

/// Check that a classifier was trained on the extractor's features
///
/// # Errors
///
/// Returns [`BoundaryError::FeatureMismatch`] if the lists differ.
pub fn check_descriptors(classifier: &dyn Classifier, actual: Vec<String>) -> BoundaryResult<()> {
    if classifier.feature_descriptors() != actual.as_slice() {
        return Err(BoundaryError::FeatureMismatch {
            expected: classifier.feature_descriptors().to_vec(),
            actual,
        });
    }
    Ok(())
}

/// Smaller of two non-negative quantities over the larger, 1 when equal
fn balance(a: f64, b: f64) -> f64 {
    let (a, b) = (a.max(0.0), b.max(0.0));
    if a == b {
        1.0
    } else {
        a.min(b) / a.max(b)
    }
}

fn cached(shape: &PixelShape, name: &str, position: i32, compute: impl FnOnce(&PixelShape) -> f64) -> f64 {
    let key = FeatureKey::new(format!("{}@{}", name, position));
    shape.feature_value(&key, compute)
}

/// Geometric features of a split candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricSplitFeatures;

impl GeometricSplitFeatures {
    pub const WIDTH_RATIO: &'static str = "split-width-ratio";
    pub const RELATIVE_POSITION: &'static str = "split-relative-position";
    pub const BRIDGE_WIDTH: &'static str = "split-bridge-width";
    pub const WEIGHT_RATIO: &'static str = "split-weight-ratio";

    /// Width balance of the two halves
    pub fn width_ratio(shape: &PixelShape, position: i32) -> f64 {
        let left = position - 1;
        let right = (shape.width() - 1) - (position + 1);
        balance(left as f64, right as f64)
    }

    /// Split column as a fraction of the shape width
    pub fn relative_position(shape: &PixelShape, position: i32) -> f64 {
        if shape.width() <= 0 {
            return 0.0;
        }
        position as f64 / shape.width() as f64
    }

    /// Half the x-height over the stroke thickness below the column's top
    /// pixel, at most 1
    ///
    /// Thin bridges give values near 1; an ink-free column gives
    /// half the x-height capped at 1.
    pub fn bridge_width(shape: &PixelShape, position: i32) -> f64 {
        let half_x_height = shape.x_height() as f64 / 2.0;
        let counts = shape.vertical_counts();
        let has_ink = counts.get(position.max(0) as usize).is_some_and(|&c| c > 0);
        let thickness = if has_ink {
            let top = shape.vertical_contour().top(position as usize);
            // a straight walk from the column to its right samples the
            // column's top pixel first
            let probe = LineDefinition::new(0, 0, vec![0]);
            probe
                .map(|probe| {
                    probe
                        .find_thickness(shape, position + 1, top, 0, shape.black_threshold(), 0, 1)
                        .first()
                        .copied()
                        .unwrap_or(0)
                })
                .unwrap_or(0)
                + 1
        } else {
            1
        };
        (half_x_height / thickness as f64).min(1.0)
    }

    /// Ink balance of the two halves, the split column excluded
    pub fn weight_ratio(shape: &PixelShape, position: i32) -> f64 {
        let counts = shape.vertical_counts();
        let mut left = 0u64;
        let mut right = 0u64;
        for (i, &count) in counts.iter().enumerate() {
            let i = i as i32;
            if i < position {
                left += count as u64;
            } else if i > position {
                right += count as u64;
            }
        }
        balance(left as f64, right as f64)
    }
}

impl SplitFeatureExtractor for GeometricSplitFeatures {
    fn descriptors(&self) -> Vec<String> {
        [
            Self::WIDTH_RATIO,
            Self::RELATIVE_POSITION,
            Self::BRIDGE_WIDTH,
            Self::WEIGHT_RATIO,
        ]
        .iter()
        .map(|d| d.to_string())
        .collect()
    }

    fn extract(&self, candidate: &SplitCandidate<'_>) -> Vec<f64> {
        let shape = candidate.shape;
        let pos = candidate.position;
        vec![
            cached(shape, Self::WIDTH_RATIO, pos, |s| Self::width_ratio(s, pos)),
            cached(shape, Self::RELATIVE_POSITION, pos, |s| {
                Self::relative_position(s, pos)
            }),
            cached(shape, Self::BRIDGE_WIDTH, pos, |s| Self::bridge_width(s, pos)),
            cached(shape, Self::WEIGHT_RATIO, pos, |s| Self::weight_ratio(s, pos)),
        ]
    }
}

/// Geometric features of a pair of shapes
///
/// Width and distance are scaled by the merger's gate so that every pair
/// the merger considers maps into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricMergeFeatures {
    pub max_width_ratio: f64,
    pub max_distance_ratio: f64,
}

impl Default for GeometricMergeFeatures {
    fn default() -> Self {
        Self {
            max_width_ratio: 1.2,
            max_distance_ratio: 0.15,
        }
    }
}

impl GeometricMergeFeatures {
    pub const MERGED_WIDTH: &'static str = "merged-width";
    pub const MERGE_DISTANCE: &'static str = "merge-distance";
    pub const MERGED_HEIGHT: &'static str = "merged-height";

    pub fn new(max_width_ratio: f64, max_distance_ratio: f64) -> Self {
        Self {
            max_width_ratio,
            max_distance_ratio,
        }
    }

    /// Pair width in x-heights over the maximum merge width, at most 1
    pub fn merged_width(&self, pair: &ShapePair<'_>) -> f64 {
        (pair.width_ratio() / self.max_width_ratio).min(1.0)
    }

    /// Inner distance in x-heights over the maximum merge distance,
    /// within `[0, 1]`
    pub fn merge_distance(&self, pair: &ShapePair<'_>) -> f64 {
        if self.max_distance_ratio <= 0.0 {
            return if pair.inner_distance() > 0 { 1.0 } else { 0.0 };
        }
        (pair.distance_ratio() / self.max_distance_ratio).clamp(0.0, 1.0)
    }

    /// Pair height in units of two x-heights, at most 1
    pub fn merged_height(&self, pair: &ShapePair<'_>) -> f64 {
        (pair.height() as f64 / pair.x_height() as f64 / 2.0).min(1.0)
    }
}

impl MergeFeatureExtractor for GeometricMergeFeatures {
    fn descriptors(&self) -> Vec<String> {
        [Self::MERGED_WIDTH, Self::MERGE_DISTANCE, Self::MERGED_HEIGHT]
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    fn extract(&self, pair: &ShapePair<'_>) -> Vec<f64> {
        vec![
            self.merged_width(pair),
            self.merge_distance(pair),
            self.merged_height(pair),
        ]
    }
}
