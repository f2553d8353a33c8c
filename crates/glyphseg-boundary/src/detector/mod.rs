//! Boundary detection over a group of shapes
//!
//! A [`BoundaryDetector`] takes the shapes of one group (typically a
//! word) in reading order and returns candidate letter partitions, best
//! first. Three strategies are available:
//!
//! - `Identity` keeps every shape as it is.
//! - `Deterministic` applies only the confident decisions and returns a
//!   single partition.
//! - `LetterByLetter` runs a beam search over every split and merge
//!   alternative.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use glyphseg_boundary::BoundaryDetector;
//! use glyphseg_core::{GrayBitmap, PixelShape, PixelSource};
//!
//! let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::new(20, 10).unwrap());
//! let shapes = vec![
//!     Rc::new(PixelShape::new(Arc::clone(&source), 0, 0, 8, 9)),
//!     Rc::new(PixelShape::new(source, 11, 0, 19, 9)),
//! ];
//! let sequences = BoundaryDetector::Identity.find_boundaries(&shapes);
//! assert_eq!(sequences.len(), 1);
//! assert_eq!(sequences[0].len(), 2);
//! ```

mod beam;
mod deterministic;

pub use beam::LetterByLetterDetector;
pub use deterministic::DeterministicDetector;

use std::rc::Rc;

use glyphseg_core::ShapeRef;
use serde::{Deserialize, Serialize};

use crate::candidates::SplitCandidateFinder;
use crate::classifier::Classifier;
use crate::config::{BoundaryConfig, validate_positive, validate_range};
use crate::error::BoundaryResult;
use crate::features::{GeometricMergeFeatures, GeometricSplitFeatures};
use crate::merger::ShapeMerger;
use crate::outcome::MergeOutcome;
use crate::sequence::{Decision, ShapeSequence};
use crate::splitter::{RecursiveShapeSplitter, ShapeSplitter, SplitterOptions};

/// Boundary detection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorStrategy {
    Identity,
    Deterministic,
    #[default]
    LetterByLetter,
}

/// Detector options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DetectorOptions {
    pub strategy: DetectorStrategy,
    /// Partial sequences kept at every step of the beam search
    pub beam_width: usize,
    /// Confidence needed by the deterministic detector to act
    pub min_prob_for_decision: f64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            strategy: DetectorStrategy::default(),
            beam_width: 5,
            min_prob_for_decision: 0.5,
        }
    }
}

impl DetectorOptions {
    pub fn with_strategy(mut self, strategy: DetectorStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_min_prob_for_decision(mut self, prob: f64) -> Self {
        self.min_prob_for_decision = prob;
        self
    }

    pub fn validate(&self) -> BoundaryResult<()> {
        validate_positive(self.beam_width, "beam-width")?;
        validate_range(self.min_prob_for_decision, 0.0, 1.0, "min-prob-for-decision")?;
        Ok(())
    }
}

/// Finds letter boundaries in a group of shapes
#[derive(Debug)]
pub enum BoundaryDetector {
    /// Every shape is a letter
    Identity,
    /// Confident decisions only, one result
    Deterministic(DeterministicDetector),
    /// Beam search, up to `beam-width` results
    LetterByLetter(LetterByLetterDetector),
}

impl BoundaryDetector {
    /// Build the detector described by `config`
    ///
    /// The split and merge models are optional; without one, the
    /// corresponding decision is never taken. Both are ignored by the
    /// identity strategy.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate or a model does not
    /// fit its feature extractor.
    pub fn from_config(
        config: &BoundaryConfig,
        split_model: Option<Box<dyn Classifier>>,
        merge_model: Option<Box<dyn Classifier>>,
    ) -> BoundaryResult<Self> {
        config.validate()?;
        if config.detector.strategy == DetectorStrategy::Identity {
            return Ok(BoundaryDetector::Identity);
        }

        let splitter: Option<Box<dyn ShapeSplitter>> = match split_model {
            Some(model) => Some(Box::new(RecursiveShapeSplitter::new(
                config.splitter.clone(),
                SplitCandidateFinder::new(config.candidates.clone())?,
                model,
                Box::new(GeometricSplitFeatures),
            )?)),
            None => None,
        };
        let merger = match merge_model {
            Some(model) => Some(ShapeMerger::new(
                config.merger.clone(),
                model,
                Box::new(GeometricMergeFeatures::new(
                    config.merger.max_width_ratio,
                    config.merger.max_distance_ratio,
                )),
            )?),
            None => None,
        };
        let components = DecisionComponents {
            splitter,
            split_gate: config.splitter.clone(),
            merger,
        };

        Ok(match config.detector.strategy {
            DetectorStrategy::Identity => BoundaryDetector::Identity,
            DetectorStrategy::Deterministic => BoundaryDetector::Deterministic(
                DeterministicDetector::new(components, config.detector.min_prob_for_decision)?,
            ),
            DetectorStrategy::LetterByLetter => BoundaryDetector::LetterByLetter(
                LetterByLetterDetector::new(components, config.detector.beam_width)?,
            ),
        })
    }

    /// Candidate partitions of `shapes`, best first
    ///
    /// Never empty: an empty group yields one empty sequence.
    pub fn find_boundaries(&self, shapes: &[ShapeRef]) -> Vec<ShapeSequence> {
        let sequences = match self {
            BoundaryDetector::Identity => {
                let mut sequence = ShapeSequence::new();
                for shape in shapes {
                    sequence.add_shape(Rc::clone(shape));
                }
                vec![sequence]
            }
            BoundaryDetector::Deterministic(detector) => vec![detector.find_boundaries(shapes)],
            BoundaryDetector::LetterByLetter(detector) => detector.find_boundaries(shapes),
        };
        tracing::debug!(
            shapes = shapes.len(),
            sequences = sequences.len(),
            best = sequences.first().map_or(0.0, |s| s.score()),
            "found boundaries"
        );
        sequences
    }
}

/// The splitter and merger a detector consults
///
/// Either may be absent, in which case no split (or merge) is ever
/// proposed.
pub struct DecisionComponents {
    pub splitter: Option<Box<dyn ShapeSplitter>>,
    /// Shapes failing this gate are never passed to the splitter
    pub split_gate: SplitterOptions,
    pub merger: Option<ShapeMerger>,
}

impl DecisionComponents {
    /// Candidate partitions of one input shape
    ///
    /// A shape outside the split gate, or any shape when there is no
    /// splitter, continues as itself.
    pub(crate) fn continuations(&self, shape: &ShapeRef) -> Vec<ShapeSequence> {
        if let Some(splitter) = &self.splitter {
            if self.split_gate.should_attempt(shape) {
                let sequences = splitter.split(shape);
                if !sequences.is_empty() {
                    return sequences;
                }
            }
        }
        vec![single(shape)]
    }

    /// Probability of merging the last shape of `history` with the first
    /// of `continuation`; 0 outside the gate or without a merger
    ///
    /// The gate sees the continuation's first piece, not the input shape it
    /// was split from, so a split piece may merge with its predecessor even
    /// when the whole shape is too wide to.
    pub(crate) fn merge_probability(&self, history: &ShapeSequence, continuation: &ShapeSequence) -> f64 {
        match (&self.merger, history.last(), continuation.first()) {
            (Some(merger), Some(previous), Some(first)) => {
                merger.merge_probability(previous.shape(), first.shape())
            }
            _ => 0.0,
        }
    }
}

impl std::fmt::Debug for DecisionComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionComponents")
            .field("splitter", &self.splitter.is_some())
            .field("split_gate", &self.split_gate)
            .field("merger", &self.merger)
            .finish()
    }
}

/// A sequence holding only `shape`
fn single(shape: &ShapeRef) -> ShapeSequence {
    let mut sequence = ShapeSequence::new();
    sequence.add_shape(Rc::clone(shape));
    sequence
}

/// `history` extended by `continuation`, its last shape merged with the
/// continuation's first
///
/// `None` if either side is empty.
fn merged_successor(history: &ShapeSequence, continuation: &ShapeSequence, prob: f64) -> Option<ShapeSequence> {
    let mut next = ShapeSequence::from_history(history);
    let previous = next.pop()?;
    let first = continuation.first()?;
    let merged = Rc::new(ShapeMerger::merge(previous.shape(), first.shape()));
    let originals = previous
        .originals()
        .iter()
        .chain(first.originals())
        .cloned()
        .collect();
    next.add_shape_with_originals(merged, originals);
    for shape in continuation.shapes().iter().skip(1) {
        next.push(shape.clone());
    }
    next.add_decision(Decision::new(MergeOutcome::DoMerge, prob));
    for decision in continuation.decisions() {
        next.add_decision(*decision);
    }
    Some(next)
}

/// `history` extended by `continuation` without merging
///
/// A `DO_NOT_MERGE` decision is recorded only when merging was possible.
fn unmerged_successor(history: &ShapeSequence, continuation: &ShapeSequence, prob: f64) -> ShapeSequence {
    let mut next = ShapeSequence::from_history(history);
    if prob > 0.0 {
        next.add_decision(Decision::new(MergeOutcome::DoNotMerge, 1.0 - prob));
    }
    for decision in continuation.decisions() {
        next.add_decision(*decision);
    }
    for shape in continuation.shapes() {
        next.push(shape.clone());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_config() {
        let config = BoundaryConfig {
            detector: DetectorOptions::default().with_strategy(DetectorStrategy::Identity),
            ..BoundaryConfig::default()
        };
        let detector = BoundaryDetector::from_config(&config, None, None).unwrap();
        assert!(matches!(detector, BoundaryDetector::Identity));
        let sequences = detector.find_boundaries(&[]);
        assert_eq!(sequences.len(), 1);
        assert!(sequences[0].is_empty());
    }

    #[test]
    fn test_options_validation() {
        assert!(DetectorOptions::default().with_beam_width(0).validate().is_err());
        assert!(DetectorOptions::default().with_min_prob_for_decision(1.5).validate().is_err());
        let json = r#"{"strategy": "deterministic", "min-prob-for-decision": 0.7}"#;
        let options: DetectorOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.strategy, DetectorStrategy::Deterministic);
        assert_eq!(options.min_prob_for_decision, 0.7);
        assert_eq!(options.beam_width, 5);
    }
}
