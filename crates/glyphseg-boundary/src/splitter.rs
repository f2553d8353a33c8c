//! Shape splitters
//!
//! A splitter turns one shape into candidate partitions, each a
//! [`ShapeSequence`] whose shapes all trace back to the input shape.
//!
//! [`RecursiveShapeSplitter`] scores every candidate column with a
//! classifier and recurses into both halves, keeping a small beam of
//! partitions per level. [`AnnotatedShapeSplitter`] simply cuts at the
//! shape's ground-truth split positions.

use std::fmt;
use std::rc::Rc;

use glyphseg_core::{PixelShape, ShapeRef};
use serde::{Deserialize, Serialize};

use crate::candidates::SplitCandidateFinder;
use crate::classifier::Classifier;
use crate::config::{validate_finite, validate_positive};
use crate::error::BoundaryResult;
use crate::features::{SplitFeatureExtractor, check_descriptors};
use crate::outcome::{SplitOutcome, SplitOutcomes};
use crate::pair::in_x_heights;
use crate::sequence::{Decision, ShapeSequence};
use crate::split::SplitCandidate;

/// Produces candidate partitions of a single shape
pub trait ShapeSplitter {
    /// Partitions of `shape`, best first
    ///
    /// The list is never empty. Shapes appear in reading order and every
    /// one has `shape` as its only original.
    fn split(&self, shape: &ShapeRef) -> Vec<ShapeSequence>;
}

/// Options of the [`RecursiveShapeSplitter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SplitterOptions {
    /// Narrower shapes (in x-heights) are never split
    pub min_width_ratio: f64,
    /// Lower shapes (in x-heights) are not considered by the detectors
    pub min_height_ratio: f64,
    /// Partitions kept per recursion level
    pub beam_width: usize,
    /// Maximum recursion depth; 2 allows up to four pieces
    pub max_depth: usize,
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self {
            min_width_ratio: 1.1,
            min_height_ratio: 1.0,
            beam_width: 5,
            max_depth: 2,
        }
    }
}

impl SplitterOptions {
    pub fn with_min_width_ratio(mut self, ratio: f64) -> Self {
        self.min_width_ratio = ratio;
        self
    }

    pub fn with_min_height_ratio(mut self, ratio: f64) -> Self {
        self.min_height_ratio = ratio;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> BoundaryResult<()> {
        validate_finite(self.min_width_ratio, "min-width-ratio")?;
        validate_finite(self.min_height_ratio, "min-height-ratio")?;
        validate_positive(self.beam_width, "beam-width")?;
        Ok(())
    }

    /// True if `shape` is wide and tall enough to try splitting
    pub fn should_attempt(&self, shape: &PixelShape) -> bool {
        in_x_heights(shape.width(), shape.x_height()) >= self.min_width_ratio
            && in_x_heights(shape.height(), shape.x_height()) >= self.min_height_ratio
    }
}

/// Classifier-driven recursive splitter
pub struct RecursiveShapeSplitter {
    options: SplitterOptions,
    finder: SplitCandidateFinder,
    classifier: Box<dyn Classifier>,
    features: Box<dyn SplitFeatureExtractor>,
    outcomes: SplitOutcomes,
}

impl RecursiveShapeSplitter {
    /// Create a splitter
    ///
    /// # Errors
    ///
    /// Fails if the options do not validate, if the classifier has no
    /// `DO_SPLIT`/`DO_NOT_SPLIT` labels, or if it was trained on other
    /// features than `features` provides.
    pub fn new(
        options: SplitterOptions,
        finder: SplitCandidateFinder,
        classifier: Box<dyn Classifier>,
        features: Box<dyn SplitFeatureExtractor>,
    ) -> BoundaryResult<Self> {
        options.validate()?;
        let outcomes = SplitOutcomes::resolve(classifier.as_ref())?;
        check_descriptors(classifier.as_ref(), features.descriptors())?;
        Ok(Self {
            options,
            finder,
            classifier,
            features,
            outcomes,
        })
    }

    pub fn options(&self) -> &SplitterOptions {
        &self.options
    }

    pub fn finder(&self) -> &SplitCandidateFinder {
        &self.finder
    }

    /// Probability that the shape should be split at the candidate
    pub fn should_split(&self, candidate: &SplitCandidate<'_>) -> f64 {
        let features = self.features.extract(candidate);
        let result = self.classifier.decide(&features);
        let prob = self.outcomes.probability(SplitOutcome::DoSplit, &result);
        tracing::trace!(shape = %candidate.shape, position = candidate.position, prob, "split probability");
        prob
    }

    fn split_at_depth(&self, shape: &ShapeRef, depth: usize, original: &ShapeRef) -> Vec<ShapeSequence> {
        let width_ratio = in_x_heights(shape.width(), shape.x_height());
        if width_ratio < self.options.min_width_ratio || depth >= self.options.max_depth {
            let mut sequence = ShapeSequence::new();
            sequence.add_shape_with_original(Rc::clone(shape), Rc::clone(original));
            return vec![sequence];
        }

        let choices = self
            .finder
            .find_split_candidates(shape)
            .into_iter()
            .map(|split| {
                let prob = self.should_split(&SplitCandidate::new(shape, split.position));
                (split.position, prob)
            })
            .collect();
        self.rank_partitions(shape, depth, original, choices)
    }

    /// Partitions of `shape` from its scored split positions, best first
    ///
    /// Scores are relative to the most probable choice. Alternatives below
    /// the best surviving split are further weighted by how likely that
    /// split's pieces are to stay whole.
    fn rank_partitions(
        &self,
        shape: &ShapeRef,
        depth: usize,
        original: &ShapeRef,
        splits: Vec<(i32, f64)>,
    ) -> Vec<ShapeSequence> {
        // `None` stands for leaving the shape whole
        let mut choices: Vec<(Option<i32>, f64)> =
            splits.into_iter().map(|(position, prob)| (Some(position), prob)).collect();
        choices.sort_by(|a, b| b.1.total_cmp(&a.1));
        let max_split = choices.first().map_or(0.0, |c| c.1);
        let no_split = 1.0 - max_split;
        let max_prob = max_split.max(no_split);
        let at = choices.partition_point(|c| c.1 >= no_split);
        choices.insert(at, (None, no_split));

        let left_to_right = original.direction().is_left_to_right();
        let mut sequences = Vec::new();
        // set by the first choice that yields a partition
        let mut top_weight: Option<f64> = None;
        for &(position, prob) in &choices {
            let Some(position) = position else {
                let weight = *top_weight.get_or_insert(1.0);
                let mut sequence = ShapeSequence::new();
                sequence.add_shape_with_original(Rc::clone(shape), Rc::clone(original));
                sequence.add_decision(Decision::new(
                    SplitOutcome::DoNotSplit,
                    prob / max_prob * weight,
                ));
                sequences.push(sequence);
                continue;
            };

            let Some((left, right)) = SplitCandidate::new(shape, position).pieces() else {
                tracing::trace!(shape = %shape, position, "degenerate split skipped");
                continue;
            };
            let lefts = self.split_at_depth(&Rc::new(left), depth + 1, original);
            let rights = self.split_at_depth(&Rc::new(right), depth + 1, original);

            let top = top_weight.is_none();
            let weight = *top_weight.get_or_insert_with(|| {
                let unsplit = |sequences: &[ShapeSequence]| {
                    sequences
                        .iter()
                        .find(|s| s.len() == 1)
                        .map_or(1.0, |s| s.score())
                };
                unsplit(lefts.as_slice()) * unsplit(rights.as_slice())
            });

            for left in &lefts {
                for right in &rights {
                    let mut sequence = if left_to_right {
                        ShapeSequence::concat(left, right)
                    } else {
                        ShapeSequence::concat(right, left)
                    };
                    let total: f64 = sequence.decisions().iter().map(|d| d.probability).product();
                    sequence.clear_decisions();
                    let mut prob = total * (prob / max_prob);
                    if !top {
                        prob *= weight;
                    }
                    sequence.add_decision(Decision::new(SplitOutcome::DoSplit, prob));
                    sequences.push(sequence);
                }
            }
        }

        sequences.sort_by(|a, b| b.score().total_cmp(&a.score()));
        sequences
            .into_iter()
            .enumerate()
            .filter(|(i, s)| s.len() == 1 || *i < self.options.beam_width)
            .map(|(_, s)| s)
            .collect()
    }
}

impl ShapeSplitter for RecursiveShapeSplitter {
    fn split(&self, shape: &ShapeRef) -> Vec<ShapeSequence> {
        let sequences = self.split_at_depth(shape, 0, shape);
        tracing::debug!(
            shape = %shape,
            sequences = sequences.len(),
            best = sequences.first().map_or(0.0, |s| s.score()),
            "split shape"
        );
        sequences
    }
}

impl fmt::Debug for RecursiveShapeSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveShapeSplitter")
            .field("options", &self.options)
            .field("finder", &self.finder)
            .field("features", &self.features.descriptors())
            .finish()
    }
}

/// Splits shapes at their ground-truth split positions
///
/// Returns exactly one partition: the shape itself when it has no splits,
/// otherwise its pieces in reading order with a certain `DO_SPLIT`
/// decision. Positions that would leave an empty piece are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedShapeSplitter;

impl ShapeSplitter for AnnotatedShapeSplitter {
    fn split(&self, shape: &ShapeRef) -> Vec<ShapeSequence> {
        let mut positions: Vec<i32> = shape
            .split_positions()
            .iter()
            .copied()
            .filter(|&p| p >= 0 && p < shape.width() - 1)
            .collect();
        positions.sort_unstable();
        positions.dedup();

        let mut sequence = ShapeSequence::new();
        if positions.is_empty() {
            sequence.add_shape(Rc::clone(shape));
            return vec![sequence];
        }

        let mut pieces = Vec::with_capacity(positions.len() + 1);
        let mut start = 0;
        for position in positions {
            pieces.extend(shape.sub_shape(start, position));
            start = position + 1;
        }
        pieces.extend(shape.sub_shape(start, shape.width() - 1));
        if !shape.direction().is_left_to_right() {
            pieces.reverse();
        }
        for piece in pieces {
            sequence.add_shape_with_original(Rc::new(piece), Rc::clone(shape));
        }
        sequence.add_decision(Decision::new(SplitOutcome::DoSplit, 1.0));
        vec![sequence]
    }
}
