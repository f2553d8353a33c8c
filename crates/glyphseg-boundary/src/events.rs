//! Training event streams
//!
//! Turn an annotated corpus into labelled feature vectors for training
//! split and merge classifiers. Both streams are lazy iterators; shapes
//! and groups are pulled from the underlying iterator only when the
//! previous one is exhausted.

use std::vec;

use glyphseg_core::ShapeRef;
use serde::{Deserialize, Serialize};

use crate::candidates::SplitCandidateFinder;
use crate::evaluate::EvaluationOptions;
use crate::features::{MergeFeatureExtractor, SplitFeatureExtractor};
use crate::merger::MergerOptions;
use crate::outcome::{MergeOutcome, SplitOutcome};
use crate::pair::{ShapePair, in_x_heights};
use crate::split::SplitCandidate;

/// One labelled split candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SplitEvent {
    pub shape_id: u64,
    pub position: i32,
    pub features: Vec<f64>,
    pub outcome: SplitOutcome,
}

/// One labelled pair of adjacent shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergeEvent {
    pub first_id: u64,
    pub second_id: u64,
    pub features: Vec<f64>,
    pub outcome: MergeOutcome,
}

/// Running totals of a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventCounts {
    /// Shapes (or pairs) passing the size filter
    pub accepted: usize,
    /// Shapes (or pairs) skipped by it
    pub rejected: usize,
    pub positive: usize,
    pub negative: usize,
}

/// Split events for every candidate of every shape large enough to split
///
/// A candidate is `DO_SPLIT` when it lies strictly closer than
/// `split-label-tolerance` to one of the shape's true splits.
pub struct SplitEventStream<'a, I> {
    shapes: I,
    finder: &'a SplitCandidateFinder,
    features: &'a dyn SplitFeatureExtractor,
    options: EvaluationOptions,
    current: Option<(ShapeRef, vec::IntoIter<i32>)>,
    counts: EventCounts,
    finished: bool,
}

impl<'a, I: Iterator<Item = ShapeRef>> SplitEventStream<'a, I> {
    pub fn new(
        shapes: impl IntoIterator<IntoIter = I>,
        finder: &'a SplitCandidateFinder,
        features: &'a dyn SplitFeatureExtractor,
        options: EvaluationOptions,
    ) -> Self {
        Self {
            shapes: shapes.into_iter(),
            finder,
            features,
            options,
            current: None,
            counts: EventCounts::default(),
            finished: false,
        }
    }

    pub fn counts(&self) -> EventCounts {
        self.counts
    }

    fn next_candidate(&mut self) -> Option<(ShapeRef, i32)> {
        loop {
            if let Some((shape, positions)) = &mut self.current {
                if let Some(position) = positions.next() {
                    return Some((ShapeRef::clone(shape), position));
                }
            }
            let shape = self.shapes.next()?;
            let width_ratio = in_x_heights(shape.width(), shape.x_height());
            let height_ratio = in_x_heights(shape.height(), shape.x_height());
            if width_ratio >= self.options.min_width_ratio && height_ratio >= self.options.min_height_ratio {
                self.counts.accepted += 1;
                let positions: Vec<i32> = self
                    .finder
                    .find_split_candidates(&shape)
                    .into_iter()
                    .map(|split| split.position)
                    .collect();
                self.current = Some((shape, positions.into_iter()));
            } else {
                self.counts.rejected += 1;
                self.current = None;
            }
        }
    }
}

impl<I: Iterator<Item = ShapeRef>> Iterator for SplitEventStream<'_, I> {
    type Item = SplitEvent;

    fn next(&mut self) -> Option<SplitEvent> {
        let Some((shape, position)) = self.next_candidate() else {
            if !self.finished {
                self.finished = true;
                tracing::debug!(counts = ?self.counts, "split events done");
            }
            return None;
        };
        let features = self.features.extract(&SplitCandidate::new(&shape, position));
        let tolerance = self.options.split_label_tolerance;
        let outcome = if shape
            .split_positions()
            .iter()
            .any(|&split| (position - split).abs() < tolerance)
        {
            self.counts.positive += 1;
            SplitOutcome::DoSplit
        } else {
            self.counts.negative += 1;
            SplitOutcome::DoNotSplit
        };
        tracing::trace!(shape = %shape, position, ?outcome, "split event");
        Some(SplitEvent {
            shape_id: shape.id(),
            position,
            features,
            outcome,
        })
    }
}

/// Merge events for every adjacent pair within the merge gate
///
/// Labels come from the letter annotations, see
/// [`ShapePair::should_merge`].
pub struct MergeEventStream<'a, I: Iterator> {
    groups: I,
    features: &'a dyn MergeFeatureExtractor,
    gate: MergerOptions,
    current: Option<I::Item>,
    index: usize,
    counts: EventCounts,
    finished: bool,
}

impl<'a, I> MergeEventStream<'a, I>
where
    I: Iterator,
    I::Item: AsRef<[ShapeRef]>,
{
    pub fn new(
        groups: impl IntoIterator<IntoIter = I>,
        features: &'a dyn MergeFeatureExtractor,
        gate: MergerOptions,
    ) -> Self {
        Self {
            groups: groups.into_iter(),
            features,
            gate,
            current: None,
            index: 0,
            counts: EventCounts::default(),
            finished: false,
        }
    }

    pub fn counts(&self) -> EventCounts {
        self.counts
    }

    fn next_pair(&mut self) -> Option<(ShapeRef, ShapeRef)> {
        loop {
            if let Some(group) = &self.current {
                let shapes = group.as_ref();
                if self.index + 1 < shapes.len() {
                    let first = ShapeRef::clone(&shapes[self.index]);
                    let second = ShapeRef::clone(&shapes[self.index + 1]);
                    self.index += 1;
                    if self.gate.within_gate(&ShapePair::new(&first, &second)) {
                        self.counts.accepted += 1;
                        return Some((first, second));
                    }
                    self.counts.rejected += 1;
                    continue;
                }
            }
            self.current = Some(self.groups.next()?);
            self.index = 0;
        }
    }
}

impl<I> Iterator for MergeEventStream<'_, I>
where
    I: Iterator,
    I::Item: AsRef<[ShapeRef]>,
{
    type Item = MergeEvent;

    fn next(&mut self) -> Option<MergeEvent> {
        let Some((first, second)) = self.next_pair() else {
            if !self.finished {
                self.finished = true;
                tracing::debug!(counts = ?self.counts, "merge events done");
            }
            return None;
        };
        let pair = ShapePair::new(&first, &second);
        let features = self.features.extract(&pair);
        let outcome = if pair.should_merge() {
            self.counts.positive += 1;
            MergeOutcome::DoMerge
        } else {
            self.counts.negative += 1;
            MergeOutcome::DoNotMerge
        };
        tracing::trace!(pair = %pair, ?outcome, "merge event");
        Some(MergeEvent {
            first_id: first.id(),
            second_id: second.id(),
            features,
            outcome,
        })
    }
}
