//! Merger evaluation

use glyphseg_core::ShapeRef;

use super::{EvalLabel, EvaluationOptions, FScoreCalculator};
use crate::error::BoundaryResult;
use crate::merger::ShapeMerger;
use crate::pair::ShapePair;

/// Compares merge decisions on adjacent pairs with the letter annotations
#[derive(Debug, Clone, Default)]
pub struct MergeEvaluator {
    options: EvaluationOptions,
}

impl MergeEvaluator {
    /// # Errors
    ///
    /// Fails if the options do not validate.
    pub fn new(options: EvaluationOptions) -> BoundaryResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Tally every adjacent pair of every group
    ///
    /// Pairs within the merger's gate are merged when the probability
    /// reaches `min-prob-for-decision`. Pairs outside it count `YES/WIDE`
    /// if they should have merged and `NO/NO` otherwise.
    pub fn evaluate<I>(&self, groups: I, merger: &ShapeMerger) -> FScoreCalculator<EvalLabel>
    where
        I: IntoIterator,
        I::Item: AsRef<[ShapeRef]>,
    {
        let mut calc = FScoreCalculator::new();
        for group in groups {
            for window in group.as_ref().windows(2) {
                let (first, second) = (&window[0], &window[1]);
                let pair = ShapePair::new(first, second);
                let should_merge = pair.should_merge();
                if merger.options().within_gate(&pair) {
                    let prob = merger.check_merge(first, second);
                    let merged = prob >= self.options.min_prob_for_decision;
                    tracing::trace!(pair = %pair, should_merge, prob, "merge evaluated");
                    calc.increment(EvalLabel::from_bool(should_merge), EvalLabel::from_bool(merged));
                } else if should_merge {
                    tracing::trace!(pair = %pair, "pair to merge outside gate");
                    calc.increment(EvalLabel::Yes, EvalLabel::Wide);
                } else {
                    calc.increment(EvalLabel::No, EvalLabel::No);
                }
            }
        }
        tracing::debug!(pairs = calc.total(), "evaluated merges");
        calc
    }
}
