//! Splitter evaluation

use glyphseg_core::ShapeRef;

use super::{EvalLabel, EvaluationOptions, FScoreCalculator};
use crate::error::BoundaryResult;
use crate::pair::in_x_heights;
use crate::splitter::ShapeSplitter;

/// Compares a splitter's best partition with annotated split positions
#[derive(Debug, Clone, Default)]
pub struct SplitEvaluator {
    options: EvaluationOptions,
}

impl SplitEvaluator {
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

    /// Tally every shape that is wide enough to split or carries splits
    ///
    /// A guess within `tolerance` pixels of a true split not yet matched
    /// counts `YES/YES`. Unmatched true splits count `YES/NO`, or
    /// `YES/NARROW` when the shape was too narrow to try. Unmatched guesses
    /// count `NO/YES`. A shape without splits or guesses counts `NO/NO`.
    pub fn evaluate<I>(&self, shapes: I, splitter: &dyn ShapeSplitter) -> FScoreCalculator<EvalLabel>
    where
        I: IntoIterator<Item = ShapeRef>,
    {
        let mut calc = FScoreCalculator::new();
        let mut tested = 0usize;
        for shape in shapes {
            let width_ratio = in_x_heights(shape.width(), shape.x_height());
            let height_ratio = in_x_heights(shape.height(), shape.x_height());
            let wide = width_ratio >= self.options.min_width_ratio;
            if !wide && shape.split_positions().is_empty() {
                continue;
            }
            tested += 1;

            let guesses = if wide && height_ratio >= self.options.min_height_ratio {
                guessed_positions(&shape, splitter)
            } else {
                tracing::trace!(shape = %shape, width_ratio, height_ratio, "too small to split");
                Vec::new()
            };
            self.tally(&mut calc, shape.split_positions(), guesses, wide);
        }
        tracing::debug!(shapes = tested, total = calc.total(), "evaluated splits");
        calc
    }

    fn tally(&self, calc: &mut FScoreCalculator<EvalLabel>, truth: &[i32], guesses: Vec<i32>, wide: bool) {
        if truth.is_empty() && guesses.is_empty() {
            calc.increment(EvalLabel::No, EvalLabel::No);
            return;
        }

        let mut remaining = guesses;
        for &position in truth {
            let found = remaining
                .iter()
                .position(|&guess| (position - guess).abs() <= self.options.tolerance);
            match found {
                Some(i) => {
                    remaining.remove(i);
                    calc.increment(EvalLabel::Yes, EvalLabel::Yes);
                }
                None if wide => calc.increment(EvalLabel::Yes, EvalLabel::No),
                None => calc.increment(EvalLabel::Yes, EvalLabel::Narrow),
            }
        }
        for _ in remaining {
            calc.increment(EvalLabel::No, EvalLabel::Yes);
        }
    }
}

/// Split positions implied by the best partition: the right edge of every
/// piece except the one ending the shape
fn guessed_positions(shape: &ShapeRef, splitter: &dyn ShapeSplitter) -> Vec<i32> {
    let sequences = splitter.split(shape);
    let Some(best) = sequences.first() else {
        return Vec::new();
    };
    let mut positions: Vec<i32> = best
        .iter()
        .map(|piece| piece.shape().right())
        .filter(|&right| right != shape.right())
        .map(|right| right - shape.left())
        .collect();
    positions.sort_unstable();
    positions
}
