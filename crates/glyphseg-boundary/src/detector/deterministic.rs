//! Deterministic boundary detection

use glyphseg_core::ShapeRef;

use super::{DecisionComponents, merged_successor, single, unmerged_successor};
use crate::config::validate_range;
use crate::error::BoundaryResult;
use crate::sequence::ShapeSequence;

/// Applies only decisions at least `min_prob_for_decision` likely
///
/// Anything less confident leaves the shapes as they are, so a weak model
/// degrades to the identity detector rather than guessing.
#[derive(Debug)]
pub struct DeterministicDetector {
    components: DecisionComponents,
    min_prob_for_decision: f64,
}

impl DeterministicDetector {
    /// # Errors
    ///
    /// Fails if `min_prob_for_decision` is not within `[0, 1]`.
    pub fn new(components: DecisionComponents, min_prob_for_decision: f64) -> BoundaryResult<Self> {
        validate_range(min_prob_for_decision, 0.0, 1.0, "min-prob-for-decision")?;
        Ok(Self {
            components,
            min_prob_for_decision,
        })
    }

    pub fn components(&self) -> &DecisionComponents {
        &self.components
    }

    pub fn min_prob_for_decision(&self) -> f64 {
        self.min_prob_for_decision
    }

    /// The single most likely partition of `shapes`
    pub fn find_boundaries(&self, shapes: &[ShapeRef]) -> ShapeSequence {
        let mut best = ShapeSequence::new();
        for shape in shapes {
            let continuation = self.best_continuation(shape);
            let prob = self.components.merge_probability(&best, &continuation);
            let merged = if prob > 0.0 && prob >= self.min_prob_for_decision {
                merged_successor(&best, &continuation, prob)
            } else {
                None
            };
            best = match merged {
                Some(sequence) => sequence,
                None => unmerged_successor(&best, &continuation, prob),
            };
            tracing::trace!(shape = %shape, merge_prob = prob, sequence = %best, "deterministic step");
        }
        best
    }

    fn best_continuation(&self, shape: &ShapeRef) -> ShapeSequence {
        let mut best: Option<ShapeSequence> = None;
        let mut best_prob = 0.0;
        for candidate in self.components.continuations(shape) {
            let score = candidate.score();
            if score > best_prob {
                best_prob = score;
                best = Some(candidate);
            }
        }
        match best {
            Some(sequence) if best_prob >= self.min_prob_for_decision => sequence,
            _ => single(shape),
        }
    }
}
