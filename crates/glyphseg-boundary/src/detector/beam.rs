//! Letter-by-letter beam search

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glyphseg_core::ShapeRef;

use super::{DecisionComponents, merged_successor, unmerged_successor};
use crate::config::validate_positive;
use crate::error::BoundaryResult;
use crate::sequence::ShapeSequence;

/// A partial sequence in the beam
///
/// Ordered by score; among equal scores the one pushed first wins.
#[derive(Debug)]
struct Ranked {
    score: f64,
    order: u64,
    sequence: ShapeSequence,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-heap of partial sequences, stamping each push with its order
#[derive(Debug, Default)]
struct Beam {
    heap: BinaryHeap<Ranked>,
    pushed: u64,
}

impl Beam {
    fn push(&mut self, sequence: ShapeSequence) {
        self.heap.push(Ranked {
            score: sequence.score(),
            order: self.pushed,
            sequence,
        });
        self.pushed += 1;
    }

    /// Remove the best `n` sequences, best first
    fn take_best(&mut self, n: usize) -> Vec<ShapeSequence> {
        let mut best = Vec::with_capacity(n.min(self.heap.len()));
        while best.len() < n {
            match self.heap.pop() {
                Some(ranked) => best.push(ranked.sequence),
                None => break,
            }
        }
        best
    }
}

/// Explores every split and merge alternative, keeping the
/// `beam_width` best partial sequences after each input shape
#[derive(Debug)]
pub struct LetterByLetterDetector {
    components: DecisionComponents,
    beam_width: usize,
}

impl LetterByLetterDetector {
    /// # Errors
    ///
    /// Fails if `beam_width` is 0.
    pub fn new(components: DecisionComponents, beam_width: usize) -> BoundaryResult<Self> {
        validate_positive(beam_width, "beam-width")?;
        Ok(Self {
            components,
            beam_width,
        })
    }

    pub fn components(&self) -> &DecisionComponents {
        &self.components
    }

    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    /// Up to `beam_width` partitions of `shapes`, best first
    pub fn find_boundaries(&self, shapes: &[ShapeRef]) -> Vec<ShapeSequence> {
        let mut beam = Beam::default();
        beam.push(ShapeSequence::new());

        for shape in shapes {
            let continuations = self.components.continuations(shape);
            let histories = beam.take_best(self.beam_width);
            let mut next = Beam::default();

            for history in &histories {
                for continuation in &continuations {
                    let prob = self.components.merge_probability(history, continuation);
                    if prob > 0.0 {
                        if let Some(merged) = merged_successor(history, continuation, prob) {
                            next.push(merged);
                        }
                    }
                    if prob < 1.0 {
                        next.push(unmerged_successor(history, continuation, prob));
                    }
                }
            }
            tracing::trace!(
                shape = %shape,
                histories = histories.len(),
                continuations = continuations.len(),
                successors = next.heap.len(),
                "beam step"
            );
            beam = next;
        }

        beam.take_best(self.beam_width)
    }
}
