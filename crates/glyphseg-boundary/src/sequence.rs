//! Shape sequences - candidate partitions of a group of shapes
//!
//! A [`ShapeSequence`] is one way of cutting a group of shapes into
//! letters: the shapes in reading order, each with the original shapes it
//! was made from, plus every split or merge [`Decision`] taken along the
//! way. Its score is the harmonic mean of the decision probabilities, so a
//! single impossible decision (probability 0) eliminates the sequence.
//!
//! Sequences are cheap to copy: shapes are shared through [`ShapeRef`].

use std::fmt;
use std::rc::Rc;

use glyphseg_core::ShapeRef;
use serde::{Deserialize, Serialize};

use crate::outcome::DecisionOutcome;

/// One split or merge choice and its probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub probability: f64,
}

impl Decision {
    pub fn new(outcome: impl Into<DecisionOutcome>, probability: f64) -> Self {
        Self {
            outcome: outcome.into(),
            probability,
        }
    }
}

/// Harmonic mean of decision probabilities
///
/// 1 with no decisions, 0 as soon as one probability is 0.
pub fn harmonic_mean(probabilities: impl IntoIterator<Item = f64>) -> f64 {
    let mut count = 0usize;
    let mut inverse_sum = 0.0;
    for p in probabilities {
        if p <= 0.0 {
            return 0.0;
        }
        count += 1;
        inverse_sum += 1.0 / p;
    }
    if count == 0 {
        1.0
    } else {
        count as f64 / inverse_sum
    }
}

/// A shape at a given place in a sequence
#[derive(Debug, Clone)]
pub struct ShapeInSequence {
    shape: ShapeRef,
    index: usize,
    originals: Vec<ShapeRef>,
}

impl ShapeInSequence {
    pub fn shape(&self) -> &ShapeRef {
        &self.shape
    }

    /// Position within the sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// The input shapes this shape was split from or merged out of
    pub fn originals(&self) -> &[ShapeRef] {
        &self.originals
    }
}

/// An ordered partition of a group of shapes, with the decisions that
/// produced it
#[derive(Debug, Clone, Default)]
pub struct ShapeSequence {
    shapes: Vec<ShapeInSequence>,
    decisions: Vec<Decision>,
}

impl ShapeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of `history` with room for one more shape
    pub fn from_history(history: &ShapeSequence) -> Self {
        let mut shapes = Vec::with_capacity(history.shapes.len() + 1);
        shapes.extend(history.shapes.iter().cloned());
        Self {
            shapes,
            decisions: history.decisions.clone(),
        }
    }

    /// `first` followed by `second`, decisions included, reindexed
    pub fn concat(first: &ShapeSequence, second: &ShapeSequence) -> Self {
        let mut shapes = Vec::with_capacity(first.len() + second.len());
        shapes.extend(first.shapes.iter().cloned());
        shapes.extend(second.shapes.iter().cloned());
        for (i, shape) in shapes.iter_mut().enumerate() {
            shape.index = i;
        }
        let mut decisions = first.decisions.clone();
        decisions.extend_from_slice(&second.decisions);
        Self { shapes, decisions }
    }

    /// Append an input shape, its own original
    pub fn add_shape(&mut self, shape: ShapeRef) -> &ShapeInSequence {
        let original = Rc::clone(&shape);
        self.add_shape_with_originals(shape, vec![original])
    }

    /// Append a shape derived from `original`
    pub fn add_shape_with_original(&mut self, shape: ShapeRef, original: ShapeRef) -> &ShapeInSequence {
        self.add_shape_with_originals(shape, vec![original])
    }

    /// Append a shape derived from several originals
    pub fn add_shape_with_originals(
        &mut self,
        shape: ShapeRef,
        originals: Vec<ShapeRef>,
    ) -> &ShapeInSequence {
        let index = self.shapes.len();
        self.shapes.push(ShapeInSequence {
            shape,
            index,
            originals,
        });
        &self.shapes[index]
    }

    /// Append an already placed shape, keeping its originals
    pub fn push(&mut self, shape: ShapeInSequence) {
        let index = self.shapes.len();
        self.shapes.push(ShapeInSequence { index, ..shape });
    }

    /// Remove and return the last shape
    pub fn pop(&mut self) -> Option<ShapeInSequence> {
        self.shapes.pop()
    }

    pub fn add_decision(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    pub fn clear_decisions(&mut self) {
        self.decisions.clear();
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn shapes(&self) -> &[ShapeInSequence] {
        &self.shapes
    }

    pub fn first(&self) -> Option<&ShapeInSequence> {
        self.shapes.first()
    }

    pub fn last(&self) -> Option<&ShapeInSequence> {
        self.shapes.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeInSequence> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Harmonic mean of the decision probabilities
    pub fn score(&self) -> f64 {
        harmonic_mean(self.decisions.iter().map(|d| d.probability))
    }

    /// Carry guessed letters back to the original shapes
    ///
    /// `letters` holds one letter per sequence shape. Split pieces of one
    /// original concatenate their letters; a shape merged out of several
    /// originals gives `"|x"` to the first of them and `"x|"` to the last,
    /// leaving the ones in between empty.
    ///
    /// Returns each original once, in order of first appearance.
    pub fn original_letters<S: AsRef<str>>(&self, letters: &[S]) -> Vec<(ShapeRef, String)> {
        fn slot(original: &ShapeRef, result: &mut Vec<(ShapeRef, String)>) -> usize {
            match result.iter().position(|(o, _)| Rc::ptr_eq(o, original)) {
                Some(i) => i,
                None => {
                    result.push((Rc::clone(original), String::new()));
                    result.len() - 1
                }
            }
        }

        let mut result: Vec<(ShapeRef, String)> = Vec::new();

        for (shape, letter) in self.shapes.iter().zip(letters) {
            let letter = letter.as_ref();
            match shape.originals.as_slice() {
                [] => {}
                [only] => {
                    let i = slot(only, &mut result);
                    result[i].1.push_str(letter);
                }
                [first, middle @ .., last] => {
                    let i = slot(first, &mut result);
                    result[i].1.push('|');
                    result[i].1.push_str(letter);
                    for original in middle {
                        slot(original, &mut result);
                    }
                    let i = slot(last, &mut result);
                    result[i].1.push_str(letter);
                    result[i].1.push('|');
                }
            }
        }
        result
    }
}

impl fmt::Display for ShapeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeSequence[score={:.4}]", self.score())?;
        for shape in &self.shapes {
            write!(f, " {}", shape.shape)?;
        }
        Ok(())
    }
}
