//! Shape sequence regression test
//!
//! Harmonic-mean scoring and mapping guessed letters back onto the
//! original shapes.

use std::rc::Rc;
use std::sync::Arc;

use glyphseg_boundary::{Decision, MergeOutcome, ShapeSequence, SplitOutcome, harmonic_mean};
use glyphseg_core::{GrayBitmap, PixelShape, PixelSource, ShapeRef};
use glyphseg_test::RegParams;

fn shapes(count: i32) -> Vec<ShapeRef> {
    let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::new(100, 10).unwrap());
    (0..count)
        .map(|i| Rc::new(PixelShape::new(Arc::clone(&source), i * 10, 0, i * 10 + 7, 9)))
        .collect()
}

// ============================================================================
// Scoring
// ============================================================================

#[test]
fn sequence_reg_harmonic_score() {
    let mut rp = RegParams::new("sequence_harmonic_score");

    let mut sequence = ShapeSequence::new();
    rp.compare_values(1.0, sequence.score(), 0.0);

    sequence.add_decision(Decision::new(SplitOutcome::DoSplit, 1.0));
    sequence.add_decision(Decision::new(MergeOutcome::DoNotMerge, 1.0));
    rp.compare_values(1.0, sequence.score(), 0.0);

    sequence.add_decision(Decision::new(SplitOutcome::DoNotSplit, 0.5));
    rp.compare_values(0.75, sequence.score(), 1e-12);

    sequence.add_decision(Decision::new(MergeOutcome::DoMerge, 0.0));
    rp.compare_values(0.0, sequence.score(), 0.0);

    rp.compare_values(2.0 / 3.0, harmonic_mean([0.5, 1.0]), 1e-12);
    rp.compare_values(1.0, harmonic_mean(Vec::new()), 0.0);
    rp.compare_values(0.0, harmonic_mean([0.9, 0.0, 0.9]), 0.0);

    assert!(rp.cleanup());
}

#[test]
fn sequence_reg_concat() {
    let mut rp = RegParams::new("sequence_concat");

    let input = shapes(3);
    let mut first = ShapeSequence::new();
    first.add_shape(Rc::clone(&input[0]));
    first.add_decision(Decision::new(SplitOutcome::DoSplit, 0.8));
    let mut second = ShapeSequence::new();
    second.add_shape(Rc::clone(&input[1]));
    second.add_shape(Rc::clone(&input[2]));
    second.add_decision(Decision::new(SplitOutcome::DoSplit, 0.8));

    let joined = ShapeSequence::concat(&first, &second);
    rp.compare_values(3.0, joined.len() as f64, 0.0);
    rp.compare_values(2.0, joined.decisions().len() as f64, 0.0);
    let indexes: Vec<usize> = joined.iter().map(|s| s.index()).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    rp.compare_values(0.8, joined.score(), 1e-12);

    assert!(rp.cleanup());
}

// ============================================================================
// Letters
// ============================================================================

#[test]
fn sequence_reg_original_letters() {
    let mut rp = RegParams::new("sequence_original_letters");

    let input = shapes(3);
    let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::new(100, 10).unwrap());

    let mut sequence = ShapeSequence::new();
    // the first two inputs merged into one letter
    let merged = Rc::new(PixelShape::union(&input[0], &input[1]));
    sequence.add_shape_with_originals(merged, vec![Rc::clone(&input[0]), Rc::clone(&input[1])]);
    // the third split in two
    let left = Rc::new(PixelShape::new(Arc::clone(&source), 20, 0, 23, 9));
    let right = Rc::new(PixelShape::new(source, 24, 0, 27, 9));
    sequence.add_shape_with_original(left, Rc::clone(&input[2]));
    sequence.add_shape_with_original(right, Rc::clone(&input[2]));

    let letters = sequence.original_letters(&["x", "y", "z"]);
    rp.compare_values(3.0, letters.len() as f64, 0.0);
    for ((original, _), expected) in letters.iter().zip(&input) {
        assert!(Rc::ptr_eq(original, expected));
    }
    let texts: Vec<&str> = letters.iter().map(|(_, letter)| letter.as_str()).collect();
    rp.compare_strings(b"|x,x|,yz", texts.join(",").as_bytes());

    assert!(rp.cleanup());
}
