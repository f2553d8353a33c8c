//! Evaluator regression test
//!
//! Split position tolerance, narrow shapes and merge ground truth from
//! letter annotations.

use std::rc::Rc;
use std::sync::Arc;

use glyphseg_boundary::{
    Classifier, EvalLabel, EvaluationOptions, GeometricMergeFeatures, MergeEvaluator,
    MergeFeatureExtractor, MergerOptions, ShapeMerger, ShapeSequence, ShapeSplitter,
    SplitEvaluator,
};
use glyphseg_core::{GrayBitmap, PixelShape, PixelSource, ShapeRef};
use glyphseg_test::RegParams;

/// Always cuts after column `position`
struct FixedSplitter {
    position: i32,
}

impl ShapeSplitter for FixedSplitter {
    fn split(&self, shape: &ShapeRef) -> Vec<ShapeSequence> {
        let mut sequence = ShapeSequence::new();
        let left = shape.sub_shape(0, self.position);
        let right = shape.sub_shape(self.position + 1, shape.width() - 1);
        match (left, right) {
            (Some(left), Some(right)) => {
                sequence.add_shape_with_original(Rc::new(left), Rc::clone(shape));
                sequence.add_shape_with_original(Rc::new(right), Rc::clone(shape));
            }
            _ => {
                sequence.add_shape(Rc::clone(shape));
            }
        }
        vec![sequence]
    }
}

struct FixedClassifier {
    labels: Vec<String>,
    descriptors: Vec<String>,
    prob: f64,
}

impl Classifier for FixedClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn feature_descriptors(&self) -> &[String] {
        &self.descriptors
    }

    fn decide(&self, _features: &[f64]) -> Vec<f64> {
        vec![self.prob, 1.0 - self.prob]
    }
}

fn source() -> Arc<dyn PixelSource> {
    Arc::new(GrayBitmap::new(100, 10).unwrap())
}

/// 30x10 shape at the bitmap's left edge; x-height 9
fn wide_shape(splits: Vec<i32>) -> ShapeRef {
    Rc::new(PixelShape::new(source(), 0, 0, 29, 9).with_split_positions(splits))
}

// ============================================================================
// Splits
// ============================================================================

#[test]
fn evaluate_reg_split_tolerance() {
    let mut rp = RegParams::new("evaluate_split_tolerance");

    let options = EvaluationOptions::default();
    let evaluator = SplitEvaluator::new(options.clone()).unwrap();
    let splitter = FixedSplitter { position: 10 };

    // guess at 10, truth at 10 + tolerance
    let calc = evaluator.evaluate(vec![wide_shape(vec![10 + options.tolerance])], &splitter);
    rp.compare_values(1.0, calc.count(&EvalLabel::Yes, &EvalLabel::Yes) as f64, 0.0);
    rp.compare_values(1.0, calc.total() as f64, 0.0);

    // one pixel further: a miss and a bad guess
    let calc = evaluator.evaluate(vec![wide_shape(vec![11 + options.tolerance])], &splitter);
    rp.compare_values(0.0, calc.count(&EvalLabel::Yes, &EvalLabel::Yes) as f64, 0.0);
    rp.compare_values(1.0, calc.count(&EvalLabel::Yes, &EvalLabel::No) as f64, 0.0);
    rp.compare_values(1.0, calc.count(&EvalLabel::No, &EvalLabel::Yes) as f64, 0.0);

    // a guess where there is no split
    let calc = evaluator.evaluate(vec![wide_shape(vec![])], &splitter);
    rp.compare_values(1.0, calc.count(&EvalLabel::No, &EvalLabel::Yes) as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn evaluate_reg_split_narrow() {
    let mut rp = RegParams::new("evaluate_split_narrow");

    let evaluator = SplitEvaluator::default();
    let splitter = FixedSplitter { position: 3 };

    // 8 wide with x-height 9: never split, so the true split is NARROW
    let narrow: ShapeRef = Rc::new(PixelShape::new(source(), 0, 0, 7, 9).with_split_positions(vec![3]));
    // narrow and unsplit: not tested at all
    let skipped: ShapeRef = Rc::new(PixelShape::new(source(), 10, 0, 17, 9));
    let calc = evaluator.evaluate(vec![narrow, skipped], &splitter);
    rp.compare_values(1.0, calc.count(&EvalLabel::Yes, &EvalLabel::Narrow) as f64, 0.0);
    rp.compare_values(1.0, calc.total() as f64, 0.0);
    rp.compare_values(0.0, calc.f_score(&EvalLabel::Yes), 0.0);

    assert!(rp.cleanup());
}

// ============================================================================
// Merges
// ============================================================================

#[test]
fn evaluate_reg_merge() {
    let mut rp = RegParams::new("evaluate_merge");

    let features = GeometricMergeFeatures::default();
    let classifier = FixedClassifier {
        labels: vec!["DO_MERGE".to_string(), "DO_NOT_MERGE".to_string()],
        descriptors: features.descriptors(),
        prob: 0.6,
    };
    let merger = ShapeMerger::new(MergerOptions::default(), Box::new(classifier), Box::new(features)).unwrap();

    let source = source();
    let shape = |left: i32, right: i32, letter: &str| -> ShapeRef {
        Rc::new(
            PixelShape::new(Arc::clone(&source), left, 0, right, 9)
                .with_lines(0, 10)
                .with_letter(letter),
        )
    };
    let groups = vec![
        // broken letter, close: merged correctly
        vec![shape(0, 4, "|x"), shape(5, 9, "x|")],
        // two letters, close: merged wrongly
        vec![shape(20, 24, "a"), shape(25, 29, "b")],
        // broken letter, too far apart to consider
        vec![shape(40, 44, "|y"), shape(60, 64, "y|")],
        // two letters, far apart
        vec![shape(70, 74, "c"), shape(90, 94, "d")],
    ];

    let evaluator = MergeEvaluator::default();
    let calc = evaluator.evaluate(&groups, &merger);
    rp.compare_values(4.0, calc.total() as f64, 0.0);
    rp.compare_values(1.0, calc.count(&EvalLabel::Yes, &EvalLabel::Yes) as f64, 0.0);
    rp.compare_values(1.0, calc.count(&EvalLabel::No, &EvalLabel::Yes) as f64, 0.0);
    rp.compare_values(1.0, calc.count(&EvalLabel::Yes, &EvalLabel::Wide) as f64, 0.0);
    rp.compare_values(1.0, calc.count(&EvalLabel::No, &EvalLabel::No) as f64, 0.0);
    rp.compare_values(0.5, calc.precision(&EvalLabel::Yes), 1e-12);

    // a stricter threshold turns the guesses around
    let strict = MergeEvaluator::new(EvaluationOptions::default().with_min_prob_for_decision(0.7)).unwrap();
    let calc = strict.evaluate(&groups, &merger);
    rp.compare_values(1.0, calc.count(&EvalLabel::Yes, &EvalLabel::No) as f64, 0.0);
    rp.compare_values(2.0, calc.count(&EvalLabel::No, &EvalLabel::No) as f64, 0.0);

    let report = serde_json::to_string(&calc.report()).unwrap();
    assert!(report.contains("\"label\":\"WIDE\""));

    assert!(rp.cleanup());
}
