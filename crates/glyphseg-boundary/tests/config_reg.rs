//! Configuration and model loading regression test
//!
//! Everything that can go wrong happens at construction: malformed JSON,
//! out-of-range options, inconsistent models and models that do not fit
//! their feature extractor.

use glyphseg_boundary::{
    BoundaryConfig, BoundaryError, CandidateStrategy, Classifier, DetectorStrategy,
    GeometricSplitFeatures, LogisticModel, RecursiveShapeSplitter, SplitCandidateFinder,
    SplitFeatureExtractor, SplitterOptions,
};
use glyphseg_test::RegParams;

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_reg_parse() {
    let mut rp = RegParams::new("config_parse");

    let config = BoundaryConfig::from_json_str(
        r#"{
            "candidates": { "strategy": "contour-summit", "min-distance-between-splits": 7 },
            "splitter": { "max-depth": 3 },
            "detector": { "strategy": "deterministic", "min-prob-for-decision": 0.8 },
            "evaluation": { "split-label-tolerance": 3 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.candidates.strategy, CandidateStrategy::ContourSummit);
    rp.compare_values(7.0, config.candidates.min_distance_between_splits as f64, 0.0);
    rp.compare_values(3.0, config.splitter.max_depth as f64, 0.0);
    rp.compare_values(5.0, config.splitter.beam_width as f64, 0.0);
    assert_eq!(config.detector.strategy, DetectorStrategy::Deterministic);
    rp.compare_values(0.8, config.detector.min_prob_for_decision, 0.0);
    rp.compare_values(3.0, config.evaluation.split_label_tolerance as f64, 0.0);
    // untouched sections keep their defaults
    rp.compare_values(1.2, config.merger.max_width_ratio, 0.0);
    rp.compare_values(4.0, config.evaluation.tolerance as f64, 0.0);

    // serialization round-trips through the same names
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"min-prob-for-decision\":0.8"));
    assert_eq!(BoundaryConfig::from_json_str(&json).unwrap(), config);

    assert!(rp.cleanup());
}

#[test]
fn config_reg_invalid() {
    let rp = RegParams::new("config_invalid");

    let cases = [
        (r#"{"detector": {"beam-width": 0}}"#, "beam-width"),
        (r#"{"splitter": {"beam-width": 0}}"#, "beam-width"),
        (r#"{"detector": {"min-prob-for-decision": 1.5}}"#, "min-prob-for-decision"),
        (r#"{"candidates": {"min-distance-between-splits": 0}}"#, "min-distance-between-splits"),
        (r#"{"evaluation": {"tolerance": -1}}"#, "tolerance"),
    ];
    for (json, field) in cases {
        let err = BoundaryConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidConfig(_)), "{json}");
        assert!(err.to_string().contains(field), "{err}");
    }

    let malformed = BoundaryConfig::from_json_str("{\"detector\": ");
    assert!(matches!(malformed, Err(BoundaryError::Json(_))));
    let wrong_type = BoundaryConfig::from_json_str(r#"{"detector": {"strategy": "guess"}}"#);
    assert!(matches!(wrong_type, Err(BoundaryError::Json(_))));

    let missing = BoundaryConfig::from_json_path("/nonexistent/glyphseg.json");
    assert!(matches!(missing, Err(BoundaryError::Io { .. })));

    assert!(rp.cleanup());
}

// ============================================================================
// Models
// ============================================================================

fn split_model_json(labels: &str, descriptors: &str, weights: &str, biases: &str) -> String {
    format!(
        r#"{{"labels": {labels}, "feature-descriptors": {descriptors}, "weights": {weights}, "biases": {biases}}}"#
    )
}

#[test]
fn config_reg_model() {
    let mut rp = RegParams::new("config_model");

    let model = LogisticModel::from_json_str(&split_model_json(
        r#"["DO_SPLIT", "DO_NOT_SPLIT"]"#,
        r#"["a", "b"]"#,
        "[[1.0, 0.0], [0.0, 1.0]]",
        "[0.0, 0.0]",
    ))
    .unwrap();
    let probs = model.decide(&[2.0, 2.0]);
    rp.compare_values(0.5, probs[0], 1e-12);
    rp.compare_values(1.0, probs.iter().sum::<f64>(), 1e-12);

    let reloaded = LogisticModel::from_json_str(&model.to_json_string().unwrap()).unwrap();
    assert_eq!(reloaded.labels(), model.labels());

    let broken = [
        split_model_json("[]", "[]", "[]", "[]"),
        split_model_json(r#"["A", "B"]"#, r#"["a"]"#, "[[1.0]]", "[0.0, 0.0]"),
        split_model_json(r#"["A", "B"]"#, r#"["a"]"#, "[[1.0], [1.0, 2.0]]", "[0.0, 0.0]"),
        split_model_json(r#"["A"]"#, r#"["a"]"#, "[[1.0]]", "[0.0, 0.0]"),
    ];
    for json in &broken {
        let err = LogisticModel::from_json_str(json).unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidModel(_)), "{json}: {err}");
    }

    assert!(rp.cleanup());
}

#[test]
fn config_reg_model_mismatch() {
    let mut rp = RegParams::new("config_model_mismatch");

    let descriptors = GeometricSplitFeatures.descriptors();
    let labelled = |labels: [&str; 2], descriptors: Vec<String>| -> Box<dyn Classifier> {
        let n = descriptors.len();
        Box::new(
            LogisticModel::new(
                labels.iter().map(|l| l.to_string()).collect(),
                descriptors,
                vec![vec![0.0; n]; 2],
                vec![0.0, 0.0],
            )
            .unwrap(),
        )
    };
    let build = |classifier: Box<dyn Classifier>| {
        RecursiveShapeSplitter::new(
            SplitterOptions::default(),
            SplitCandidateFinder::default(),
            classifier,
            Box::new(GeometricSplitFeatures),
        )
    };

    assert!(build(labelled(["DO_SPLIT", "DO_NOT_SPLIT"], descriptors.clone())).is_ok());
    // label order does not matter
    assert!(build(labelled(["DO_NOT_SPLIT", "DO_SPLIT"], descriptors.clone())).is_ok());

    let missing = build(labelled(["DO_SPLIT", "MAYBE"], descriptors.clone()));
    assert!(matches!(missing, Err(BoundaryError::MissingOutcome { .. })));

    let mut reordered = descriptors.clone();
    reordered.reverse();
    let mismatch = build(labelled(["DO_SPLIT", "DO_NOT_SPLIT"], reordered));
    assert!(matches!(mismatch, Err(BoundaryError::FeatureMismatch { .. })));

    rp.compare_values(4.0, descriptors.len() as f64, 0.0);
    assert!(rp.cleanup());
}
