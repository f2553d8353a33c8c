//! glyphseg-boundary - Letter boundary detection
//!
//! Scanned words arrive as groups of connected shapes, but a shape is not
//! always a letter: touching letters fuse into one shape and broken
//! letters fall apart into several. This crate decides where the letters
//! really are.
//!
//! - [`SplitCandidateFinder`] - columns at which a shape might be cut
//! - [`RecursiveShapeSplitter`] / [`AnnotatedShapeSplitter`] - partitions
//!   of a single shape
//! - [`ShapeMerger`] - whether two neighbours are one letter
//! - [`BoundaryDetector`] - partitions of a whole group, best first
//! - [`SplitEvaluator`] / [`MergeEvaluator`] - F-scores against annotations
//! - [`SplitEventStream`] / [`MergeEventStream`] - labelled training data
//!
//! Decisions are taken by a [`Classifier`]; [`LogisticModel`] is the
//! bundled JSON-backed implementation.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use glyphseg_boundary::{BoundaryConfig, BoundaryDetector};
//! use glyphseg_core::{GrayBitmap, PixelShape, PixelSource};
//!
//! let config = BoundaryConfig::from_json_str(r#"{"detector": {"beam-width": 3}}"#).unwrap();
//! let detector = BoundaryDetector::from_config(&config, None, None).unwrap();
//!
//! let source: std::sync::Arc<dyn PixelSource> =
//!     std::sync::Arc::new(GrayBitmap::new(12, 10).unwrap());
//! let shapes = vec![Rc::new(PixelShape::whole(source))];
//! let sequences = detector.find_boundaries(&shapes);
//! assert_eq!(sequences.len(), 1);
//! assert_eq!(sequences[0].score(), 1.0);
//! ```

pub mod candidates;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod evaluate;
pub mod events;
pub mod features;
pub mod merger;
pub mod outcome;
pub mod pair;
pub mod sequence;
pub mod split;
pub mod splitter;

pub use candidates::{CandidateOptions, CandidateStrategy, SplitCandidateFinder};
pub use classifier::{Classifier, LogisticModel};
pub use config::BoundaryConfig;
pub use detector::{
    BoundaryDetector, DecisionComponents, DetectorOptions, DetectorStrategy, DeterministicDetector,
    LetterByLetterDetector,
};
pub use error::{BoundaryError, BoundaryResult};
pub use evaluate::{
    EvalLabel, EvaluationOptions, FScoreCalculator, FScoreReport, LabelScore, MergeEvaluator,
    SplitEvaluator,
};
pub use events::{EventCounts, MergeEvent, MergeEventStream, SplitEvent, SplitEventStream};
pub use features::{
    GeometricMergeFeatures, GeometricSplitFeatures, MergeFeatureExtractor, SplitFeatureExtractor,
};
pub use merger::{MergerOptions, ShapeMerger};
pub use outcome::{DecisionOutcome, MergeOutcome, SplitOutcome};
pub use pair::ShapePair;
pub use sequence::{Decision, ShapeInSequence, ShapeSequence, harmonic_mean};
pub use split::{Split, SplitCandidate};
pub use splitter::{AnnotatedShapeSplitter, RecursiveShapeSplitter, ShapeSplitter, SplitterOptions};
