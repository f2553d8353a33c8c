//! Evaluation of splitters and mergers against annotated shapes
//!
//! Both evaluators tally expected against guessed [`EvalLabel`]s in an
//! [`FScoreCalculator`]:
//!
//! | expected | guessed  | meaning                                        |
//! |----------|----------|------------------------------------------------|
//! | `YES`    | `YES`    | true split found / pair merged                 |
//! | `YES`    | `NO`     | true split missed / pair not merged            |
//! | `YES`    | `NARROW` | true split in a shape too narrow to try        |
//! | `YES`    | `WIDE`   | pair that should merge but fails the gate      |
//! | `NO`     | `YES`    | split guessed where there is none / bad merge  |
//! | `NO`     | `NO`     | nothing to do and nothing done                 |

mod fscore;
mod merge;
mod split;

pub use fscore::{FScoreCalculator, FScoreReport, LabelScore};
pub use merge::MergeEvaluator;
pub use split::SplitEvaluator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{validate_finite, validate_range};
use crate::error::BoundaryResult;

/// Outcome labels tallied by the evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvalLabel {
    Yes,
    No,
    Narrow,
    Wide,
}

impl EvalLabel {
    pub fn label(self) -> &'static str {
        match self {
            EvalLabel::Yes => "YES",
            EvalLabel::No => "NO",
            EvalLabel::Narrow => "NARROW",
            EvalLabel::Wide => "WIDE",
        }
    }

    fn from_bool(value: bool) -> Self {
        if value { EvalLabel::Yes } else { EvalLabel::No }
    }
}

impl fmt::Display for EvalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evaluation and training-event options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EvaluationOptions {
    /// Largest distance, in pixels, between a guessed and a true split
    /// that still counts as found
    pub tolerance: i32,
    /// Narrower shapes (in x-heights) are not split
    pub min_width_ratio: f64,
    /// Lower shapes (in x-heights) are not split
    pub min_height_ratio: f64,
    /// Merge probability from which a pair counts as merged
    pub min_prob_for_decision: f64,
    /// Candidates strictly closer than this to a true split are labelled
    /// `DO_SPLIT` in training events
    pub split_label_tolerance: i32,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            tolerance: 4,
            min_width_ratio: 1.1,
            min_height_ratio: 1.0,
            min_prob_for_decision: 0.5,
            split_label_tolerance: 5,
        }
    }
}

impl EvaluationOptions {
    pub fn with_tolerance(mut self, tolerance: i32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_min_width_ratio(mut self, ratio: f64) -> Self {
        self.min_width_ratio = ratio;
        self
    }

    pub fn with_min_height_ratio(mut self, ratio: f64) -> Self {
        self.min_height_ratio = ratio;
        self
    }

    pub fn with_min_prob_for_decision(mut self, prob: f64) -> Self {
        self.min_prob_for_decision = prob;
        self
    }

    pub fn with_split_label_tolerance(mut self, tolerance: i32) -> Self {
        self.split_label_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> BoundaryResult<()> {
        validate_range(self.tolerance, 0, i32::MAX, "tolerance")?;
        validate_finite(self.min_width_ratio, "min-width-ratio")?;
        validate_finite(self.min_height_ratio, "min-height-ratio")?;
        validate_range(self.min_prob_for_decision, 0.0, 1.0, "min-prob-for-decision")?;
        validate_range(self.split_label_tolerance, 0, i32::MAX, "split-label-tolerance")?;
        Ok(())
    }
}
