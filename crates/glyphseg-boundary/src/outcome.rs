//! Decision outcomes
//!
//! A split or merge decision has two outcomes each. The classifier names
//! its outcomes by label; the index of each label is looked up once, when
//! a splitter or merger is built, and decisions afterwards only carry the
//! typed outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::error::{BoundaryError, BoundaryResult};

/// Outcome of a split decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitOutcome {
    DoSplit,
    DoNotSplit,
}

impl SplitOutcome {
    /// Classifier label of the outcome
    pub fn label(self) -> &'static str {
        match self {
            SplitOutcome::DoSplit => "DO_SPLIT",
            SplitOutcome::DoNotSplit => "DO_NOT_SPLIT",
        }
    }
}

/// Outcome of a merge decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeOutcome {
    DoMerge,
    DoNotMerge,
}

impl MergeOutcome {
    /// Classifier label of the outcome
    pub fn label(self) -> &'static str {
        match self {
            MergeOutcome::DoMerge => "DO_MERGE",
            MergeOutcome::DoNotMerge => "DO_NOT_MERGE",
        }
    }
}

/// Outcome recorded by a [`Decision`](crate::sequence::Decision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionOutcome {
    Split(SplitOutcome),
    Merge(MergeOutcome),
}

impl DecisionOutcome {
    pub fn label(self) -> &'static str {
        match self {
            DecisionOutcome::Split(outcome) => outcome.label(),
            DecisionOutcome::Merge(outcome) => outcome.label(),
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<SplitOutcome> for DecisionOutcome {
    fn from(outcome: SplitOutcome) -> Self {
        DecisionOutcome::Split(outcome)
    }
}

impl From<MergeOutcome> for DecisionOutcome {
    fn from(outcome: MergeOutcome) -> Self {
        DecisionOutcome::Merge(outcome)
    }
}

fn label_index(classifier: &dyn Classifier, label: &str) -> BoundaryResult<usize> {
    classifier
        .labels()
        .iter()
        .position(|l| l == label)
        .ok_or_else(|| BoundaryError::MissingOutcome {
            label: label.to_string(),
            labels: classifier.labels().to_vec(),
        })
}

/// Positions of the split outcomes in a classifier's label set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcomes {
    do_split: usize,
    do_not_split: usize,
}

impl SplitOutcomes {
    /// Look up `DO_SPLIT` and `DO_NOT_SPLIT`
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::MissingOutcome`] if either label is absent.
    pub fn resolve(classifier: &dyn Classifier) -> BoundaryResult<Self> {
        Ok(Self {
            do_split: label_index(classifier, SplitOutcome::DoSplit.label())?,
            do_not_split: label_index(classifier, SplitOutcome::DoNotSplit.label())?,
        })
    }

    /// Probability of `outcome` in a classifier result
    pub fn probability(&self, outcome: SplitOutcome, result: &[f64]) -> f64 {
        let index = match outcome {
            SplitOutcome::DoSplit => self.do_split,
            SplitOutcome::DoNotSplit => self.do_not_split,
        };
        result.get(index).copied().unwrap_or(0.0)
    }
}

/// Positions of the merge outcomes in a classifier's label set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcomes {
    do_merge: usize,
    do_not_merge: usize,
}

impl MergeOutcomes {
    /// Look up `DO_MERGE` and `DO_NOT_MERGE`
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::MissingOutcome`] if either label is absent.
    pub fn resolve(classifier: &dyn Classifier) -> BoundaryResult<Self> {
        Ok(Self {
            do_merge: label_index(classifier, MergeOutcome::DoMerge.label())?,
            do_not_merge: label_index(classifier, MergeOutcome::DoNotMerge.label())?,
        })
    }

    /// Probability of `outcome` in a classifier result
    pub fn probability(&self, outcome: MergeOutcome, result: &[f64]) -> f64 {
        let index = match outcome {
            MergeOutcome::DoMerge => self.do_merge,
            MergeOutcome::DoNotMerge => self.do_not_merge,
        };
        result.get(index).copied().unwrap_or(0.0)
    }
}
