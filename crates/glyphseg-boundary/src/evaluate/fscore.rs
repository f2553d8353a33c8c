//! Precision, recall and F-score over a confusion map

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Counts of expected/guessed label pairs
///
/// A label's true positives are the pairs where both agree on it, its
/// false positives the pairs guessing it wrongly, its false negatives the
/// pairs expecting it but guessing something else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Ord + Serialize",
    deserialize = "L: Ord + Deserialize<'de>"
))]
pub struct FScoreCalculator<L> {
    counts: BTreeMap<L, BTreeMap<L, u64>>,
}

impl<L> Default for FScoreCalculator<L> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

/// Scores for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelScore<L> {
    pub label: L,
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

/// Per-label scores plus totals over every label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FScoreReport<L> {
    pub labels: Vec<LabelScore<L>>,
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn harmonic(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl<L: Ord + Clone> FScoreCalculator<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one expected/guessed pair
    pub fn increment(&mut self, expected: L, guessed: L) {
        *self
            .counts
            .entry(expected)
            .or_default()
            .entry(guessed)
            .or_insert(0) += 1;
    }

    /// Add every count of `other`
    pub fn merge(&mut self, other: &FScoreCalculator<L>) {
        for (expected, row) in &other.counts {
            let target = self.counts.entry(expected.clone()).or_default();
            for (guessed, count) in row {
                *target.entry(guessed.clone()).or_insert(0) += count;
            }
        }
    }

    pub fn count(&self, expected: &L, guessed: &L) -> u64 {
        self.counts
            .get(expected)
            .and_then(|row| row.get(guessed))
            .copied()
            .unwrap_or(0)
    }

    /// Number of pairs recorded
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|row| row.values()).sum()
    }

    /// Every label seen, expected or guessed
    pub fn labels(&self) -> Vec<L> {
        let mut labels = BTreeSet::new();
        for (expected, row) in &self.counts {
            labels.insert(expected.clone());
            labels.extend(row.keys().cloned());
        }
        labels.into_iter().collect()
    }

    pub fn true_positives(&self, label: &L) -> u64 {
        self.count(label, label)
    }

    pub fn false_positives(&self, label: &L) -> u64 {
        self.counts
            .iter()
            .filter(|(expected, _)| *expected != label)
            .filter_map(|(_, row)| row.get(label))
            .sum()
    }

    pub fn false_negatives(&self, label: &L) -> u64 {
        self.counts.get(label).map_or(0, |row| {
            row.iter()
                .filter(|(guessed, _)| *guessed != label)
                .map(|(_, count)| count)
                .sum()
        })
    }

    pub fn precision(&self, label: &L) -> f64 {
        let tp = self.true_positives(label);
        ratio(tp, tp + self.false_positives(label))
    }

    pub fn recall(&self, label: &L) -> f64 {
        let tp = self.true_positives(label);
        ratio(tp, tp + self.false_negatives(label))
    }

    pub fn f_score(&self, label: &L) -> f64 {
        harmonic(self.precision(label), self.recall(label))
    }

    /// Pairs where expected and guessed agree
    pub fn total_true_positives(&self) -> u64 {
        self.counts
            .iter()
            .filter_map(|(expected, row)| row.get(expected))
            .sum()
    }

    /// Pairs where they disagree; each is a false positive of the guessed
    /// label and a false negative of the expected one
    pub fn total_errors(&self) -> u64 {
        self.total() - self.total_true_positives()
    }

    /// Share of pairs where expected and guessed agree
    pub fn total_precision(&self) -> f64 {
        ratio(self.total_true_positives(), self.total())
    }

    /// Summed over all labels, precision, recall and F-score coincide
    pub fn total_f_score(&self) -> f64 {
        let precision = self.total_precision();
        harmonic(precision, precision)
    }

    pub fn report(&self) -> FScoreReport<L> {
        let labels = self
            .labels()
            .into_iter()
            .map(|label| LabelScore {
                true_positives: self.true_positives(&label),
                false_positives: self.false_positives(&label),
                false_negatives: self.false_negatives(&label),
                precision: self.precision(&label),
                recall: self.recall(&label),
                f_score: self.f_score(&label),
                label,
            })
            .collect();
        let precision = self.total_precision();
        FScoreReport {
            labels,
            true_positives: self.total_true_positives(),
            false_positives: self.total_errors(),
            false_negatives: self.total_errors(),
            precision,
            recall: precision,
            f_score: self.total_f_score(),
        }
    }
}

impl<L: Ord + Clone + fmt::Display> fmt::Display for FScoreCalculator<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "label\ttp\tfp\tfn\tprecision\trecall\tf-score")?;
        for label in self.labels() {
            writeln!(
                f,
                "{}\t{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}",
                label,
                self.true_positives(&label),
                self.false_positives(&label),
                self.false_negatives(&label),
                self.precision(&label),
                self.recall(&label),
                self.f_score(&label)
            )?;
        }
        write!(
            f,
            "total\t{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}",
            self.total_true_positives(),
            self.total_errors(),
            self.total_errors(),
            self.total_precision(),
            self.total_precision(),
            self.total_f_score()
        )
    }
}
