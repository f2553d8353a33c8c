//! Per-shape result cache
//!
//! Every derived result a shape computes (thresholded bitsets, outlines,
//! contours, brightness grids, classifier feature values) lives in one
//! explicit [`ShapeCache`] owned by the shape. The cache is keyed
//! structurally, by threshold and fill factor or by feature name, never
//! by the identity of whoever asked. Any change to the shape's geometry
//! clears it wholesale.
//!
//! The cache uses `RefCell`/`Rc` and is therefore single-threaded: shapes
//! that must be processed in parallel need to be loaded once per worker.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::VerticalContour;
use super::brightness::{SectionBrightness, SectionKey};
use crate::bits::BitGrid;

/// Structural identity of a cached feature value
///
/// Two feature extractors that compute the same quantity should use the
/// same key so that the value is computed once per shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(String);

impl FeatureKey {
    /// Create a key from a feature name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The feature name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Results cached for one shape
#[derive(Debug, Default)]
pub struct ShapeCache {
    pub(crate) bits: HashMap<(u8, usize), Rc<BitGrid>>,
    pub(crate) outlines: HashMap<u8, Rc<BitGrid>>,
    pub(crate) contours: HashMap<u8, Rc<VerticalContour>>,
    pub(crate) sections: HashMap<SectionKey, Rc<SectionBrightness>>,
    pub(crate) features: HashMap<FeatureKey, f64>,
    pub(crate) black_and_white: Option<bool>,
}

impl ShapeCache {
    /// Drop every cached result
    pub fn clear(&mut self) {
        self.bits.clear();
        self.outlines.clear();
        self.contours.clear();
        self.sections.clear();
        self.features.clear();
        self.black_and_white = None;
    }

    /// Number of cached feature values
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Look up a cached feature value
    pub fn feature(&self, key: &FeatureKey) -> Option<f64> {
        self.features.get(key).copied()
    }
}
