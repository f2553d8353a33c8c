//! Vectorizer - longest straight runs through a shape
//!
//! From sampled outline pixels, the vectorizer walks every line definition
//! of its catalog until it leaves the shape, keeps the longest distinct
//! runs and finally drops runs that mostly duplicate a longer one.
//!
//! The catalog covers the first four sectors (the other four are the same
//! lines walked backwards) with four slopes each: straight, 1/4, 1/2 and
//! 3/4 of a diagonal.

use std::collections::HashSet;
use std::sync::Arc;

use glyphseg_core::{BitGrid, PixelShape};
use serde::{Deserialize, Serialize};

use crate::error::{VectorError, VectorResult};
use crate::line_def::LineDefinition;
use crate::segment::LineSegment;

/// Line definitions per 45 degree sector
pub const LINE_DEFS_PER_SECTOR: usize = 4;

/// Vectorizer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VectorizerOptions {
    /// White gaps of up to this many pixels count as black while walking
    pub white_gap_fill_factor: usize,
    /// Number of longest lines kept by [`Vectorizer::vectorize`]
    pub max_lines: usize,
    /// Half width of the rectangles compared when combining segments
    pub combine_tolerance: u32,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            white_gap_fill_factor: 0,
            max_lines: 200,
            combine_tolerance: 3,
        }
    }
}

impl VectorizerOptions {
    pub fn with_white_gap_fill_factor(mut self, fill_factor: usize) -> Self {
        self.white_gap_fill_factor = fill_factor;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_combine_tolerance(mut self, tolerance: u32) -> Self {
        self.combine_tolerance = tolerance;
        self
    }

    /// Validate the options
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidParameters`] if `max_lines` is zero.
    pub fn validate(&self) -> VectorResult<()> {
        if self.max_lines == 0 {
            return Err(VectorError::InvalidParameters(
                "max-lines must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build the step patterns of one sector
///
/// Slope `i / 64` for `i` in `0, 16, 32, 48`: runs of `64 / i` pixels
/// rounded down cumulatively, `[0]` for the straight line.
fn sector_step_patterns() -> Vec<Vec<u32>> {
    (0..64)
        .step_by(64 / LINE_DEFS_PER_SECTOR)
        .map(|i| {
            if i == 0 {
                return vec![0];
            }
            let slope = 64.0 / i as f64;
            let mut steps = Vec::new();
            let mut spot = slope;
            let mut count = 0u32;
            while spot <= 64.0 {
                let next = spot.floor() as u32;
                steps.push(next - count);
                count = next;
                spot += slope;
            }
            steps
        })
        .collect()
}

/// Line vectorizer over a fixed catalog of line definitions
#[derive(Debug, Clone)]
pub struct Vectorizer {
    options: VectorizerOptions,
    definitions: Vec<Arc<LineDefinition>>,
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self {
            options: VectorizerOptions::default(),
            definitions: Self::build_catalog(),
        }
    }
}

impl Vectorizer {
    /// Create a vectorizer
    ///
    /// # Errors
    ///
    /// Returns an error if the options do not validate.
    pub fn new(options: VectorizerOptions) -> VectorResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            definitions: Self::build_catalog(),
        })
    }

    fn build_catalog() -> Vec<Arc<LineDefinition>> {
        let patterns = sector_step_patterns();
        let mut definitions = Vec::with_capacity(4 * patterns.len());
        for sector in 0..4 {
            for steps in &patterns {
                let index = definitions.len();
                definitions.push(Arc::new(LineDefinition::catalog_entry(
                    sector,
                    index,
                    steps.clone(),
                )));
            }
        }
        definitions
    }

    pub fn options(&self) -> &VectorizerOptions {
        &self.options
    }

    /// The catalog, indexed by [`LineDefinition::index`]
    pub fn line_definitions(&self) -> &[Arc<LineDefinition>] {
        &self.definitions
    }

    /// Longest run from `(x, y)` along every catalog direction
    ///
    /// Zero-length runs and repeats of an already found run are skipped.
    pub fn get_lines_to_edge(&self, shape: &PixelShape, x: i32, y: i32, threshold: u8) -> Vec<LineSegment> {
        let frame = (shape.width().max(0) as u32, shape.height().max(0) as u32);
        let mut segments: Vec<LineSegment> = Vec::new();
        for definition in &self.definitions {
            let end = definition.follow_in_shape(
                shape,
                x,
                y,
                0,
                threshold,
                self.options.white_gap_fill_factor,
            );
            if end.length == 0 {
                continue;
            }
            let segment = LineSegment::new(
                Arc::clone(definition),
                (x, y),
                (end.x, end.y),
                end.length,
                frame,
            );
            if !segments.iter().any(|s| s.is_same_line(&segment)) {
                segments.push(segment);
            }
        }
        segments
    }

    /// Up to `max_lines` of the longest runs starting on the outline
    ///
    /// Outline pixels are visited in row-major order; outlines of 200
    /// pixels or more are sampled, one pixel per hundredth of the outline.
    /// A run found from both of its endpoints is kept once.
    pub fn get_longest_lines(
        &self,
        shape: &PixelShape,
        outline: &BitGrid,
        max_lines: usize,
        threshold: u8,
    ) -> Vec<LineSegment> {
        let interval = (outline.count_ones() / 100).max(1);

        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for (i, (x, y)) in outline.iter_ones().enumerate() {
            if i % interval != 0 {
                continue;
            }
            for segment in self.get_lines_to_edge(shape, x, y, threshold) {
                let a = (segment.start_x(), segment.start_y());
                let b = (segment.end_x(), segment.end_y());
                let key = (segment.length(), a.min(b), a.max(b));
                if seen.insert(key) {
                    segments.push(segment);
                }
            }
        }

        segments.sort();
        segments.truncate(max_lines);

        for segment in &segments {
            tracing::trace!(
                start_x = segment.start_x(),
                start_y = segment.start_y(),
                end_x = segment.end_x(),
                end_y = segment.end_y(),
                length = segment.length(),
                "longest line"
            );
        }
        segments
    }

    /// Vectorize a shape at its own black threshold
    ///
    /// Collects the `max_lines` longest outline-to-edge runs, then drops
    /// those that [`combine_segments`](Self::combine_segments) finds
    /// redundant.
    pub fn vectorize(&self, shape: &PixelShape) -> Vec<LineSegment> {
        let threshold = shape.black_threshold();
        let outline = shape.outline(threshold);
        let segments = self.get_longest_lines(shape, &outline, self.options.max_lines, threshold);
        let found = segments.len();
        let segments = self.combine_segments(segments);
        tracing::debug!(shape = %shape, found, kept = segments.len(), "vectorized shape");
        segments
    }

    /// Remove segments that mostly overlap an earlier (longer) one
    ///
    /// `segments` must be sorted longest first. For every pair whose
    /// bounding boxes come within the combine tolerance, the later segment
    /// is dropped when more than half of its enclosing rectangle lies in
    /// the earlier one's.
    pub fn combine_segments(&self, segments: Vec<LineSegment>) -> Vec<LineSegment> {
        let tolerance = self.options.combine_tolerance;
        let mut rectangles: Vec<Option<BitGrid>> = vec![None; segments.len()];
        let mut redundant = vec![false; segments.len()];

        for i in 0..segments.len() {
            let box_i = segments[i].bounding_rect(tolerance as i32);
            for j in i + 1..segments.len() {
                if !box_i.overlaps(&segments[j].bounding_rect(tolerance as i32)) {
                    continue;
                }
                for k in [i, j] {
                    if rectangles[k].is_none() {
                        rectangles[k] = Some(segments[k].enclosing_rectangle(tolerance));
                    }
                }
                if let (Some(rect_i), Some(rect_j)) = (&rectangles[i], &rectangles[j]) {
                    let shared = rect_i.intersection(rect_j).count_ones();
                    if shared * 2 > rect_j.count_ones() {
                        redundant[j] = true;
                    }
                }
            }
        }

        segments
            .into_iter()
            .zip(redundant)
            .filter_map(|(segment, drop)| (!drop).then_some(segment))
            .collect()
    }
}
