//! Split candidate finder
//!
//! Proposes the columns at which a shape might be cut in two. Two
//! strategies are available:
//!
//! - [`CandidateStrategy::LineConvergence`] vectorizes the shape and looks
//!   for pairs of long strokes of different slope that meet near the
//!   vertical centre, the notch left where two touching letters fused.
//! - [`CandidateStrategy::ContourSummit`] scans the distance between the
//!   shape's box and its top and bottom contours for local summits, i.e.
//!   columns where ink is pinched from above and below.
//!
//! Either way, candidates closer than `min-distance-between-splits` are
//! collapsed to the strongest one and the survivors are returned left to
//! right.

use glyphseg_core::PixelShape;
use glyphseg_vector::{Vectorizer, VectorizerOptions};
use serde::{Deserialize, Serialize};

use crate::config::{validate_finite, validate_positive, validate_range};
use crate::error::BoundaryResult;
use crate::split::Split;

/// How split candidates are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStrategy {
    /// Convergence points of long strokes
    #[default]
    LineConvergence,
    /// Summits of the top/bottom contour distance
    ContourSummit,
}

/// Options of the [`SplitCandidateFinder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CandidateOptions {
    /// Candidates closer than this are collapsed into one
    pub min_distance_between_splits: i32,
    pub strategy: CandidateStrategy,
    /// Number of longest lines compared for convergence
    pub max_lines: usize,
    /// Lines shorter than this many x-heights are ignored
    pub min_line_length_ratio: f64,
    /// Half width of the stroke rectangles that must overlap
    pub rectangle_half_width: u32,
    /// Allowed distance of a convergence point from the vertical centre,
    /// as a fraction of the shape height
    pub center_band_ratio: f64,
    /// Black threshold; the shape's own when absent
    pub threshold: Option<u8>,
    pub white_gap_fill_factor: usize,
}

impl Default for CandidateOptions {
    fn default() -> Self {
        Self {
            min_distance_between_splits: 5,
            strategy: CandidateStrategy::default(),
            max_lines: 20,
            min_line_length_ratio: 0.25,
            rectangle_half_width: 1,
            center_band_ratio: 0.35,
            threshold: None,
            white_gap_fill_factor: 0,
        }
    }
}

impl CandidateOptions {
    pub fn with_min_distance_between_splits(mut self, distance: i32) -> Self {
        self.min_distance_between_splits = distance;
        self
    }

    pub fn with_strategy(mut self, strategy: CandidateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_min_line_length_ratio(mut self, ratio: f64) -> Self {
        self.min_line_length_ratio = ratio;
        self
    }

    pub fn with_rectangle_half_width(mut self, half_width: u32) -> Self {
        self.rectangle_half_width = half_width;
        self
    }

    pub fn with_center_band_ratio(mut self, ratio: f64) -> Self {
        self.center_band_ratio = ratio;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_white_gap_fill_factor(mut self, fill_factor: usize) -> Self {
        self.white_gap_fill_factor = fill_factor;
        self
    }

    pub fn validate(&self) -> BoundaryResult<()> {
        validate_positive(self.min_distance_between_splits, "min-distance-between-splits")?;
        validate_positive(self.max_lines, "max-lines")?;
        validate_finite(self.min_line_length_ratio, "min-line-length-ratio")?;
        validate_range(self.min_line_length_ratio, 0.0, f64::MAX, "min-line-length-ratio")?;
        validate_range(self.center_band_ratio, 0.0, 1.0, "center-band-ratio")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    position: i32,
    magnitude: f64,
}

/// Finds candidate split columns in a shape
#[derive(Debug, Clone)]
pub struct SplitCandidateFinder {
    options: CandidateOptions,
    vectorizer: Vectorizer,
}

impl Default for SplitCandidateFinder {
    fn default() -> Self {
        Self {
            options: CandidateOptions::default(),
            vectorizer: Vectorizer::default(),
        }
    }
}

impl SplitCandidateFinder {
    /// Create a finder
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::InvalidConfig`](crate::BoundaryError::InvalidConfig)
    /// if the options do not validate.
    pub fn new(options: CandidateOptions) -> BoundaryResult<Self> {
        options.validate()?;
        let vectorizer = Vectorizer::new(
            VectorizerOptions::default()
                .with_white_gap_fill_factor(options.white_gap_fill_factor)
                .with_max_lines(options.max_lines),
        )?;
        Ok(Self {
            options,
            vectorizer,
        })
    }

    pub fn options(&self) -> &CandidateOptions {
        &self.options
    }

    /// Candidate splits of `shape`, left to right
    ///
    /// Every position leaves at least one column on either side. Shapes
    /// narrower than three columns have no candidates.
    pub fn find_split_candidates(&self, shape: &PixelShape) -> Vec<Split> {
        if shape.width() < 3 || shape.height() <= 0 {
            return Vec::new();
        }
        let scored = match self.options.strategy {
            CandidateStrategy::LineConvergence => self.line_convergence(shape),
            CandidateStrategy::ContourSummit => contour_summits(shape),
        };
        let positions = dedupe(scored, self.options.min_distance_between_splits);
        tracing::trace!(shape = %shape, ?positions, "split candidates");
        positions
            .into_iter()
            .filter(|&p| p > 0 && p < shape.width() - 1)
            .map(|p| Split::new(shape.id(), p))
            .collect()
    }

    fn line_convergence(&self, shape: &PixelShape) -> Vec<Scored> {
        let threshold = self.options.threshold.unwrap_or(shape.black_threshold());
        let outline = shape.outline(threshold);
        let min_length = self.options.min_line_length_ratio * shape.x_height() as f64;
        let lines: Vec<_> = self
            .vectorizer
            .get_longest_lines(shape, &outline, self.options.max_lines, threshold)
            .into_iter()
            .filter(|line| line.length() as f64 >= min_length)
            .collect();

        let center = (shape.height() - 1) as f64 / 2.0;
        let band = self.options.center_band_ratio * shape.height() as f64;
        let half_width = self.options.rectangle_half_width;

        let mut scored = Vec::new();
        for (i, first) in lines.iter().enumerate() {
            for second in &lines[i + 1..] {
                if first.definition().index() == second.definition().index() {
                    continue;
                }
                let shared = first.enclosing_rectangle_intersection(second, half_width);
                let count = shared.count_ones();
                if count == 0 {
                    continue;
                }
                let (sum_x, sum_y) = shared
                    .iter_ones()
                    .fold((0i64, 0i64), |(sx, sy), (x, y)| (sx + x as i64, sy + y as i64));
                let cx = sum_x as f64 / count as f64;
                let cy = sum_y as f64 / count as f64;
                if (cy - center).abs() > band {
                    continue;
                }
                let position = cx.round() as i32;
                if position <= 0 || position >= shape.width() - 1 {
                    continue;
                }
                scored.push(Scored {
                    position,
                    magnitude: (first.length() + second.length()) as f64,
                });
            }
        }
        scored
    }
}

/// Summits of the distance between box edge and contour, top plus bottom
fn contour_summits(shape: &PixelShape) -> Vec<Scored> {
    let width = shape.width() as usize;
    let height = shape.height();
    let contour = shape.vertical_contour();
    let edge: Vec<i32> = (0..width)
        .map(|x| (contour.top(x) + (height - 1 - contour.bottom(x))).min(height - 1))
        .collect();

    // 1 marks a local maximum, -1 a local minimum
    let mut extrema = vec![0i8; width];
    let mut last = -1;
    let mut rising = true;
    for (i, &distance) in edge.iter().enumerate() {
        if last >= 0 {
            if distance < last && rising {
                extrema[i - 1] = 1;
            }
            if distance > last && !rising {
                extrema[i - 1] = -1;
            }
        }
        if distance > last {
            rising = true;
        } else if distance < last {
            rising = false;
        }
        last = distance;
    }
    extrema[0] = 1;
    extrema[width - 1] = if rising { 1 } else { -1 };

    let mut scored = Vec::new();
    let mut have_minimum = false;
    let mut last_maximum: Option<usize> = None;
    let mut last_min_value = 0;
    let mut last_max_value = 0;
    for (i, &mark) in extrema.iter().enumerate() {
        if mark < 0 {
            have_minimum = true;
            if let Some(position) = last_maximum {
                scored.push(Scored {
                    position: position as i32,
                    magnitude: ((last_max_value - last_min_value) + (last_max_value - edge[i])) as f64
                        / 2.0,
                });
            }
            last_min_value = edge[i];
        }
        if mark > 0 {
            if have_minimum {
                last_maximum = Some(i);
                last_max_value = edge[i];
            }
            have_minimum = false;
        }
    }
    scored
}

/// Keep the strongest candidate of every cluster, return positions sorted
///
/// Candidates are taken strongest first (leftmost on ties); one is
/// dropped when it lies closer than `min_distance` to one already kept.
fn dedupe(mut scored: Vec<Scored>, min_distance: i32) -> Vec<i32> {
    scored.sort_by(|a, b| {
        b.magnitude
            .total_cmp(&a.magnitude)
            .then(a.position.cmp(&b.position))
    });
    let mut kept: Vec<i32> = Vec::new();
    for candidate in scored {
        if kept
            .iter()
            .all(|&p| (p - candidate.position).abs() >= min_distance)
        {
            kept.push(candidate.position);
        }
    }
    kept.sort_unstable();
    kept
}
