//! Brightness totals by grid section
//!
//! A shape is divided into a grid of sections and the ink (255 minus
//! brightness) falling into each section is summed. When a section break
//! falls inside a pixel, that pixel's ink is divided between the two
//! sections in proportion to the break position. Grids are indexed
//! `[column][row]`.
//!
//! Classifier features are trained against these numbers, so the break
//! placement below must stay exactly as it is.

use serde::{Deserialize, Serialize};

use super::PixelShape;
use crate::source::WHITE;

/// Grid of per-section values, indexed `[column][row]`
pub type SectionGrid = Vec<Vec<f64>>;

/// How section totals are normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrightnessMethod {
    /// Raw ink totals
    Raw,
    /// Totals divided by section area
    SizeNormalised,
    /// Size-normalised values divided by the largest one
    RelativeToMaxSection,
    /// Totals divided by the total ink of the shape
    PortionOfTotalBrightness,
}

/// Placement of the section grid over a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionLayout {
    /// The shape's own rectangle, split evenly
    Plain { columns: usize, rows: usize },
    /// A square of one x-height (mean line to base line) plus margins
    ///
    /// `top_bottom_margin` adds that many x-heights above and below.
    /// `horizontal_margin` adds that many x-heights of width, to the left
    /// of the square for left-to-right shapes and to the right otherwise.
    XHeightMargins {
        columns: usize,
        rows: usize,
        top_bottom_margin: f64,
        horizontal_margin: f64,
    },
    /// The x-height band split into `rows`, with `margin_sections` rows
    /// above the mean line and below the base line
    ///
    /// With `include_horizontal_margin` the grid spans 1.5 x-heights of
    /// width and the extra half x-height gets `margin_sections` columns.
    MarginSections {
        columns: usize,
        rows: usize,
        margin_sections: usize,
        include_horizontal_margin: bool,
    },
}

impl SectionLayout {
    fn dimensions(&self) -> (usize, usize) {
        match *self {
            SectionLayout::Plain { columns, rows } => (columns, rows),
            SectionLayout::XHeightMargins { columns, rows, .. } => (columns, rows),
            SectionLayout::MarginSections {
                columns,
                rows,
                margin_sections,
                include_horizontal_margin,
            } => {
                let x = if include_horizontal_margin {
                    columns + margin_sections
                } else {
                    columns
                };
                (x, rows + 2 * margin_sections)
            }
        }
    }

    /// Structural cache key (floats compared by bit pattern)
    pub(crate) fn key(&self) -> SectionKey {
        match *self {
            SectionLayout::Plain { columns, rows } => SectionKey::Plain(columns, rows),
            SectionLayout::XHeightMargins {
                columns,
                rows,
                top_bottom_margin,
                horizontal_margin,
            } => SectionKey::XHeight(
                columns,
                rows,
                top_bottom_margin.to_bits(),
                horizontal_margin.to_bits(),
            ),
            SectionLayout::MarginSections {
                columns,
                rows,
                margin_sections,
                include_horizontal_margin,
            } => SectionKey::Margin(columns, rows, margin_sections, include_horizontal_margin),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SectionKey {
    Plain(usize, usize),
    XHeight(usize, usize, u64, u64),
    Margin(usize, usize, usize, bool),
}

/// All four normalisations of one grid computation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionBrightness {
    raw: SectionGrid,
    size_normalised: SectionGrid,
    relative_to_max: SectionGrid,
    portion_of_total: SectionGrid,
}

impl SectionBrightness {
    pub(crate) fn get(&self, method: BrightnessMethod) -> &SectionGrid {
        match method {
            BrightnessMethod::Raw => &self.raw,
            BrightnessMethod::SizeNormalised => &self.size_normalised,
            BrightnessMethod::RelativeToMaxSection => &self.relative_to_max,
            BrightnessMethod::PortionOfTotalBrightness => &self.portion_of_total,
        }
    }

    fn zeros(columns: usize, rows: usize) -> Self {
        let grid = vec![vec![0.0; rows]; columns];
        Self {
            raw: grid.clone(),
            size_normalised: grid.clone(),
            relative_to_max: grid.clone(),
            portion_of_total: grid,
        }
    }
}

/// Compute the section grid for `layout`
pub(crate) fn compute(shape: &PixelShape, layout: &SectionLayout) -> SectionBrightness {
    let (columns, rows) = layout.dimensions();
    if shape.is_degenerate() || columns == 0 || rows == 0 {
        return SectionBrightness::zeros(columns, rows);
    }
    let (vertical, horizontal) = section_breaks(shape, layout);
    tracing::trace!(?vertical, ?horizontal, "section breaks");
    totals_by_section(shape, &vertical, &horizontal)
}

fn section_breaks(shape: &PixelShape, layout: &SectionLayout) -> (Vec<f64>, Vec<f64>) {
    let width = shape.width() as f64;
    let height = shape.height() as f64;
    let mean_line = shape.mean_line() as f64;
    let base_line = shape.base_line() as f64;
    let x_height = base_line - mean_line + 1.0;
    let left_to_right = shape.direction().is_left_to_right();

    match *layout {
        SectionLayout::Plain { columns, rows } => {
            let column_width = width / columns as f64;
            let mut vertical: Vec<f64> = (0..=columns).map(|i| column_width * i as f64).collect();
            vertical[columns] = width;
            let row_height = height / rows as f64;
            let mut horizontal: Vec<f64> = (0..=rows).map(|i| row_height * i as f64).collect();
            horizontal[rows] = height;
            (vertical, horizontal)
        }
        SectionLayout::XHeightMargins {
            columns,
            rows,
            top_bottom_margin,
            horizontal_margin,
        } => {
            let total_width = x_height + x_height * horizontal_margin;
            let left_offset = if left_to_right { width - total_width } else { 0.0 };
            let column_width = total_width / columns as f64;
            let mut vertical: Vec<f64> = (0..=columns)
                .map(|i| left_offset + column_width * i as f64)
                .collect();
            vertical[columns] = width;

            let total_height = x_height + x_height * top_bottom_margin * 2.0;
            let top_offset = mean_line - x_height * top_bottom_margin;
            let row_height = total_height / rows as f64;
            let horizontal = (0..=rows)
                .map(|i| top_offset + row_height * i as f64)
                .collect();
            (vertical, horizontal)
        }
        SectionLayout::MarginSections {
            columns,
            rows,
            margin_sections,
            include_horizontal_margin,
        } => {
            let (x_count, y_count) = layout.dimensions();
            let margin_columns = x_count - columns;

            let mut left_offset = 0.0;
            let mut margin_width = 0.0;
            let mut margin_column_width = 0.0;
            let column_width;
            if include_horizontal_margin {
                let total_width = x_height * 1.5;
                if !left_to_right {
                    left_offset = width - total_width;
                }
                margin_width = total_width - x_height;
                margin_column_width = margin_width / margin_sections as f64;
                column_width = x_height / columns as f64;
            } else {
                column_width = width / x_count as f64;
            }

            let mut vertical = Vec::with_capacity(x_count + 1);
            vertical.push(left_offset);
            if left_to_right {
                for i in 0..columns {
                    vertical.push(column_width * (i + 1) as f64);
                }
                for i in 0..margin_columns {
                    vertical.push(
                        column_width * columns as f64 + margin_column_width * (i + 1) as f64,
                    );
                }
            } else {
                for i in 0..margin_columns {
                    vertical.push(left_offset + margin_column_width * (i + 1) as f64);
                }
                for i in 0..columns {
                    vertical.push(left_offset + margin_width + column_width * (i + 1) as f64);
                }
            }
            vertical[x_count] = width;

            let mut horizontal = Vec::with_capacity(y_count + 1);
            horizontal.push(0.0);
            let header_row_height = mean_line.max(0.0) / margin_sections as f64;
            for i in 0..margin_sections {
                horizontal.push(header_row_height * (i + 1) as f64);
            }
            let row_height = x_height / rows as f64;
            for i in 0..rows {
                horizontal.push(mean_line + row_height * (i + 1) as f64);
            }
            let footer_row_height = (height - base_line - 1.0).max(0.0) / margin_sections as f64;
            for i in 0..margin_sections {
                horizontal.push(base_line + 1.0 + footer_row_height * (i + 1) as f64);
            }
            horizontal[y_count] = height;
            (vertical, horizontal)
        }
    }
}

/// Spread of each pixel coordinate over sections: (first, last, shares)
fn distribution(extent: i32, breaks: &[f64]) -> Vec<(usize, usize, Vec<f64>)> {
    let sections = breaks.len() - 1;
    (0..extent)
        .map(|p| {
            let p = p as f64;
            let mut shares = vec![0.0; sections];
            let mut range = (0, 0);
            for i in 0..sections {
                let brk = breaks[i + 1];
                if p < brk && brk < p + 1.0 {
                    shares[i] = brk - brk.floor();
                    range = (i, i);
                    if i + 1 < sections {
                        shares[i + 1] = 1.0 - shares[i];
                        range.1 = i + 1;
                    }
                    break;
                } else if p < brk {
                    shares[i] = 1.0;
                    range = (i, i);
                    break;
                }
            }
            (range.0, range.1, shares)
        })
        .collect()
}

fn totals_by_section(
    shape: &PixelShape,
    vertical: &[f64],
    horizontal: &[f64],
) -> SectionBrightness {
    let columns = vertical.len() - 1;
    let rows = horizontal.len() - 1;
    let x_dist = distribution(shape.width(), vertical);
    let y_dist = distribution(shape.height(), horizontal);

    let mut raw = vec![vec![0.0; rows]; columns];
    let mut total_ink = 0.0;
    for (y, (y_start, y_end, y_shares)) in y_dist.iter().enumerate() {
        for (x, (x_start, x_end, x_shares)) in x_dist.iter().enumerate() {
            let ink = (WHITE - shape.brightness(x as i32, y as i32)) as f64;
            total_ink += ink;
            for i in *x_start..=*x_end {
                for j in *y_start..=*y_end {
                    raw[i][j] += x_shares[i] * y_shares[j] * ink;
                }
            }
        }
    }

    let mut size_normalised = vec![vec![0.0; rows]; columns];
    let mut max_ratio: f64 = 0.0;
    for i in 0..columns {
        for j in 0..rows {
            let area = (vertical[i + 1] - vertical[i]) * (horizontal[j + 1] - horizontal[j]);
            if area > 0.0 {
                size_normalised[i][j] = raw[i][j] / area;
                max_ratio = max_ratio.max(size_normalised[i][j]);
            }
        }
    }

    let relative_to_max = if max_ratio > 0.0 {
        size_normalised
            .iter()
            .map(|col| col.iter().map(|v| v / max_ratio).collect())
            .collect()
    } else {
        vec![vec![0.0; rows]; columns]
    };

    let portion_of_total = if total_ink > 0.0 {
        raw.iter()
            .map(|col| col.iter().map(|v| v / total_ink).collect())
            .collect()
    } else {
        vec![vec![0.0; rows]; columns]
    };

    SectionBrightness {
        raw,
        size_normalised,
        relative_to_max,
        portion_of_total,
    }
}
