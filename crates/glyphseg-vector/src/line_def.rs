//! Line definitions - discrete directional stepping patterns
//!
//! A line definition walks one pixel at a time in its sector's main
//! direction and, after each run of `steps[k]` pixels, takes one extra
//! sideways step before continuing with the next run length (cycling
//! through `steps`). A pattern of `{0}` never steps sideways and walks
//! straight along the axis; `{2, 3}` alternates runs of two and three
//! pixels, approximating a shallow slope. All arithmetic is on integer
//! pixel offsets, so a walk is fully reproducible.
//!
//! Sectors number the eight compass directions:
//!
//! | sector | main step | sideways step |
//! |--------|-----------|---------------|
//! | 0      | (-1, 0)   | (0, 1)        |
//! | 1      | (-1, 1)   | (1, 0)        |
//! | 2      | (0, 1)    | (1, 0)        |
//! | 3      | (1, 1)    | (0, -1)       |
//! | 4      | (1, 0)    | (0, -1)       |
//! | 5      | (1, -1)   | (-1, 0)       |
//! | 6      | (0, -1)   | (-1, 0)       |
//! | 7      | (-1, -1)  | (0, 1)        |
//!
//! A `rotation` argument adds to the sector (mod 8): a rotation of 2 turns
//! the walk by 90 degrees.

use glyphseg_core::{BitGrid, PixelShape};

use crate::error::{VectorError, VectorResult};

const DELTA_X: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];
const DELTA_Y: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
const X_INCREMENT: [i32; 8] = [0, 1, 1, 0, 0, -1, -1, 0];
const Y_INCREMENT: [i32; 8] = [1, 0, 0, -1, -1, 0, 0, 1];

/// Number of compass sectors
pub const SECTOR_COUNT: usize = 8;

/// End of a walk: the last position reached and the number of steps taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEnd {
    /// Last x position reached
    pub x: i32,
    /// Last y position reached
    pub y: i32,
    /// Number of steps taken
    pub length: i32,
}

/// Side effects and stopping rule of a single walk
#[derive(Default)]
struct Walk<'a> {
    trace: Option<&'a mut BitGrid>,
    stay_in: Option<(&'a PixelShape, u8, usize)>,
    samples: Option<(usize, &'a mut Vec<(i32, i32)>)>,
}

/// One entry of the line catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineDefinition {
    sector: usize,
    index: usize,
    steps: Vec<u32>,
}

impl LineDefinition {
    /// Create a line definition
    ///
    /// # Arguments
    ///
    /// * `sector` - Compass sector, 0 to 7
    /// * `index` - Position in the owning catalog
    /// * `steps` - Run lengths between sideways steps; `[0]` walks straight
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidLineDefinition`] for a sector outside
    /// 0..8 or an empty step pattern.
    pub fn new(sector: usize, index: usize, steps: Vec<u32>) -> VectorResult<Self> {
        if sector >= SECTOR_COUNT {
            return Err(VectorError::InvalidLineDefinition(format!(
                "sector must be below {}, got {}",
                SECTOR_COUNT, sector
            )));
        }
        if steps.is_empty() {
            return Err(VectorError::InvalidLineDefinition(
                "step pattern cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            sector,
            index,
            steps,
        })
    }

    /// Catalog entry built from known-good parameters
    pub(crate) fn catalog_entry(sector: usize, index: usize, steps: Vec<u32>) -> Self {
        Self {
            sector,
            index,
            steps,
        }
    }

    /// Compass sector
    pub fn sector(&self) -> usize {
        self.sector
    }

    /// Position in the owning catalog
    pub fn index(&self) -> usize {
        self.index
    }

    /// Run lengths between sideways steps
    pub fn steps(&self) -> &[u32] {
        &self.steps
    }

    /// Main step `(dx, dy)` of the unrotated sector
    pub fn delta(&self) -> (i32, i32) {
        (DELTA_X[self.sector], DELTA_Y[self.sector])
    }

    /// Sideways step of the unrotated sector
    pub fn increment(&self) -> (i32, i32) {
        (X_INCREMENT[self.sector], Y_INCREMENT[self.sector])
    }

    /// Mark every pixel visited by a walk of `length` steps from `(x, y)`
    ///
    /// The start pixel and `length` further pixels are marked; pixels
    /// outside `grid` are skipped.
    pub fn trace(&self, grid: &mut BitGrid, x: i32, y: i32, length: u32, rotation: i32) {
        self.walk(
            x,
            y,
            Some(length),
            rotation,
            Walk {
                trace: Some(grid),
                ..Walk::default()
            },
        );
    }

    /// Position reached after a walk of `length` steps from `(x, y)`
    pub fn follow(&self, x: i32, y: i32, length: u32, rotation: i32) -> (i32, i32) {
        let end = self.walk(x, y, Some(length), rotation, Walk::default());
        (end.x, end.y)
    }

    /// Walk from `(x, y)` until the next pixel is not black
    ///
    /// Returns the last black pixel reached and the number of steps taken
    /// inside the shape. White gaps of up to `fill_factor` pixels are
    /// treated as black.
    pub fn follow_in_shape(
        &self,
        shape: &PixelShape,
        x: i32,
        y: i32,
        rotation: i32,
        threshold: u8,
        fill_factor: usize,
    ) -> LineEnd {
        self.walk(
            x,
            y,
            None,
            rotation,
            Walk {
                stay_in: Some((shape, threshold, fill_factor)),
                ..Walk::default()
            },
        )
    }

    /// Stroke thickness perpendicular to this line, sampled along it
    ///
    /// Walks at most `length` steps from `(x, y)` inside the shape. Every
    /// `sample_step` steps, it crosses the stroke at a right angle and
    /// records how many steps the crossing takes.
    pub fn find_thickness(
        &self,
        shape: &PixelShape,
        x: i32,
        y: i32,
        length: u32,
        threshold: u8,
        fill_factor: usize,
        sample_step: usize,
    ) -> Vec<i32> {
        let sample_step = sample_step.max(1);
        let mut points = Vec::with_capacity(length as usize / sample_step + 1);
        self.walk(
            x,
            y,
            Some(length),
            0,
            Walk {
                stay_in: Some((shape, threshold, fill_factor)),
                samples: Some((sample_step, &mut points)),
                ..Walk::default()
            },
        );

        points
            .into_iter()
            .map(|(px, py)| {
                let edge = self.follow_in_shape(shape, px, py, 2, threshold, fill_factor);
                self.follow_in_shape(shape, edge.x, edge.y, -2, threshold, fill_factor)
                    .length
            })
            .collect()
    }

    /// Core stepping loop shared by every walk
    ///
    /// With `length == None` the walk only stops on leaving the shape, so
    /// callers must supply `stay_in`.
    fn walk(&self, x0: i32, y0: i32, length: Option<u32>, rotation: i32, mut effects: Walk<'_>) -> LineEnd {
        let sector = (self.sector as i32 + rotation).rem_euclid(SECTOR_COUNT as i32) as usize;
        let (dx, dy) = (DELTA_X[sector], DELTA_Y[sector]);
        let (ix, iy) = (X_INCREMENT[sector], Y_INCREMENT[sector]);

        let (mut x, mut y) = (x0, y0);
        let (mut last_x, mut last_y) = (0, 0);
        let mut step_pos = 0;
        let mut current_run = self.steps[0];
        let mut pos_on_run = 0;
        let mut sample_counter = 0;
        let mut i: i32 = 0;

        while length.is_none_or(|len| i <= len as i32) {
            if let Some(grid) = effects.trace.as_deref_mut() {
                grid.set(x, y, true);
            }
            last_x = x;
            last_y = y;
            x += dx;
            y += dy;

            if let Some((gap, points)) = effects.samples.as_mut() {
                sample_counter += 1;
                if sample_counter == *gap {
                    points.push((x, y));
                    sample_counter = 0;
                }
            }

            pos_on_run += 1;
            if pos_on_run == current_run {
                x += ix;
                y += iy;
                pos_on_run = 0;
                step_pos = (step_pos + 1) % self.steps.len();
                current_run = self.steps[step_pos];
            }

            if let Some((shape, threshold, fill)) = effects.stay_in {
                if !shape.is_black_with_fill(x, y, threshold, fill) {
                    break;
                }
            }
            i += 1;
        }

        LineEnd {
            x: last_x,
            y: last_y,
            length: i,
        }
    }
}
