//! Hole filling for black/white bitsets
//!
//! Scanning and thresholding leave small white specks inside strokes.
//! These interior holes confuse outline tracing and line vectorization,
//! so they are filled before geometry is analysed. A white region counts
//! as a hole only when it is small (at most `fill_factor` pixels) and does
//! not touch the border of the bitset. Regions touching the border are
//! background, however small.
//!
//! # See also
//!
//! [`PixelShape::black_and_white_bits`], which applies the filler when a
//! non-zero white-gap fill factor is requested.

use std::collections::VecDeque;

use crate::bits::BitGrid;
use crate::shape::PixelShape;

/// Fills small interior white regions of a bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoleFiller {
    fill_factor: usize,
}

impl HoleFiller {
    /// Create a filler that fills interior white regions of at most
    /// `fill_factor` pixels
    pub fn new(fill_factor: usize) -> Self {
        Self { fill_factor }
    }

    /// Maximum size of a white region that gets filled
    pub fn fill_factor(&self) -> usize {
        self.fill_factor
    }

    /// Threshold a shape and fill its interior holes
    pub fn fill_shape(&self, shape: &PixelShape, threshold: u8) -> BitGrid {
        let black = shape.black_and_white_bits(threshold, 0);
        self.fill(&black)
    }

    /// Fill interior holes of a black (`true`) / white (`false`) bitset
    ///
    /// Single pass: every white pixel is visited once by a 4-connected
    /// flood fill, so the cost is linear in the number of pixels.
    pub fn fill(&self, black: &BitGrid) -> BitGrid {
        let mut filled = black.clone();
        if self.fill_factor == 0 || black.is_empty() {
            return filled;
        }

        let width = black.width() as i32;
        let height = black.height() as i32;
        let mut visited = BitGrid::new(black.width(), black.height());
        let mut region: Vec<(i32, i32)> = Vec::new();
        let mut queue = VecDeque::new();

        for y in 0..height {
            for x in 0..width {
                if black.get(x, y) || visited.get(x, y) {
                    continue;
                }

                region.clear();
                let mut touches_border = false;
                visited.set(x, y, true);
                queue.push_back((x, y));

                while let Some((cx, cy)) = queue.pop_front() {
                    region.push((cx, cy));
                    if cx == 0 || cy == 0 || cx == width - 1 || cy == height - 1 {
                        touches_border = true;
                    }

                    for (nx, ny) in [(cx - 1, cy), (cx + 1, cy), (cx, cy - 1), (cx, cy + 1)] {
                        if black.in_bounds(nx, ny) && !black.get(nx, ny) && !visited.get(nx, ny)
                        {
                            visited.set(nx, ny, true);
                            queue.push_back((nx, ny));
                        }
                    }
                }

                if !touches_border && region.len() <= self.fill_factor {
                    tracing::trace!(x, y, size = region.len(), "hole filled");
                    for &(hx, hy) in &region {
                        filled.set(hx, hy, true);
                    }
                }
            }
        }

        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> BitGrid {
        BitGrid::from_fn(rows[0].len() as u32, rows.len() as u32, |x, y| {
            rows[y as usize].as_bytes()[x as usize] == b'1'
        })
    }

    #[test]
    fn test_fills_small_interior_hole() {
        let g = grid(&["11111", "10011", "11111"]);
        let filled = HoleFiller::new(2).fill(&g);
        assert_eq!(filled.count_ones(), 15);
    }

    #[test]
    fn test_keeps_large_hole() {
        let g = grid(&["11111", "10001", "11111"]);
        let filled = HoleFiller::new(2).fill(&g);
        assert_eq!(filled, g);
    }

    #[test]
    fn test_keeps_border_region() {
        let g = grid(&["01111", "11111", "11111"]);
        let filled = HoleFiller::new(10).fill(&g);
        assert_eq!(filled, g);
    }

    #[test]
    fn test_zero_fill_factor_is_identity() {
        let g = grid(&["111", "101", "111"]);
        assert_eq!(HoleFiller::new(0).fill(&g), g);
    }
}
