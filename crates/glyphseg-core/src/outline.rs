//! Outline extraction
//!
//! A black pixel is on the outline iff at least one of its four
//! neighbours is white or lies outside the bitset.

use crate::bits::BitGrid;

/// Extract the 1-pixel-wide outline of a black/white bitset
pub fn trace_outline(black: &BitGrid) -> BitGrid {
    BitGrid::from_fn(black.width(), black.height(), |x, y| {
        black.get(x, y)
            && !(black.get(x - 1, y)
                && black.get(x + 1, y)
                && black.get(x, y - 1)
                && black.get(x, y + 1))
    })
}
