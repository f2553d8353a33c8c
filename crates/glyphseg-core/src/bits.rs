//! BitGrid - a packed two-dimensional bitset
//!
//! Bits are stored row-major (top-left to bottom-right, travelling
//! horizontally first), 64 to a word. Coordinates are signed so that
//! directional walks may step off the grid: reads outside the grid return
//! `false` and writes outside it are ignored.

use std::fmt;

const WORD_BITS: usize = 64;

/// Packed row-major bitset covering a `width` x `height` area
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitGrid {
    width: u32,
    height: u32,
    words: Vec<u64>,
}

impl BitGrid {
    /// Create an all-zero grid
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    /// Create a grid by evaluating `f(x, y)` at every position
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(i32, i32) -> bool) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if f(x, y) {
                    grid.set(x, y, true);
                }
            }
        }
        grid
    }

    /// Grid width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of positions (width * height)
    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if the grid covers no positions at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    /// Check whether `(x, y)` lies inside the grid
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Read the bit at `(x, y)`; positions outside the grid read as `false`
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.get_index(i))
    }

    /// Write the bit at `(x, y)`; positions outside the grid are ignored
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if let Some(i) = self.index(x, y) {
            self.set_index(i, value);
        }
    }

    /// Read the bit at a linear row-major index
    #[inline]
    pub fn get_index(&self, i: usize) -> bool {
        i < self.len() && (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    /// Write the bit at a linear row-major index
    #[inline]
    pub fn set_index(&mut self, i: usize, value: bool) {
        if i >= self.len() {
            return;
        }
        let mask = 1u64 << (i % WORD_BITS);
        if value {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if no bit is set
    pub fn none(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Bitwise AND of two grids
    ///
    /// Grids of different sizes are intersected position by position over
    /// their common area; the result has the size of `self`.
    pub fn intersection(&self, other: &BitGrid) -> BitGrid {
        if self.width == other.width && self.height == other.height {
            let words = self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect();
            return BitGrid {
                width: self.width,
                height: self.height,
                words,
            };
        }
        BitGrid::from_fn(self.width, self.height, |x, y| {
            self.get(x, y) && other.get(x, y)
        })
    }

    /// Iterate over the coordinates of set bits in row-major order
    pub fn iter_ones(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width as usize;
        (0..self.len())
            .filter(move |&i| self.get_index(i))
            .map(move |i| ((i % width) as i32, (i / width) as i32))
    }

    /// Render the grid as rows of `'1'` and `'0'`
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i32)
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| if self.get(x, y) { '1' } else { '0' })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid {}x{}", self.width, self.height)?;
        for row in self.to_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_across_word_boundary() {
        let mut g = BitGrid::new(10, 10);
        g.set(3, 6, true);
        g.set(9, 9, true);
        assert!(g.get(3, 6));
        assert!(g.get(9, 9));
        assert!(!g.get(4, 6));
        assert_eq!(g.count_ones(), 2);
        g.set(3, 6, false);
        assert_eq!(g.count_ones(), 1);
    }

    #[test]
    fn test_out_of_bounds_is_false_and_ignored() {
        let mut g = BitGrid::new(3, 3);
        g.set(-1, 0, true);
        g.set(3, 0, true);
        assert!(g.none());
        assert!(!g.get(-1, 0));
    }

    #[test]
    fn test_iter_ones_row_major() {
        let g = BitGrid::from_fn(4, 2, |x, y| (x + y) % 3 == 0);
        let ones: Vec<_> = g.iter_ones().collect();
        assert_eq!(ones, vec![(0, 0), (3, 0), (2, 1)]);
    }

    #[test]
    fn test_intersection() {
        let a = BitGrid::from_fn(5, 5, |x, _| x < 3);
        let b = BitGrid::from_fn(5, 5, |_, y| y == 2);
        assert_eq!(a.intersection(&b).count_ones(), 3);
    }
}
