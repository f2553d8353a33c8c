//! Pairs of adjacent shapes considered for merging

use std::fmt;

use glyphseg_core::{PixelShape, Rect};

/// Two neighbouring shapes, in sequence order
///
/// The pair's box is the union of both shapes. Nothing here is cached:
/// pairs are built on the fly for every merge check.
#[derive(Debug, Clone, Copy)]
pub struct ShapePair<'a> {
    first: &'a PixelShape,
    second: &'a PixelShape,
}

impl<'a> ShapePair<'a> {
    pub fn new(first: &'a PixelShape, second: &'a PixelShape) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &'a PixelShape {
        self.first
    }

    pub fn second(&self) -> &'a PixelShape {
        self.second
    }

    pub fn left(&self) -> i32 {
        self.first.left().min(self.second.left())
    }

    pub fn top(&self) -> i32 {
        self.first.top().min(self.second.top())
    }

    pub fn right(&self) -> i32 {
        self.first.right().max(self.second.right())
    }

    pub fn bottom(&self) -> i32 {
        self.first.bottom().max(self.second.bottom())
    }

    pub fn width(&self) -> i32 {
        self.right() - self.left() + 1
    }

    pub fn height(&self) -> i32 {
        self.bottom() - self.top() + 1
    }

    pub fn rect(&self) -> Rect {
        Rect::from_inclusive(self.left(), self.top(), self.right(), self.bottom())
    }

    /// Larger x-height of the two, at least 1
    pub fn x_height(&self) -> i32 {
        let x_height = self.first.x_height().max(self.second.x_height());
        if x_height <= 0 { 1 } else { x_height }
    }

    /// White columns between the shapes; negative when they overlap
    pub fn inner_distance(&self) -> i32 {
        if self.first.left() < self.second.left() {
            self.second.left() - self.first.right() - 1
        } else {
            self.first.left() - self.second.right() - 1
        }
    }

    /// Pair width in x-heights
    pub fn width_ratio(&self) -> f64 {
        in_x_heights(self.width(), self.x_height())
    }

    /// Inner distance in x-heights
    pub fn distance_ratio(&self) -> f64 {
        in_x_heights(self.inner_distance(), self.x_height())
    }

    /// Whether the letter annotations mark the pair as one letter
    ///
    /// A letter broken over several shapes is annotated `"|x"` on its first
    /// shape, `"x|"` on its last and `""` on anything in between.
    pub fn should_merge(&self) -> bool {
        should_merge(self.first.letter(), self.second.letter())
    }
}

/// `length` in units of `x_height`, taking an x-height of at least 1
pub fn in_x_heights(length: i32, x_height: i32) -> f64 {
    length as f64 / x_height.max(1) as f64
}

/// Ground truth for a pair of letter annotations, see
/// [`ShapePair::should_merge`]
pub fn should_merge(first_letter: &str, second_letter: &str) -> bool {
    if first_letter.starts_with('|') {
        second_letter.is_empty() || second_letter.ends_with('|')
    } else {
        first_letter.is_empty() && second_letter.ends_with('|')
    }
}

impl fmt::Display for ShapePair<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapePair[{} + {}]", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glyphseg_core::{GrayBitmap, PixelSource};

    use super::*;

    fn source() -> Arc<dyn PixelSource> {
        Arc::new(GrayBitmap::new(40, 20).unwrap())
    }

    #[test]
    fn test_geometry() {
        let source = source();
        let a = PixelShape::new(Arc::clone(&source), 2, 4, 9, 12).with_lines(2, 8);
        let b = PixelShape::new(source, 13, 3, 20, 12).with_lines(1, 9);
        let pair = ShapePair::new(&a, &b);
        assert_eq!((pair.left(), pair.top(), pair.right(), pair.bottom()), (2, 3, 20, 12));
        assert_eq!(pair.width(), 19);
        assert_eq!(pair.x_height(), 8);
        assert_eq!(pair.inner_distance(), 3);
        // reversed order measures the same gap
        assert_eq!(ShapePair::new(&b, &a).inner_distance(), 3);
    }

    #[test]
    fn test_x_height_floor() {
        let source = source();
        let a = PixelShape::new(Arc::clone(&source), 0, 0, 3, 3).with_lines(2, 2);
        let b = PixelShape::new(source, 5, 0, 8, 3).with_lines(2, 2);
        assert_eq!(ShapePair::new(&a, &b).x_height(), 1);
    }

    #[test]
    fn test_should_merge() {
        assert!(should_merge("|a", "a|"));
        assert!(should_merge("|a", ""));
        assert!(should_merge("", "a|"));
        assert!(!should_merge("", ""));
        assert!(!should_merge("a", "b"));
        assert!(!should_merge("|a", "b"));
        assert!(!should_merge("a|", "|b"));
    }
}
