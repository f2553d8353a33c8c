//! Split positions

use std::fmt;

use glyphseg_core::PixelShape;
use serde::{Deserialize, Serialize};

/// A column at which a shape may be divided in two
///
/// `position` is relative to the parent's left edge; the split column
/// is the last column of the left half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Split {
    pub parent_id: u64,
    pub position: i32,
}

impl Split {
    pub fn new(parent_id: u64, position: i32) -> Self {
        Self {
            parent_id,
            position,
        }
    }

    /// True if the split leaves at least one column on either side
    pub fn is_within(&self, shape: &PixelShape) -> bool {
        self.position > 0 && self.position < shape.width() - 1
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split[{}]@{}", self.parent_id, self.position)
    }
}

/// A candidate split position within a borrowed shape
#[derive(Debug, Clone, Copy)]
pub struct SplitCandidate<'a> {
    pub shape: &'a PixelShape,
    pub position: i32,
}

impl<'a> SplitCandidate<'a> {
    pub fn new(shape: &'a PixelShape, position: i32) -> Self {
        Self { shape, position }
    }

    /// The split as a value, detached from the shape
    pub fn split(&self) -> Split {
        Split::new(self.shape.id(), self.position)
    }

    /// Left and right halves, or `None` if either would be empty
    pub fn pieces(&self) -> Option<(PixelShape, PixelShape)> {
        let left = self.shape.sub_shape(0, self.position)?;
        let right = self
            .shape
            .sub_shape(self.position + 1, self.shape.width() - 1)?;
        Some((left, right))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glyphseg_core::{GrayBitmap, PixelSource};

    use super::*;

    fn blank(width: u32) -> PixelShape {
        let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::new(width, 4).unwrap());
        PixelShape::whole(source).with_id(7)
    }

    #[test]
    fn test_pieces() {
        let shape = blank(10);
        let (left, right) = SplitCandidate::new(&shape, 4).pieces().unwrap();
        assert_eq!((left.left(), left.right()), (0, 4));
        assert_eq!((right.left(), right.right()), (5, 9));
        assert_eq!(SplitCandidate::new(&shape, 4).split(), Split::new(7, 4));
    }

    #[test]
    fn test_degenerate_pieces() {
        let shape = blank(10);
        assert!(SplitCandidate::new(&shape, -1).pieces().is_none());
        assert!(SplitCandidate::new(&shape, 9).pieces().is_none());
        assert!(!Split::new(7, 9).is_within(&shape));
        assert!(Split::new(7, 8).is_within(&shape));
    }
}
