//! Line segments found inside a shape
//!
//! A [`LineSegment`] is the result of one walk from an outline pixel to
//! the opposite edge of the shape. Segments order longest first, and each
//! can report a tilted "enclosing rectangle": the walk repeated at
//! parallel offsets on both sides. Two segments whose rectangles overlap
//! run through the same strokes, which is what the split-candidate finder
//! looks for.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use glyphseg_core::{BitGrid, Rect};

use crate::line_def::LineDefinition;

/// A straight run between two points of a shape
#[derive(Clone)]
pub struct LineSegment {
    definition: Arc<LineDefinition>,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
    length: i32,
    frame_width: u32,
    frame_height: u32,
}

impl LineSegment {
    /// Create a segment
    ///
    /// # Arguments
    ///
    /// * `definition` - Line definition the segment was walked with
    /// * `start` / `end` - Endpoints in shape coordinates
    /// * `length` - Number of steps of the walk
    /// * `frame` - Width and height of the shape, the extent of the
    ///   rectangles this segment produces
    pub fn new(
        definition: Arc<LineDefinition>,
        start: (i32, i32),
        end: (i32, i32),
        length: i32,
        frame: (u32, u32),
    ) -> Self {
        Self {
            definition,
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
            length,
            frame_width: frame.0,
            frame_height: frame.1,
        }
    }

    /// Line definition the segment was walked with
    pub fn definition(&self) -> &Arc<LineDefinition> {
        &self.definition
    }

    pub fn start_x(&self) -> i32 {
        self.start_x
    }

    pub fn start_y(&self) -> i32 {
        self.start_y
    }

    pub fn end_x(&self) -> i32 {
        self.end_x
    }

    pub fn end_y(&self) -> i32 {
        self.end_y
    }

    /// Number of steps between the endpoints
    pub fn length(&self) -> i32 {
        self.length
    }

    /// True if `other` has the same length and the same endpoints, in
    /// either direction
    pub fn is_same_line(&self, other: &LineSegment) -> bool {
        if self.length != other.length {
            return false;
        }
        let forward = self.start_x == other.start_x
            && self.start_y == other.start_y
            && self.end_x == other.end_x
            && self.end_y == other.end_y;
        let reverse = self.start_x == other.end_x
            && self.start_y == other.end_y
            && self.end_x == other.start_x
            && self.end_y == other.start_y;
        forward || reverse
    }

    /// Axis-aligned box around both endpoints, inflated by `tolerance`
    pub fn bounding_rect(&self, tolerance: i32) -> Rect {
        Rect::from_inclusive(
            self.start_x.min(self.end_x),
            self.start_y.min(self.end_y),
            self.start_x.max(self.end_x),
            self.start_y.max(self.end_y),
        )
        .inflate(tolerance)
    }

    /// Tilted rectangle covering the walk and its parallels up to
    /// `half_width` pixels away on either side
    ///
    /// Mostly horizontal sectors (0, 3, 4, 7) offset the parallels
    /// vertically, the others horizontally. The result has the size of the
    /// shape; pixels falling outside it are dropped.
    pub fn enclosing_rectangle(&self, half_width: u32) -> BitGrid {
        let mut rect = BitGrid::new(self.frame_width, self.frame_height);
        let length = self.length.max(0) as u32;
        self.definition
            .trace(&mut rect, self.start_x, self.start_y, length, 0);

        let vertical_offset = matches!(self.definition.sector(), 0 | 3 | 4 | 7);
        for i in 1..=half_width as i32 {
            let (before, after) = if vertical_offset {
                ((self.start_x, self.start_y - i), (self.start_x, self.start_y + i))
            } else {
                ((self.start_x - i, self.start_y), (self.start_x + i, self.start_y))
            };
            self.definition
                .trace(&mut rect, before.0, before.1, length, 0);
            self.definition
                .trace(&mut rect, after.0, after.1, length, 0);
        }
        rect
    }

    /// Pixels shared by the enclosing rectangles of both segments
    pub fn enclosing_rectangle_intersection(&self, other: &LineSegment, half_width: u32) -> BitGrid {
        self.enclosing_rectangle(half_width)
            .intersection(&other.enclosing_rectangle(half_width))
    }
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LineSegment {}

impl PartialOrd for LineSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineSegment {
    /// Longest first, then by start row, start column, end row, end column
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .length
            .cmp(&self.length)
            .then(self.start_y.cmp(&other.start_y))
            .then(self.start_x.cmp(&other.start_x))
            .then(self.end_y.cmp(&other.end_y))
            .then(self.end_x.cmp(&other.end_x))
    }
}

impl fmt::Debug for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LineSegment[{}]({},{})-({},{}) len {}",
            self.definition.index(),
            self.start_x,
            self.start_y,
            self.end_x,
            self.end_y,
            self.length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: (i32, i32), end: (i32, i32), length: i32) -> LineSegment {
        let def = Arc::new(LineDefinition::new(0, 0, vec![2, 3]).unwrap());
        LineSegment::new(def, start, end, length, (8, 8))
    }

    #[test]
    fn test_ordering_longest_first() {
        let mut segments = vec![
            segment((1, 1), (2, 1), 1),
            segment((0, 3), (4, 3), 4),
            segment((0, 2), (4, 2), 4),
        ];
        segments.sort();
        assert_eq!(segments[0].start_y(), 2);
        assert_eq!(segments[1].start_y(), 3);
        assert_eq!(segments[2].length(), 1);
    }

    #[test]
    fn test_same_line_in_reverse() {
        let a = segment((5, 2), (1, 3), 4);
        let b = segment((1, 3), (5, 2), 4);
        let c = segment((1, 3), (5, 2), 5);
        assert!(a.is_same_line(&b));
        assert!(!a.is_same_line(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_bounding_rect() {
        let a = segment((5, 2), (1, 3), 4);
        let rect = a.bounding_rect(3);
        assert_eq!((rect.x, rect.y), (-2, -1));
        assert_eq!((rect.right() - 1, rect.bottom() - 1), (8, 6));
    }
}
