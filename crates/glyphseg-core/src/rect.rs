//! Rect - axis-aligned rectangles
//!
//! Shapes describe themselves with inclusive `left/top/right/bottom`
//! coordinates, but bounding-box arithmetic (unions for merged shapes,
//! overlap pre-checks for line segments) is simpler on an
//! origin-plus-extent rectangle with exclusive right and bottom edges.

use crate::error::{Error, Result};

/// A rectangle region
///
/// A small `Copy` type: x/y is the top-left corner, w/h the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "rect dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a rectangle without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from inclusive edge coordinates
    ///
    /// A right edge left of the left edge (or bottom above top) gives an
    /// empty rectangle rather than a negative extent.
    pub fn from_inclusive(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            w: (right - left + 1).max(0),
            h: (bottom - top + 1).max(0),
        }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the rectangle is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle overlaps with another
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Compute the smallest rectangle containing both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            x,
            y,
            w: right - x,
            h: bottom - y,
        }
    }

    /// Grow the rectangle by `margin` pixels on every side
    pub fn inflate(&self, margin: i32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            w: (self.w + 2 * margin).max(0),
            h: (self.h + 2 * margin).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_inclusive() {
        let r = Rect::from_inclusive(2, 3, 5, 3);
        assert_eq!((r.x, r.y, r.w, r.h), (2, 3, 4, 1));
        assert!(Rect::from_inclusive(5, 0, 4, 0).is_empty());
    }

    #[test]
    fn test_union_and_intersect() {
        let a = Rect::new_unchecked(0, 0, 4, 4);
        let b = Rect::new_unchecked(6, 1, 2, 5);
        assert_eq!(a.union(&b), Rect::new_unchecked(0, 0, 8, 6));
        assert!(a.intersect(&b).is_none());
        assert!(!a.overlaps(&b));
        // edges are exclusive: grown by 2, `a` ends just short of x = 6
        assert!(!a.inflate(2).overlaps(&b));
        assert!(a.inflate(3).overlaps(&b));
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(Rect::new(0, 0, -1, 2).is_err());
    }
}
