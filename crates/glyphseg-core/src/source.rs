//! Pixel sources
//!
//! Shapes never own pixels. They read brightness through a [`PixelSource`]
//! supplied by the upstream image pipeline. [`GrayBitmap`] is a plain owned
//! 8-bit implementation, used for tests and for callers that already hold
//! a decoded grayscale buffer.

use crate::error::{Error, Result};

/// Brightness value of white (background) pixels
pub const WHITE: u8 = 255;

/// Brightness value of fully black pixels
pub const BLACK: u8 = 0;

/// Read-only access to a rectangular grayscale region
///
/// Brightness runs from 0 (black) to 255 (white). Implementations must
/// return [`WHITE`] for coordinates outside the region.
pub trait PixelSource: Send + Sync {
    /// Width of the region in pixels
    fn width(&self) -> u32;

    /// Height of the region in pixels
    fn height(&self) -> u32;

    /// Brightness at `(x, y)`
    fn brightness(&self, x: i32, y: i32) -> u8;
}

/// Owned 8-bit grayscale bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayBitmap {
    /// Create an all-white bitmap
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![WHITE; width as usize * height as usize],
        })
    }

    /// Create a bitmap from row-major brightness values
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or `data` does not hold
    /// exactly `width * height` values.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Set the brightness at `(x, y)`; positions outside the bitmap are ignored
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// Raw row-major brightness values
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }
}

impl PixelSource for GrayBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn brightness(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(WHITE, |i| self.data[i])
    }
}
