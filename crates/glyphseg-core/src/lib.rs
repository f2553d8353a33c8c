//! glyphseg-core - Bitmap geometry for glyph segmentation
//!
//! This crate provides the leaf data structures of the segmentation engine:
//!
//! - [`PixelSource`] / [`GrayBitmap`] - read-only grayscale pixel access
//! - [`BitGrid`] - packed row-major bitset
//! - [`Rect`] - axis-aligned rectangle
//! - [`PixelShape`] - a candidate letter blob with text metrics, black/white
//!   queries, outline, brightness grid and a per-shape result cache
//! - [`HoleFiller`] - fills small interior white gaps
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use glyphseg_core::{GrayBitmap, PixelShape, PixelSource};
//!
//! let bitmap = GrayBitmap::from_raw(3, 3, vec![0, 0, 0, 0, 255, 0, 0, 0, 0]).unwrap();
//! let source: Arc<dyn PixelSource> = Arc::new(bitmap);
//! let shape = PixelShape::whole(source);
//!
//! assert!(!shape.is_black(1, 1, 100));
//! assert!(shape.is_black_with_fill(1, 1, 100, 1));
//! assert_eq!(shape.outline(100).count_ones(), 8);
//! ```

pub mod bits;
pub mod error;
pub mod fill;
pub mod outline;
pub mod rect;
pub mod shape;
pub mod source;

pub use bits::BitGrid;
pub use error::{Error, Result};
pub use fill::HoleFiller;
pub use outline::trace_outline;
pub use rect::Rect;
pub use shape::{
    BrightnessMethod, DEFAULT_BLACK_THRESHOLD, FeatureKey, PixelShape, ReadingDirection,
    SectionGrid, SectionLayout, ShapeCache, ShapeRef, VerticalContour,
};
pub use source::{BLACK, GrayBitmap, PixelSource, WHITE};
