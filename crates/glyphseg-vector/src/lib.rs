//! glyphseg-vector - Discrete line vectorization of glyph outlines
//!
//! Lines here are integer walks: a [`LineDefinition`] fixes a compass
//! sector and a repeating pattern of run lengths, and every walk over the
//! same pixels gives the same result.
//!
//! - [`LineDefinition`] - stepping pattern with `trace`, `follow`,
//!   `follow_in_shape` and a stroke-thickness probe
//! - [`LineSegment`] - a run between two points, with enclosing rectangles
//! - [`Vectorizer`] - longest runs from the outline of a shape
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use glyphseg_core::{GrayBitmap, PixelShape, PixelSource};
//! use glyphseg_vector::Vectorizer;
//!
//! let mut bitmap = GrayBitmap::new(6, 3).unwrap();
//! for x in 0..6 {
//!     bitmap.set(x, 1, 0);
//! }
//! let source: Arc<dyn PixelSource> = Arc::new(bitmap);
//! let shape = PixelShape::whole(source);
//!
//! let lines = Vectorizer::default().vectorize(&shape);
//! assert_eq!(lines[0].length(), 5);
//! ```

pub mod error;
pub mod line_def;
pub mod segment;
pub mod vectorizer;

pub use error::{VectorError, VectorResult};
pub use line_def::{LineDefinition, LineEnd, SECTOR_COUNT};
pub use segment::LineSegment;
pub use vectorizer::{LINE_DEFS_PER_SECTOR, Vectorizer, VectorizerOptions};
