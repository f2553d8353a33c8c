//! glyphseg - Glyph segmentation for OCR
//!
//! Finds the letters in a scanned word: shapes that are really two
//! touching letters are split, fragments of one broken letter are
//! merged, and every alternative is ranked.
//!
//! # Overview
//!
//! - Bitmap geometry and pixel queries (`PixelShape`, `GrayBitmap`, ...)
//! - Discrete line vectorization of glyph outlines ([`vector`])
//! - Split candidates, split/merge classifiers, boundary detection,
//!   evaluation and training events ([`boundary`])
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use glyphseg::boundary::{BoundaryConfig, BoundaryDetector};
//! use glyphseg::{GrayBitmap, PixelShape, PixelSource};
//!
//! let config = BoundaryConfig::from_json_str(r#"{"detector": {"strategy": "identity"}}"#).unwrap();
//! let detector = BoundaryDetector::from_config(&config, None, None).unwrap();
//!
//! let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::new(40, 12).unwrap());
//! let shapes = vec![
//!     Rc::new(PixelShape::new(Arc::clone(&source), 0, 0, 9, 11)),
//!     Rc::new(PixelShape::new(source, 14, 0, 25, 11)),
//! ];
//! let best = &detector.find_boundaries(&shapes)[0];
//! assert_eq!(best.len(), 2);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use glyphseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use glyphseg_boundary as boundary;
pub use glyphseg_vector as vector;
