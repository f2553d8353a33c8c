//! glyphseg-test - Regression test framework for glyphseg
//!
//! This crate provides the comparison harness used by every `*_reg.rs`
//! integration test in the workspace, plus helpers that turn small
//! text fixtures into bitmaps and shapes.
//!
//! # Usage
//!
//! ```ignore
//! use glyphseg_test::{RegParams, shape_from_rows};
//!
//! let shape = shape_from_rows(&["0110", "1111"]).unwrap();
//! let mut rp = RegParams::new("outline");
//! rp.compare_values(6.0, shape.outline(100).count_ones() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;

use std::sync::Arc;

use glyphseg_core::{BLACK, BitGrid, GrayBitmap, PixelShape, PixelSource, WHITE};

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Build a bilevel bitmap from text rows
///
/// `'1'` and `'x'` are black; every other character is white. All rows
/// must have the same length.
///
/// # Errors
///
/// Returns [`TestError::InvalidFixture`] for empty or ragged rows.
pub fn bitmap_from_rows(rows: &[&str]) -> TestResult<GrayBitmap> {
    let width = rows.first().map_or(0, |r| r.len());
    if width == 0 {
        return Err(TestError::InvalidFixture("no pixels".to_string()));
    }
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(TestError::InvalidFixture(format!(
            "row {} has length {}, expected {}",
            bad,
            rows[bad].len(),
            width
        )));
    }
    let data = rows
        .iter()
        .flat_map(|r| r.bytes())
        .map(|b| if b == b'1' || b == b'x' { BLACK } else { WHITE })
        .collect();
    Ok(GrayBitmap::from_raw(width as u32, rows.len() as u32, data)?)
}

/// Build a shape covering the whole of a text-row bitmap
///
/// # Errors
///
/// See [`bitmap_from_rows`].
pub fn shape_from_rows(rows: &[&str]) -> TestResult<PixelShape> {
    let source: Arc<dyn PixelSource> = Arc::new(bitmap_from_rows(rows)?);
    Ok(PixelShape::whole(source))
}

/// Build a bitset from text rows (`'1'`/`'x'` set, anything else clear)
///
/// # Errors
///
/// See [`bitmap_from_rows`].
pub fn bits_from_rows(rows: &[&str]) -> TestResult<BitGrid> {
    let bitmap = bitmap_from_rows(rows)?;
    Ok(BitGrid::from_fn(bitmap.width(), bitmap.height(), |x, y| {
        bitmap.brightness(x, y) == BLACK
    }))
}
