//! PixelShape - a candidate letter blob within a bitmap
//!
//! A shape is a rectangular window `(left, top, right, bottom)`, inclusive,
//! onto a shared [`PixelSource`], together with the text metrics
//! (mean line and base line, relative to the shape's top) needed to
//! normalise its geometry. Every pixel query takes coordinates relative to
//! the shape's top-left corner; anything outside the window is white.
//!
//! Shapes come from the upstream segmenter, or are synthesised by splitting
//! or merging other shapes. `id == 0` marks a shape that has not been
//! persisted.
//!
//! # See also
//!
//! - [`crate::fill::HoleFiller`] for white-gap filling
//! - [`crate::outline::trace_outline`] for outline extraction

mod brightness;
mod cache;

pub use brightness::{BrightnessMethod, SectionGrid, SectionLayout};
pub use cache::{FeatureKey, ShapeCache};

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bits::BitGrid;
use crate::fill::HoleFiller;
use crate::outline::trace_outline;
use crate::rect::Rect;
use crate::source::{PixelSource, WHITE};

/// Brightness at or below which a pixel counts as black, unless the
/// caller supplies a threshold of its own
pub const DEFAULT_BLACK_THRESHOLD: u8 = 100;

/// Shared handle to a shape
///
/// Shapes are shared between the many candidate sequences explored during
/// boundary detection; the handle is `Rc` because the shape's cache is not
/// thread-safe.
pub type ShapeRef = Rc<PixelShape>;

/// Reading direction of the text a shape belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingDirection {
    /// Latin-style text
    LeftToRight,
    /// Hebrew and Yiddish
    #[default]
    RightToLeft,
}

impl ReadingDirection {
    /// True for left-to-right text
    pub fn is_left_to_right(self) -> bool {
        self == ReadingDirection::LeftToRight
    }
}

/// Topmost and bottommost black row of each column
///
/// Columns without any black pixel report `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerticalContour {
    spans: Vec<(i32, i32)>,
}

impl VerticalContour {
    /// Number of columns
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True if the shape has no columns
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Topmost black row of column `x`
    pub fn top(&self, x: usize) -> i32 {
        self.spans.get(x).map_or(0, |s| s.0)
    }

    /// Bottommost black row of column `x`
    pub fn bottom(&self, x: usize) -> i32 {
        self.spans.get(x).map_or(0, |s| s.1)
    }

    /// Iterate over `(top, bottom)` pairs, left to right
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.spans.iter().copied()
    }
}

/// A rectangular window onto a bitmap, with text metrics and a result cache
pub struct PixelShape {
    id: u64,
    source: Arc<dyn PixelSource>,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    mean_line: i32,
    base_line: i32,
    black_threshold: u8,
    direction: ReadingDirection,
    letter: String,
    split_positions: Vec<i32>,
    cache: RefCell<ShapeCache>,
}

impl PixelShape {
    /// Create a shape covering the inclusive window `left..=right`,
    /// `top..=bottom` of `source`
    ///
    /// The mean line defaults to the top row and the base line to the
    /// bottom row.
    pub fn new(source: Arc<dyn PixelSource>, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            id: 0,
            source,
            left,
            top,
            right,
            bottom,
            mean_line: 0,
            base_line: bottom - top,
            black_threshold: DEFAULT_BLACK_THRESHOLD,
            direction: ReadingDirection::default(),
            letter: String::new(),
            split_positions: Vec::new(),
            cache: RefCell::new(ShapeCache::default()),
        }
    }

    /// Create a shape covering the whole of `source`
    pub fn whole(source: Arc<dyn PixelSource>) -> Self {
        let right = source.width() as i32 - 1;
        let bottom = source.height() as i32 - 1;
        Self::new(source, 0, 0, right, bottom)
    }

    /// Set the persistent id
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Set the mean line and base line, relative to the shape's top
    pub fn with_lines(mut self, mean_line: i32, base_line: i32) -> Self {
        self.mean_line = mean_line;
        self.base_line = base_line;
        self.cache.get_mut().clear();
        self
    }

    /// Set the default black threshold
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.black_threshold = threshold;
        self
    }

    /// Set the reading direction
    pub fn with_direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self.cache.get_mut().clear();
        self
    }

    /// Set the annotated letter
    ///
    /// Letters split across two shapes are annotated `"|x"` on the first
    /// fragment and `"x|"` on the last; middle fragments are empty.
    pub fn with_letter(mut self, letter: impl Into<String>) -> Self {
        self.letter = letter.into();
        self
    }

    /// Set the ground-truth split positions (x offsets from the left edge)
    pub fn with_split_positions(mut self, positions: Vec<i32>) -> Self {
        self.split_positions = positions;
        self
    }

    /// Move the shape to a new window, dropping every cached result
    pub fn set_bounds(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        self.left = left;
        self.top = top;
        self.right = right;
        self.bottom = bottom;
        self.cache.get_mut().clear();
    }

    /// Persistent id, 0 if the shape was never saved
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Leftmost column, inclusive
    pub fn left(&self) -> i32 {
        self.left
    }

    /// Top row, inclusive
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Rightmost column, inclusive
    pub fn right(&self) -> i32 {
        self.right
    }

    /// Bottom row, inclusive
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Width in pixels (may be zero or negative for degenerate shapes)
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Height in pixels (may be zero or negative for degenerate shapes)
    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    /// True if the shape covers no pixels
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Bounding rectangle in source coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_inclusive(self.left, self.top, self.right, self.bottom)
    }

    /// Mean line, relative to the shape's top
    pub fn mean_line(&self) -> i32 {
        self.mean_line
    }

    /// Base line, relative to the shape's top
    pub fn base_line(&self) -> i32 {
        self.base_line
    }

    /// Distance from mean line to base line
    pub fn x_height(&self) -> i32 {
        self.base_line - self.mean_line
    }

    /// Default black threshold for this shape
    pub fn black_threshold(&self) -> u8 {
        self.black_threshold
    }

    /// Reading direction
    pub fn direction(&self) -> ReadingDirection {
        self.direction
    }

    /// Annotated letter, empty if none
    pub fn letter(&self) -> &str {
        &self.letter
    }

    /// Ground-truth split positions
    pub fn split_positions(&self) -> &[i32] {
        &self.split_positions
    }

    /// The underlying pixel source
    pub fn source(&self) -> &Arc<dyn PixelSource> {
        &self.source
    }

    /// True if both shapes cover the same window of the same source
    pub fn same_geometry(&self, other: &PixelShape) -> bool {
        Arc::ptr_eq(&self.source, &other.source) && self.rect() == other.rect()
    }

    /// Brightness at shape-relative `(x, y)`; white outside the shape
    #[inline]
    pub fn brightness(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            WHITE
        } else {
            self.source.brightness(self.left + x, self.top + y)
        }
    }

    /// True if the pixel at shape-relative `(x, y)` is at or below `threshold`
    ///
    /// Pixels outside the shape are never black.
    #[inline]
    pub fn is_black(&self, x: i32, y: i32, threshold: u8) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height() && self.brightness(x, y) <= threshold
    }

    /// Like [`is_black`](Self::is_black), but with small interior white
    /// gaps of up to `fill_factor` pixels treated as black
    pub fn is_black_with_fill(&self, x: i32, y: i32, threshold: u8, fill_factor: usize) -> bool {
        if fill_factor == 0 {
            return self.is_black(x, y, threshold);
        }
        self.black_and_white_bits(threshold, fill_factor).get(x, y)
    }

    /// True if the shape contains at most two distinct brightness levels
    pub fn is_black_and_white(&self) -> bool {
        if let Some(bw) = self.cache.borrow().black_and_white {
            return bw;
        }
        let mut seen = [false; 256];
        let mut levels = 0;
        'scan: for y in 0..self.height() {
            for x in 0..self.width() {
                let b = self.brightness(x, y) as usize;
                if !seen[b] {
                    seen[b] = true;
                    levels += 1;
                    if levels > 2 {
                        break 'scan;
                    }
                }
            }
        }
        let bw = levels <= 2;
        self.cache.borrow_mut().black_and_white = Some(bw);
        bw
    }

    /// Black/white bitset of the shape, row-major
    ///
    /// With a non-zero `fill_factor`, interior white holes of at most that
    /// many pixels are filled, but only for shapes that are already
    /// black-and-white: greyscale shapes keep their raw threshold.
    pub fn black_and_white_bits(&self, threshold: u8, fill_factor: usize) -> Rc<BitGrid> {
        let key = (threshold, fill_factor);
        if let Some(bits) = self.cache.borrow().bits.get(&key) {
            return Rc::clone(bits);
        }

        let bits = if fill_factor > 0 && self.is_black_and_white() {
            let raw = self.black_and_white_bits(threshold, 0);
            Rc::new(HoleFiller::new(fill_factor).fill(&raw))
        } else if fill_factor > 0 {
            self.black_and_white_bits(threshold, 0)
        } else {
            Rc::new(BitGrid::from_fn(
                self.width().max(0) as u32,
                self.height().max(0) as u32,
                |x, y| self.is_black(x, y, threshold),
            ))
        };
        self.cache.borrow_mut().bits.insert(key, Rc::clone(&bits));
        bits
    }

    /// Outline bitset: black pixels with at least one non-black 4-neighbour
    pub fn outline(&self, threshold: u8) -> Rc<BitGrid> {
        if let Some(outline) = self.cache.borrow().outlines.get(&threshold) {
            return Rc::clone(outline);
        }
        let black = self.black_and_white_bits(threshold, 0);
        let outline = Rc::new(trace_outline(&black));
        self.cache
            .borrow_mut()
            .outlines
            .insert(threshold, Rc::clone(&outline));
        outline
    }

    /// Top and bottom black row per column at the shape's own threshold
    pub fn vertical_contour(&self) -> Rc<VerticalContour> {
        let threshold = self.black_threshold;
        if let Some(contour) = self.cache.borrow().contours.get(&threshold) {
            return Rc::clone(contour);
        }
        let height = self.height();
        let spans = (0..self.width().max(0))
            .map(|x| {
                let top = (0..height).find(|&y| self.is_black(x, y, threshold));
                let bottom = (0..height).rev().find(|&y| self.is_black(x, y, threshold));
                (top.unwrap_or(0), bottom.unwrap_or(0))
            })
            .collect();
        let contour = Rc::new(VerticalContour { spans });
        self.cache
            .borrow_mut()
            .contours
            .insert(threshold, Rc::clone(&contour));
        contour
    }

    /// Ink (255 minus brightness) summed over each column
    pub fn vertical_counts(&self) -> Vec<u32> {
        (0..self.width().max(0))
            .map(|x| {
                (0..self.height())
                    .map(|y| (WHITE - self.brightness(x, y)) as u32)
                    .sum()
            })
            .collect()
    }

    /// Ink per grid section, normalised by `method`
    ///
    /// All four normalisations are computed and cached together, so asking
    /// for a second method on the same layout is free.
    pub fn brightness_by_section(&self, layout: SectionLayout, method: BrightnessMethod) -> SectionGrid {
        let key = layout.key();
        if let Some(sections) = self.cache.borrow().sections.get(&key) {
            return sections.get(method).clone();
        }
        let sections = Rc::new(brightness::compute(self, &layout));
        let grid = sections.get(method).clone();
        self.cache.borrow_mut().sections.insert(key, sections);
        grid
    }

    /// Cached feature value, computing and storing it on first request
    pub fn feature_value(&self, key: &FeatureKey, compute: impl FnOnce(&PixelShape) -> f64) -> f64 {
        if let Some(value) = self.cache.borrow().feature(key) {
            return value;
        }
        let value = compute(self);
        self.cache.borrow_mut().features.insert(key.clone(), value);
        value
    }

    /// Read-only view of the cache
    pub fn cache(&self) -> Ref<'_, ShapeCache> {
        self.cache.borrow()
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Columns `start..=end` (shape-relative) as a new, unsaved shape
    ///
    /// Returns `None` when the range is empty or leaves the shape.
    pub fn sub_shape(&self, start: i32, end: i32) -> Option<PixelShape> {
        if start < 0 || end < start || end >= self.width() {
            return None;
        }
        let mut child = PixelShape::new(
            Arc::clone(&self.source),
            self.left + start,
            self.top,
            self.left + end,
            self.bottom,
        );
        child.mean_line = self.mean_line;
        child.base_line = self.base_line;
        child.black_threshold = self.black_threshold;
        child.direction = self.direction;
        Some(child)
    }

    /// Smallest unsaved shape covering both `first` and `second`
    ///
    /// Text metrics are taken from `first` and re-expressed relative to the
    /// merged shape's top.
    pub fn union(first: &PixelShape, second: &PixelShape) -> PixelShape {
        let rect = first.rect().union(&second.rect());
        let mut merged = PixelShape::new(
            Arc::clone(&first.source),
            rect.x,
            rect.y,
            rect.right() - 1,
            rect.bottom() - 1,
        );
        merged.mean_line = first.top + first.mean_line - rect.y;
        merged.base_line = first.top + first.base_line - rect.y;
        merged.black_threshold = first.black_threshold;
        merged.direction = first.direction;
        merged
    }
}

impl Clone for PixelShape {
    /// Clones geometry and annotations; the clone starts with an empty cache
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            source: Arc::clone(&self.source),
            left: self.left,
            top: self.top,
            right: self.right,
            bottom: self.bottom,
            mean_line: self.mean_line,
            base_line: self.base_line,
            black_threshold: self.black_threshold,
            direction: self.direction,
            letter: self.letter.clone(),
            split_positions: self.split_positions.clone(),
            cache: RefCell::new(ShapeCache::default()),
        }
    }
}

impl fmt::Debug for PixelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelShape")
            .field("id", &self.id)
            .field("left", &self.left)
            .field("top", &self.top)
            .field("right", &self.right)
            .field("bottom", &self.bottom)
            .field("mean_line", &self.mean_line)
            .field("base_line", &self.base_line)
            .field("letter", &self.letter)
            .finish()
    }
}

impl fmt::Display for PixelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shape[{}]({},{})-({},{})",
            self.id, self.left, self.top, self.right, self.bottom
        )
    }
}
