//! Shape geometry regression test
//!
//! Covers black/white queries on shape windows, outline extraction,
//! vertical contour and counts, brightness grids and hole filling.

use std::sync::Arc;

use glyphseg_core::{
    BitGrid, BrightnessMethod, GrayBitmap, HoleFiller, PixelShape, PixelSource, ReadingDirection,
    SectionLayout,
};
use glyphseg_test::{RegParams, bitmap_from_rows, bits_from_rows, shape_from_rows};

const THRESHOLD: u8 = 100;

const PATTERN: [&str; 8] = [
    "01100111", "01110111", "00110011", "00110110", "00011110", "00011100", "00111000",
    "11111000",
];

/// Shape over a grayscale bitmap given row-major brightness values
fn gray_shape(width: u32, height: u32, data: Vec<u8>) -> PixelShape {
    let source: Arc<dyn PixelSource> = Arc::new(GrayBitmap::from_raw(width, height, data).unwrap());
    PixelShape::whole(source)
}

// ============================================================================
// Black/white queries
// ============================================================================

#[test]
fn shape_reg_window_offsets() {
    let mut rp = RegParams::new("shape_window");

    let rows = [
        "00000000", "01000000", "00010011", "00111001", "00011111", "01000000", "01100000",
        "00110000",
    ];
    let source: Arc<dyn PixelSource> = Arc::new(bitmap_from_rows(&rows).unwrap());
    let shape = PixelShape::new(Arc::clone(&source), 2, 2, 7, 4);

    rp.compare_values(6.0, shape.width() as f64, 0.0);
    rp.compare_values(3.0, shape.height() as f64, 0.0);
    for y in 0..shape.height() {
        for x in 0..shape.width() {
            let expected = source.brightness(x + 2, y + 2) == 0;
            rp.compare_values(
                expected as u8 as f64,
                shape.is_black(x, y, THRESHOLD) as u8 as f64,
                0.0,
            );
        }
    }
    // (0,0) of the bitmap is outside the window
    rp.compare_values(0.0, shape.is_black(-2, -1, THRESHOLD) as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

// ============================================================================
// Outline
// ============================================================================

#[test]
fn shape_reg_outline() {
    let mut rp = RegParams::new("shape_outline");

    let shape = shape_from_rows(&PATTERN).unwrap();
    let expected = bits_from_rows(&[
        "01100111", "01010101", "00110011", "00110110", "00011010", "00010100", "00101000",
        "11111000",
    ])
    .unwrap();
    let outline = shape.outline(THRESHOLD);
    rp.compare_bits(&expected, &outline);

    // second request is served from the cache
    let again = shape.outline(THRESHOLD);
    rp.compare_values(1.0, std::rc::Rc::ptr_eq(&outline, &again) as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

// ============================================================================
// Vertical contour and counts
// ============================================================================

#[test]
fn shape_reg_vertical_counts() {
    let mut rp = RegParams::new("shape_vertical_counts");

    let shape = shape_from_rows(&[
        "00000000", "01000000", "00010011", "00111001", "00011111", "01000000", "01100000",
        "00110000",
    ])
    .unwrap();
    let counts = shape.vertical_counts();
    let expected = [0, 3, 3, 4, 2, 1, 2, 3];
    rp.compare_values(8.0, counts.len() as f64, 0.0);
    for (e, a) in expected.iter().zip(&counts) {
        rp.compare_values((e * 255) as f64, *a as f64, 0.0);
    }

    let contour = shape.vertical_contour();
    rp.compare_values(0.0, contour.top(0) as f64, 0.0);
    rp.compare_values(0.0, contour.bottom(0) as f64, 0.0);
    rp.compare_values(1.0, contour.top(1) as f64, 0.0);
    rp.compare_values(6.0, contour.bottom(1) as f64, 0.0);
    rp.compare_values(2.0, contour.top(7) as f64, 0.0);
    rp.compare_values(4.0, contour.bottom(7) as f64, 0.0);

    assert!(rp.cleanup());
}

// ============================================================================
// Brightness by section
// ============================================================================

#[test]
fn shape_reg_brightness_margin_sections() {
    let mut rp = RegParams::new("shape_brightness_margin");

    // 5x7, brightness falling from 255 by one per pixel, with a black origin
    let mut data: Vec<u8> = (0..35).map(|i| (256 - i) as u8).collect();
    data[0] = 0;
    data[1] = 255;
    let shape = gray_shape(5, 7, data)
        .with_lines(1, 5)
        .with_direction(ReadingDirection::LeftToRight);

    let totals = shape.brightness_by_section(
        SectionLayout::MarginSections {
            columns: 5,
            rows: 5,
            margin_sections: 1,
            include_horizontal_margin: false,
        },
        BrightnessMethod::Raw,
    );
    rp.compare_values(5.0, totals.len() as f64, 0.0);
    rp.compare_values(7.0, totals[0].len() as f64, 0.0);
    rp.compare_values(255.0, totals[0][0], 0.0001);
    let mut expected = 0.0;
    for y in 0..7 {
        for (x, column) in totals.iter().enumerate() {
            if x != 0 || y != 0 {
                rp.compare_values(expected, column[y], 0.0001);
                expected += 1.0;
            }
        }
    }

    assert!(rp.cleanup());
}

#[test]
fn shape_reg_brightness_fractional_breaks() {
    let mut rp = RegParams::new("shape_brightness_fractional");

    let shape = gray_shape(6, 8, vec![245; 48])
        .with_lines(2, 4)
        .with_direction(ReadingDirection::LeftToRight);
    let layout = SectionLayout::MarginSections {
        columns: 4,
        rows: 4,
        margin_sections: 2,
        include_horizontal_margin: false,
    };

    let totals = shape.brightness_by_section(layout, BrightnessMethod::Raw);
    for column in &totals {
        for (y, value) in column.iter().enumerate() {
            let expected = if y < 2 {
                120.0 / 8.0
            } else if y > 5 {
                180.0 / 8.0
            } else {
                180.0 / 16.0
            };
            rp.compare_values(expected, *value, 0.1);
        }
    }

    let ratios = shape.brightness_by_section(layout, BrightnessMethod::SizeNormalised);
    for value in ratios.iter().flatten() {
        rp.compare_values(10.0, *value, 0.01);
    }

    let relative = shape.brightness_by_section(layout, BrightnessMethod::RelativeToMaxSection);
    for value in relative.iter().flatten() {
        rp.compare_values(1.0, *value, 0.001);
    }

    let portions = shape.brightness_by_section(layout, BrightnessMethod::PortionOfTotalBrightness);
    let sum: f64 = portions.iter().flatten().sum();
    rp.compare_values(1.0, sum, 0.0001);

    assert!(rp.cleanup());
}

#[test]
fn shape_reg_brightness_plain_grid() {
    let mut rp = RegParams::new("shape_brightness_plain");

    let shape = shape_from_rows(&["1100", "1100", "0000", "0011"]).unwrap();
    let totals = shape.brightness_by_section(
        SectionLayout::Plain {
            columns: 2,
            rows: 2,
        },
        BrightnessMethod::Raw,
    );
    rp.compare_values(4.0 * 255.0, totals[0][0], 0.0);
    rp.compare_values(0.0, totals[1][0], 0.0);
    rp.compare_values(0.0, totals[0][1], 0.0);
    rp.compare_values(2.0 * 255.0, totals[1][1], 0.0);

    let relative = shape.brightness_by_section(
        SectionLayout::Plain {
            columns: 2,
            rows: 2,
        },
        BrightnessMethod::RelativeToMaxSection,
    );
    rp.compare_values(1.0, relative[0][0], 1e-9);
    rp.compare_values(0.5, relative[1][1], 1e-9);

    assert!(rp.cleanup());
}

#[test]
fn shape_reg_brightness_x_height_margins() {
    let mut rp = RegParams::new("shape_brightness_xheight");

    // x-height (inclusive) of 4: mean line 2, base line 5
    let shape = gray_shape(4, 8, vec![0; 32]).with_lines(2, 5);
    let totals = shape.brightness_by_section(
        SectionLayout::XHeightMargins {
            columns: 2,
            rows: 2,
            top_bottom_margin: 0.0,
            horizontal_margin: 0.0,
        },
        BrightnessMethod::Raw,
    );
    // bands are rows 2..4 and 4..6; rows above the first band are counted
    // in it and rows below the last band are dropped
    for column in &totals {
        rp.compare_values(8.0 * 255.0, column[0], 1e-9);
        rp.compare_values(4.0 * 255.0, column[1], 1e-9);
    }

    assert!(rp.cleanup());
}

// ============================================================================
// Hole filling
// ============================================================================

#[test]
fn shape_reg_hole_filler_idempotent() {
    let mut rp = RegParams::new("shape_hole_filler");

    let bits = bits_from_rows(&[
        "0111111110",
        "0100110010",
        "0111111110",
        "0101000010",
        "0111111110",
        "0000000000",
    ])
    .unwrap();
    let filler = HoleFiller::new(3);
    let once = filler.fill(&bits);
    let twice = filler.fill(&once);
    rp.compare_bits(&once, &twice);

    // the two 2-pixel holes and the single-pixel hole are filled, the
    // 4-pixel hole stays open
    let expected = bits_from_rows(&[
        "0111111110",
        "0111111110",
        "0111111110",
        "0111000010",
        "0111111110",
        "0000000000",
    ])
    .unwrap();
    rp.compare_bits(&expected, &once);

    assert!(rp.cleanup());
}

#[test]
fn shape_reg_fill_factor_leaves_pattern_unchanged() {
    let mut rp = RegParams::new("shape_fill_pattern");

    // every white region of the 8x8 pattern touches the border
    let shape = shape_from_rows(&PATTERN).unwrap();
    let raw: BitGrid = (*shape.black_and_white_bits(THRESHOLD, 0)).clone();
    let filled = shape.black_and_white_bits(THRESHOLD, 5);
    rp.compare_bits(&raw, &filled);

    assert!(rp.cleanup());
}
