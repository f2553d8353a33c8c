//! Vectorization regression test
//!
//! Line walks over the reference 8x8 glyph fragment: traces, follows,
//! runs to the shape edge, longest lines, enclosing rectangles and
//! segment combining.

use std::sync::Arc;

use glyphseg_core::BitGrid;
use glyphseg_test::{RegParams, bits_from_rows, shape_from_rows};
use glyphseg_vector::{LineDefinition, LineSegment, Vectorizer, VectorizerOptions};

const THRESHOLD: u8 = 100;

const PATTERN: [&str; 8] = [
    "01100111", "01110111", "00110011", "00110110", "00011110", "00011100", "00111000",
    "11111000",
];

fn def(sector: usize, steps: &[u32]) -> Arc<LineDefinition> {
    Arc::new(LineDefinition::new(sector, 0, steps.to_vec()).unwrap())
}

fn points(grid: &BitGrid) -> Vec<(i32, i32)> {
    grid.iter_ones().collect()
}

// ============================================================================
// Line definitions
// ============================================================================

#[test]
fn vectorize_reg_trace() {
    let mut rp = RegParams::new("vectorize_trace");

    let line = def(0, &[2, 3]);
    let mut grid = BitGrid::new(8, 8);
    line.trace(&mut grid, 5, 2, 8, 0);
    let expected = [(4, 2), (5, 2), (1, 3), (2, 3), (3, 3), (0, 4)];
    let actual = points(&grid);
    rp.compare_strings(
        format!("{:?}", expected).as_bytes(),
        format!("{:?}", actual).as_bytes(),
    );

    // rotated a quarter turn: mostly downwards, drifting right
    let mut grid = BitGrid::new(8, 8);
    line.trace(&mut grid, 1, 1, 4, 2);
    let expected = [(1, 1), (1, 2), (2, 3), (2, 4), (2, 5)];
    let actual = points(&grid);
    rp.compare_strings(
        format!("{:?}", expected).as_bytes(),
        format!("{:?}", actual).as_bytes(),
    );

    assert!(rp.cleanup());
}

#[test]
fn vectorize_reg_follow() {
    let mut rp = RegParams::new("vectorize_follow");

    let line = def(0, &[2, 3]);
    let (x, y) = line.follow(5, 2, 4, 0);
    rp.compare_values(1.0, x as f64, 0.0);
    rp.compare_values(3.0, y as f64, 0.0);

    let shape = shape_from_rows(&PATTERN).unwrap();
    let end = line.follow_in_shape(&shape, 5, 5, 0, THRESHOLD, 0);
    rp.compare_values(2.0, end.x as f64, 0.0);
    rp.compare_values(6.0, end.y as f64, 0.0);
    rp.compare_values(3.0, end.length as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn vectorize_reg_thickness() {
    let mut rp = RegParams::new("vectorize_thickness");

    // a horizontal bar three pixels thick
    let shape = shape_from_rows(&[
        "0000000000",
        "1111111111",
        "1111111111",
        "1111111111",
        "0000000000",
    ])
    .unwrap();
    let line = def(0, &[0]);
    let thickness = line.find_thickness(&shape, 9, 2, 6, THRESHOLD, 0, 2);
    rp.compare_values(3.0, thickness.len() as f64, 0.0);
    for t in thickness {
        rp.compare_values(2.0, t as f64, 0.0);
    }

    assert!(rp.cleanup());
}

// ============================================================================
// Vectorizer
// ============================================================================

#[test]
fn vectorize_reg_lines_to_edge() {
    let mut rp = RegParams::new("vectorize_lines_to_edge");

    let shape = shape_from_rows(&PATTERN).unwrap();
    let vectorizer =
        Vectorizer::new(VectorizerOptions::default().with_white_gap_fill_factor(5)).unwrap();
    let lines = vectorizer.get_lines_to_edge(&shape, 2, 2, THRESHOLD);
    rp.compare_values(6.0, lines.len() as f64, 0.0);

    // catalog order: the first run found ends just below the start, the
    // longest one runs down and to the right
    rp.compare_values(7.0, lines[0].definition().index() as f64, 0.0);
    rp.compare_values(5.0, lines[1].length() as f64, 0.0);
    rp.compare_values(4.0, lines[1].end_x() as f64, 0.0);
    rp.compare_values(7.0, lines[1].end_y() as f64, 0.0);
    for line in &lines {
        rp.compare_values(2.0, line.start_x() as f64, 0.0);
        rp.compare_values(2.0, line.start_y() as f64, 0.0);
    }

    assert!(rp.cleanup());
}

#[test]
fn vectorize_reg_longest_lines() {
    let mut rp = RegParams::new("vectorize_longest_lines");

    let shape = shape_from_rows(&PATTERN).unwrap();
    let vectorizer =
        Vectorizer::new(VectorizerOptions::default().with_white_gap_fill_factor(5)).unwrap();
    let outline = shape.outline(THRESHOLD);

    let lines = vectorizer.get_longest_lines(&shape, &outline, 60, THRESHOLD);
    rp.compare_values(60.0, lines.len() as f64, 0.0);
    for pair in lines.windows(2) {
        rp.compare_values(1.0, (pair[0].length() >= pair[1].length()) as u8 as f64, 0.0);
    }

    // every distinct run, each counted once whichever end it was found from
    let all = vectorizer.get_longest_lines(&shape, &outline, 1000, THRESHOLD);
    rp.compare_values(150.0, all.len() as f64, 0.0);
    let reversed = all.iter().enumerate().any(|(i, a)| {
        all[i + 1..].iter().any(|b| a.is_same_line(b))
    });
    rp.compare_values(0.0, reversed as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn vectorize_reg_vectorize() {
    let mut rp = RegParams::new("vectorize_full");

    // with a tolerance of three pixels, the longest run absorbs every
    // other line of such a small shape
    let shape = shape_from_rows(&PATTERN).unwrap();
    let lines = Vectorizer::default().vectorize(&shape);
    rp.compare_values(1.0, lines.len() as f64, 0.0);
    rp.compare_values(7.0, lines[0].length() as f64, 0.0);
    rp.compare_values(1.0, lines[0].start_x() as f64, 0.0);
    rp.compare_values(0.0, lines[0].start_y() as f64, 0.0);
    rp.compare_values(4.0, lines[0].end_x() as f64, 0.0);
    rp.compare_values(7.0, lines[0].end_y() as f64, 0.0);

    let none = Vectorizer::default().combine_segments(Vec::new());
    rp.compare_values(0.0, none.len() as f64, 0.0);

    assert!(rp.cleanup());
}

// ============================================================================
// Enclosing rectangles
// ============================================================================

#[test]
fn vectorize_reg_enclosing_rectangle() {
    let mut rp = RegParams::new("vectorize_enclosing_rectangle");

    let shallow = LineSegment::new(def(0, &[2, 3]), (5, 2), (1, 3), 4, (8, 8));
    let expected = bits_from_rows(&[
        "00000000", "00001100", "01111100", "01111100", "01110000", "00000000", "00000000",
        "00000000",
    ])
    .unwrap();
    let rect = shallow.enclosing_rectangle(1);
    rp.compare_bits(&expected, &rect);
    rp.compare_values(15.0, rect.count_ones() as f64, 0.0);

    let diagonal = LineSegment::new(def(0, &[1, 2]), (5, 2), (1, 5), 4, (8, 8));
    let expected = bits_from_rows(&[
        "00000000", "00000100", "00011100", "00111100", "01111000", "01100000", "01000000",
        "00000000",
    ])
    .unwrap();
    let rect = diagonal.enclosing_rectangle(1);
    rp.compare_bits(&expected, &rect);
    rp.compare_values(15.0, rect.count_ones() as f64, 0.0);

    // steep sectors take their parallels to the left and right
    let steep = LineSegment::new(def(1, &[2]), (5, 2), (3, 6), 4, (8, 8));
    let expected = bits_from_rows(&[
        "00000000", "00000000", "00001110", "00011100", "00011100", "00111000", "00111000",
        "00000000",
    ])
    .unwrap();
    let rect = steep.enclosing_rectangle(1);
    rp.compare_bits(&expected, &rect);
    rp.compare_values(15.0, rect.count_ones() as f64, 0.0);

    let expected = bits_from_rows(&[
        "00000000", "00000000", "00001100", "00011100", "00010000", "00000000", "00000000",
        "00000000",
    ])
    .unwrap();
    let shared = shallow.enclosing_rectangle_intersection(&steep, 1);
    rp.compare_bits(&expected, &shared);

    assert!(rp.cleanup());
}
