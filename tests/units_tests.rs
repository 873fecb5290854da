//! Coordinate and unit conversion tests
//!
//! Column letters are bijective base-26 (`A`..`Z`, `AA`..), rows are
//! 1-based on screen and 0-based everywhere else.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use sheetview::cell_ref::{
    col_to_letter, format_a1, format_range_a1, parse_a1_notation, to_a1_notation,
    to_zero_based_notation, A1Ref,
};
use sheetview::units::{pt_to_px, px_to_pt, CSS_PPI};
use sheetview::{CellRange, SheetViewError};
use test_case::test_case;

// ============================================================================
// COLUMN LETTERS
// ============================================================================

#[test]
fn test_column_round_trip() {
    for col in 0..10_000u32 {
        let letters = col_to_letter(col);
        assert_eq!(to_zero_based_notation(&letters).unwrap(), col, "{letters}");
    }
}

#[test_case(0, "A" ; "first")]
#[test_case(25, "Z" ; "last single")]
#[test_case(26, "AA" ; "first double")]
#[test_case(51, "AZ" ; "carry")]
#[test_case(701, "ZZ" ; "last double")]
#[test_case(702, "AAA" ; "first triple")]
#[test_case(16_383, "XFD" ; "last excel column")]
fn test_column_boundaries(col: i64, letters: &str) {
    assert_eq!(to_a1_notation(col).unwrap(), letters);
    assert_eq!(i64::from(to_zero_based_notation(letters).unwrap()), col);
}

#[test]
fn test_letters_are_case_insensitive() {
    assert_eq!(to_zero_based_notation("aa").unwrap(), 26);
    assert_eq!(to_zero_based_notation("xFd").unwrap(), 16_383);
}

#[test_case("" ; "empty")]
#[test_case("A1" ; "digits")]
#[test_case("A-" ; "punctuation")]
#[test_case("ZZZZZZZZ" ; "overflow")]
fn test_bad_letters_rejected(letters: &str) {
    assert!(matches!(
        to_zero_based_notation(letters),
        Err(SheetViewError::InvalidArgument(_))
    ));
}

#[test]
fn test_negative_column_rejected() {
    assert!(to_a1_notation(-1).is_err());
}

// ============================================================================
// A1 PARSING
// ============================================================================

fn a1(col_start: u32, row_start: u32, end: Option<(u32, u32)>) -> A1Ref {
    A1Ref {
        col_start,
        row_start,
        col_end: end.map(|(c, _)| c),
        row_end: end.map(|(_, r)| r),
    }
}

#[test_case("A1", a1(0, 0, None) ; "single cell")]
#[test_case("c7", a1(2, 6, None) ; "lowercase")]
#[test_case("$B$2", a1(1, 1, None) ; "absolute markers")]
#[test_case(" D4 ", a1(3, 3, None) ; "surrounding whitespace")]
#[test_case("A1:B2", a1(0, 0, Some((1, 1))) ; "range")]
#[test_case("AA10:AB20", a1(26, 9, Some((27, 19))) ; "double letter range")]
fn test_parse_a1(input: &str, expected: A1Ref) {
    assert_eq!(parse_a1_notation(input), Some(expected));
}

#[test_case("" ; "empty")]
#[test_case("A" ; "letters only")]
#[test_case("1" ; "digits only")]
#[test_case("1A" ; "digits first")]
#[test_case("A0" ; "row zero")]
#[test_case("A-1" ; "negative row")]
#[test_case("A1:" ; "missing end")]
#[test_case(":B2" ; "missing start")]
#[test_case("A1:B2:C3" ; "three parts")]
fn test_parse_a1_no_match(input: &str) {
    assert_eq!(parse_a1_notation(input), None);
}

#[test]
fn test_reversed_range_normalizes() {
    let range = parse_a1_notation("C5:A1").unwrap().to_range();
    assert_eq!(range, CellRange::new(0, 0, 4, 2));
}

#[test]
fn test_format_round_trip() {
    assert_eq!(format_a1(2, 1), "B3");
    let range = CellRange::new(0, 0, 9, 27);
    let text = format_range_a1(&range);
    assert_eq!(text, "A1:AB10");
    assert_eq!(parse_a1_notation(&text).unwrap().to_range(), range);
    assert_eq!(format_range_a1(&CellRange::point(4, 4)), "E5");
}

// ============================================================================
// RANGES
// ============================================================================

#[test]
fn test_cover_is_reflexive_and_antisymmetric() {
    let ranges = [
        CellRange::new(0, 0, 0, 0),
        CellRange::new(0, 0, 4, 4),
        CellRange::new(1, 1, 3, 3),
        CellRange::new(2, 0, 2, 9),
    ];
    for a in &ranges {
        assert!(a.cover(a));
        for b in &ranges {
            if a.cover(b) && b.cover(a) {
                assert_eq!(a, b);
            }
        }
    }
    assert!(ranges[1].cover(&ranges[2]));
    assert!(!ranges[2].cover(&ranges[1]));
}

// ============================================================================
// POINTS AND PIXELS
// ============================================================================

#[test_case(15.0 => 20.0 ; "default row")]
#[test_case(48.0 => 64.0 ; "default column")]
#[test_case(0.0 => 0.0 ; "zero")]
fn test_pt_to_px(pt: f64) -> f64 {
    pt_to_px(pt)
}

#[test]
fn test_px_to_pt_inverts_at_css_ppi() {
    for pt in [1.0, 7.5, 11.0, 15.0, 409.5] {
        assert!((px_to_pt(pt_to_px(pt), CSS_PPI) - pt).abs() < 1e-9);
    }
    assert_eq!(px_to_pt(20.0, 192.0), 7.5);
}
