//! Utilities for converting between A1-style references and 0-based indices.
//!
//! Column letters use bijective base-26: there is no zero digit, so
//! `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`.

use crate::error::{Result, SheetViewError};
use crate::types::CellRange;

/// A parsed `A1` or `A1:B2` reference. All indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct A1Ref {
    pub col_start: u32,
    pub row_start: u32,
    pub col_end: Option<u32>,
    pub row_end: Option<u32>,
}

impl A1Ref {
    /// Logical range covered by this reference (single cell when there is no end part).
    pub fn to_range(self) -> CellRange {
        let end_row = self.row_end.unwrap_or(self.row_start);
        let end_col = self.col_end.unwrap_or(self.col_start);
        CellRange::new(
            self.row_start.min(end_row),
            self.col_start.min(end_col),
            self.row_start.max(end_row),
            self.col_start.max(end_col),
        )
    }
}

/// Convert a 0-based column index to column letters.
///
/// # Errors
/// Returns `InvalidArgument` for negative indices.
pub fn to_a1_notation(col: i64) -> Result<String> {
    if col < 0 {
        return Err(SheetViewError::invalid(format!(
            "column index must be non-negative, got {col}"
        )));
    }
    let mut letters = Vec::new();
    let mut n = col;
    while n >= 0 {
        // n % 26 is in 0..26 here
        let digit = u8::try_from(n % 26).unwrap_or(0);
        letters.push(char::from(b'A' + digit));
        n = n / 26 - 1;
    }
    Ok(letters.iter().rev().collect())
}

/// Infallible variant of [`to_a1_notation`] for indices that are already unsigned.
pub fn col_to_letter(col: u32) -> String {
    to_a1_notation(i64::from(col)).unwrap_or_default()
}

/// Convert a JS number to a column index, rejecting negatives and non-integers.
///
/// # Errors
/// Returns `InvalidArgument` if `value` is NaN, infinite, fractional or negative.
pub fn col_index_from_f64(value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SheetViewError::invalid(format!(
            "column index must be an integer, got {value}"
        )));
    }
    if value < 0.0 || value > f64::from(u32::MAX) {
        return Err(SheetViewError::invalid(format!(
            "column index out of range: {value}"
        )));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(value as i64)
}

/// Convert column letters (case-insensitive) back to a 0-based column index.
///
/// # Errors
/// Returns `InvalidArgument` if the string is empty, contains anything other
/// than ASCII letters, or does not fit in a `u32`.
pub fn to_zero_based_notation(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(SheetViewError::invalid("column letters must not be empty"));
    }
    let mut n: u64 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(SheetViewError::invalid(format!(
                "invalid column letters: {letters:?}"
            )));
        }
        let digit = u64::from(b.to_ascii_uppercase() - b'A') + 1;
        n = n
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .filter(|v| *v <= u64::from(u32::MAX))
            .ok_or_else(|| SheetViewError::invalid(format!("column out of range: {letters}")))?;
    }
    u32::try_from(n - 1).map_err(|_| SheetViewError::invalid(format!("column out of range: {letters}")))
}

/// Parse a single `A1`-style cell reference into (col, row), 0-indexed.
///
/// `$` absolute markers are accepted and ignored.
fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let s = cell_ref.strip_prefix('$').unwrap_or(cell_ref);
    let split = s.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, rest) = s.split_at(split);
    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let col = to_zero_based_notation(letters).ok()?;
    let row: u32 = digits.parse().ok()?;
    Some((col, row.checked_sub(1)?))
}

/// Parse `A1` or `A1:B2` notation.
///
/// Returns `None` for anything that is not well-formed A1 notation; this is
/// a "no match", not an error.
pub fn parse_a1_notation(input: &str) -> Option<A1Ref> {
    let input = input.trim();
    match input.split_once(':') {
        Some((start, end)) => {
            let (col_start, row_start) = parse_cell_ref(start)?;
            let (col_end, row_end) = parse_cell_ref(end)?;
            Some(A1Ref {
                col_start,
                row_start,
                col_end: Some(col_end),
                row_end: Some(row_end),
            })
        }
        None => {
            let (col_start, row_start) = parse_cell_ref(input)?;
            Some(A1Ref {
                col_start,
                row_start,
                col_end: None,
                row_end: None,
            })
        }
    }
}

/// Format a 0-based (row, col) pair as `B3`-style text.
pub fn format_a1(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}

/// Format a logical range as `A1` (single cell) or `A1:B2`.
pub fn format_range_a1(range: &CellRange) -> String {
    let start = format_a1(range.start_row, range.start_col);
    if range.start_row == range.end_row && range.start_col == range.end_col {
        start
    } else {
        format!("{start}:{}", format_a1(range.end_row, range.end_col))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(1), "B");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(27), "AB");
        assert_eq!(col_to_letter(51), "AZ");
        assert_eq!(col_to_letter(52), "BA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
    }

    #[test]
    fn test_negative_column_rejected() {
        assert!(matches!(
            to_a1_notation(-1),
            Err(SheetViewError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_col_index_from_f64() {
        assert_eq!(col_index_from_f64(3.0).unwrap(), 3);
        assert!(col_index_from_f64(1.5).is_err());
        assert!(col_index_from_f64(-2.0).is_err());
        assert!(col_index_from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_zero_based_rejects_garbage() {
        assert!(to_zero_based_notation("").is_err());
        assert!(to_zero_based_notation("A1").is_err());
        assert!(to_zero_based_notation("A-").is_err());
        assert!(to_zero_based_notation("ZZZZZZZZZZ").is_err());
    }

    #[test]
    fn test_parse_absolute_refs() {
        let parsed = parse_a1_notation("$B$3").unwrap();
        assert_eq!((parsed.col_start, parsed.row_start), (1, 2));
    }

    #[test]
    fn test_row_zero_is_malformed() {
        assert_eq!(parse_a1_notation("A0"), None);
        assert_eq!(parse_a1_notation("A1:"), None);
        assert_eq!(parse_a1_notation("1A"), None);
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range_a1(&CellRange::new(0, 0, 0, 0)), "A1");
        assert_eq!(format_range_a1(&CellRange::new(0, 0, 1, 1)), "A1:B2");
        assert_eq!(
            parse_a1_notation("B2:A1").unwrap().to_range(),
            CellRange::new(0, 0, 1, 1)
        );
    }
}
