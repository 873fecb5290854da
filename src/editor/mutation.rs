//! Edit text classification.
//!
//! Turns what the user typed into the typed input the engine expects.

use crate::engine::CellInputValue;

/// Classify the text of a committed edit.
///
/// - Leading `=` (with something after it) → Formula
/// - "true"/"false" (case-insensitive) → Bool
/// - Parseable as a number, optionally with `,` grouping or a trailing `%`
///   → Number
/// - Otherwise (including empty) → Text, untrimmed
pub fn classify_input(text: &str) -> CellInputValue {
    let trimmed = text.trim();

    if trimmed.len() > 1 && trimmed.starts_with('=') {
        return CellInputValue::Formula(trimmed.to_string());
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return CellInputValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellInputValue::Bool(false);
    }
    if let Some(n) = parse_number(trimmed) {
        return CellInputValue::Number(n);
    }
    CellInputValue::Text(text.to_string())
}

fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let (body, divisor) = match text.strip_suffix('%') {
        Some(body) => (body.trim_end(), 100.0),
        None => (text, 1.0),
    };
    let plain = if body.contains(',') {
        if !valid_grouping(body) {
            return None;
        }
        body.replace(',', "")
    } else {
        body.to_string()
    };
    // Rust accepts "inf"/"NaN"; a spreadsheet does not.
    if !plain
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    let n: f64 = plain.parse().ok()?;
    n.is_finite().then_some(n / divisor)
}

/// `1,234,567.5` style grouping: groups of three after the first.
fn valid_grouping(text: &str) -> bool {
    let int_part = text.split('.').next().unwrap_or_default();
    let int_part = int_part.trim_start_matches(['-', '+']);
    let mut groups = int_part.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()));
    first_ok && groups.all(|g| g.len() == 3)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", CellInputValue::Number(42.0) ; "integer")]
    #[test_case(" -1.5 ", CellInputValue::Number(-1.5) ; "trimmed negative")]
    #[test_case("1,234", CellInputValue::Number(1234.0) ; "grouped")]
    #[test_case("50%", CellInputValue::Number(0.5) ; "percent")]
    #[test_case("1e3", CellInputValue::Number(1000.0) ; "exponent")]
    #[test_case("TRUE", CellInputValue::Bool(true) ; "bool upper")]
    #[test_case("false", CellInputValue::Bool(false) ; "bool lower")]
    #[test_case("=A1+1", CellInputValue::Formula("=A1+1".to_string()) ; "formula")]
    #[test_case("=", CellInputValue::Text("=".to_string()) ; "lone equals")]
    #[test_case("inf", CellInputValue::Text("inf".to_string()) ; "inf is text")]
    #[test_case("1,23", CellInputValue::Text("1,23".to_string()) ; "bad grouping")]
    #[test_case("", CellInputValue::Text(String::new()) ; "empty")]
    fn test_classify(input: &str, expected: CellInputValue) {
        assert_eq!(classify_input(input), expected);
    }
}
