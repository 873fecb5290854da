//! Display formatting for cached cell values.
//!
//! Number format codes are a mini-language; we support the common subset:
//! `General`, fixed decimals (`0.00`), thousands separators (`#,##0`),
//! percentages, scientific notation, a leading currency symbol, the text
//! placeholder `@` and up to four `positive;negative;zero;text` sections with
//! `[Red]`-style color tags. Unknown codes fall back to `General`.

use crate::types::CellValue;

/// Result of formatting a value, including optional color
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedValue {
    pub text: String,
    /// Color from a `[Color]` tag, as `#RRGGBB`
    pub color: Option<&'static str>,
}

impl FormattedValue {
    fn plain(text: String) -> Self {
        Self { text, color: None }
    }
}

/// Format a cached value for display.
pub fn format_value(value: &CellValue, format_code: Option<&str>) -> FormattedValue {
    match value {
        CellValue::Number(n) => format_number(*n, format_code.unwrap_or("General")),
        CellValue::Str(s) => format_text(s, format_code),
        CellValue::Bool(b) => FormattedValue::plain(if *b { "TRUE" } else { "FALSE" }.to_string()),
        CellValue::Error(e) => FormattedValue::plain(e.clone()),
        CellValue::Empty => FormattedValue::plain(String::new()),
    }
}

/// Format a number with a format code.
pub fn format_number(value: f64, format_code: &str) -> FormattedValue {
    if !value.is_finite() {
        return FormattedValue::plain("#NUM!".to_string());
    }
    let sections: Vec<&str> = format_code.split(';').collect();
    // Negative section formats the absolute value; the sign is in the literal.
    let (section, shown) = match (sections.as_slice(), value) {
        ([_, neg, ..], v) if v < 0.0 => (*neg, -v),
        ([_, _, zero, ..], v) if v == 0.0 => (*zero, v),
        ([pos, ..], v) => (*pos, v),
        ([], v) => ("General", v),
    };
    let (color, code) = split_color(section);
    FormattedValue {
        text: format_section(shown, code),
        color,
    }
}

fn format_text(text: &str, format_code: Option<&str>) -> FormattedValue {
    let Some(code) = format_code else {
        return FormattedValue::plain(text.to_string());
    };
    let section = code.split(';').nth(3).unwrap_or(code);
    if !section.contains('@') {
        return FormattedValue::plain(text.to_string());
    }
    let (color, section) = split_color(section);
    FormattedValue {
        text: strip_literals(section).replace('@', text),
        color,
    }
}

/// Pull a leading `[Color]` tag off a section.
fn split_color(section: &str) -> (Option<&'static str>, &str) {
    let trimmed = section.trim();
    let Some(rest) = trimmed.strip_prefix('[') else {
        return (None, trimmed);
    };
    let Some(end) = rest.find(']') else {
        return (None, trimmed);
    };
    let name = rest.get(..end).unwrap_or_default();
    let color = match name.to_ascii_lowercase().as_str() {
        "red" => "#FF0000",
        "blue" => "#0000FF",
        "green" => "#00FF00",
        "black" => "#000000",
        "white" => "#FFFFFF",
        "yellow" => "#FFFF00",
        "magenta" => "#FF00FF",
        "cyan" => "#00FFFF",
        _ => return (None, trimmed),
    };
    (Some(color), rest.get(end + 1..).unwrap_or_default())
}

/// Remove quoting and escapes used for literal text in format codes.
fn strip_literals(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {}
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn format_section(value: f64, code: &str) -> String {
    let code = code.trim();
    if code.is_empty() || code.eq_ignore_ascii_case("General") || code == "@" {
        return format_general(value);
    }
    let upper = code.to_ascii_uppercase();
    if upper.contains("E+") || upper.contains("E-") {
        return format_scientific(value, code);
    }

    let percent = code.contains('%');
    let shown = if percent { value * 100.0 } else { value };
    let decimals = code
        .find('.')
        .and_then(|pos| code.get(pos..))
        .map_or(0, |frac| frac.chars().filter(|c| *c == '0' || *c == '#').count());
    let digits = if code.contains(',') {
        format_with_thousands(shown, decimals)
    } else {
        format!("{:.prec$}", shown, prec = decimals.min(10))
    };

    // Keep literal prefix/suffix text around the digit placeholders.
    let literal = strip_literals(code);
    let is_placeholder = |c: char| matches!(c, '0' | '#' | '?' | ',' | '.');
    let first = literal.find(is_placeholder);
    let last = literal.rfind(is_placeholder);
    match (first, last) {
        (Some(first), Some(last)) => {
            let prefix = literal.get(..first).unwrap_or_default();
            let suffix = literal.get(last + 1..).unwrap_or_default();
            format!("{prefix}{digits}{suffix}")
        }
        _ => digits,
    }
}

/// General format: integers as-is, otherwise up to 10 significant decimals,
/// scientific for very large or very small magnitudes.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn format_general(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e11 {
        format!("{}", value as i64)
    } else if value.abs() >= 1e11 || value.abs() < 1e-4 {
        format!("{value:.5E}")
    } else {
        let s = format!("{value:.10}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Scientific notation, e.g. `0.00E+00`.
fn format_scientific(value: f64, code: &str) -> String {
    let mantissa = code
        .to_ascii_uppercase()
        .split('E')
        .next()
        .unwrap_or_default()
        .to_string();
    let decimals = mantissa
        .find('.')
        .map_or(0, |pos| mantissa.len().saturating_sub(pos + 1));
    let raw = format!("{:.prec$E}", value, prec = decimals.min(10));
    // Rust prints `1.5E3`; spreadsheets print `1.5E+03`.
    match raw.split_once('E') {
        Some((m, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{m}E{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Number with `,` thousands separators.
fn format_with_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals.min(10));
    let (int_part, dec_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(dec) = dec_part {
        grouped.push('.');
        grouped.push_str(dec);
    }
    if value < 0.0 && grouped.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(42.0, "General", "42" ; "integer")]
    #[test_case(0.5, "General", "0.5" ; "fraction")]
    #[test_case(1234.5, "0.00", "1234.50" ; "fixed decimals")]
    #[test_case(1234567.0, "#,##0", "1,234,567" ; "thousands")]
    #[test_case(-1234.5, "#,##0.00", "-1,234.50" ; "negative thousands")]
    #[test_case(0.256, "0.0%", "25.6%" ; "percent")]
    #[test_case(1500.0, "0.00E+00", "1.50E+03" ; "scientific")]
    #[test_case(12.0, "$#,##0", "$12" ; "currency prefix")]
    #[test_case(-5.0, "0;(0)", "(5)" ; "negative section")]
    #[test_case(0.0, "0;-0;\"zero\"", "zero" ; "zero section")]
    fn test_format_number(value: f64, code: &str, expected: &str) {
        assert_eq!(format_number(value, code).text, expected);
    }

    #[test]
    fn test_color_section() {
        let f = format_number(-3.0, "0;[Red]0");
        assert_eq!(f.text, "3");
        assert_eq!(f.color, Some("#FF0000"));
    }

    #[test]
    fn test_format_value_kinds() {
        assert_eq!(format_value(&CellValue::Bool(true), None).text, "TRUE");
        assert_eq!(
            format_value(&CellValue::Error("#DIV/0!".to_string()), None).text,
            "#DIV/0!"
        );
        assert_eq!(format_value(&CellValue::Empty, None).text, "");
        assert_eq!(
            format_value(&CellValue::Str("x".to_string()), Some("\"id-\"@")).text,
            "id-x"
        );
    }
}
