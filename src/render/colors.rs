//! Color parsing and mixing for cell styles.
//!
//! Styles carry colors as the engine sends them: `#RRGGBB`, `#AARRGGBB`,
//! bare hex or CSS `rgb()`/`rgba()`. Everything is normalized to a CSS color
//! string the canvas accepts.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// RGB color with u8 components for color math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any supported color string, ignoring alpha.
    pub fn parse(s: &str) -> Option<Self> {
        let (r, g, b, _) = parse_color_rgba(s)?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Mix toward `other`; 0.0 keeps `self`, 1.0 gives `other`.
    pub fn mix(self, other: Self, factor: f64) -> Self {
        Self {
            r: Self::blend_component(self.r, other.r, factor),
            g: Self::blend_component(self.g, other.g, factor),
            b: Self::blend_component(self.b, other.b, factor),
        }
    }

    /// Clamped to [0, 255] before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        let blended = from + (to - from) * factor.clamp(0.0, 1.0);
        blended.clamp(0.0, 255.0).round() as u8
    }
}

/// Parse a color string and normalize it to CSS format.
///
/// Supports `#RRGGBB`, `#AARRGGBB` (alpha first), `RRGGBB`, `rgb(r, g, b)`
/// and `rgba(r, g, b, a)`.
pub fn parse_color(s: &str) -> Option<CssColor> {
    let s = s.trim();
    if s.starts_with("rgb") {
        let (r, g, b, a) = parse_color_rgba(s)?;
        return Some(css_from_rgba(r, g, b, a));
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    let (r, g, b, a) = parse_hex_rgba(hex)?;
    Some(css_from_rgba(r, g, b, a))
}

fn css_from_rgba(r: u8, g: u8, b: u8, a: f64) -> CssColor {
    if a >= 1.0 {
        Rgb::new(r, g, b).to_hex()
    } else {
        format!("rgba({r}, {g}, {b}, {a:.2})")
    }
}

/// Parse color and return RGBA components (0-255 for RGB, 0.0-1.0 for alpha)
pub fn parse_color_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        let mut parts = inner.split(',').map(str::trim);
        let r: u8 = parts.next()?.parse().ok()?;
        let g: u8 = parts.next()?.parse().ok()?;
        let b: u8 = parts.next()?.parse().ok()?;
        let a: f64 = parts.next()?.parse().ok()?;
        return parts.next().is_none().then_some((r, g, b, a.clamp(0.0, 1.0)));
    }
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let mut parts = inner.split(',').map(str::trim);
        let r: u8 = parts.next()?.parse().ok()?;
        let g: u8 = parts.next()?.parse().ok()?;
        let b: u8 = parts.next()?.parse().ok()?;
        return parts.next().is_none().then_some((r, g, b, 1.0));
    }
    parse_hex_rgba(s.strip_prefix('#').unwrap_or(s))
}

fn parse_hex_rgba(hex: &str) -> Option<(u8, u8, u8, f64)> {
    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some((byte(0..2)?, byte(2..4)?, byte(4..6)?, 1.0)),
        8 => {
            let a = byte(0..2)?;
            Some((byte(2..4)?, byte(4..6)?, byte(6..8)?, f64::from(a) / 255.0))
        }
        _ => None,
    }
}

/// Flat color standing in for a stipple pattern: `density` of the area in
/// `fg`, the rest in `bg`.
pub fn pattern_tone(fg: &str, bg: &str, density: f64) -> CssColor {
    let fg = Rgb::parse(fg).unwrap_or_default();
    let bg = Rgb::parse(bg).unwrap_or(Rgb::new(255, 255, 255));
    bg.mix(fg, density).to_hex()
}

/// Fixed colors used by the painter.
pub mod palette {
    pub const WHITE: &str = "#FFFFFF";
    pub const BLACK: &str = "#000000";
    /// Line under the frozen band
    pub const FROZEN_DIVIDER: &str = "#BABABA";
    /// Header text when the whole row/column is selected
    pub const HEADER_TEXT_SELECTED: &str = "#1A73E8";
    /// Guide line shown while dragging a row/column edge
    pub const RESIZE_GUIDE: &str = "#1A73E8";
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_color("#ff0000").unwrap(), "#FF0000");
        assert_eq!(parse_color("00FF00").unwrap(), "#00FF00");
    }

    #[test]
    fn test_parse_hex_8() {
        assert_eq!(parse_color("#FFFF0000").unwrap(), "#FF0000");
        assert!(parse_color("#80FF0000")
            .unwrap()
            .starts_with("rgba(255, 0, 0,"));
    }

    #[test]
    fn test_parse_rgb_forms() {
        assert_eq!(parse_color("rgb(255, 128, 64)").unwrap(), "#FF8040");
        let (r, g, b, a) = parse_color_rgba("rgba(255, 128, 64, 0.5)").unwrap();
        assert_eq!((r, g, b), (255, 128, 64));
        assert_eq!(a, 0.5);
    }

    #[test]
    fn test_invalid() {
        assert!(parse_color("red-ish").is_none());
        assert!(parse_color("#12345").is_none());
    }

    #[test]
    fn test_pattern_tone() {
        assert_eq!(pattern_tone("#000000", "#FFFFFF", 0.5), "#808080");
        assert_eq!(pattern_tone("#000000", "#FFFFFF", 0.0), "#FFFFFF");
    }
}
