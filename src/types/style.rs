use serde::{Deserialize, Serialize};

/// Cached display style for one cell, as delivered by a `styles` patch.
///
/// Every field is optional; anything missing renders with the defaults from
/// [`crate::settings::Settings`].
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    // Font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,

    // Fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<PatternType>,
    /// Solid fill color, or the pattern background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Pattern foreground color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<String>,

    // Borders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    /// Line from top-left to bottom-right
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagonal_down: Option<Border>,
    /// Line from bottom-left to top-right
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagonal_up: Option<Border>,

    // Alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<VAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,

    /// Number format code, e.g. `0.00` or `#,##0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_fmt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Border {
    pub style: BorderStyle,
    #[serde(default)]
    pub color: Option<String>,
}

impl Border {
    /// Stroke width in pixels.
    pub fn width(&self) -> f64 {
        match self.style {
            BorderStyle::None => 0.0,
            BorderStyle::Thin | BorderStyle::Hair | BorderStyle::Dashed | BorderStyle::Dotted => {
                1.0
            }
            BorderStyle::Medium | BorderStyle::MediumDashed => 2.0,
            BorderStyle::Thick | BorderStyle::Double => 3.0,
        }
    }

    /// Canvas line dash pattern for this border style.
    pub fn dash(&self) -> &'static [f64] {
        match self.style {
            BorderStyle::Dashed | BorderStyle::MediumDashed => &[4.0, 2.0],
            BorderStyle::Dotted | BorderStyle::Hair => &[1.0, 1.0],
            _ => &[],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    General,
    Left,
    Center,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Pattern fill kinds the renderer knows how to paint.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    None,
    Solid,
    Gray125,
    LightGray,
    MediumGray,
    DarkGray,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
}

impl PatternType {
    /// Fraction of the fill painted with the foreground color for the
    /// stipple patterns; `None` for line-based patterns.
    pub fn density(self) -> Option<f64> {
        match self {
            Self::Gray125 => Some(0.125),
            Self::LightGray => Some(0.25),
            Self::MediumGray => Some(0.5),
            Self::DarkGray => Some(0.75),
            _ => None,
        }
    }
}

impl CellStyle {
    /// CSS font shorthand for the style, falling back to the given defaults.
    pub fn css_font(&self, default_family: &str, default_size_px: f64) -> String {
        let size_px = self
            .font_size
            .map(crate::units::pt_to_px)
            .unwrap_or(default_size_px);
        let family = self.font_family.as_deref().unwrap_or(default_family);
        let italic = if self.italic == Some(true) { "italic " } else { "" };
        let bold = if self.bold == Some(true) { "bold " } else { "" };
        format!("{italic}{bold}{size_px}px {family}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_style_deserializes_partial_object() {
        let style: CellStyle =
            serde_json::from_str(r##"{"bold":true,"bgColor":"#FF0000","alignH":"right"}"##)
                .unwrap();
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.bg_color.as_deref(), Some("#FF0000"));
        assert_eq!(style.align_h, Some(HAlign::Right));
        assert!(style.border_top.is_none());
    }

    #[test]
    fn test_css_font() {
        let style = CellStyle {
            bold: Some(true),
            font_size: Some(12.0),
            ..CellStyle::default()
        };
        assert_eq!(style.css_font("Arial", 14.0), "bold 16px Arial");
        assert_eq!(CellStyle::default().css_font("Arial", 14.0), "14px Arial");
    }

    #[test]
    fn test_border_width() {
        let border = Border {
            style: BorderStyle::Thick,
            color: None,
        };
        assert_eq!(border.width(), 3.0);
    }
}
