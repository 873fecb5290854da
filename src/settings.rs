//! Viewer configuration.
//!
//! Deserialized from a JS object (`serde-wasm-bindgen`) or a JSON file (CLI).
//! Every field is optional on the wire; missing fields take the defaults
//! below.

use serde::{Deserialize, Serialize};

use crate::units::{pt_to_px, CSS_PPI};

/// Default number of addressable rows.
pub const DEFAULT_MAX_ROWS: u32 = 100_000_000;

/// Default number of addressable columns (`XFD`).
pub const DEFAULT_MAX_COLS: u32 = 16_384;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Width of the row header band in pixels
    pub row_header_width: f64,
    /// Height of the column header band in pixels
    pub col_header_height: f64,
    /// Row height in points when no explicit info exists
    pub default_row_height: f64,
    /// Column width in points when no explicit info exists
    pub default_col_width: f64,
    /// Pixel density used when converting pixels back to points
    pub ppi: f64,
    pub show_grid_lines: bool,
    pub max_rows: u32,
    pub max_cols: u32,

    pub grid_color: String,
    pub header_bg_color: String,
    pub header_text_color: String,
    pub header_border_color: String,
    pub header_selected_bg_color: String,
    pub comment_marker_color: String,
    pub selection_color: String,
    pub default_text_color: String,

    pub font_family: String,
    /// Default font size in points
    pub font_size: f64,
    /// Horizontal padding inside a cell in pixels
    pub cell_padding: f64,
    /// Smallest row height / column width a resize drag can produce, in pixels
    pub min_resize_px: f64,
    /// Entries kept in the text measurement cache
    pub text_cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            row_header_width: 40.0,
            col_header_height: 20.0,
            default_row_height: 15.0,
            default_col_width: 48.0,
            ppi: CSS_PPI,
            show_grid_lines: true,
            max_rows: DEFAULT_MAX_ROWS,
            max_cols: DEFAULT_MAX_COLS,
            grid_color: "#E2E2E2".to_string(),
            header_bg_color: "#F3F3F3".to_string(),
            header_text_color: "#595959".to_string(),
            header_border_color: "#CCCCCC".to_string(),
            header_selected_bg_color: "#CFD8E8".to_string(),
            comment_marker_color: "#FF0000".to_string(),
            selection_color: "#217346".to_string(),
            default_text_color: "#000000".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 11.0,
            cell_padding: 4.0,
            min_resize_px: 4.0,
            text_cache_capacity: 4096,
        }
    }
}

impl Settings {
    /// Default row height in pixels.
    pub fn default_row_px(&self) -> f64 {
        pt_to_px(self.default_row_height)
    }

    /// Default column width in pixels.
    pub fn default_col_px(&self) -> f64 {
        pt_to_px(self.default_col_width)
    }

    /// Default font size in pixels.
    pub fn font_size_px(&self) -> f64 {
        pt_to_px(self.font_size)
    }

    /// Load settings from a JSON string; unknown keys are ignored.
    ///
    /// # Errors
    /// Returns `Json` if the text is not a valid settings object.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_in_pixels() {
        let s = Settings::default();
        assert_eq!(s.default_row_px(), 20.0);
        assert_eq!(s.default_col_px(), 64.0);
        assert_eq!(s.max_rows, 100_000_000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"rowHeaderWidth": 50, "showGridLines": false}"#).unwrap();
        assert_eq!(s.row_header_width, 50.0);
        assert!(!s.show_grid_lines);
        assert_eq!(s.col_header_height, 20.0);
    }
}
