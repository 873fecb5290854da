//! Display-list canvas.
//!
//! Records every drawing call as a [`DrawOp`] instead of painting pixels.
//! Used natively by the CLI and by tests that assert on what was drawn.

use serde::Serialize;

use super::backend::{Canvas, LineStyle, TextAlign, TextBaseline, TextPaint};
use crate::types::PixelRange;

/// Width of one character for text measurement, as a fraction of the font
/// size.
const CHAR_WIDTH_EM: f64 = 0.55;

/// Fallback font size when the font string has no `<n>px` token.
const FALLBACK_FONT_PX: f64 = 15.0;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DrawOp {
    Save,
    Restore,
    Clip {
        rect: PixelRange,
    },
    FillRect {
        rect: PixelRange,
        color: String,
    },
    StrokeRect {
        rect: PixelRange,
        color: String,
        width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        width: f64,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        dash: Vec<f64>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        color: String,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    measure_calls: usize,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            measure_calls: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the display list, e.g. between frames.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Resize the surface. Recorded ops are kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// How many times text was measured on this surface.
    pub fn measure_calls(&self) -> usize {
        self.measure_calls
    }

    /// Every `FillText` op as `(text, x, y)`.
    pub fn texts(&self) -> Vec<(&str, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, x, y, .. } => Some((text.as_str(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

/// Pixel size from a CSS font shorthand (`bold 15px Arial` -> 15).
fn font_px(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px")?.parse::<f64>().ok())
        .unwrap_or(FALLBACK_FONT_PX)
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn clip_rect(&mut self, rect: PixelRange) {
        self.ops.push(DrawOp::Clip { rect });
    }

    fn fill_rect(&mut self, rect: PixelRange, color: &str) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: PixelRange, line: &LineStyle<'_>) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color: line.color.to_string(),
            width: line.width,
        });
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line: &LineStyle<'_>) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: line.color.to_string(),
            width: line.width,
            dash: line.dash.to_vec(),
        });
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, paint: &TextPaint<'_>) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            font: paint.font.to_string(),
            color: paint.color.to_string(),
            align: paint.align,
            baseline: paint.baseline,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        self.measure_calls += 1;
        text.chars().count() as f64 * font_px(font) * CHAR_WIDTH_EM
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_font_px() {
        assert_eq!(font_px("bold 20px Arial"), 20.0);
        assert_eq!(font_px("Arial"), FALLBACK_FONT_PX);
    }

    #[test]
    fn test_records_in_order() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        canvas.save();
        canvas.fill_rect(PixelRange::new(0.0, 0.0, 10.0, 10.0), "#FFFFFF");
        canvas.restore();
        assert_eq!(canvas.ops().len(), 3);
        assert_eq!(canvas.ops()[0], DrawOp::Save);
        assert_eq!(canvas.take_ops().len(), 3);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_ops_serialize_with_tag() {
        let op = DrawOp::FillText {
            text: "42".to_string(),
            x: 1.0,
            y: 2.0,
            font: "15px Arial".to_string(),
            color: "#000000".to_string(),
            align: TextAlign::Right,
            baseline: TextBaseline::Bottom,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "fillText");
        assert_eq!(json["align"], "right");
    }
}
