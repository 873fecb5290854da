//! Drawing surface abstraction.
//!
//! The painter only talks to a [`Canvas`]; the browser backend forwards to a
//! `CanvasRenderingContext2d`, the recording backend keeps a display list for
//! tests and the CLI. All coordinates are CSS pixels.

use serde::Serialize;

use crate::data::SheetData;
use crate::layout::ScrollPos;
use crate::settings::Settings;
use crate::types::{PixelRange, Selection};
use crate::viewer::ResizePreview;

/// Stroke parameters for a line or rectangle outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle<'a> {
    pub width: f64,
    pub color: &'a str,
    /// Dash pattern; empty for a solid line
    pub dash: &'a [f64],
}

impl<'a> LineStyle<'a> {
    pub fn solid(width: f64, color: &'a str) -> Self {
        Self {
            width,
            color,
            dash: &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

impl TextBaseline {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

/// Font and placement for a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint<'a> {
    /// CSS font shorthand, e.g. `bold 15px Arial`
    pub font: &'a str,
    pub color: &'a str,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// A 2D drawing surface.
pub trait Canvas {
    /// Width in CSS pixels.
    fn width(&self) -> f64;

    /// Height in CSS pixels.
    fn height(&self) -> f64;

    /// Push the clip region onto the state stack.
    fn save(&mut self);

    /// Pop the state saved by the matching [`Canvas::save`].
    fn restore(&mut self);

    /// Intersect the clip region with `rect`.
    fn clip_rect(&mut self, rect: PixelRange);

    fn fill_rect(&mut self, rect: PixelRange, color: &str);

    fn stroke_rect(&mut self, rect: PixelRange, line: &LineStyle<'_>);

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line: &LineStyle<'_>);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, paint: &TextPaint<'_>);

    /// Advance width of `text` in `font`, in CSS pixels.
    fn measure_text(&mut self, text: &str, font: &str) -> f64;
}

/// Everything a frame needs, borrowed from the session.
pub struct RenderParams<'a> {
    pub data: &'a SheetData,
    pub settings: &'a Settings,
    pub scroll: ScrollPos,
    pub selection: Option<&'a Selection>,
    /// Live row/column resize drag, drawn as a guide line
    pub resize_preview: Option<ResizePreview>,
}
