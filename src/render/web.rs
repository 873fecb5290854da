//! Canvas 2D backend over `web-sys`.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backend::{Canvas, LineStyle, TextPaint};
use crate::error::{Result, SheetViewError};
use crate::types::PixelRange;

/// Snap a coordinate to the pixel center so 1px lines stay crisp.
fn crisp(x: f64) -> f64 {
    x.floor() + 0.5
}

pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS size; the backing buffer is this times `dpr`
    css_width: f64,
    css_height: f64,
    dpr: f64,
}

impl WebCanvas {
    /// Wrap a canvas element.
    ///
    /// # Errors
    /// Returns `Render` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SheetViewError::Render("Failed to get 2d context".to_string()))?
            .ok_or_else(|| SheetViewError::Render("No 2d context available".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                SheetViewError::Render("Failed to cast to CanvasRenderingContext2d".to_string())
            })?;
        let css_width = f64::from(canvas.client_width().max(0));
        let css_height = f64::from(canvas.client_height().max(0));
        let mut web = Self {
            canvas,
            ctx,
            css_width,
            css_height,
            dpr: 1.0,
        };
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        web.resize(css_width, css_height, dpr);
        Ok(web)
    }

    /// Resize the backing buffer to `css * dpr` physical pixels and scale the
    /// context so drawing stays in CSS pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) {
        self.css_width = css_width.max(0.0);
        self.css_height = css_height.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.canvas
            .set_width((self.css_width * self.dpr).round() as u32);
        self.canvas
            .set_height((self.css_height * self.dpr).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.css_width));
        let _ = style.set_property("height", &format!("{}px", self.css_height));
        let _ = self
            .ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_line(&self, line: &LineStyle<'_>) {
        self.ctx.set_stroke_style_str(line.color);
        self.ctx.set_line_width(line.width);
        let dash: Array = line.dash.iter().map(|d| JsValue::from_f64(*d)).collect();
        let _ = self.ctx.set_line_dash(&dash);
    }
}

impl Canvas for WebCanvas {
    fn width(&self) -> f64 {
        self.css_width
    }

    fn height(&self) -> f64 {
        self.css_height
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clip_rect(&mut self, rect: PixelRange) {
        self.ctx.begin_path();
        self.ctx.rect(rect.x(), rect.y(), rect.width(), rect.height());
        self.ctx.clip();
    }

    fn fill_rect(&mut self, rect: PixelRange, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x(), rect.y(), rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: PixelRange, line: &LineStyle<'_>) {
        self.set_line(line);
        self.ctx.stroke_rect(
            crisp(rect.x()),
            crisp(rect.y()),
            rect.width().floor(),
            rect.height().floor(),
        );
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line: &LineStyle<'_>) {
        self.set_line(line);
        self.ctx.begin_path();
        // Odd widths straddle the pixel grid unless snapped to the center.
        if (line.width.round() % 2.0 - 1.0).abs() < f64::EPSILON {
            self.ctx.move_to(crisp(x1), crisp(y1));
            self.ctx.line_to(crisp(x2), crisp(y2));
        } else {
            self.ctx.move_to(x1.round(), y1.round());
            self.ctx.line_to(x2.round(), y2.round());
        }
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
        let mut iter = points.iter();
        let Some(&(x0, y0)) = iter.next() else {
            return;
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        for &(x, y) in iter {
            self.ctx.line_to(x, y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, paint: &TextPaint<'_>) {
        self.ctx.set_font(paint.font);
        self.ctx.set_fill_style_str(paint.color);
        self.ctx.set_text_align(paint.align.as_css());
        self.ctx.set_text_baseline(paint.baseline.as_css());
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        self.ctx.set_font(font);
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }
}
