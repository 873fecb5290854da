//! Sheet painter.
//!
//! Every frame rebuilds the view range for the canvas size and scroll
//! offset, then paints the four pane quadrants (scrolled first, frozen on
//! top), the overlays and finally the header bands. The painter only reads
//! from the cache.

use super::frozen::paint_frozen_dividers;
use super::headers::{paint_col_headers, paint_corner, paint_row_headers, FrozenBand};
use super::indicators::paint_comment_marker;
use crate::data::SheetData;
use crate::editor::SelectionOverlay;
use crate::error::{Result, SheetViewError};
use crate::layout::{RenderCell, ScrollPos, ViewRange, ViewRangeBuilder};
use crate::numfmt::format_value;
use crate::render::backend::{Canvas, LineStyle, RenderParams, TextAlign, TextBaseline, TextPaint};
use crate::render::cache::TextMeasureCache;
use crate::render::colors::{palette, parse_color, pattern_tone};
use crate::session::Session;
use crate::settings::Settings;
use crate::types::{
    Border, CellRange, CellStyle, CellValue, HAlign, PatternType, PixelRange, SelectionType,
    StandardCell, VAlign,
};
use crate::units::pt_to_px;
use crate::viewer::{ResizePreview, ResizeTarget};

/// Pixels per indent level.
const INDENT_PX: f64 = 10.0;

/// Gap between hatch lines of line patterns.
const HATCH_STEP: f64 = 4.0;

/// Inset of top/bottom aligned text from the cell edge.
const TEXT_EDGE_GAP: f64 = 2.0;

/// Something painted as one box: a plain cell, or a merged region at its
/// origin cell.
#[derive(Debug, Clone, Copy)]
struct PaintItem {
    row: u32,
    col: u32,
    rect: PixelRange,
    merged: bool,
}

/// Per-frame geometry shared by the quadrant passes.
struct Frame<'a> {
    data: &'a SheetData,
    settings: &'a Settings,
    scroll: ScrollPos,
    frozen: FrozenBand,
}

impl Frame<'_> {
    /// Pixel box of a merged range as painted in one quadrant.
    ///
    /// The quadrant's scroll mode applies to the whole merge, so a merge
    /// that starts in the frozen band still scrolls with the pane it runs
    /// into; the quadrant clip cuts off the part under the frozen band.
    fn merge_rect(&self, merge: &CellRange, rows_frozen: bool, cols_frozen: bool) -> PixelRange {
        let rows = self.data.row_sizes();
        let cols = self.data.col_sizes();
        let scroll_y = if rows_frozen { 0.0 } else { self.scroll.y };
        let scroll_x = if cols_frozen { 0.0 } else { self.scroll.x };
        let y = self.settings.col_header_height + rows.offset(merge.start_row) - scroll_y;
        let x = self.settings.row_header_width + cols.offset(merge.start_col) - scroll_x;
        let height = rows.offset(merge.end_row.saturating_add(1)) - rows.offset(merge.start_row);
        let width = cols.offset(merge.end_col.saturating_add(1)) - cols.offset(merge.start_col);
        PixelRange::from_origin(x, y, width, height)
    }

    fn style(&self, row: u32, col: u32) -> Option<&CellStyle> {
        self.data.cell(row, col)?.style.as_ref()
    }
}

/// Canvas painter for one sheet view.
pub struct SheetRenderer {
    text_cache: TextMeasureCache,
}

impl SheetRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            text_cache: TextMeasureCache::new(settings.text_cache_capacity),
        }
    }

    pub fn text_cache(&self) -> &TextMeasureCache {
        &self.text_cache
    }

    /// Drop cached measurements, e.g. after fonts finished loading.
    pub fn clear_caches(&mut self) {
        self.text_cache.clear();
    }

    /// Paint the session's active sheet and return the view range used.
    ///
    /// # Errors
    /// Returns `Render` if the session has no active sheet.
    pub fn render(&mut self, canvas: &mut dyn Canvas, session: &Session) -> Result<ViewRange> {
        let params = session
            .render_params()
            .ok_or_else(|| SheetViewError::Render("no active sheet".to_string()))?;
        self.render_params(canvas, &params)
    }

    /// Paint one frame from borrowed state.
    ///
    /// # Errors
    /// Currently infallible; the signature leaves room for backends that
    /// can fail.
    pub fn render_params(&mut self, canvas: &mut dyn Canvas, params: &RenderParams<'_>) -> Result<ViewRange> {
        let (width, height) = (canvas.width(), canvas.height());
        if !(width > 0.0 && height > 0.0) {
            log::warn!("skipping render on empty canvas {width}x{height}");
            return Ok(ViewRange::default());
        }
        let settings = params.settings;
        let (hw, hh) = (settings.row_header_width, settings.col_header_height);
        let builder = ViewRangeBuilder::new(params.data, settings);
        let scroll = params.scroll.clamped();
        let view = builder.build((width - hw).max(0.0), (height - hh).max(0.0), scroll);
        let frozen = FrozenBand {
            rows: builder.frozen.rows.min(builder.max_rows),
            cols: builder.frozen.cols.min(builder.max_cols),
            width: builder.frozen_width(),
            height: builder.frozen_height(),
        };
        let frame = Frame {
            data: params.data,
            settings,
            scroll,
            frozen,
        };

        canvas.fill_rect(PixelRange::new(0.0, 0.0, height, width), palette::WHITE);

        // Scrolled panes first so the frozen ones paint over any overlap.
        for (rows_frozen, cols_frozen) in [(false, false), (false, true), (true, false), (true, true)] {
            self.paint_quadrant(canvas, &frame, &view, rows_frozen, cols_frozen);
        }
        paint_frozen_dividers(canvas, frozen, hw, hh);

        if let Some(selection) = params.selection {
            if let Some(rect) = SelectionOverlay::selector_rect(selection, &view) {
                canvas.save();
                canvas.clip_rect(PixelRange::new(hh, hw, height, width));
                canvas.stroke_rect(rect, &LineStyle::solid(2.0, &settings.selection_color));
                canvas.restore();
            }
        }
        if let Some(preview) = params.resize_preview {
            paint_resize_guide(canvas, preview);
        }

        paint_row_headers(canvas, &view, settings, params.selection, frozen);
        paint_col_headers(canvas, &view, settings, params.selection, frozen);
        let all_selected = params
            .selection
            .is_some_and(|s| s.selection_type == SelectionType::All);
        paint_corner(canvas, settings, all_selected);

        log::debug!(
            "rendered {} cells on {width}x{height} canvas",
            view.cells.len()
        );
        Ok(view)
    }

    fn paint_quadrant(
        &mut self,
        canvas: &mut dyn Canvas,
        frame: &Frame<'_>,
        view: &ViewRange,
        rows_frozen: bool,
        cols_frozen: bool,
    ) {
        let settings = frame.settings;
        let (hw, hh) = (settings.row_header_width, settings.col_header_height);
        let frozen = frame.frozen;
        let (x0, x1) = if cols_frozen {
            (hw, hw + frozen.width)
        } else {
            (hw + frozen.width, canvas.width())
        };
        let (y0, y1) = if rows_frozen {
            (hh, hh + frozen.height)
        } else {
            (hh + frozen.height, canvas.height())
        };
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let rows: Vec<&RenderCell> = view
            .rows
            .iter()
            .filter(|r| (r.coordinate.start_row < frozen.rows) == rows_frozen)
            .collect();
        let cols: Vec<&RenderCell> = view
            .cols
            .iter()
            .filter(|c| (c.coordinate.start_col < frozen.cols) == cols_frozen)
            .collect();
        let (Some(first_row), Some(last_row), Some(first_col), Some(last_col)) =
            (rows.first(), rows.last(), cols.first(), cols.last())
        else {
            return;
        };

        let clip = PixelRange::new(y0, x0, y1, x1);
        canvas.save();
        canvas.clip_rect(clip);

        if settings.show_grid_lines {
            let line = LineStyle::solid(1.0, &settings.grid_color);
            let x_end = last_col.position.end_col.min(x1);
            let y_end = last_row.position.end_row.min(y1);
            for r in &rows {
                canvas.stroke_line(x0, r.position.end_row, x_end, r.position.end_row, &line);
            }
            for c in &cols {
                canvas.stroke_line(c.position.end_col, y0, c.position.end_col, y_end, &line);
            }
        }

        let window = CellRange::new(
            first_row.coordinate.start_row,
            first_col.coordinate.start_col,
            last_row.coordinate.start_row,
            last_col.coordinate.start_col,
        );
        let merges: Vec<&CellRange> = frame
            .data
            .sheet()
            .merges
            .iter()
            .filter(|m| m.intersects(&window))
            .collect();

        let mut items: Vec<PaintItem> = merges
            .iter()
            .map(|m| PaintItem {
                row: m.start_row,
                col: m.start_col,
                rect: frame.merge_rect(m, rows_frozen, cols_frozen),
                merged: true,
            })
            .collect();
        for r in &rows {
            for c in &cols {
                let (row, col) = (r.coordinate.start_row, c.coordinate.start_col);
                if merges.iter().any(|m| m.contains_cell(row, col)) {
                    continue;
                }
                items.push(PaintItem {
                    row,
                    col,
                    rect: PixelRange::new(
                        r.position.start_row,
                        c.position.start_col,
                        r.position.end_row,
                        c.position.end_col,
                    ),
                    merged: false,
                });
            }
        }

        for item in &items {
            paint_fill(canvas, item, frame.style(item.row, item.col));
        }
        for item in &items {
            if let Some(style) = frame.style(item.row, item.col) {
                paint_borders(canvas, item.rect, style);
            }
        }
        for item in &items {
            if let Some(cell) = frame.data.cell(item.row, item.col) {
                self.paint_text(canvas, item.rect, cell, settings);
            }
        }
        let comments = &frame.data.sheet().comments;
        if !comments.is_empty() {
            for item in &items {
                if comments.contains_key(&(item.row, item.col)) {
                    paint_comment_marker(canvas, item.rect, &settings.comment_marker_color);
                }
            }
        }

        canvas.restore();
    }

    fn paint_text(&mut self, canvas: &mut dyn Canvas, rect: PixelRange, cell: &StandardCell, settings: &Settings) {
        let Some(value) = cell.value.as_ref().filter(|v| !v.is_empty()) else {
            return;
        };
        let padding = settings.cell_padding;
        if rect.width() <= padding * 2.0 {
            return;
        }
        let style = cell.style.as_ref();
        let formatted = format_value(value, style.and_then(|s| s.num_fmt.as_deref()));
        if formatted.text.is_empty() {
            return;
        }

        let font_px = style
            .and_then(|s| s.font_size)
            .map_or_else(|| settings.font_size_px(), pt_to_px);
        let font = match style {
            Some(s) => s.css_font(&settings.font_family, settings.font_size_px()),
            None => format!("{}px {}", settings.font_size_px(), settings.font_family),
        };
        let color = formatted
            .color
            .map(str::to_string)
            .or_else(|| style.and_then(|s| s.font_color.as_deref()).and_then(parse_color))
            .unwrap_or_else(|| settings.default_text_color.clone());

        let indent = f64::from(style.and_then(|s| s.indent).unwrap_or(0)) * INDENT_PX;
        let align = text_align(style, value);
        let x = match align {
            TextAlign::Left => rect.x() + padding + indent,
            TextAlign::Right => rect.end_col - padding - indent,
            TextAlign::Center => rect.x() + rect.width() / 2.0,
        };
        let (y, baseline, text_top) = match style.and_then(|s| s.align_v).unwrap_or(VAlign::Bottom) {
            VAlign::Top => {
                let y = rect.y() + TEXT_EDGE_GAP;
                (y, TextBaseline::Top, y)
            }
            VAlign::Center => {
                let y = rect.y() + rect.height() / 2.0;
                (y, TextBaseline::Middle, y - font_px / 2.0)
            }
            VAlign::Bottom => {
                let y = rect.end_row - TEXT_EDGE_GAP;
                (y, TextBaseline::Bottom, y - font_px)
            }
        };

        let text_width = self.text_cache.measure(canvas, &font, &formatted.text);
        let available = rect.width() - padding * 2.0 - indent;
        let overflow = text_width > available;
        if overflow {
            canvas.save();
            canvas.clip_rect(rect);
        }
        canvas.fill_text(
            &formatted.text,
            x,
            y,
            &TextPaint {
                font: &font,
                color: &color,
                align,
                baseline,
            },
        );

        let left = match align {
            TextAlign::Left => x,
            TextAlign::Right => x - text_width,
            TextAlign::Center => x - text_width / 2.0,
        };
        let line = LineStyle::solid(1.0, &color);
        if style.and_then(|s| s.underline) == Some(true) {
            let uy = text_top + font_px;
            canvas.stroke_line(left, uy, left + text_width, uy, &line);
        }
        if style.and_then(|s| s.strikethrough) == Some(true) {
            let sy = text_top + font_px / 2.0;
            canvas.stroke_line(left, sy, left + text_width, sy, &line);
        }
        if overflow {
            canvas.restore();
        }
    }
}

/// Explicit alignment wins; otherwise numbers go right, booleans and
/// errors center and text left.
fn text_align(style: Option<&CellStyle>, value: &CellValue) -> TextAlign {
    match style.and_then(|s| s.align_h) {
        Some(HAlign::Left) => TextAlign::Left,
        Some(HAlign::Center) => TextAlign::Center,
        Some(HAlign::Right) => TextAlign::Right,
        Some(HAlign::General) | None => match value {
            CellValue::Number(_) => TextAlign::Right,
            CellValue::Bool(_) | CellValue::Error(_) => TextAlign::Center,
            CellValue::Str(_) | CellValue::Empty => TextAlign::Left,
        },
    }
}

fn paint_fill(canvas: &mut dyn Canvas, item: &PaintItem, style: Option<&CellStyle>) {
    // Merged regions hide the grid lines they span.
    if item.merged {
        canvas.fill_rect(item.rect, palette::WHITE);
    }
    let Some(style) = style else {
        return;
    };
    let bg = style.bg_color.as_deref().and_then(parse_color);
    let fg = style.fg_color.as_deref().and_then(parse_color);
    match style.pattern_type {
        Some(PatternType::None) => {}
        None | Some(PatternType::Solid) => {
            if let Some(bg) = bg {
                canvas.fill_rect(item.rect, &bg);
            }
        }
        Some(pattern) => {
            let fg = fg.unwrap_or_else(|| palette::BLACK.to_string());
            match pattern.density() {
                Some(density) => {
                    let bg = bg.as_deref().unwrap_or(palette::WHITE);
                    canvas.fill_rect(item.rect, &pattern_tone(&fg, bg, density));
                }
                None => {
                    if let Some(bg) = bg {
                        canvas.fill_rect(item.rect, &bg);
                    }
                    paint_hatch(canvas, item.rect, pattern, &fg);
                }
            }
        }
    }
}

/// Line patterns, clipped to the cell box.
fn paint_hatch(canvas: &mut dyn Canvas, rect: PixelRange, pattern: PatternType, color: &str) {
    let line = LineStyle::solid(1.0, color);
    // Only the on-canvas part of a tall merge needs hatching.
    let (x0, y0) = (rect.start_col.max(0.0), rect.start_row.max(0.0));
    let (x1, y1) = (rect.end_col.min(canvas.width()), rect.end_row.min(canvas.height()));
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let h = y1 - y0;
    let horizontal = matches!(pattern, PatternType::LightHorizontal | PatternType::LightGrid);
    let vertical = matches!(pattern, PatternType::LightVertical | PatternType::LightGrid);

    canvas.save();
    canvas.clip_rect(rect);
    if horizontal {
        let mut y = y0 + HATCH_STEP / 2.0;
        while y < y1 {
            canvas.stroke_line(x0, y, x1, y, &line);
            y += HATCH_STEP;
        }
    }
    if vertical {
        let mut x = x0 + HATCH_STEP / 2.0;
        while x < x1 {
            canvas.stroke_line(x, y0, x, y1, &line);
            x += HATCH_STEP;
        }
    }
    if matches!(pattern, PatternType::LightDown | PatternType::LightUp) {
        let down = pattern == PatternType::LightDown;
        let mut x = x0 - h;
        while x < x1 {
            if down {
                canvas.stroke_line(x, y0, x + h, y1, &line);
            } else {
                canvas.stroke_line(x, y1, x + h, y0, &line);
            }
            x += HATCH_STEP;
        }
    }
    canvas.restore();
}

fn paint_borders(canvas: &mut dyn Canvas, rect: PixelRange, style: &CellStyle) {
    let (x1, y1, x2, y2) = (rect.start_col, rect.start_row, rect.end_col, rect.end_row);
    let edges = [
        (&style.border_top, (x1, y1, x2, y1)),
        (&style.border_right, (x2, y1, x2, y2)),
        (&style.border_bottom, (x1, y2, x2, y2)),
        (&style.border_left, (x1, y1, x1, y2)),
        (&style.diagonal_down, (x1, y1, x2, y2)),
        (&style.diagonal_up, (x1, y2, x2, y1)),
    ];
    for (border, (ax, ay, bx, by)) in edges {
        if let Some(border) = border {
            draw_border_line(canvas, ax, ay, bx, by, border);
        }
    }
}

fn draw_border_line(canvas: &mut dyn Canvas, x1: f64, y1: f64, x2: f64, y2: f64, border: &Border) {
    let width = border.width();
    if width <= 0.0 {
        return;
    }
    let color = border
        .color
        .as_deref()
        .and_then(parse_color)
        .unwrap_or_else(|| palette::BLACK.to_string());
    canvas.stroke_line(
        x1,
        y1,
        x2,
        y2,
        &LineStyle {
            width,
            color: &color,
            dash: border.dash(),
        },
    );
}

/// Dashed guide at the edge being dragged.
fn paint_resize_guide(canvas: &mut dyn Canvas, preview: ResizePreview) {
    let line = LineStyle {
        width: 1.0,
        color: palette::RESIZE_GUIDE,
        dash: &[4.0, 4.0],
    };
    match preview.target {
        ResizeTarget::Row(_) => {
            canvas.stroke_line(0.0, preview.edge, canvas.width(), preview.edge, &line);
        }
        ResizeTarget::Col(_) => {
            canvas.stroke_line(preview.edge, 0.0, preview.edge, canvas.height(), &line);
        }
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
    fn test_general_alignment_by_value_kind() {
        assert_eq!(text_align(None, &CellValue::Number(1.0)), TextAlign::Right);
        assert_eq!(text_align(None, &CellValue::Bool(true)), TextAlign::Center);
        assert_eq!(
            text_align(None, &CellValue::Str("a".to_string())),
            TextAlign::Left
        );
        let style = CellStyle {
            align_h: Some(HAlign::Left),
            ..CellStyle::default()
        };
        assert_eq!(
            text_align(Some(&style), &CellValue::Number(1.0)),
            TextAlign::Left
        );
    }
}
