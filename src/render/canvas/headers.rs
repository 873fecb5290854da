//! Row and column header bands.
//!
//! - Column headers: A, B, C, ... Z, AA, AB, ...
//! - Row headers: 1, 2, 3, ...
//! - Selection highlighting for selected rows/columns
//! - Frozen bands painted on top of the scrolled ones

use crate::cell_ref::col_to_letter;
use crate::layout::{RenderCell, ViewRange};
use crate::render::backend::{Canvas, LineStyle, TextAlign, TextBaseline, TextPaint};
use crate::render::colors::palette;
use crate::settings::Settings;
use crate::types::{PixelRange, Selection, SelectionType};

const HEADER_FONT: &str = "500 11px -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Header background when the whole row/column is selected.
const HEADER_ACTIVE_BG: &str = "#A8C7FA";

/// Divider between frozen and scrolled headers, and the corner triangle.
const HEADER_HANDLE: &str = "#80868B";

/// How a header relates to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMark {
    None,
    /// Some cells of the row/column are selected
    Partial,
    /// The whole row/column is selected
    Full,
}

/// Mark for column `col`.
pub fn col_mark(selection: Option<&Selection>, col: u32) -> HeaderMark {
    let Some(sel) = selection else {
        return HeaderMark::None;
    };
    let range = sel.range();
    if col < range.start_col || col > range.end_col {
        return HeaderMark::None;
    }
    match sel.selection_type {
        SelectionType::ColumnRange | SelectionType::All => HeaderMark::Full,
        SelectionType::CellRange => HeaderMark::Partial,
        SelectionType::RowRange => HeaderMark::None,
    }
}

/// Mark for row `row`.
pub fn row_mark(selection: Option<&Selection>, row: u32) -> HeaderMark {
    let Some(sel) = selection else {
        return HeaderMark::None;
    };
    let range = sel.range();
    if row < range.start_row || row > range.end_row {
        return HeaderMark::None;
    }
    match sel.selection_type {
        SelectionType::RowRange | SelectionType::All => HeaderMark::Full,
        SelectionType::CellRange => HeaderMark::Partial,
        SelectionType::ColumnRange => HeaderMark::None,
    }
}

/// Extent of the frozen bands in canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct FrozenBand {
    pub rows: u32,
    pub cols: u32,
    pub width: f64,
    pub height: f64,
}

fn header_background(canvas: &mut dyn Canvas, rect: PixelRange, mark: HeaderMark, settings: &Settings) {
    match mark {
        HeaderMark::Full => canvas.fill_rect(rect, HEADER_ACTIVE_BG),
        HeaderMark::Partial => canvas.fill_rect(rect, &settings.header_selected_bg_color),
        HeaderMark::None => {}
    }
}

fn header_label(canvas: &mut dyn Canvas, label: &str, x: f64, y: f64, mark: HeaderMark, settings: &Settings) {
    let color = if mark == HeaderMark::Full {
        palette::HEADER_TEXT_SELECTED
    } else {
        settings.header_text_color.as_str()
    };
    canvas.fill_text(
        label,
        x,
        y,
        &TextPaint {
            font: HEADER_FONT,
            color,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        },
    );
}

fn paint_col_header(canvas: &mut dyn Canvas, col: &RenderCell, selection: Option<&Selection>, settings: &Settings) {
    let rect = col.position;
    let mark = col_mark(selection, col.coordinate.start_col);
    header_background(canvas, rect, mark, settings);
    canvas.stroke_line(
        rect.end_col - 0.5,
        rect.start_row,
        rect.end_col - 0.5,
        rect.end_row,
        &LineStyle::solid(1.0, &settings.header_border_color),
    );
    // Narrow columns get no label
    if rect.width() >= 20.0 {
        let label = col_to_letter(col.coordinate.start_col);
        let (x, y) = (rect.x() + rect.width() / 2.0, rect.y() + rect.height() / 2.0);
        header_label(canvas, &label, x, y, mark, settings);
    }
}

fn paint_row_header(canvas: &mut dyn Canvas, row: &RenderCell, selection: Option<&Selection>, settings: &Settings) {
    let rect = row.position;
    let mark = row_mark(selection, row.coordinate.start_row);
    header_background(canvas, rect, mark, settings);
    canvas.stroke_line(
        rect.start_col,
        rect.end_row - 0.5,
        rect.end_col,
        rect.end_row - 0.5,
        &LineStyle::solid(1.0, &settings.header_border_color),
    );
    if rect.height() >= 12.0 {
        // Row numbers are 1-based on screen
        let label = (u64::from(row.coordinate.start_row) + 1).to_string();
        let (x, y) = (rect.x() + rect.width() / 2.0, rect.y() + rect.height() / 2.0);
        header_label(canvas, &label, x, y, mark, settings);
    }
}

/// Column header band along the top edge.
pub fn paint_col_headers(
    canvas: &mut dyn Canvas,
    view: &ViewRange,
    settings: &Settings,
    selection: Option<&Selection>,
    frozen: FrozenBand,
) {
    let (hw, hh) = (settings.row_header_width, settings.col_header_height);
    let width = canvas.width();
    if hh <= 0.0 || width <= hw {
        return;
    }

    // Scrolled columns first, clipped so they never bleed under the frozen ones.
    let scroll_band = PixelRange::new(0.0, hw + frozen.width, hh, width);
    canvas.save();
    canvas.clip_rect(scroll_band);
    canvas.fill_rect(scroll_band, &settings.header_bg_color);
    for col in view.cols.iter().filter(|c| c.coordinate.start_col >= frozen.cols) {
        paint_col_header(canvas, col, selection, settings);
    }
    canvas.restore();

    if frozen.cols > 0 {
        let frozen_band = PixelRange::new(0.0, hw, hh, hw + frozen.width);
        canvas.fill_rect(frozen_band, &settings.header_bg_color);
        for col in view.cols.iter().filter(|c| c.coordinate.start_col < frozen.cols) {
            paint_col_header(canvas, col, selection, settings);
        }
        canvas.stroke_line(
            hw + frozen.width,
            0.0,
            hw + frozen.width,
            hh,
            &LineStyle::solid(2.0, HEADER_HANDLE),
        );
    }

    canvas.stroke_line(
        hw,
        hh - 0.5,
        width,
        hh - 0.5,
        &LineStyle::solid(1.0, &settings.header_border_color),
    );
}

/// Row header band along the left edge.
pub fn paint_row_headers(
    canvas: &mut dyn Canvas,
    view: &ViewRange,
    settings: &Settings,
    selection: Option<&Selection>,
    frozen: FrozenBand,
) {
    let (hw, hh) = (settings.row_header_width, settings.col_header_height);
    let height = canvas.height();
    if hw <= 0.0 || height <= hh {
        return;
    }

    let scroll_band = PixelRange::new(hh + frozen.height, 0.0, height, hw);
    canvas.save();
    canvas.clip_rect(scroll_band);
    canvas.fill_rect(scroll_band, &settings.header_bg_color);
    for row in view.rows.iter().filter(|r| r.coordinate.start_row >= frozen.rows) {
        paint_row_header(canvas, row, selection, settings);
    }
    canvas.restore();

    if frozen.rows > 0 {
        let frozen_band = PixelRange::new(hh, 0.0, hh + frozen.height, hw);
        canvas.fill_rect(frozen_band, &settings.header_bg_color);
        for row in view.rows.iter().filter(|r| r.coordinate.start_row < frozen.rows) {
            paint_row_header(canvas, row, selection, settings);
        }
        canvas.stroke_line(
            0.0,
            hh + frozen.height,
            hw,
            hh + frozen.height,
            &LineStyle::solid(2.0, HEADER_HANDLE),
        );
    }

    canvas.stroke_line(
        hw - 0.5,
        hh,
        hw - 0.5,
        height,
        &LineStyle::solid(1.0, &settings.header_border_color),
    );
}

/// The box where the two header bands meet.
pub fn paint_corner(canvas: &mut dyn Canvas, settings: &Settings, all_selected: bool) {
    let (width, height) = (settings.row_header_width, settings.col_header_height);
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let rect = PixelRange::new(0.0, 0.0, height, width);
    let bg = if all_selected {
        HEADER_ACTIVE_BG
    } else {
        settings.header_bg_color.as_str()
    };
    canvas.fill_rect(rect, bg);

    // "Select all" triangle in the bottom-right corner
    if !all_selected {
        let (size, margin) = (6.0, 4.0);
        canvas.fill_polygon(
            &[
                (width - margin, height - margin - size),
                (width - margin, height - margin),
                (width - margin - size, height - margin),
            ],
            HEADER_HANDLE,
        );
    }
    canvas.stroke_rect(rect, &LineStyle::solid(1.0, &settings.header_border_color));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_follow_selection_type() {
        let cells = Selection {
            selection_type: SelectionType::CellRange,
            anchor: (1, 1),
            focus: (3, 2),
        };
        assert_eq!(col_mark(Some(&cells), 2), HeaderMark::Partial);
        assert_eq!(col_mark(Some(&cells), 3), HeaderMark::None);
        assert_eq!(row_mark(Some(&cells), 0), HeaderMark::None);

        let rows = Selection::rows(4, 6);
        assert_eq!(row_mark(Some(&rows), 5), HeaderMark::Full);
        assert_eq!(col_mark(Some(&rows), 5), HeaderMark::None);

        let all = Selection::all();
        assert_eq!(col_mark(Some(&all), 16_000), HeaderMark::Full);
        assert_eq!(row_mark(None, 0), HeaderMark::None);
    }
}
