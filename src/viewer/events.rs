//! Pointer handling for a [`Session`].
//!
//! Coordinates are canvas-local CSS pixels. The wasm viewer subtracts the
//! canvas bounding rect before calling in; tests and the CLI call these
//! directly.

use crate::layout::{MatchResult, RenderCell};
use crate::session::{PointerDrag, Session, SessionEvent};
use crate::types::{CellRange, Selection};

use super::resize::{ResizeController, ResizeTarget};

/// CSS cursor for a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Cell,
    RowResize,
    ColResize,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Cell => "cell",
            Self::RowResize => "row-resize",
            Self::ColResize => "col-resize",
        }
    }
}

impl Session {
    /// Pointer pressed. Grabs a header border for resizing, or starts a
    /// cell, row, column or select-all selection.
    ///
    /// Returns whether anything changed.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let view = self.view_range();
        let (hw, hh) = (self.settings.row_header_width, self.settings.col_header_height);
        if let Some((target, band)) = ResizeController::hit_edge(x, y, &view, hw, hh) {
            self.pointer = None;
            let pointer = match target {
                ResizeTarget::Row(_) => y,
                ResizeTarget::Col(_) => x,
            };
            self.begin_resize(target, pointer, &band);
            return true;
        }

        let (selection, drag) = match self.hit_test(x, y) {
            MatchResult::Corner => (Selection::all(), None),
            MatchResult::RowHeader(r) => {
                let row = r.coordinate.start_row;
                (Selection::rows(row, row), Some(PointerDrag::Rows))
            }
            MatchResult::ColHeader(c) => {
                let col = c.coordinate.start_col;
                (Selection::columns(col, col), Some(PointerDrag::Cols))
            }
            MatchResult::Cell(c) => {
                let (row, col) = (c.coordinate.start_row, c.coordinate.start_col);
                (self.cell_selection(row, col), Some(PointerDrag::Cells))
            }
            MatchResult::None => return false,
        };
        if self.edit.is_editing() {
            self.edit.cancel();
        }
        self.pointer = drag;
        self.selection = Some(selection);
        self.mark_dirty(SessionEvent::SelectionChanged);
        true
    }

    /// Pointer moved with the button down. Returns whether anything changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if self.resize.is_active() {
            let pointer = match self.resize.preview().map(|p| p.target) {
                Some(ResizeTarget::Row(_)) => y,
                _ => x,
            };
            return self.update_resize(pointer).is_some();
        }
        let Some(drag) = self.pointer else {
            return false;
        };
        let Some(mut selection) = self.selection else {
            return false;
        };
        let view = self.view_range();
        let row = band_at(&view.rows, y, |b| {
            (b.position.start_row, b.position.end_row, b.coordinate.start_row)
        });
        let col = band_at(&view.cols, x, |b| {
            (b.position.start_col, b.position.end_col, b.coordinate.start_col)
        });
        let focus = match (drag, row, col) {
            (PointerDrag::Rows, Some(row), _) => (row, 0),
            (PointerDrag::Cols, _, Some(col)) => (0, col),
            (PointerDrag::Cells, Some(row), Some(col)) => (row, col),
            _ => return false,
        };
        selection.extend_to(focus.0, focus.1);
        if drag == PointerDrag::Cells {
            if let Some(merge) = self.data.merge_covering(focus.0, focus.1, None) {
                selection = grow_over_merge(selection, &merge);
            }
        }
        if Some(selection) == self.selection {
            return false;
        }
        self.selection = Some(selection);
        self.mark_dirty(SessionEvent::SelectionChanged);
        true
    }

    /// Pointer released. A resize drag ends here and is sent to the engine.
    ///
    /// # Errors
    /// Propagates the engine client's error for a finished resize.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> crate::error::Result<bool> {
        self.pointer = None;
        if self.resize.is_active() {
            self.pointer_move(x, y);
            return self.finish_resize();
        }
        Ok(false)
    }

    /// Cursor to show while hovering `(x, y)` with no button down.
    pub fn cursor_at(&self, x: f64, y: f64) -> Cursor {
        let view = self.view_range();
        let (hw, hh) = (self.settings.row_header_width, self.settings.col_header_height);
        match ResizeController::hit_edge(x, y, &view, hw, hh) {
            Some((ResizeTarget::Row(_), _)) => Cursor::RowResize,
            Some((ResizeTarget::Col(_), _)) => Cursor::ColResize,
            None => match self.hit_test(x, y) {
                MatchResult::Cell(_) => Cursor::Cell,
                _ => Cursor::Default,
            },
        }
    }

    /// Comment text attached to the cell under `(x, y)`.
    pub fn comment_at_point(&self, x: f64, y: f64) -> Option<String> {
        let (row, col) = self.hit_test(x, y).cell()?;
        let (row, col) = match self.data.merge_covering(row, col, None) {
            Some(m) => (m.start_row, m.start_col),
            None => (row, col),
        };
        self.data.comment_at(row, col, None).map(|c| c.text.clone())
    }

    /// A click on a merged region selects the whole region.
    fn cell_selection(&self, row: u32, col: u32) -> Selection {
        match self.data.merge_covering(row, col, None) {
            Some(m) => {
                let mut sel = Selection::cell(m.start_row, m.start_col);
                sel.extend_to(m.end_row, m.end_col);
                sel
            }
            None => Selection::cell(row, col),
        }
    }
}

/// Index of the band under `v`, clamping to the first/last visible band
/// when the pointer leaves the data area.
///
/// `extent` gives a band's pixel span and logical index along the axis.
fn band_at(bands: &[RenderCell], v: f64, extent: impl Fn(&RenderCell) -> (f64, f64, u32)) -> Option<u32> {
    if let Some((_, _, idx)) = bands
        .iter()
        .map(&extent)
        .find(|(start, end, _)| v >= *start && v < *end)
    {
        return Some(idx);
    }
    let (first_start, _, first) = extent(bands.first()?);
    let (_, _, last) = extent(bands.last()?);
    Some(if v < first_start { first } else { last })
}

/// Extend a cell selection so it fully contains a merged region.
fn grow_over_merge(selection: Selection, merge: &CellRange) -> Selection {
    let range = selection.range();
    let (ar, ac) = selection.anchor;
    let top = range.start_row.min(merge.start_row);
    let left = range.start_col.min(merge.start_col);
    let bottom = range.end_row.max(merge.end_row);
    let right = range.end_col.max(merge.end_col);
    // Keep the anchor corner; the focus goes to the opposite one.
    let focus_row = if ar <= top { bottom } else { top };
    let focus_col = if ac <= left { right } else { left };
    let anchor_row = if ar <= top { top } else { bottom };
    let anchor_col = if ac <= left { left } else { right };
    let mut grown = Selection::cell(anchor_row, anchor_col);
    grown.extend_to(focus_row, focus_col);
    grown
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
    use crate::engine::{DisplayPatch, PatchBatch, QueueClient};
    use crate::settings::Settings;
    use crate::types::SelectionType;

    fn session() -> (Session, QueueClient) {
        let client = QueueClient::new();
        let mut s = Session::new(Settings::default(), Box::new(client.clone()));
        s.resize_viewport(440.0, 220.0);
        (s, client)
    }

    #[test]
    fn test_drag_selects_cell_range() {
        let (mut s, _) = session();
        assert!(s.pointer_down(50.0, 25.0));
        assert!(s.pointer_move(180.0, 70.0));
        assert_eq!(s.selection().unwrap().range(), CellRange::new(0, 0, 2, 2));
        assert!(!s.pointer_up(180.0, 70.0).unwrap());
        assert!(!s.pointer_move(300.0, 100.0));
    }

    #[test]
    fn test_header_clicks_select_bands() {
        let (mut s, _) = session();
        s.pointer_down(10.0, 65.0);
        assert_eq!(s.selection().unwrap().selection_type, SelectionType::RowRange);
        s.pointer_move(10.0, 105.0);
        let range = s.selection().unwrap().range();
        assert_eq!((range.start_row, range.end_row), (2, 4));

        s.pointer_down(5.0, 5.0);
        assert_eq!(s.selection().unwrap().selection_type, SelectionType::All);
    }

    #[test]
    fn test_border_drag_resizes_column() {
        let (mut s, client) = session();
        // Column A spans x 40..104 in the header band
        assert_eq!(s.cursor_at(104.0, 10.0), Cursor::ColResize);
        assert!(s.pointer_down(104.0, 10.0));
        s.pointer_move(136.0, 10.0);
        assert_eq!(s.render_params().unwrap().resize_preview.unwrap().size_px, 96.0);
        assert!(s.pointer_up(136.0, 10.0).unwrap());
        assert_eq!(client.take()[0].payloads.len(), 1);
        assert!(s.render_params().unwrap().resize_preview.is_none());
    }

    #[test]
    fn test_click_in_merge_selects_region() {
        let (mut s, _) = session();
        s.apply_batch(PatchBatch {
            incremental: true,
            patches: vec![DisplayPatch::MergeCells {
                sheet_idx: 0,
                merge_cells: vec![CellRange::new(1, 1, 2, 3)],
            }],
        });
        s.pointer_down(200.0, 65.0);
        assert_eq!(s.selection().unwrap().range(), CellRange::new(1, 1, 2, 3));
    }

    #[test]
    fn test_outside_canvas_is_ignored() {
        let (mut s, _) = session();
        assert!(!s.pointer_down(-5.0, 10.0));
        assert!(s.selection().is_none());
    }
}
