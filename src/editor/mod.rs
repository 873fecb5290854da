//! Selection and editing overlay.
//!
//! Adds, on top of the read-only view:
//! - Selector geometry for the DOM selection box
//! - Edit sessions that turn typed text into outbound payloads
//! - An HTML input overlay positioned over the edited cell (wasm32)
//!
//! Edits never touch the cache directly; the engine answers a committed
//! edit with patches.

#[cfg(target_arch = "wasm32")]
pub mod input;
pub mod mutation;

pub use mutation::classify_input;

use crate::data::DataService;
use crate::engine::EditPayload;
use crate::layout::{RenderCell, ViewRange};
use crate::numfmt::format_value;
use crate::types::{PixelRange, Selection};

#[cfg(target_arch = "wasm32")]
pub use input::InputOverlay;

/// Geometry of the selection box.
pub struct SelectionOverlay;

impl SelectionOverlay {
    /// Pixel box covering the visible part of the selection, or `None` when
    /// none of it is on screen.
    ///
    /// The box is the union of the visible row and column bands the
    /// selection spans.
    pub fn selector_rect(selection: &Selection, view: &ViewRange) -> Option<PixelRange> {
        let range = selection.range();
        let union = |acc: Option<PixelRange>, unit: &RenderCell| {
            Some(acc.map_or(unit.position, |a| a.union(&unit.position)))
        };
        let rows = view
            .rows
            .iter()
            .filter(|r| (range.start_row..=range.end_row).contains(&r.coordinate.start_row))
            .fold(None, union)?;
        let cols = view
            .cols
            .iter()
            .filter(|c| (range.start_col..=range.end_col).contains(&c.coordinate.start_col))
            .fold(None, union)?;
        Some(PixelRange::new(
            rows.start_row,
            cols.start_col,
            rows.end_row,
            cols.end_col,
        ))
    }
}

/// Cell being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub sheet_idx: usize,
    pub row: u32,
    pub col: u32,
}

/// One in-progress cell edit.
#[derive(Debug, Default)]
pub struct EditSession {
    target: Option<EditTarget>,
    original: String,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `(row, col)` on the active sheet and return the text
    /// the input should start with: the formula if there is one, else the
    /// displayed value.
    pub fn begin(&mut self, data: &DataService, row: u32, col: u32) -> &str {
        let cell = data.get_cell(row, col, None);
        self.original = match cell {
            Some(c) if !c.formula.is_empty() => c.formula.clone(),
            Some(c) => c
                .value
                .as_ref()
                .map(|v| format_value(v, None).text)
                .unwrap_or_default(),
            None => String::new(),
        };
        self.target = Some(EditTarget {
            sheet_idx: data.get_active_sheet(),
            row,
            col,
        });
        &self.original
    }

    pub fn target(&self) -> Option<EditTarget> {
        self.target
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    /// Finish the edit. Returns the payload to submit, or `None` when
    /// nothing was being edited or the text is unchanged.
    pub fn commit(&mut self, text: &str) -> Option<EditPayload> {
        let target = self.target.take()?;
        let original = std::mem::take(&mut self.original);
        if text == original {
            log::debug!("edit of ({}, {}) left unchanged", target.row, target.col);
            return None;
        }
        Some(EditPayload::CellInput {
            sheet_idx: target.sheet_idx,
            row: target.row,
            col: target.col,
            input: classify_input(text),
        })
    }

    pub fn cancel(&mut self) {
        self.target = None;
        self.original.clear();
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
    use crate::engine::CellInputValue;
    use crate::layout::{ScrollPos, ViewRangeBuilder};
    use crate::settings::Settings;
    use crate::types::{CellPatch, CellValue};

    fn view() -> ViewRange {
        let data = DataService::default();
        let settings = Settings::default();
        ViewRangeBuilder::new(data.sheet_data(None).unwrap(), &settings).build(
            300.0,
            200.0,
            ScrollPos::default(),
        )
    }

    #[test]
    fn test_selector_rect_spans_selection() {
        let mut sel = Selection::cell(1, 1);
        sel.extend_to(2, 2);
        let rect = SelectionOverlay::selector_rect(&sel, &view()).unwrap();
        // rows 1..=2 at 20px from y=20, cols 1..=2 at 64px from x=40
        assert_eq!(rect, PixelRange::new(40.0, 104.0, 80.0, 232.0));
    }

    #[test]
    fn test_selector_rect_clipped_to_visible() {
        let mut sel = Selection::cell(8, 0);
        sel.extend_to(500, 0);
        let rect = SelectionOverlay::selector_rect(&sel, &view()).unwrap();
        assert_eq!(rect.start_row, 180.0);
        assert_eq!(rect.end_row, 220.0);
        assert!(SelectionOverlay::selector_rect(&Selection::cell(5000, 0), &view()).is_none());
    }

    #[test]
    fn test_edit_session_commit() {
        let mut data = DataService::default();
        data.set_cell(
            0,
            0,
            None,
            CellPatch {
                value: Some(CellValue::Number(3.0)),
                formula: Some("=1+2".to_string()),
                ..CellPatch::default()
            },
        );
        let mut edit = EditSession::new();
        assert_eq!(edit.begin(&data, 0, 0), "=1+2");
        assert!(edit.is_editing());
        let payload = edit.commit("7").unwrap();
        assert_eq!(
            payload,
            EditPayload::CellInput {
                sheet_idx: 0,
                row: 0,
                col: 0,
                input: CellInputValue::Number(7.0),
            }
        );
        assert!(!edit.is_editing());
    }

    #[test]
    fn test_unchanged_or_cancelled_edit_sends_nothing() {
        let data = DataService::default();
        let mut edit = EditSession::new();
        assert_eq!(edit.begin(&data, 4, 4), "");
        assert!(edit.commit("").is_none());
        edit.begin(&data, 4, 4);
        edit.cancel();
        assert!(edit.commit("x").is_none());
    }
}
