//! Interaction controller tests
//!
//! Scrolling, header border resizing, pointer selection and cell editing,
//! driven through a session wired to a recording engine client. Resizes
//! and edits must go out as payloads and leave the cache alone until the
//! engine answers with patches.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{assert_px, sent_payloads, session, session_with, BatchBuilder};
use sheetview::engine::{CellInputValue, EditPayload, Transaction};
use sheetview::layout::ScrollPos;
use sheetview::viewer::{wheel_delta_px, Cursor, ResizeTarget, DOM_DELTA_LINE, DOM_DELTA_PAGE};
use sheetview::{CellRange, PixelRange, Selection, SelectionType, SessionEvent, Settings};

// ============================================================================
// SCROLLING
// ============================================================================

#[test]
fn test_scroll_clamps_to_content() {
    let settings = Settings {
        max_rows: 30,
        max_cols: 10,
        ..Settings::default()
    };
    let (mut s, _) = session_with(settings, 400.0, 200.0);
    // 600px of rows in a 180px data area, 640px of columns in 360px
    let applied = s.scroll_by(1000.0, 1000.0).unwrap();
    assert_eq!(applied, ScrollPos::new(280.0, 420.0));
    assert!(s.scroll_by(5.0, 5.0).is_none());
    assert_eq!(s.view_range().rows.last().unwrap().coordinate.start_row, 29);
}

#[test]
fn test_scroll_records_reached_extent() {
    let (mut s, _) = session(400.0, 200.0);
    s.scroll_by(100.0, 2000.0);
    let sheet = s.data().get_sheet(None).unwrap();
    assert_px(sheet.view_height, 2180.0);
    assert_px(sheet.view_width, 460.0);
    // Scrolling back never shrinks it
    s.scroll_to(0.0, 0.0);
    assert_px(s.data().get_sheet(None).unwrap().view_height, 2180.0);
}

#[test]
fn test_wheel_modes() {
    assert_eq!(wheel_delta_px(0.0, 3.0, DOM_DELTA_LINE, 20.0, 360.0, 180.0), (0.0, 60.0));
    assert_eq!(wheel_delta_px(1.0, 0.0, DOM_DELTA_PAGE, 20.0, 360.0, 180.0), (360.0, 0.0));
}

#[test]
fn test_scroll_into_view_skips_frozen_rows() {
    let (mut s, _) = session(400.0, 200.0);
    s.apply_batch(BatchBuilder::new().frozen(2, 0).build());
    s.scroll_to(0.0, 500.0);
    assert!(s.scroll_into_view(1, 0).is_none());
    // Row 10 is above the scrolled pane; it becomes the first scrolled row
    s.scroll_into_view(10, 0).unwrap();
    assert_eq!(s.scroll_pos().y, 160.0);
    assert_eq!(s.view_range().rows[2].coordinate.start_row, 10);
}

// ============================================================================
// RESIZING
// ============================================================================

#[test]
fn test_row_resize_round_trip() {
    let (mut s, client) = session(400.0, 200.0);
    // Row 1's bottom border in the row header band
    assert_eq!(s.cursor_at(20.0, 40.0), Cursor::RowResize);
    assert!(s.pointer_down(20.0, 40.0));
    assert!(s.pointer_move(20.0, 60.0));
    let preview = s.render_params().unwrap().resize_preview.unwrap();
    assert_eq!(preview.target, ResizeTarget::Row(0));
    assert_eq!(preview.size_px, 40.0);
    assert!(s.pointer_up(20.0, 60.0).unwrap());

    assert_eq!(
        sent_payloads(&client),
        vec![EditPayload::SetRowHeight {
            sheet_idx: 0,
            row: 0,
            height: 30.0,
        }]
    );
    // Nothing changes until the engine answers
    assert_eq!(s.data().get_row_info(0, None).height, 15.0);
    assert_eq!(s.view_range().rows[1].position.y(), 40.0);

    s.apply_batch(BatchBuilder::new().incremental().row_height(0, 30.0).build());
    assert_eq!(s.view_range().rows[1].position.y(), 60.0);
}

#[test]
fn test_resize_clamps_and_cancels() {
    let (mut s, client) = session(400.0, 200.0);
    assert!(s.pointer_down(104.0, 10.0));
    s.pointer_move(0.0, 10.0);
    let preview = s.render_params().unwrap().resize_preview.unwrap();
    assert_eq!(preview.target, ResizeTarget::Col(0));
    assert_eq!(preview.size_px, 4.0);

    assert!(s.cancel_resize());
    assert!(!s.pointer_up(0.0, 10.0).unwrap());
    assert!(client.is_empty());
    assert!(s.render_params().unwrap().resize_preview.is_none());
}

#[test]
fn test_unmoved_border_sends_nothing() {
    let (mut s, client) = session(400.0, 200.0);
    s.pointer_down(168.0, 10.0);
    assert!(!s.pointer_up(168.0, 10.0).unwrap());
    assert!(client.is_empty());
}

#[test]
fn test_cursor_shapes() {
    let (s, _) = session(400.0, 200.0);
    assert_eq!(s.cursor_at(104.0, 10.0), Cursor::ColResize);
    assert_eq!(s.cursor_at(60.0, 30.0), Cursor::Cell);
    assert_eq!(s.cursor_at(10.0, 10.0), Cursor::Default);
    assert_eq!(Cursor::ColResize.as_css(), "col-resize");
}

// ============================================================================
// SELECTION
// ============================================================================

#[test]
fn test_pointer_selection_and_observers() {
    let (mut s, _) = session(400.0, 200.0);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    s.subscribe(move |e| sink.borrow_mut().push(e));

    s.pointer_down(60.0, 30.0);
    s.pointer_move(190.0, 90.0);
    s.pointer_up(190.0, 90.0).unwrap();
    assert_eq!(s.selection().unwrap().range(), CellRange::new(0, 0, 3, 2));
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::SelectionChanged, SessionEvent::SelectionChanged]
    );
}

#[test]
fn test_drag_into_merge_covers_it() {
    let (mut s, _) = session(400.0, 200.0);
    s.apply_batch(BatchBuilder::new().merge("C3:D5").build());
    s.pointer_down(60.0, 30.0);
    // Into C3, the merge origin
    s.pointer_move(180.0, 70.0);
    assert_eq!(s.selection().unwrap().range(), CellRange::new(0, 0, 4, 3));
}

#[test]
fn test_column_header_drag() {
    let (mut s, _) = session(400.0, 200.0);
    s.pointer_down(136.0, 10.0);
    s.pointer_move(250.0, 150.0);
    let selection = s.selection().unwrap();
    assert_eq!(selection.selection_type, SelectionType::ColumnRange);
    let range = selection.range();
    assert_eq!((range.start_col, range.end_col), (1, 3));
}

#[test]
fn test_sheet_switch_resets_view_state() {
    let (mut s, _) = session(400.0, 200.0);
    s.apply_batch(BatchBuilder::new().sheet_names(&["One", "Two"]).build());
    s.scroll_to(0.0, 300.0);
    s.set_selection(Some(Selection::cell(3, 3)));

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    s.subscribe(move |e| sink.borrow_mut().push(e));
    s.set_active_sheet(1);
    s.set_active_sheet(1);

    assert_eq!(s.scroll_pos(), ScrollPos::default());
    assert!(s.selection().is_none());
    assert_eq!(*events.borrow(), vec![SessionEvent::SheetChanged(1)]);
}

// ============================================================================
// EDITING
// ============================================================================

#[test]
fn test_edit_starts_from_formula() {
    let (mut s, client) = session(400.0, 200.0);
    s.apply_batch(BatchBuilder::new().formula("A1", "=1+1", 2.0).build());
    let (text, rect) = s.begin_edit(0, 0);
    assert_eq!(text, "=1+1");
    assert_eq!(rect, Some(PixelRange::new(20.0, 40.0, 40.0, 104.0)));
    assert!(s.commit_edit("=SUM(B1:B3)").unwrap());
    assert!(!s.is_editing());

    let sent = client.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].payloads[0],
        EditPayload::CellInput {
            sheet_idx: 0,
            row: 0,
            col: 0,
            input: CellInputValue::Formula("=SUM(B1:B3)".to_string()),
        }
    );
    // The cache still shows the old formula
    assert_eq!(s.data().get_cell(0, 0, None).unwrap().formula, "=1+1");
}

#[test]
fn test_unchanged_edit_sends_nothing() {
    let (mut s, client) = session(400.0, 200.0);
    s.apply_batch(BatchBuilder::new().number("B1", 5.0).build());
    let (text, _) = s.begin_edit(0, 1);
    assert_eq!(text, "5");
    assert!(!s.commit_edit("5").unwrap());
    assert!(client.is_empty());
}

#[test]
fn test_edit_inside_merge_targets_origin() {
    let (mut s, client) = session(400.0, 200.0);
    s.apply_batch(BatchBuilder::new().merge("B2:C3").build());
    let (_, rect) = s.begin_edit(2, 2);
    assert_eq!(rect, Some(PixelRange::new(40.0, 104.0, 80.0, 232.0)));
    s.commit_edit("12.5").unwrap();

    let tx: Vec<Transaction> = client.take();
    let json = serde_json::to_value(&tx[0]).unwrap();
    assert_eq!(json["payloads"][0]["type"], "cellInput");
    assert_eq!(json["payloads"][0]["row"], 1);
    assert_eq!(json["payloads"][0]["col"], 1);
    assert_eq!(json["payloads"][0]["input"]["type"], "number");
    assert_eq!(json["payloads"][0]["input"]["value"], 12.5);
}

#[test]
fn test_pointer_down_cancels_edit() {
    let (mut s, client) = session(400.0, 200.0);
    s.begin_edit(0, 0);
    s.pointer_down(200.0, 100.0);
    assert!(!s.is_editing());
    assert!(!s.commit_edit("late").unwrap());
    assert!(client.is_empty());
}

// ============================================================================
// ENGINE REPLIES
// ============================================================================

#[test]
fn test_inbox_drains_in_arrival_order() {
    let (mut s, _) = session(400.0, 200.0);
    let inbox = s.inbox();
    inbox.borrow_mut().push(BatchBuilder::new().number("A1", 1.0).build());
    inbox
        .borrow_mut()
        .push(BatchBuilder::new().incremental().number("A1", 2.0).build());
    s.take_dirty();

    assert_eq!(s.drain_inbox(), 2);
    assert!(s.take_dirty());
    assert_eq!(
        s.data().get_cell(0, 0, None).unwrap().value,
        Some(sheetview::CellValue::Number(2.0))
    );
    assert_eq!(s.drain_inbox(), 0);
}
