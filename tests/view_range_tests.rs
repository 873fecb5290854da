//! Visible range tests
//!
//! The view range is rebuilt for every scroll offset; these tests check
//! what lands on screen, including deep scrolls into very tall sheets
//! and frozen panes.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod fixtures;
mod common;

use common::{assert_px, visible_cols, visible_rows, BatchBuilder};
use sheetview::data::DataService;
use sheetview::engine::apply_batch;
use sheetview::layout::{ScrollPos, ViewRange, ViewRangeBuilder};
use sheetview::{CellRange, PixelRange, Settings};
use test_case::test_case;

fn build_with(settings: &Settings, data: &DataService, w: f64, h: f64, x: f64, y: f64) -> ViewRange {
    ViewRangeBuilder::new(data.sheet_data(None).unwrap(), settings).build(w, h, ScrollPos::new(x, y))
}

fn build(data: &DataService, w: f64, h: f64, x: f64, y: f64) -> ViewRange {
    build_with(&Settings::default(), data, w, h, x, y)
}

fn loaded(batch: BatchBuilder) -> DataService {
    let mut data = DataService::default();
    apply_batch(&mut data, batch.build());
    data
}

// ============================================================================
// VISIBLE COUNTS
// ============================================================================

#[test_case(0.0 ; "top")]
#[test_case(7.0 ; "partial first row")]
#[test_case(10_000.0 ; "shallow")]
#[test_case(19_999_000.0 ; "near the end")]
fn test_visible_row_count_on_million_rows(scroll_y: f64) {
    let settings = Settings {
        max_rows: 1_000_000,
        ..Settings::default()
    };
    let data = DataService::new(&settings);
    let height = 410.0;
    let view = build_with(&settings, &data, 800.0, height, 0.0, scroll_y);
    let full = (height / settings.default_row_px()).ceil() as usize;
    assert!(view.rows.len() >= full, "{} rows < {full}", view.rows.len());
    assert!(view.rows.len() <= full + 1, "{} rows > {}", view.rows.len(), full + 1);
    assert_eq!(view.cells.len(), view.rows.len() * view.cols.len());
    assert!(view.rows.iter().all(|r| r.coordinate.start_row < 1_000_000));
}

#[test]
fn test_last_row_stops_at_max_rows() {
    let settings = Settings {
        max_rows: 3,
        ..Settings::default()
    };
    let data = DataService::new(&settings);
    let view = build_with(&settings, &data, 200.0, 500.0, 0.0, 0.0);
    assert_eq!(visible_rows(&view), vec![0, 1, 2]);
    // Column headers span every row of the sheet
    assert_eq!(view.cols[0].coordinate, CellRange::new(0, 0, 2, 0));
}

// ============================================================================
// POSITIONS
// ============================================================================

#[test]
fn test_positions_offset_by_header_band() {
    let data = DataService::default();
    let view = build(&data, 200.0, 100.0, 0.0, 0.0);
    assert_eq!(view.cells[0].coordinate, CellRange::point(0, 0));
    assert_eq!(view.cells[0].position, PixelRange::new(20.0, 40.0, 40.0, 104.0));
    assert_eq!(view.rows[0].position, PixelRange::new(20.0, 0.0, 40.0, 40.0));
    assert_eq!(view.cols[1].position, PixelRange::new(0.0, 104.0, 20.0, 168.0));
}

#[test]
fn test_deep_scroll_lands_on_resized_row() {
    let data = loaded(BatchBuilder::new().row_height(500_000, 99.0));
    let geometry_offset = {
        let sizes = data.sheet_data(None).unwrap().row_sizes();
        sizes.offset(500_000)
    };
    assert_eq!(geometry_offset, 500_000.0 * 20.0);

    let view = build(&data, 300.0, 300.0, 0.0, geometry_offset);
    let first = view.rows[0];
    assert_eq!(first.coordinate.start_row, 500_000);
    assert_px(first.position.height(), 132.0);
    assert_eq!(view.rows[1].coordinate.start_row, 500_001);
    assert_px(view.rows[1].position.y(), 20.0 + 132.0);
}

#[test]
fn test_hidden_rows_and_columns_are_skipped() {
    let data = loaded(
        BatchBuilder::new()
            .hide_row(1)
            .hide_row(2)
            .col_width(1, 0.0),
    );
    let view = build(&data, 300.0, 100.0, 0.0, 0.0);
    assert_eq!(&visible_rows(&view)[..3], &[0, 3, 4]);
    assert_eq!(&visible_cols(&view)[..3], &[0, 2, 3]);
    // Row 3 sits directly under row 0
    assert_eq!(view.row(3).unwrap().position.y(), 40.0);
}

#[test]
fn test_everything_hidden_is_empty() {
    let settings = Settings {
        default_row_height: 0.0,
        ..Settings::default()
    };
    let data = DataService::new(&settings);
    let view = build_with(&settings, &data, 300.0, 300.0, 0.0, 50.0);
    assert!(view.rows.is_empty());
    assert!(view.cells.is_empty());
}

#[test_case(0.0, 300.0 ; "zero width")]
#[test_case(300.0, 0.0 ; "zero height")]
#[test_case(-1.0, 300.0 ; "negative width")]
fn test_degenerate_viewport_is_empty(w: f64, h: f64) {
    let data = DataService::default();
    assert!(build(&data, w, h, 0.0, 0.0).is_empty());
}

#[test]
fn test_negative_scroll_reads_as_origin() {
    let data = DataService::default();
    assert_eq!(
        build(&data, 300.0, 200.0, -50.0, -80.0),
        build(&data, 300.0, 200.0, 0.0, 0.0)
    );
}

#[test]
fn test_merged_cells_stay_individual() {
    let data = loaded(BatchBuilder::new().merge("A1:B2"));
    let view = build(&data, 300.0, 100.0, 0.0, 0.0);
    assert!(view.cell(0, 0).is_some());
    assert!(view.cell(1, 1).is_some());
    assert_eq!(view.cell(1, 1).unwrap().coordinate, CellRange::point(1, 1));
}

// ============================================================================
// FROZEN PANES
// ============================================================================

#[test]
fn test_frozen_rows_stay_put() {
    let data = loaded(BatchBuilder::new().frozen(2, 0));
    let view = build(&data, 300.0, 200.0, 0.0, 200.0);
    let rows = visible_rows(&view);
    assert_eq!(&rows[..3], &[0, 1, 12]);
    assert_eq!(view.row(0).unwrap().position.y(), 20.0);
    assert_eq!(view.row(1).unwrap().position.y(), 40.0);
    // Scrolled rows continue right under the frozen band
    assert_eq!(view.row(12).unwrap().position.y(), 60.0);
}

#[test]
fn test_frozen_columns_stay_put() {
    let data = loaded(BatchBuilder::new().frozen(0, 1));
    let view = build(&data, 300.0, 100.0, 128.0, 0.0);
    let cols = visible_cols(&view);
    assert_eq!(&cols[..2], &[0, 3]);
    assert_eq!(view.col(0).unwrap().position.x(), 40.0);
    assert_eq!(view.col(3).unwrap().position.x(), 104.0);
}

#[test]
fn test_frozen_band_larger_than_viewport() {
    let data = loaded(BatchBuilder::new().frozen(50, 0));
    let view = build(&data, 300.0, 100.0, 0.0, 400.0);
    // Only frozen rows fit; none of the scrolled ones do
    assert!(visible_rows(&view).iter().all(|r| *r < 50));
    assert_eq!(view.rows.len(), 5);
}
