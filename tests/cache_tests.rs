//! Sheet data cache tests
//!
//! The cache holds whatever the engine last reported: cells are patched
//! field by field, sizes keep a running total, and a full refresh starts
//! from a blank sheet.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;
mod common;

use std::collections::HashMap;

use common::{assert_px, BatchBuilder};
use sheetview::data::DataService;
use sheetview::engine::{apply_batch, PatchBatch};
use sheetview::units::pt_to_px;
use sheetview::{Block, CellPatch, CellRange, CellStyle, CellValue, RowInfo};

fn row(idx: u32, height: f64, hidden: bool) -> RowInfo {
    RowInfo { idx, height, hidden }
}

// ============================================================================
// CELLS
// ============================================================================

#[test]
fn test_partial_update_keeps_other_fields() {
    let mut data = DataService::default();
    data.set_cell(
        3,
        4,
        None,
        CellPatch {
            value: Some(CellValue::Number(7.0)),
            formula: Some("=3+4".to_string()),
            ..CellPatch::default()
        },
    );
    data.set_cell(
        3,
        4,
        None,
        CellPatch {
            style: Some(CellStyle {
                bold: Some(true),
                ..CellStyle::default()
            }),
            ..CellPatch::default()
        },
    );

    let cell = data.get_cell(3, 4, None).unwrap();
    assert_eq!(cell.value, Some(CellValue::Number(7.0)));
    assert_eq!(cell.formula, "=3+4");
    assert_eq!(cell.style.as_ref().unwrap().bold, Some(true));
    assert!(data.get_cell(4, 3, None).is_none());
}

#[test]
fn test_cells_have_no_bounds_checks() {
    let mut data = DataService::default();
    data.set_cell(
        u32::MAX,
        u32::MAX,
        None,
        CellPatch {
            value: Some(CellValue::Bool(true)),
            ..CellPatch::default()
        },
    );
    assert!(data.get_cell(u32::MAX, u32::MAX, None).is_some());
}

// ============================================================================
// ROW / COLUMN SIZES
// ============================================================================

#[test]
fn test_running_total_matches_explicit_sizes() {
    let mut data = DataService::default();
    let mut model: HashMap<u32, RowInfo> = HashMap::new();
    let updates = [
        row(0, 30.0, false),
        row(5, 15.0, false),
        row(0, 12.0, false),
        row(9, 40.0, true),
        row(5, 60.0, false),
        row(9, 40.0, false),
        row(2, 0.75, false),
    ];
    for info in updates {
        data.set_row_info(info.idx, info, None);
        model.insert(info.idx, info);
        let expected: f64 = model.values().map(RowInfo::px).sum();
        assert_px(data.get_sheet(None).unwrap().height, expected);
    }
    assert_px(
        data.get_sheet(None).unwrap().height,
        pt_to_px(12.0 + 0.75 + 60.0 + 40.0),
    );
}

#[test]
fn test_hidden_row_takes_no_space() {
    let mut data = DataService::default();
    data.set_row_info(1, row(1, 30.0, false), None);
    data.set_row_info(1, row(1, 30.0, true), None);
    assert_eq!(data.get_sheet(None).unwrap().height, 0.0);

    let rows = data.sheet_data(None).unwrap().row_sizes();
    assert_eq!(rows.size(1), 0.0);
    // Row 2 starts right after row 0
    assert_eq!(rows.offset(2), 20.0);
}

#[test]
fn test_missing_size_info_is_default() {
    let data = DataService::default();
    let info = data.get_row_info(1_000_000, None);
    assert_eq!(info.height, 15.0);
    assert!(!info.hidden);
    assert_eq!(data.get_col_info(0, None).width, 48.0);
}

// ============================================================================
// BATCHES
// ============================================================================

#[test]
fn test_full_refresh_starts_from_blank_sheet() {
    let mut data = DataService::default();
    apply_batch(
        &mut data,
        BatchBuilder::new()
            .number("A1", 1.0)
            .row_height(0, 30.0)
            .merge("B2:C3")
            .build(),
    );
    apply_batch(&mut data, BatchBuilder::new().number("B1", 2.0).build());

    assert!(data.get_cell(0, 0, None).is_none());
    assert_eq!(data.get_cell(0, 1, None).unwrap().value, Some(CellValue::Number(2.0)));
    assert_eq!(data.get_row_info(0, None).height, 15.0);
    assert!(data.get_sheet(None).unwrap().merges.is_empty());
}

#[test]
fn test_incremental_batch_patches_in_place() {
    let mut data = DataService::default();
    apply_batch(&mut data, BatchBuilder::new().formula("A1", "=1+1", 2.0).build());
    apply_batch(
        &mut data,
        BatchBuilder::new()
            .incremental()
            .style(
                "A1",
                CellStyle {
                    italic: Some(true),
                    ..CellStyle::default()
                },
            )
            .build(),
    );
    let cell = data.get_cell(0, 0, None).unwrap();
    assert_eq!(cell.formula, "=1+1");
    assert_eq!(cell.style.as_ref().unwrap().italic, Some(true));
}

#[test]
fn test_batch_json_applies_like_built_batch() {
    let builder = || {
        BatchBuilder::new()
            .text("C2", "north")
            .col_width(2, 96.0)
            .comment("C2", "check")
            .frozen(1, 0)
    };
    let mut from_json = DataService::default();
    apply_batch(&mut from_json, PatchBatch::from_json(&builder().to_json()).unwrap());
    let mut direct = DataService::default();
    apply_batch(&mut direct, builder().build());

    assert_eq!(from_json.get_sheet(None), direct.get_sheet(None));
    assert_eq!(from_json.get_cell(1, 2, None), direct.get_cell(1, 2, None));
    assert_eq!(from_json.comment_at(1, 2, None).unwrap().text, "check");
    assert_eq!(from_json.get_col_info(2, None).px(), 128.0);
}

#[test]
fn test_sheet_names_rename_and_drop() {
    let mut data = DataService::default();
    apply_batch(
        &mut data,
        BatchBuilder::new()
            .incremental()
            .sheet_names(&["Income", "Costs", "Notes"])
            .build(),
    );
    assert_eq!(data.sheet_names(), vec!["Income", "Costs", "Notes"]);

    apply_batch(
        &mut data,
        BatchBuilder::new().incremental().sheet_names(&["Income"]).build(),
    );
    assert_eq!(data.sheet_count(), 1);
}

#[test]
fn test_patch_for_unseen_sheet_creates_it() {
    let mut data = DataService::default();
    apply_batch(
        &mut data,
        BatchBuilder::new().incremental().sheet(2).number("A1", 5.0).build(),
    );
    assert_eq!(data.sheet_count(), 3);
    assert!(data.get_cell(0, 0, Some(2)).is_some());
    assert!(data.get_cell(0, 0, None).is_none());
}

#[test]
fn test_inverted_merges_are_dropped() {
    let mut data = DataService::default();
    apply_batch(
        &mut data,
        BatchBuilder::new()
            .incremental()
            .merge("A1:B2")
            .build(),
    );
    let mut batch = BatchBuilder::new().incremental().build();
    batch.patches.push(sheetview::engine::DisplayPatch::MergeCells {
        sheet_idx: 0,
        merge_cells: vec![CellRange::new(0, 0, 1, 1), CellRange::new(5, 5, 2, 2)],
    });
    apply_batch(&mut data, batch);
    assert_eq!(data.get_sheet(None).unwrap().merges, vec![CellRange::new(0, 0, 1, 1)]);
    assert_eq!(data.merge_covering(1, 0, None), Some(CellRange::new(0, 0, 1, 1)));
}

#[test]
fn test_blocks_replace_wholesale() {
    let mut data = DataService::default();
    let block = |id: &str| Block {
        id: id.to_string(),
        range: CellRange::new(0, 0, 3, 3),
    };
    data.set_blocks(0, vec![block("chart"), block("table")]);
    data.set_blocks(0, vec![block("pivot")]);
    assert_eq!(data.get_blocks(None).len(), 1);
    assert_eq!(data.get_blocks(None)[0].id, "pivot");
    assert!(data.get_blocks(Some(9)).is_empty());
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_clear_keeps_sheet_name() {
    let mut data = DataService::default();
    apply_batch(
        &mut data,
        BatchBuilder::new()
            .incremental()
            .sheet_names(&["Budget"])
            .number("A1", 1.0)
            .build(),
    );
    data.clear();
    assert_eq!(data.get_sheet(None).unwrap().name, "Budget");
    assert!(data.get_cell(0, 0, None).is_none());
}

#[test]
fn test_clear_all_data_leaves_one_blank_sheet() {
    let mut data = DataService::default();
    data.new_sheet(Some("Second"));
    data.set_active_sheet(1);
    data.clear_all_data();
    assert_eq!(data.sheet_count(), 1);
    assert_eq!(data.get_active_sheet(), 0);
    assert_eq!(data.sheet_names(), vec!["Sheet1"]);
}
