//! Test fixtures for building engine patch batches in memory.
//!
//! Cells are addressed in A1 notation, sizes in points, the way the engine
//! sends them.
//!
//! # Example
//!
//! ```rust
//! use fixtures::BatchBuilder;
//!
//! let batch = BatchBuilder::new()
//!     .number("A1", 42.0)
//!     .text("B1", "Total")
//!     .row_height(0, 20.0)
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use sheetview::cell_ref::parse_a1_notation;
use sheetview::data::CellComment;
use sheetview::engine::{DisplayPatch, PatchBatch, StyleEntry, ValueEntry};
use sheetview::types::{CellRange, CellStyle, CellValue, ColInfo, FrozenPanes, RowInfo};

/// Zero-based `(row, col)` of an A1 reference; panics on bad input.
pub fn a1(reference: &str) -> (u32, u32) {
    let r = parse_a1_notation(reference).unwrap_or_else(|| panic!("bad reference {reference}"));
    (r.row_start, r.col_start)
}

/// Logical range of an `A1:B2` reference; panics on bad input.
pub fn a1_range(reference: &str) -> CellRange {
    parse_a1_notation(reference)
        .unwrap_or_else(|| panic!("bad reference {reference}"))
        .to_range()
}

/// Builder for a [`PatchBatch`] targeting one sheet at a time.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    incremental: bool,
    sheet_idx: usize,
    patches: Vec<DisplayPatch>,
}

impl BatchBuilder {
    /// A full-refresh batch for sheet 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incremental(mut self) -> Self {
        self.incremental = true;
        self
    }

    /// Direct the following patches at sheet `idx`.
    pub fn sheet(mut self, idx: usize) -> Self {
        self.sheet_idx = idx;
        self
    }

    fn value(mut self, reference: &str, value: CellValue, formula: Option<&str>) -> Self {
        let (row, col) = a1(reference);
        self.patches.push(DisplayPatch::Values {
            sheet_idx: self.sheet_idx,
            values: vec![ValueEntry {
                row,
                col,
                formula: formula.map(str::to_string),
                value: Some(value),
            }],
        });
        self
    }

    pub fn number(self, reference: &str, n: f64) -> Self {
        self.value(reference, CellValue::Number(n), None)
    }

    pub fn text(self, reference: &str, s: &str) -> Self {
        self.value(reference, CellValue::Str(s.to_string()), None)
    }

    pub fn boolean(self, reference: &str, b: bool) -> Self {
        self.value(reference, CellValue::Bool(b), None)
    }

    pub fn formula(self, reference: &str, formula: &str, result: f64) -> Self {
        self.value(reference, CellValue::Number(result), Some(formula))
    }

    pub fn style(mut self, reference: &str, style: CellStyle) -> Self {
        let (row, col) = a1(reference);
        self.patches.push(DisplayPatch::Styles {
            sheet_idx: self.sheet_idx,
            styles: vec![StyleEntry { row, col, style }],
        });
        self
    }

    /// Row height in points.
    pub fn row_height(mut self, row: u32, height: f64) -> Self {
        self.patches.push(DisplayPatch::RowInfo {
            sheet_idx: self.sheet_idx,
            info: vec![RowInfo {
                idx: row,
                height,
                hidden: false,
            }],
        });
        self
    }

    pub fn hide_row(mut self, row: u32) -> Self {
        self.patches.push(DisplayPatch::RowInfo {
            sheet_idx: self.sheet_idx,
            info: vec![RowInfo {
                idx: row,
                height: 15.0,
                hidden: true,
            }],
        });
        self
    }

    /// Column width in points.
    pub fn col_width(mut self, col: u32, width: f64) -> Self {
        self.patches.push(DisplayPatch::ColInfo {
            sheet_idx: self.sheet_idx,
            info: vec![ColInfo {
                idx: col,
                width,
                hidden: false,
            }],
        });
        self
    }

    pub fn merge(mut self, reference: &str) -> Self {
        self.patches.push(DisplayPatch::MergeCells {
            sheet_idx: self.sheet_idx,
            merge_cells: vec![a1_range(reference)],
        });
        self
    }

    pub fn comment(mut self, reference: &str, text: &str) -> Self {
        let (row, col) = a1(reference);
        self.patches.push(DisplayPatch::Comments {
            sheet_idx: self.sheet_idx,
            comments: vec![CellComment {
                row,
                col,
                author: None,
                text: text.to_string(),
            }],
        });
        self
    }

    pub fn frozen(mut self, rows: u32, cols: u32) -> Self {
        self.patches.push(DisplayPatch::Frozen {
            sheet_idx: self.sheet_idx,
            frozen: Some(FrozenPanes { rows, cols }),
        });
        self
    }

    pub fn sheet_names(mut self, names: &[&str]) -> Self {
        self.patches.push(DisplayPatch::SheetNames {
            names: names.iter().map(|n| (*n).to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> PatchBatch {
        PatchBatch {
            incremental: self.incremental,
            patches: self.patches,
        }
    }

    /// The batch as the JSON a JS engine would send.
    pub fn to_json(self) -> String {
        serde_json::to_string(&self.build()).unwrap()
    }
}
