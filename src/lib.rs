//! sheetview - canvas sheet view for a spreadsheet engine
//!
//! Displays, scrolls and edits a sheet whose contents are computed by an
//! external calculation engine, via WebAssembly and Canvas 2D:
//! - Sparse cache fed by engine display patches
//! - Visible-range computation over 10^8 rows without walking the sheet
//! - Frozen panes, merged cells, comments, number formats
//! - Row/column resize, selection and cell editing sent back as transactions
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SheetView } from 'sheetview';
//! await init();
//! const view = new SheetView(canvas, (tx) => engine.handle(tx), { showGridLines: true });
//! view.applyPatches(await engine.initialPatches());
//! ```

// Model and cache
pub mod cell_ref;
pub mod data;
pub mod engine;
pub mod error;
pub mod numfmt;
pub mod settings;
pub mod types;
pub mod units;

// View
pub mod editor;
pub mod layout;
pub mod render;
pub mod session;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{Result, SheetViewError};
pub use session::{ObserverId, Session, SessionEvent};
pub use settings::Settings;
pub use viewer::SheetView;

pub use types::*;

/// Column letters for a 0-based column index (`0 -> "A"`, `26 -> "AA"`).
///
/// # Errors
/// Rejects negative or fractional indices.
#[wasm_bindgen(js_name = "toA1Notation")]
pub fn column_letters(col: f64) -> std::result::Result<String, JsValue> {
    let col = cell_ref::col_index_from_f64(col).map_err(|e| JsValue::from_str(&e.to_string()))?;
    cell_ref::to_a1_notation(col).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse `A1` or `A1:B2` into `[startRow, startCol, endRow, endCol]`
/// (0-based), or `undefined` when the text is not a reference.
#[wasm_bindgen(js_name = "parseA1")]
pub fn parse_a1(input: &str) -> Option<Vec<u32>> {
    let range = cell_ref::parse_a1_notation(input)?.to_range();
    Some(vec![range.start_row, range.start_col, range.end_row, range.end_col])
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
