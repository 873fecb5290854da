//! Outbound edit requests.

use serde::{Deserialize, Serialize};

use crate::types::CellRange;

/// Typed content of a committed edit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellInputValue {
    Number(f64),
    Bool(bool),
    Text(String),
    /// Formula text including the leading `=`
    Formula(String),
}

/// One edit request. The engine applies or rejects it and answers through
/// the patch stream.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditPayload {
    CellInput {
        sheet_idx: usize,
        row: u32,
        col: u32,
        input: CellInputValue,
    },
    /// Height in points
    SetRowHeight {
        sheet_idx: usize,
        row: u32,
        height: f64,
    },
    /// Width in points
    SetColWidth {
        sheet_idx: usize,
        col: u32,
        width: f64,
    },
    InsertRows {
        sheet_idx: usize,
        start: u32,
        count: u32,
    },
    DeleteRows {
        sheet_idx: usize,
        start: u32,
        count: u32,
    },
    InsertCols {
        sheet_idx: usize,
        start: u32,
        count: u32,
    },
    DeleteCols {
        sheet_idx: usize,
        start: u32,
        count: u32,
    },
    MergeCells {
        sheet_idx: usize,
        range: CellRange,
    },
    SplitMergedCells {
        sheet_idx: usize,
        range: CellRange,
    },
    SheetRename {
        sheet_idx: usize,
        name: String,
    },
    /// Insert a sheet at `sheet_idx`
    CreateSheet {
        sheet_idx: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    DeleteSheet {
        sheet_idx: usize,
    },
    SetFrozen {
        sheet_idx: usize,
        rows: u32,
        cols: u32,
    },
}

impl EditPayload {
    pub fn sheet_idx(&self) -> usize {
        match self {
            Self::CellInput { sheet_idx, .. }
            | Self::SetRowHeight { sheet_idx, .. }
            | Self::SetColWidth { sheet_idx, .. }
            | Self::InsertRows { sheet_idx, .. }
            | Self::DeleteRows { sheet_idx, .. }
            | Self::InsertCols { sheet_idx, .. }
            | Self::DeleteCols { sheet_idx, .. }
            | Self::MergeCells { sheet_idx, .. }
            | Self::SplitMergedCells { sheet_idx, .. }
            | Self::SheetRename { sheet_idx, .. }
            | Self::CreateSheet { sheet_idx, .. }
            | Self::DeleteSheet { sheet_idx }
            | Self::SetFrozen { sheet_idx, .. } => *sheet_idx,
        }
    }
}

/// Payloads submitted together; `undoable` controls whether the engine
/// records them on its undo stack.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub payloads: Vec<EditPayload>,
    pub undoable: bool,
}

impl Transaction {
    pub fn new(payloads: Vec<EditPayload>) -> Self {
        Self {
            payloads,
            undoable: true,
        }
    }

    pub fn single(payload: EditPayload) -> Self {
        Self::new(vec![payload])
    }

    #[must_use]
    pub fn not_undoable(mut self) -> Self {
        self.undoable = false;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let tx = Transaction::single(EditPayload::SetRowHeight {
            sheet_idx: 1,
            row: 4,
            height: 30.0,
        });
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["undoable"], true);
        assert_eq!(json["payloads"][0]["type"], "setRowHeight");
        assert_eq!(json["payloads"][0]["sheetIdx"], 1);
        assert_eq!(json["payloads"][0]["height"], 30.0);
    }

    #[test]
    fn test_cell_input_value_tag() {
        let json = serde_json::to_string(&CellInputValue::Formula("=A1".to_string())).unwrap();
        assert_eq!(json, r#"{"type":"formula","value":"=A1"}"#);
    }

    #[test]
    fn test_sheet_idx_accessor() {
        assert_eq!(EditPayload::DeleteSheet { sheet_idx: 3 }.sheet_idx(), 3);
    }
}
