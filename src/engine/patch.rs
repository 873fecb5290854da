//! Inbound display patches from the calculation engine.

use serde::{Deserialize, Serialize};

use crate::data::{CellComment, DataService, SheetUpdate};
use crate::types::{
    Block, CellPatch, CellRange, CellStyle, CellValue, ColInfo, FrozenPanes, RowInfo,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueEntry {
    pub row: u32,
    pub col: u32,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub value: Option<CellValue>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleEntry {
    pub row: u32,
    pub col: u32,
    pub style: CellStyle,
}

/// One display update.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DisplayPatch {
    Values {
        sheet_idx: usize,
        values: Vec<ValueEntry>,
    },
    Styles {
        sheet_idx: usize,
        styles: Vec<StyleEntry>,
    },
    RowInfo {
        sheet_idx: usize,
        info: Vec<RowInfo>,
    },
    ColInfo {
        sheet_idx: usize,
        info: Vec<ColInfo>,
    },
    /// Ordered names of every sheet in the document
    SheetNames { names: Vec<String> },
    MergeCells {
        sheet_idx: usize,
        merge_cells: Vec<CellRange>,
    },
    Comments {
        sheet_idx: usize,
        comments: Vec<CellComment>,
    },
    Blocks {
        sheet_idx: usize,
        blocks: Vec<Block>,
    },
    Frozen {
        sheet_idx: usize,
        #[serde(default)]
        frozen: Option<FrozenPanes>,
    },
}

impl DisplayPatch {
    /// Whether the patch moves rows/columns around, invalidating geometry.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::RowInfo { .. } | Self::ColInfo { .. } | Self::MergeCells { .. } | Self::Frozen { .. }
        )
    }
}

/// A batch of patches. A non-incremental batch replaces what is displayed.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchBatch {
    #[serde(default)]
    pub incremental: bool,
    #[serde(default)]
    pub patches: Vec<DisplayPatch>,
}

impl PatchBatch {
    /// Parse a batch from JSON text.
    ///
    /// # Errors
    /// Returns `Json` if the text is not a valid batch.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Apply every patch of `batch` to the cache, clearing the active sheet
/// first when the batch is not incremental.
pub fn apply_batch(data: &mut DataService, batch: PatchBatch) {
    if !batch.incremental {
        log::trace!("full refresh: clearing active sheet");
        data.clear();
    }
    let structural = batch.patches.iter().filter(|p| p.is_structural()).count();
    if structural > 0 {
        log::debug!("{structural} of {} patches change sheet geometry", batch.patches.len());
    }
    for patch in batch.patches {
        apply_patch(data, patch);
    }
}

fn apply_patch(data: &mut DataService, patch: DisplayPatch) {
    match patch {
        DisplayPatch::Values { sheet_idx, values } => {
            log::trace!("values: {} cells on sheet {sheet_idx}", values.len());
            for v in values {
                data.set_cell(
                    v.row,
                    v.col,
                    Some(sheet_idx),
                    CellPatch {
                        style: None,
                        value: v.value,
                        formula: v.formula,
                    },
                );
            }
        }
        DisplayPatch::Styles { sheet_idx, styles } => {
            log::trace!("styles: {} cells on sheet {sheet_idx}", styles.len());
            for s in styles {
                data.set_cell(
                    s.row,
                    s.col,
                    Some(sheet_idx),
                    CellPatch {
                        style: Some(s.style),
                        ..CellPatch::default()
                    },
                );
            }
        }
        DisplayPatch::RowInfo { sheet_idx, info } => {
            for row in info {
                data.set_row_info(row.idx, row, Some(sheet_idx));
            }
        }
        DisplayPatch::ColInfo { sheet_idx, info } => {
            for col in info {
                data.set_col_info(col.idx, col, Some(sheet_idx));
            }
        }
        DisplayPatch::SheetNames { names } => {
            if names.is_empty() {
                log::warn!("ignoring empty sheetNames patch");
                return;
            }
            let count = names.len();
            for (idx, name) in names.into_iter().enumerate() {
                data.set_sheet(
                    idx,
                    SheetUpdate {
                        name: Some(name),
                        ..SheetUpdate::default()
                    },
                );
            }
            data.truncate_sheets(count);
        }
        DisplayPatch::MergeCells {
            sheet_idx,
            merge_cells,
        } => {
            let (valid, malformed): (Vec<_>, Vec<_>) =
                merge_cells.into_iter().partition(CellRange::is_well_formed);
            if !malformed.is_empty() {
                log::warn!("dropping {} inverted merge ranges", malformed.len());
            }
            data.set_sheet(
                sheet_idx,
                SheetUpdate {
                    merges: Some(valid),
                    ..SheetUpdate::default()
                },
            );
        }
        DisplayPatch::Comments {
            sheet_idx,
            comments,
        } => data.set_sheet(
            sheet_idx,
            SheetUpdate {
                comments: Some(comments),
                ..SheetUpdate::default()
            },
        ),
        DisplayPatch::Blocks { sheet_idx, blocks } => data.set_blocks(sheet_idx, blocks),
        DisplayPatch::Frozen { sheet_idx, frozen } => data.set_frozen(sheet_idx, frozen),
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
    fn test_batch_from_json() {
        let batch = PatchBatch::from_json(
            r#"{
                "incremental": false,
                "patches": [
                    {"type": "values", "sheetIdx": 0,
                     "values": [{"row": 0, "col": 0, "value": {"type": "number", "value": 42}}]},
                    {"type": "rowInfo", "sheetIdx": 0, "info": [{"idx": 0, "height": 20}]},
                    {"type": "mergeCells", "sheetIdx": 0,
                     "mergeCells": [{"startRow": 1, "startCol": 1, "endRow": 2, "endCol": 2}]}
                ]
            }"#,
        )
        .unwrap();
        assert!(!batch.incremental);
        assert_eq!(batch.patches.len(), 3);
        assert!(batch.patches[1].is_structural());
        assert!(!batch.patches[0].is_structural());
    }

    #[test]
    fn test_full_refresh_clears_first() {
        let mut data = DataService::default();
        data.set_cell(5, 5, None, CellPatch::default());
        apply_batch(
            &mut data,
            PatchBatch {
                incremental: false,
                patches: vec![DisplayPatch::Values {
                    sheet_idx: 0,
                    values: vec![ValueEntry {
                        row: 0,
                        col: 0,
                        formula: None,
                        value: Some(CellValue::Number(1.0)),
                    }],
                }],
            },
        );
        assert!(data.get_cell(5, 5, None).is_none());
        assert!(data.get_cell(0, 0, None).is_some());
    }

    #[test]
    fn test_incremental_keeps_cache() {
        let mut data = DataService::default();
        data.set_cell(5, 5, None, CellPatch::default());
        apply_batch(
            &mut data,
            PatchBatch {
                incremental: true,
                patches: vec![DisplayPatch::Frozen {
                    sheet_idx: 0,
                    frozen: Some(FrozenPanes { rows: 1, cols: 0 }),
                }],
            },
        );
        assert!(data.get_cell(5, 5, None).is_some());
        assert_eq!(data.get_sheet(None).unwrap().frozen_rows(), 1);
    }

    #[test]
    fn test_sheet_names_rename_and_drop() {
        let mut data = DataService::default();
        data.new_sheet(None);
        data.new_sheet(None);
        apply_batch(
            &mut data,
            PatchBatch {
                incremental: true,
                patches: vec![DisplayPatch::SheetNames {
                    names: vec!["Income".to_string(), "Costs".to_string()],
                }],
            },
        );
        assert_eq!(data.sheet_names(), vec!["Income", "Costs"]);
    }
}
