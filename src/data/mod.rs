//! Sheet data cache.
//!
//! Holds everything the engine has told us about each sheet: cell values and
//! styles, explicit row/column sizes, merges, comments, frozen panes and
//! blocks. The cache is eventually consistent with the engine, so lookups on
//! unknown keys return `None` or a default-sized value and never fail.

mod size_index;

pub use size_index::{SizeIndex, SizeIter};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::settings::Settings;
use crate::types::{
    Block, CellPatch, CellRange, ColInfo, Comment, FrozenPanes, RowInfo, Sheet, StandardCell,
};
use crate::units::pt_to_px;

/// Comment as it arrives in a patch, positioned by coordinate.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellComment {
    pub row: u32,
    pub col: u32,
    #[serde(default)]
    pub author: Option<String>,
    pub text: String,
}

/// Partial sheet metadata update; `None` fields are left untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetUpdate {
    pub name: Option<String>,
    pub merges: Option<Vec<CellRange>>,
    pub comments: Option<Vec<CellComment>>,
}

/// Everything cached for one sheet.
#[derive(Debug, Clone)]
pub struct SheetData {
    sheet: Sheet,
    cells: HashMap<(u32, u32), StandardCell>,
    rows: HashMap<u32, RowInfo>,
    cols: HashMap<u32, ColInfo>,
    row_sizes: SizeIndex,
    col_sizes: SizeIndex,
    blocks: Vec<Block>,
}

impl SheetData {
    fn new(name: String, default_row_px: f64, default_col_px: f64) -> Self {
        Self {
            sheet: Sheet::new(name),
            cells: HashMap::new(),
            rows: HashMap::new(),
            cols: HashMap::new(),
            row_sizes: SizeIndex::new(default_row_px),
            col_sizes: SizeIndex::new(default_col_px),
            blocks: Vec::new(),
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn row_sizes(&self) -> &SizeIndex {
        &self.row_sizes
    }

    pub fn col_sizes(&self) -> &SizeIndex {
        &self.col_sizes
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&StandardCell> {
        self.cells.get(&(row, col))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Merge range containing `(row, col)`, if any.
    pub fn merge_covering(&self, row: u32, col: u32) -> Option<CellRange> {
        self.sheet
            .merges
            .iter()
            .find(|m| m.contains_cell(row, col))
            .copied()
    }
}

/// The per-document cache.
#[derive(Debug, Clone)]
pub struct DataService {
    sheets: Vec<SheetData>,
    active: usize,
    /// Row height in points used when no explicit info exists
    default_row_height: f64,
    /// Column width in points used when no explicit info exists
    default_col_width: f64,
}

impl Default for DataService {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl DataService {
    /// Create a cache holding a single empty sheet.
    pub fn new(settings: &Settings) -> Self {
        let mut service = Self {
            sheets: Vec::new(),
            active: 0,
            default_row_height: settings.default_row_height,
            default_col_width: settings.default_col_width,
        };
        service.new_sheet(None);
        service
    }

    fn blank_sheet(&self, name: String) -> SheetData {
        SheetData::new(
            name,
            pt_to_px(self.default_row_height),
            pt_to_px(self.default_col_width),
        )
    }

    fn resolve(&self, sheet: Option<usize>) -> usize {
        sheet.unwrap_or(self.active)
    }

    /// Mutable access to a sheet, creating any missing sheets up to `idx`.
    ///
    /// Patches for a sheet may arrive before its `sheetNames` entry.
    #[allow(clippy::indexing_slicing)]
    fn sheet_mut(&mut self, sheet: Option<usize>) -> &mut SheetData {
        let idx = self.resolve(sheet);
        while self.sheets.len() <= idx {
            log::trace!("creating placeholder sheet {}", self.sheets.len());
            let name = self.unused_sheet_name();
            let data = self.blank_sheet(name);
            self.sheets.push(data);
        }
        // idx < len after the loop above
        &mut self.sheets[idx]
    }

    pub fn sheet_data(&self, sheet: Option<usize>) -> Option<&SheetData> {
        self.sheets.get(self.resolve(sheet))
    }

    /// First "Sheet N" name that is not taken.
    fn unused_sheet_name(&self) -> String {
        let mut n = self.sheets.len() + 1;
        loop {
            let candidate = format!("Sheet{n}");
            if !self.sheets.iter().any(|s| s.sheet.name == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    // ---- cells ----

    /// Partially update a cell, creating it if needed. No bounds checks.
    pub fn set_cell(&mut self, row: u32, col: u32, sheet: Option<usize>, patch: CellPatch) {
        self.sheet_mut(sheet)
            .cells
            .entry((row, col))
            .or_default()
            .apply(patch);
    }

    pub fn get_cell(&self, row: u32, col: u32, sheet: Option<usize>) -> Option<&StandardCell> {
        self.sheet_data(sheet)?.cell(row, col)
    }

    // ---- row / column sizes ----

    /// Store explicit row info and adjust the sheet's running height by the delta.
    pub fn set_row_info(&mut self, row: u32, info: RowInfo, sheet: Option<usize>) {
        let data = self.sheet_mut(sheet);
        let info = RowInfo { idx: row, ..info };
        let new_px = info.px();
        match data.rows.insert(row, info) {
            Some(old) => data.sheet.height += new_px - old.px(),
            None => data.sheet.height += new_px,
        }
        data.row_sizes.set(row, new_px);
    }

    /// Store explicit column info and adjust the sheet's running width by the delta.
    pub fn set_col_info(&mut self, col: u32, info: ColInfo, sheet: Option<usize>) {
        let data = self.sheet_mut(sheet);
        let info = ColInfo { idx: col, ..info };
        let new_px = info.px();
        match data.cols.insert(col, info) {
            Some(old) => data.sheet.width += new_px - old.px(),
            None => data.sheet.width += new_px,
        }
        data.col_sizes.set(col, new_px);
    }

    /// Row info, default-sized when nothing explicit is cached.
    pub fn get_row_info(&self, row: u32, sheet: Option<usize>) -> RowInfo {
        self.sheet_data(sheet)
            .and_then(|d| d.rows.get(&row))
            .copied()
            .unwrap_or(RowInfo {
                idx: row,
                height: self.default_row_height,
                hidden: false,
            })
    }

    /// Column info, default-sized when nothing explicit is cached.
    pub fn get_col_info(&self, col: u32, sheet: Option<usize>) -> ColInfo {
        self.sheet_data(sheet)
            .and_then(|d| d.cols.get(&col))
            .copied()
            .unwrap_or(ColInfo {
                idx: col,
                width: self.default_col_width,
                hidden: false,
            })
    }

    // ---- sheets ----

    pub fn set_sheet(&mut self, idx: usize, update: SheetUpdate) {
        let data = self.sheet_mut(Some(idx));
        if let Some(name) = update.name {
            data.sheet.name = name;
        }
        if let Some(merges) = update.merges {
            data.sheet.merges = merges;
        }
        if let Some(comments) = update.comments {
            data.sheet.comments = comments
                .into_iter()
                .map(|c| {
                    (
                        (c.row, c.col),
                        Comment {
                            author: c.author,
                            text: c.text,
                        },
                    )
                })
                .collect();
        }
    }

    pub fn get_sheet(&self, idx: Option<usize>) -> Option<&Sheet> {
        self.sheet_data(idx).map(SheetData::sheet)
    }

    /// Append a sheet. Without a name, the first free "Sheet N" is used.
    pub fn new_sheet(&mut self, name: Option<&str>) -> &Sheet {
        let name = name.map_or_else(|| self.unused_sheet_name(), str::to_string);
        let data = self.blank_sheet(name);
        self.sheets.push(data);
        let idx = self.sheets.len() - 1;
        &self.sheet_mut(Some(idx)).sheet
    }

    /// Drop sheets past `len`, keeping at least one. The active sheet is
    /// clamped into range.
    pub fn truncate_sheets(&mut self, len: usize) {
        self.sheets.truncate(len.max(1));
        self.active = self.active.min(self.sheets.len() - 1);
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.sheet.name.as_str()).collect()
    }

    pub fn set_frozen(&mut self, idx: usize, frozen: Option<FrozenPanes>) {
        self.sheet_mut(Some(idx)).sheet.frozen = frozen.filter(|f| f.rows > 0 || f.cols > 0);
    }

    /// Grow the furthest horizontal extent reached by scrolling.
    pub fn update_max_width(&mut self, idx: Option<usize>, px: f64) {
        let sheet = &mut self.sheet_mut(idx).sheet;
        if px > sheet.view_width {
            sheet.view_width = px;
        }
    }

    /// Grow the furthest vertical extent reached by scrolling.
    pub fn update_max_height(&mut self, idx: Option<usize>, px: f64) {
        let sheet = &mut self.sheet_mut(idx).sheet;
        if px > sheet.view_height {
            sheet.view_height = px;
        }
    }

    pub fn comment_at(&self, row: u32, col: u32, sheet: Option<usize>) -> Option<&Comment> {
        self.get_sheet(sheet)?.comments.get(&(row, col))
    }

    pub fn merge_covering(&self, row: u32, col: u32, sheet: Option<usize>) -> Option<CellRange> {
        self.sheet_data(sheet)?.merge_covering(row, col)
    }

    // ---- blocks ----

    pub fn set_blocks(&mut self, idx: usize, blocks: Vec<Block>) {
        self.sheet_mut(Some(idx)).blocks = blocks;
    }

    pub fn get_blocks(&self, idx: Option<usize>) -> &[Block] {
        self.sheet_data(idx)
            .map(SheetData::blocks)
            .unwrap_or_default()
    }

    // ---- lifecycle ----

    /// Reset every cached cell, size, block, merge and comment of the active
    /// sheet. The sheet keeps its name.
    pub fn clear(&mut self) {
        let active = self.active;
        let name = match self.sheets.get(active) {
            Some(data) => data.sheet.name.clone(),
            None => return,
        };
        let blank = self.blank_sheet(name);
        if let Some(slot) = self.sheets.get_mut(active) {
            *slot = blank;
        }
    }

    /// Drop every sheet and start over with a single empty one.
    pub fn clear_all_data(&mut self) {
        self.sheets.clear();
        self.active = 0;
        self.new_sheet(None);
    }

    pub fn set_active_sheet(&mut self, idx: usize) {
        self.sheet_mut(Some(idx));
        self.active = idx;
    }

    pub fn get_active_sheet(&self) -> usize {
        self.active
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
    use crate::types::CellValue;

    fn row(height: f64) -> RowInfo {
        RowInfo {
            idx: 0,
            height,
            hidden: false,
        }
    }

    #[test]
    fn test_partial_cell_update() {
        let mut data = DataService::default();
        data.set_cell(
            3,
            4,
            Some(0),
            CellPatch {
                formula: Some("=1+1".to_string()),
                ..CellPatch::default()
            },
        );
        data.set_cell(
            3,
            4,
            Some(0),
            CellPatch {
                value: Some(CellValue::Number(2.0)),
                ..CellPatch::default()
            },
        );
        let cell = data.get_cell(3, 4, Some(0)).unwrap();
        assert_eq!(cell.formula, "=1+1");
        assert_eq!(cell.value, Some(CellValue::Number(2.0)));
        assert!(data.get_cell(0, 0, Some(0)).is_none());
    }

    #[test]
    fn test_running_height_uses_delta() {
        let mut data = DataService::default();
        // 15pt = 20px, 22.5pt = 30px
        data.set_row_info(0, row(15.0), None);
        assert_eq!(data.get_sheet(None).unwrap().height, 20.0);
        data.set_row_info(0, row(22.5), None);
        assert_eq!(data.get_sheet(None).unwrap().height, 30.0);
        data.set_row_info(4, row(15.0), None);
        assert_eq!(data.get_sheet(None).unwrap().height, 50.0);
    }

    #[test]
    fn test_hidden_row_leaves_total() {
        let mut data = DataService::default();
        data.set_row_info(2, row(15.0), None);
        data.set_row_info(
            2,
            RowInfo {
                idx: 2,
                height: 15.0,
                hidden: true,
            },
            None,
        );
        assert_eq!(data.get_sheet(None).unwrap().height, 0.0);
        assert_eq!(data.sheet_data(None).unwrap().row_sizes().size(2), 0.0);
    }

    #[test]
    fn test_missing_row_info_is_default() {
        let data = DataService::default();
        let info = data.get_row_info(99_999_999, None);
        assert_eq!(info.idx, 99_999_999);
        assert_eq!(info.height, 15.0);
        assert!(!info.hidden);
    }

    #[test]
    fn test_new_sheet_names_avoid_collisions() {
        let mut data = DataService::default();
        data.set_sheet(
            0,
            SheetUpdate {
                name: Some("Sheet2".to_string()),
                ..SheetUpdate::default()
            },
        );
        let name = data.new_sheet(None).name.clone();
        assert_eq!(name, "Sheet3");
        assert_eq!(data.new_sheet(Some("Data")).name, "Data");
        assert_eq!(data.sheet_names(), vec!["Sheet2", "Sheet3", "Data"]);
    }

    #[test]
    fn test_clear_keeps_name() {
        let mut data = DataService::default();
        data.set_sheet(
            0,
            SheetUpdate {
                name: Some("Budget".to_string()),
                merges: Some(vec![CellRange::new(0, 0, 1, 1)]),
                ..SheetUpdate::default()
            },
        );
        data.set_cell(1, 1, None, CellPatch::default());
        data.set_row_info(0, row(30.0), None);
        data.clear();
        let sheet = data.get_sheet(None).unwrap();
        assert_eq!(sheet.name, "Budget");
        assert!(sheet.merges.is_empty());
        assert_eq!(sheet.height, 0.0);
        assert!(data.get_cell(1, 1, None).is_none());
    }

    #[test]
    fn test_patch_for_unknown_sheet_creates_it() {
        let mut data = DataService::default();
        data.set_cell(0, 0, Some(2), CellPatch::default());
        assert_eq!(data.sheet_count(), 3);
        assert!(data.get_cell(0, 0, Some(2)).is_some());
        assert_eq!(data.get_active_sheet(), 0);
    }

    #[test]
    fn test_comments_and_merges() {
        let mut data = DataService::default();
        data.set_sheet(
            0,
            SheetUpdate {
                merges: Some(vec![CellRange::new(2, 2, 3, 4)]),
                comments: Some(vec![CellComment {
                    row: 1,
                    col: 1,
                    author: None,
                    text: "check".to_string(),
                }]),
                ..SheetUpdate::default()
            },
        );
        assert_eq!(data.comment_at(1, 1, None).unwrap().text, "check");
        assert!(data.comment_at(1, 2, None).is_none());
        assert_eq!(
            data.merge_covering(3, 3, None),
            Some(CellRange::new(2, 2, 3, 4))
        );
        assert_eq!(data.merge_covering(4, 4, None), None);
    }

    #[test]
    fn test_view_extent_only_grows() {
        let mut data = DataService::default();
        data.update_max_height(None, 500.0);
        data.update_max_height(None, 300.0);
        assert_eq!(data.get_sheet(None).unwrap().view_height, 500.0);
    }
}
