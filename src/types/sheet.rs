use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CellRange, Comment};
use crate::units::pt_to_px;

/// Explicit height for one row, in points.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowInfo {
    pub idx: u32,
    pub height: f64,
    #[serde(default)]
    pub hidden: bool,
}

/// Explicit width for one column, in points.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColInfo {
    pub idx: u32,
    pub width: f64,
    #[serde(default)]
    pub hidden: bool,
}

impl RowInfo {
    /// Rendered height in pixels; hidden rows take no space.
    pub fn px(&self) -> f64 {
        if self.hidden {
            0.0
        } else {
            pt_to_px(self.height)
        }
    }
}

impl ColInfo {
    /// Rendered width in pixels; hidden columns take no space.
    pub fn px(&self) -> f64 {
        if self.hidden {
            0.0
        } else {
            pt_to_px(self.width)
        }
    }
}

/// Frozen pane split: the first `rows` rows and `cols` columns never scroll.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FrozenPanes {
    pub rows: u32,
    pub cols: u32,
}

/// Rectangular region reserved for an embedded widget.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub range: CellRange,
}

/// Per-sheet metadata.
///
/// `width`/`height` are running sums of the explicit column widths and row
/// heights in pixels. They are adjusted by deltas as size patches arrive.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Furthest horizontal extent reached by scrolling
    pub view_width: f64,
    /// Furthest vertical extent reached by scrolling
    pub view_height: f64,
    pub merges: Vec<CellRange>,
    #[serde(skip)]
    pub comments: HashMap<(u32, u32), Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen: Option<FrozenPanes>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn frozen_rows(&self) -> u32 {
        self.frozen.map_or(0, |f| f.rows)
    }

    pub fn frozen_cols(&self) -> u32 {
        self.frozen.map_or(0, |f| f.cols)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_row_has_no_height() {
        let row = RowInfo {
            idx: 3,
            height: 15.0,
            hidden: true,
        };
        assert_eq!(row.px(), 0.0);
        let col = ColInfo {
            idx: 0,
            width: 48.0,
            hidden: false,
        };
        assert_eq!(col.px(), 64.0);
    }
}
