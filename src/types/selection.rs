use super::CellRange;

/// Type of selection, decided by where the pointer went down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected from the row header band
    RowRange,
    /// Entire column(s) selected from the column header band
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

/// Current selection: an anchor cell plus the cell the drag reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub selection_type: SelectionType,
    pub anchor: (u32, u32),
    pub focus: (u32, u32),
}

impl Default for Selection {
    fn default() -> Self {
        Self::cell(0, 0)
    }
}

impl Selection {
    pub fn cell(row: u32, col: u32) -> Self {
        Self {
            selection_type: SelectionType::CellRange,
            anchor: (row, col),
            focus: (row, col),
        }
    }

    pub fn rows(start_row: u32, end_row: u32) -> Self {
        Self {
            selection_type: SelectionType::RowRange,
            anchor: (start_row, 0),
            focus: (end_row, u32::MAX),
        }
    }

    pub fn columns(start_col: u32, end_col: u32) -> Self {
        Self {
            selection_type: SelectionType::ColumnRange,
            anchor: (0, start_col),
            focus: (u32::MAX, end_col),
        }
    }

    pub fn all() -> Self {
        Self {
            selection_type: SelectionType::All,
            anchor: (0, 0),
            focus: (u32::MAX, u32::MAX),
        }
    }

    /// Extend the selection to `(row, col)`, keeping the anchor.
    pub fn extend_to(&mut self, row: u32, col: u32) {
        self.focus = match self.selection_type {
            SelectionType::CellRange => (row, col),
            SelectionType::RowRange => (row, u32::MAX),
            SelectionType::ColumnRange => (u32::MAX, col),
            SelectionType::All => self.focus,
        };
    }

    /// Normalized logical range.
    pub fn range(&self) -> CellRange {
        let (r1, c1) = self.anchor;
        let (r2, c2) = self.focus;
        CellRange::new(r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_normalized() {
        let mut sel = Selection::cell(5, 5);
        sel.extend_to(2, 7);
        assert_eq!(sel.range(), CellRange::new(2, 5, 5, 7));
    }

    #[test]
    fn test_row_selection_spans_all_columns() {
        let mut sel = Selection::rows(3, 3);
        sel.extend_to(1, 9);
        assert_eq!(sel.range(), CellRange::new(1, 0, 3, u32::MAX));
    }
}
