//! Hit testing: which visible unit is under the pointer.

use serde::{Deserialize, Serialize};

use super::{RenderCell, ViewRange};
use crate::types::PixelRange;

/// Bounding rectangle of the canvas in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// What a pointer position resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    /// Top-left box where the header bands meet
    Corner,
    RowHeader(RenderCell),
    ColHeader(RenderCell),
    Cell(RenderCell),
    None,
}

impl MatchResult {
    /// Logical `(row, col)` for a data cell match.
    pub fn cell(&self) -> Option<(u32, u32)> {
        match self {
            Self::Cell(c) => Some((c.coordinate.start_row, c.coordinate.start_col)),
            _ => None,
        }
    }
}

/// Resolve a pointer in client coordinates against the current view range.
///
/// Priority is corner, row header, column header, data cell; the first hit
/// wins. The header band size is given by `corner_width`/`corner_height`.
pub fn match_point(
    pointer_x: f64,
    pointer_y: f64,
    canvas_rect: &CanvasRect,
    view_range: &ViewRange,
    corner_width: f64,
    corner_height: f64,
) -> MatchResult {
    let x = pointer_x - canvas_rect.left;
    let y = pointer_y - canvas_rect.top;
    if !(x >= 0.0 && y >= 0.0) {
        return MatchResult::None;
    }
    if x <= corner_width && y <= corner_height {
        return MatchResult::Corner;
    }
    let point = PixelRange::point(y, x);
    let hit = |cells: &[RenderCell]| cells.iter().find(|c| c.position.cover(&point)).copied();

    if let Some(row) = hit(&view_range.rows) {
        return MatchResult::RowHeader(row);
    }
    if let Some(col) = hit(&view_range.cols) {
        return MatchResult::ColHeader(col);
    }
    if let Some(cell) = hit(&view_range.cells) {
        return MatchResult::Cell(cell);
    }
    MatchResult::None
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
    use crate::types::CellRange;

    fn unit(coordinate: CellRange, position: PixelRange) -> RenderCell {
        RenderCell {
            coordinate,
            position,
        }
    }

    fn sample() -> ViewRange {
        ViewRange {
            rows: vec![unit(
                CellRange::new(0, 0, 0, 99),
                PixelRange::new(20.0, 0.0, 40.0, 40.0),
            )],
            cols: vec![unit(
                CellRange::new(0, 0, 99, 0),
                PixelRange::new(0.0, 40.0, 20.0, 104.0),
            )],
            cells: vec![unit(
                CellRange::point(0, 0),
                PixelRange::new(20.0, 40.0, 40.0, 104.0),
            )],
        }
    }

    #[test]
    fn test_offsets_by_canvas_origin() {
        let rect = CanvasRect {
            left: 100.0,
            top: 50.0,
            width: 300.0,
            height: 300.0,
        };
        let hit = match_point(150.0, 80.0, &rect, &sample(), 40.0, 20.0);
        assert_eq!(hit.cell(), Some((0, 0)));
        assert_eq!(
            match_point(10.0, 10.0, &rect, &sample(), 40.0, 20.0),
            MatchResult::None
        );
    }

    #[test]
    fn test_headers() {
        let rect = CanvasRect::default();
        assert!(matches!(
            match_point(10.0, 30.0, &rect, &sample(), 40.0, 20.0),
            MatchResult::RowHeader(_)
        ));
        assert!(matches!(
            match_point(60.0, 10.0, &rect, &sample(), 40.0, 20.0),
            MatchResult::ColHeader(_)
        ));
        assert_eq!(
            match_point(500.0, 500.0, &rect, &sample(), 40.0, 20.0),
            MatchResult::None
        );
    }
}
