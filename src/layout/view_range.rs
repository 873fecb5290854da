//! Visible row/column/cell computation.
//!
//! A [`ViewRange`] is derived output: it is rebuilt from scratch on every
//! scroll, resize or structural patch and never patched in place.

use serde::Serialize;

use super::ScrollPos;
use crate::data::{SheetData, SizeIndex};
use crate::settings::Settings;
use crate::types::{CellRange, FrozenPanes, PixelRange};

/// One visible unit: a logical coordinate and its pixel box on the canvas.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCell {
    pub coordinate: CellRange,
    pub position: PixelRange,
}

/// Two render cells are the same unit when their pixel boxes match,
/// whatever their content.
impl PartialEq for RenderCell {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

/// Visible row headers, column headers and data cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewRange {
    pub rows: Vec<RenderCell>,
    pub cols: Vec<RenderCell>,
    pub cells: Vec<RenderCell>,
}

impl ViewRange {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    /// Render cell for the logical cell `(row, col)` if it is visible.
    pub fn cell(&self, row: u32, col: u32) -> Option<&RenderCell> {
        self.cells
            .iter()
            .find(|c| c.coordinate.start_row == row && c.coordinate.start_col == col)
    }

    /// Pixel band of a visible row header.
    pub fn row(&self, row: u32) -> Option<&RenderCell> {
        self.rows.iter().find(|r| r.coordinate.start_row == row)
    }

    /// Pixel band of a visible column header.
    pub fn col(&self, col: u32) -> Option<&RenderCell> {
        self.cols.iter().find(|c| c.coordinate.start_col == col)
    }
}

/// A visible band along one axis, relative to the data area origin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Band {
    idx: u32,
    start: f64,
    end: f64,
}

/// Geometry snapshot of one sheet, used to build view ranges.
#[derive(Debug, Clone, Copy)]
pub struct ViewRangeBuilder<'a> {
    pub rows: &'a SizeIndex,
    pub cols: &'a SizeIndex,
    pub frozen: FrozenPanes,
    pub header_width: f64,
    pub header_height: f64,
    pub max_rows: u32,
    pub max_cols: u32,
}

impl<'a> ViewRangeBuilder<'a> {
    pub fn new(data: &'a SheetData, settings: &Settings) -> Self {
        Self {
            rows: data.row_sizes(),
            cols: data.col_sizes(),
            frozen: data.sheet().frozen.unwrap_or_default(),
            header_width: settings.row_header_width,
            header_height: settings.col_header_height,
            max_rows: settings.max_rows,
            max_cols: settings.max_cols,
        }
    }

    /// Full content width in pixels.
    pub fn content_width(&self) -> f64 {
        self.cols.offset(self.max_cols)
    }

    /// Full content height in pixels.
    pub fn content_height(&self) -> f64 {
        self.rows.offset(self.max_rows)
    }

    /// Width of the frozen column band in pixels.
    pub fn frozen_width(&self) -> f64 {
        self.cols.offset(self.frozen.cols.min(self.max_cols))
    }

    /// Height of the frozen row band in pixels.
    pub fn frozen_height(&self) -> f64 {
        self.rows.offset(self.frozen.rows.min(self.max_rows))
    }

    /// Compute the visible units for a data area of `viewport_width` x
    /// `viewport_height` pixels (headers excluded) at the given scroll offset.
    ///
    /// Work is proportional to the number of visible rows and columns plus
    /// a binary search over the explicit size entries.
    pub fn build(&self, viewport_width: f64, viewport_height: f64, scroll: ScrollPos) -> ViewRange {
        if !(viewport_width > 0.0 && viewport_height > 0.0) {
            log::debug!("empty viewport {viewport_width}x{viewport_height}");
            return ViewRange::default();
        }
        let scroll = scroll.clamped();
        let row_bands = visible_bands(
            self.rows,
            self.frozen.rows,
            self.max_rows,
            scroll.y,
            viewport_height,
        );
        let col_bands = visible_bands(
            self.cols,
            self.frozen.cols,
            self.max_cols,
            scroll.x,
            viewport_width,
        );

        let (hw, hh) = (self.header_width, self.header_height);
        let last_row = self.max_rows.saturating_sub(1);
        let last_col = self.max_cols.saturating_sub(1);

        let rows = row_bands
            .iter()
            .map(|b| RenderCell {
                coordinate: CellRange::new(b.idx, 0, b.idx, last_col),
                position: PixelRange::new(hh + b.start, 0.0, hh + b.end, hw),
            })
            .collect();
        let cols = col_bands
            .iter()
            .map(|b| RenderCell {
                coordinate: CellRange::new(0, b.idx, last_row, b.idx),
                position: PixelRange::new(0.0, hw + b.start, hh, hw + b.end),
            })
            .collect();
        let mut cells = Vec::with_capacity(row_bands.len() * col_bands.len());
        for r in &row_bands {
            for c in &col_bands {
                cells.push(RenderCell {
                    coordinate: CellRange::point(r.idx, c.idx),
                    position: PixelRange::new(hh + r.start, hw + c.start, hh + r.end, hw + c.end),
                });
            }
        }

        log::debug!(
            "view range: {} rows x {} cols at scroll ({}, {})",
            row_bands.len(),
            col_bands.len(),
            scroll.x,
            scroll.y
        );
        ViewRange { rows, cols, cells }
    }
}

/// Visible bands along one axis: the frozen band at fixed positions from
/// offset 0, then the scrollable indices starting right after it.
fn visible_bands(index: &SizeIndex, frozen: u32, count: u32, scroll: f64, extent: f64) -> Vec<Band> {
    let mut bands = Vec::new();
    let frozen = frozen.min(count);

    for (idx, start, size) in index.iter_from(0).take_while(|(idx, ..)| *idx < frozen) {
        if start >= extent {
            break;
        }
        if size > 0.0 {
            bands.push(Band {
                idx,
                start,
                end: start + size,
            });
        }
    }

    let frozen_extent = index.offset(frozen);
    let (first, _) = index.index_at(frozen_extent + scroll);
    let first = first.max(frozen);
    // Nothing past the last explicit entry can be hidden unless the default is.
    let tail_is_empty = index.default_px() <= 0.0;
    let last_explicit = index.last_explicit();

    for (idx, start, size) in index.iter_from(first) {
        if idx >= count {
            break;
        }
        let pos = start - scroll;
        if pos >= extent {
            break;
        }
        if size > 0.0 {
            bands.push(Band {
                idx,
                start: pos,
                end: pos + size,
            });
        } else if tail_is_empty && last_explicit.map_or(true, |last| idx > last) {
            break;
        }
    }
    bands
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
    use crate::data::DataService;
    use crate::types::RowInfo;

    fn build(data: &DataService, w: f64, h: f64, x: f64, y: f64) -> ViewRange {
        let settings = Settings::default();
        ViewRangeBuilder::new(data.sheet_data(None).unwrap(), &settings).build(
            w,
            h,
            ScrollPos { x, y },
        )
    }

    #[test]
    fn test_first_cell_sits_after_headers() {
        let data = DataService::default();
        let vr = build(&data, 100.0, 100.0, 0.0, 0.0);
        let first = vr.cells[0];
        assert_eq!(first.coordinate, CellRange::new(0, 0, 0, 0));
        assert_eq!(first.position, PixelRange::new(20.0, 40.0, 40.0, 104.0));
        // 100 / 20 rows, ceil(100 / 64) cols
        assert_eq!(vr.rows.len(), 5);
        assert_eq!(vr.cols.len(), 2);
        assert_eq!(vr.cells.len(), 10);
    }

    #[test]
    fn test_partial_first_row() {
        let data = DataService::default();
        let vr = build(&data, 100.0, 100.0, 0.0, 30.0);
        assert_eq!(vr.rows[0].coordinate.start_row, 1);
        assert_eq!(vr.rows[0].position.start_row, 20.0 - 10.0);
        assert_eq!(vr.rows.len(), 6);
    }

    #[test]
    fn test_hidden_rows_are_skipped() {
        let mut data = DataService::default();
        data.set_row_info(
            1,
            RowInfo {
                idx: 1,
                height: 15.0,
                hidden: true,
            },
            None,
        );
        let vr = build(&data, 64.0, 60.0, 0.0, 0.0);
        let rows: Vec<u32> = vr.rows.iter().map(|r| r.coordinate.start_row).collect();
        assert_eq!(rows, vec![0, 2, 3]);
        assert_eq!(vr.rows[1].position.start_row, 40.0);
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let data = DataService::default();
        assert!(build(&data, 0.0, 100.0, 0.0, 0.0).is_empty());
        assert!(build(&data, 100.0, 0.0, 0.0, 0.0).cells.is_empty());
    }

    #[test]
    fn test_negative_scroll_is_clamped() {
        let data = DataService::default();
        assert_eq!(
            build(&data, 100.0, 100.0, -50.0, -50.0),
            build(&data, 100.0, 100.0, 0.0, 0.0)
        );
    }
}
