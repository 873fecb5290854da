//! Row height / column width drag resizing.
//!
//! A drag only produces a visual preview. On release the final size is
//! converted to points and sent to the engine; the cache changes when the
//! engine's patch arrives.

use serde::Serialize;

use crate::engine::EditPayload;
use crate::layout::{RenderCell, ViewRange};
use crate::units::px_to_pt;

/// Distance from a header border, in pixels, that still grabs it.
pub const RESIZE_HANDLE_TOLERANCE: f64 = 3.0;

/// Row or column being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "axis", content = "index", rename_all = "camelCase")]
pub enum ResizeTarget {
    Row(u32),
    Col(u32),
}

/// Live state of a resize drag, drawn as a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizePreview {
    pub target: ResizeTarget,
    /// Size the band would get, in pixels
    pub size_px: f64,
    /// Canvas position of the dragged trailing edge
    pub edge: f64,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    target: ResizeTarget,
    /// Pointer coordinate along the drag axis when the drag began
    origin: f64,
    /// Canvas position of the band's leading edge
    band_start: f64,
    start_size: f64,
    size: f64,
}

/// Tracks one header border drag at a time.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    drag: Option<Drag>,
    min_px: f64,
}

impl ResizeController {
    pub fn new(min_px: f64) -> Self {
        Self {
            drag: None,
            min_px: min_px.max(1.0),
        }
    }

    /// Start dragging the trailing border of `band`.
    ///
    /// `pointer` is the canvas coordinate along the drag axis (y for rows,
    /// x for columns). Any drag already in progress is replaced.
    pub fn begin(&mut self, target: ResizeTarget, pointer: f64, band: &RenderCell) {
        let (band_start, start_size) = match target {
            ResizeTarget::Row(_) => (band.position.start_row, band.position.height()),
            ResizeTarget::Col(_) => (band.position.start_col, band.position.width()),
        };
        self.drag = Some(Drag {
            target,
            origin: pointer,
            band_start,
            start_size,
            size: start_size,
        });
    }

    /// Move the drag to `pointer` and return the new preview.
    pub fn update(&mut self, pointer: f64) -> Option<ResizePreview> {
        let min_px = self.min_px;
        let drag = self.drag.as_mut()?;
        drag.size = (drag.start_size + pointer - drag.origin).max(min_px);
        Some(preview_of(drag))
    }

    pub fn preview(&self) -> Option<ResizePreview> {
        self.drag.as_ref().map(preview_of)
    }

    /// End the drag and build the payload for the engine.
    ///
    /// Returns `None` when no drag was active or the size did not change.
    pub fn finish(&mut self, sheet_idx: usize, ppi: f64) -> Option<EditPayload> {
        let drag = self.drag.take()?;
        if (drag.size - drag.start_size).abs() < f64::EPSILON {
            return None;
        }
        let size_pt = px_to_pt(drag.size, ppi);
        log::debug!("resize {:?} to {size_pt}pt", drag.target);
        Some(match drag.target {
            ResizeTarget::Row(row) => EditPayload::SetRowHeight {
                sheet_idx,
                row,
                height: size_pt,
            },
            ResizeTarget::Col(col) => EditPayload::SetColWidth {
                sheet_idx,
                col,
                width: size_pt,
            },
        })
    }

    /// Drop the drag and its preview. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Header border under the canvas point `(x, y)`, with the band whose
    /// trailing edge it is.
    ///
    /// Only borders inside the header bands count; `header_width` and
    /// `header_height` give their size.
    pub fn hit_edge(
        x: f64,
        y: f64,
        view: &ViewRange,
        header_width: f64,
        header_height: f64,
    ) -> Option<(ResizeTarget, RenderCell)> {
        if y >= 0.0 && y < header_height && x > header_width {
            return view
                .cols
                .iter()
                .find(|c| (x - c.position.end_col).abs() <= RESIZE_HANDLE_TOLERANCE)
                .map(|c| (ResizeTarget::Col(c.coordinate.start_col), *c));
        }
        if x >= 0.0 && x < header_width && y > header_height {
            return view
                .rows
                .iter()
                .find(|r| (y - r.position.end_row).abs() <= RESIZE_HANDLE_TOLERANCE)
                .map(|r| (ResizeTarget::Row(r.coordinate.start_row), *r));
        }
        None
    }
}

fn preview_of(drag: &Drag) -> ResizePreview {
    ResizePreview {
        target: drag.target,
        size_px: drag.size,
        edge: drag.band_start + drag.size,
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
    use crate::types::{CellRange, PixelRange};

    fn col_band() -> RenderCell {
        RenderCell {
            coordinate: CellRange::new(0, 2, 99, 2),
            position: PixelRange::new(0.0, 168.0, 20.0, 232.0),
        }
    }

    #[test]
    fn test_drag_updates_preview_only() {
        let mut ctl = ResizeController::new(4.0);
        ctl.begin(ResizeTarget::Col(2), 232.0, &col_band());
        let preview = ctl.update(268.0).unwrap();
        assert_eq!(preview.size_px, 100.0);
        assert_eq!(preview.edge, 268.0);
        assert!(ctl.is_active());
    }

    #[test]
    fn test_drag_is_clamped_to_minimum() {
        let mut ctl = ResizeController::new(4.0);
        ctl.begin(ResizeTarget::Col(2), 232.0, &col_band());
        let preview = ctl.update(0.0).unwrap();
        assert_eq!(preview.size_px, 4.0);
    }

    #[test]
    fn test_finish_converts_to_points() {
        let mut ctl = ResizeController::new(4.0);
        ctl.begin(ResizeTarget::Col(2), 232.0, &col_band());
        ctl.update(264.0);
        let payload = ctl.finish(1, 96.0).unwrap();
        assert_eq!(
            payload,
            EditPayload::SetColWidth {
                sheet_idx: 1,
                col: 2,
                width: 72.0,
            }
        );
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_unchanged_or_cancelled_drag_sends_nothing() {
        let mut ctl = ResizeController::new(4.0);
        ctl.begin(ResizeTarget::Col(2), 232.0, &col_band());
        assert!(ctl.finish(0, 96.0).is_none());

        ctl.begin(ResizeTarget::Col(2), 232.0, &col_band());
        ctl.update(300.0);
        assert!(ctl.cancel());
        assert!(ctl.preview().is_none());
        assert!(ctl.finish(0, 96.0).is_none());
    }

    #[test]
    fn test_hit_edge_in_header_bands_only() {
        let view = ViewRange {
            rows: vec![],
            cols: vec![col_band()],
            cells: vec![],
        };
        let (target, band) = ResizeController::hit_edge(233.0, 10.0, &view, 40.0, 20.0).unwrap();
        assert_eq!(target, ResizeTarget::Col(2));
        assert_eq!(band.position.end_col, 232.0);
        assert!(ResizeController::hit_edge(233.0, 30.0, &view, 40.0, 20.0).is_none());
        assert!(ResizeController::hit_edge(200.0, 10.0, &view, 40.0, 20.0).is_none());
    }
}
