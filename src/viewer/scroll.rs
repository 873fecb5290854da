//! Scroll handling for a [`Session`].
//!
//! Includes wheel delta normalization and the clamped scroll update that
//! also grows the sheet's scrollable extent.

use crate::layout::{ScrollPos, ViewRangeBuilder};
use crate::session::{Session, SessionEvent};

/// `WheelEvent.deltaMode` values.
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

/// Convert a wheel delta to pixels.
///
/// Line deltas scroll by `line_px` per line; page deltas by one viewport
/// (`page_width`/`page_height`). Unknown modes are taken as pixels.
pub fn wheel_delta_px(
    delta_x: f64,
    delta_y: f64,
    delta_mode: u32,
    line_px: f64,
    page_width: f64,
    page_height: f64,
) -> (f64, f64) {
    match delta_mode {
        DOM_DELTA_LINE => (delta_x * line_px, delta_y * line_px),
        DOM_DELTA_PAGE => (delta_x * page_width, delta_y * page_height),
        _ => (delta_x, delta_y),
    }
}

impl Session {
    /// Scroll by a pixel delta, clamped to the content.
    ///
    /// Returns the delta actually applied, or `None` when the position did
    /// not change.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> Option<ScrollPos> {
        let data = self.data.sheet_data(None)?;
        let geometry = ViewRangeBuilder::new(data, &self.settings);
        let applied = self.viewport.scroll_by(dx, dy, &geometry);
        if applied.x.abs() <= f64::EPSILON && applied.y.abs() <= f64::EPSILON {
            return None;
        }
        let reach_x = self.viewport.scroll.x + self.viewport.data_width(&geometry);
        let reach_y = self.viewport.scroll.y + self.viewport.data_height(&geometry);
        self.data.update_max_width(None, reach_x);
        self.data.update_max_height(None, reach_y);
        self.mark_dirty(SessionEvent::ViewChanged);
        Some(applied)
    }

    /// Jump to an absolute scroll position, clamped to the content.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> Option<ScrollPos> {
        let current = self.viewport.scroll;
        self.scroll_by(x - current.x, y - current.y)
    }

    pub fn scroll_pos(&self) -> ScrollPos {
        self.viewport.scroll
    }

    /// Scroll just enough to bring `(row, col)` fully into the scrollable
    /// pane. Frozen cells are always visible and never scroll.
    pub fn scroll_into_view(&mut self, row: u32, col: u32) -> Option<ScrollPos> {
        let data = self.data.sheet_data(None)?;
        let geometry = ViewRangeBuilder::new(data, &self.settings);
        let pane_w = self.viewport.data_width(&geometry) - geometry.frozen_width();
        let pane_h = self.viewport.data_height(&geometry) - geometry.frozen_height();
        let scroll = self.viewport.scroll;

        let target_x = if col < geometry.frozen.cols {
            scroll.x
        } else {
            let start = geometry.cols.offset(col) - geometry.frozen_width();
            let end = start + geometry.cols.size(col);
            fit(scroll.x, start, end, pane_w)
        };
        let target_y = if row < geometry.frozen.rows {
            scroll.y
        } else {
            let start = geometry.rows.offset(row) - geometry.frozen_height();
            let end = start + geometry.rows.size(row);
            fit(scroll.y, start, end, pane_h)
        };
        self.scroll_to(target_x, target_y)
    }
}

/// Smallest move of `scroll` that shows `[start, end)` in a pane of
/// `extent` pixels; the leading edge wins when the band does not fit.
fn fit(scroll: f64, start: f64, end: f64, extent: f64) -> f64 {
    if start < scroll || end - start > extent {
        start
    } else if end > scroll + extent {
        end - extent
    } else {
        scroll
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
    use crate::engine::QueueClient;
    use crate::settings::Settings;
    use test_case::test_case;

    fn session() -> Session {
        let mut session = Session::new(Settings::default(), Box::new(QueueClient::new()));
        session.resize_viewport(440.0, 220.0);
        session.take_dirty();
        session
    }

    #[test_case(0, 3.0, -2.0 => (3.0, -2.0) ; "pixels")]
    #[test_case(1, 3.0, -2.0 => (60.0, -40.0) ; "lines")]
    #[test_case(2, 1.0, 1.0 => (400.0, 200.0) ; "pages")]
    fn test_wheel_delta(mode: u32, dx: f64, dy: f64) -> (f64, f64) {
        wheel_delta_px(dx, dy, mode, 20.0, 400.0, 200.0)
    }

    #[test]
    fn test_scroll_clamps_and_marks_dirty() {
        let mut s = session();
        assert!(s.scroll_by(-10.0, -10.0).is_none());
        assert!(!s.is_dirty());

        let applied = s.scroll_by(0.0, 100.0).unwrap();
        assert_eq!(applied, ScrollPos::new(0.0, 100.0));
        assert!(s.take_dirty());
        assert_eq!(s.view_range().rows[0].coordinate.start_row, 5);
    }

    #[test]
    fn test_scroll_grows_sheet_extent() {
        let mut s = session();
        s.scroll_by(0.0, 1000.0);
        let sheet = s.data().get_sheet(None).unwrap();
        assert!(sheet.view_height >= 1200.0);
    }

    #[test]
    fn test_scroll_into_view() {
        let mut s = session();
        // 10 rows of 20px fit; row 15 ends at 320
        s.scroll_into_view(15, 0).unwrap();
        assert_eq!(s.scroll_pos(), ScrollPos::new(0.0, 120.0));
        // Already visible: nothing to do
        assert!(s.scroll_into_view(10, 0).is_none());
        s.scroll_into_view(2, 0).unwrap();
        assert_eq!(s.scroll_pos().y, 40.0);
    }
}
