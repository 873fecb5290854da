//! Viewport state: canvas size and scroll position.

use serde::{Deserialize, Serialize};

use super::ViewRangeBuilder;

/// Scroll offset in pixels, relative to the end of the frozen band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPos {
    pub x: f64,
    pub y: f64,
}

impl ScrollPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Negative or NaN offsets become 0.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }
}

/// Visible area of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scroll: ScrollPos,
    /// Canvas width in CSS pixels, headers included
    pub width: f64,
    /// Canvas height in CSS pixels, headers included
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll: ScrollPos::default(),
            width,
            height,
        }
    }

    /// Width of the data area, right of the row header band.
    pub fn data_width(&self, geometry: &ViewRangeBuilder<'_>) -> f64 {
        (self.width - geometry.header_width).max(0.0)
    }

    /// Height of the data area, below the column header band.
    pub fn data_height(&self, geometry: &ViewRangeBuilder<'_>) -> f64 {
        (self.height - geometry.header_height).max(0.0)
    }

    /// Largest scroll offset on each axis.
    ///
    /// The scrollable content is what lies beyond the frozen band, shown in
    /// the part of the data area not covered by it.
    pub fn max_scroll(&self, geometry: &ViewRangeBuilder<'_>) -> ScrollPos {
        let frozen_w = geometry.frozen_width();
        let frozen_h = geometry.frozen_height();
        let scrollable_w = geometry.content_width() - frozen_w;
        let scrollable_h = geometry.content_height() - frozen_h;
        let visible_w = self.data_width(geometry) - frozen_w;
        let visible_h = self.data_height(geometry) - frozen_h;
        ScrollPos {
            x: (scrollable_w - visible_w).max(0.0),
            y: (scrollable_h - visible_h).max(0.0),
        }
    }

    /// Clamp the scroll position into `[0, max_scroll]`.
    pub fn clamp_scroll(&mut self, geometry: &ViewRangeBuilder<'_>) {
        let max = self.max_scroll(geometry);
        let s = self.scroll.clamped();
        self.scroll = ScrollPos {
            x: s.x.min(max.x),
            y: s.y.min(max.y),
        };
    }

    /// Scroll by a delta and return the delta actually applied.
    pub fn scroll_by(&mut self, dx: f64, dy: f64, geometry: &ViewRangeBuilder<'_>) -> ScrollPos {
        let before = self.scroll;
        self.scroll.x += dx;
        self.scroll.y += dy;
        self.clamp_scroll(geometry);
        ScrollPos {
            x: self.scroll.x - before.x,
            y: self.scroll.y - before.y,
        }
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f64, y: f64, geometry: &ViewRangeBuilder<'_>) {
        self.scroll = ScrollPos { x, y };
        self.clamp_scroll(geometry);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }
}
