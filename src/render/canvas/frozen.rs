//! Frozen pane divider lines.

use super::headers::FrozenBand;
use crate::render::backend::{Canvas, LineStyle};
use crate::render::colors::palette;

/// Lines along the bottom of the frozen rows and the right of the frozen
/// columns, across the data area.
pub fn paint_frozen_dividers(canvas: &mut dyn Canvas, frozen: FrozenBand, header_width: f64, header_height: f64) {
    let (width, height) = (canvas.width(), canvas.height());
    let line = LineStyle::solid(1.0, palette::FROZEN_DIVIDER);
    if frozen.rows > 0 {
        let y = header_height + frozen.height;
        canvas.stroke_line(header_width, y, width, y, &line);
    }
    if frozen.cols > 0 {
        let x = header_width + frozen.width;
        canvas.stroke_line(x, header_height, x, height, &line);
    }
}
