//! Small cell decorations drawn on top of cell content.

use crate::render::backend::Canvas;
use crate::types::PixelRange;

/// Side length of the comment triangle.
const COMMENT_TRIANGLE: f64 = 6.0;

/// Comment marker: a small triangle in the top-right corner of the cell box.
pub fn paint_comment_marker(canvas: &mut dyn Canvas, rect: PixelRange, color: &str) {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    let size = COMMENT_TRIANGLE.min(rect.width()).min(rect.height());
    let (right, top) = (rect.end_col, rect.start_row);
    canvas.fill_polygon(&[(right - size, top), (right, top), (right, top + size)], color);
}
