use serde::{Deserialize, Serialize};

/// Axis-aligned inclusive rectangle.
///
/// The same shape is used for logical coordinates ([`CellRange`], row/col
/// indices) and physical positions ([`PixelRange`], where the "row" axis is
/// Y and the "col" axis is X). The two are distinct types so they cannot be
/// mixed without going through the layout code.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range<T> {
    pub start_row: T,
    pub start_col: T,
    pub end_row: T,
    pub end_col: T,
}

/// Logical range of rows/columns.
pub type CellRange = Range<u32>;

/// Pixel box; rows are Y, columns are X.
pub type PixelRange = Range<f64>;

impl<T: Copy + PartialOrd> Range<T> {
    pub const fn new(start_row: T, start_col: T, end_row: T, end_col: T) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Degenerate single-point range.
    pub const fn point(row: T, col: T) -> Self {
        Self::new(row, col, row, col)
    }

    /// True if `start <= end` on both axes.
    pub fn is_well_formed(&self) -> bool {
        self.start_row <= self.end_row && self.start_col <= self.end_col
    }

    /// True if this range fully contains `other` (shared edges count).
    pub fn cover(&self, other: &Self) -> bool {
        self.start_row <= other.start_row
            && self.start_col <= other.start_col
            && self.end_row >= other.end_row
            && self.end_col >= other.end_col
    }

    /// True if the two ranges share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }
}

impl CellRange {
    /// True if the logical cell `(row, col)` lies inside this range.
    pub fn contains_cell(&self, row: u32, col: u32) -> bool {
        self.cover(&Self::point(row, col))
    }
}

impl PixelRange {
    /// Pixel box from an origin and a size.
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(y, x, y + height, x + width)
    }

    pub fn x(&self) -> f64 {
        self.start_col
    }

    pub fn y(&self) -> f64 {
        self.start_row
    }

    pub fn width(&self) -> f64 {
        self.end_col - self.start_col
    }

    pub fn height(&self) -> f64 {
        self.end_row - self.start_row
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.start_row.min(other.start_row),
            self.start_col.min(other.start_col),
            self.end_row.max(other.end_row),
            self.end_col.max(other.end_col),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_is_reflexive() {
        let r = CellRange::new(1, 2, 3, 4);
        assert!(r.cover(&r));
        let p = PixelRange::new(0.5, 1.5, 20.0, 64.0);
        assert!(p.cover(&p));
    }

    #[test]
    fn test_mutual_cover_implies_equal() {
        let a = CellRange::new(0, 0, 5, 5);
        let b = CellRange::new(0, 0, 5, 5);
        let c = CellRange::new(0, 0, 5, 4);
        assert!(a.cover(&b) && b.cover(&a));
        assert_eq!(a, b);
        assert!(a.cover(&c));
        assert!(!c.cover(&a));
    }

    #[test]
    fn test_point_and_contains() {
        let r = CellRange::new(2, 2, 4, 4);
        assert!(r.contains_cell(2, 4));
        assert!(!r.contains_cell(5, 3));
        assert!(CellRange::point(7, 7).is_well_formed());
        assert!(!CellRange::new(3, 0, 2, 0).is_well_formed());
    }

    #[test]
    fn test_pixel_geometry() {
        let p = PixelRange::from_origin(10.0, 20.0, 64.0, 20.0);
        assert!((p.width() - 64.0).abs() < f64::EPSILON);
        assert!((p.height() - 20.0).abs() < f64::EPSILON);
        assert!(p.intersects(&PixelRange::point(40.0, 74.0)));
        assert!(!p.intersects(&PixelRange::point(41.0, 75.0)));
    }
}
