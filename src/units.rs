//! Point <-> pixel conversion.
//!
//! The engine speaks points (row heights, column widths, font sizes); the
//! canvas speaks CSS pixels.

/// CSS pixels per inch.
pub const CSS_PPI: f64 = 96.0;

/// Points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// Convert points to CSS pixels.
pub fn pt_to_px(pt: f64) -> f64 {
    pt * CSS_PPI / PT_PER_INCH
}

/// Convert pixels to points at the given pixel density.
///
/// With `ppi == 96` this is the exact inverse of [`pt_to_px`].
pub fn px_to_pt(px: f64, ppi: f64) -> f64 {
    px * PT_PER_INCH / ppi
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_px_round_trip() {
        assert_eq!(pt_to_px(72.0), 96.0);
        assert_eq!(pt_to_px(15.0), 20.0);
        assert_eq!(px_to_pt(20.0, CSS_PPI), 15.0);
        for pt in [0.0, 1.5, 11.0, 409.5] {
            assert!((px_to_pt(pt_to_px(pt), CSS_PPI) - pt).abs() < 1e-9);
        }
    }

    #[test]
    fn test_px_to_pt_honors_ppi() {
        assert_eq!(px_to_pt(144.0, 144.0), 72.0);
    }
}
