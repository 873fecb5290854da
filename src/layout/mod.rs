//! Layout: viewport state, visible-range computation and hit testing.
//!
//! This module handles:
//! - Building the [`ViewRange`] for a scroll offset without walking the sheet
//! - Managing viewport state (canvas size, clamped scroll position)
//! - Mapping pointer positions to header bands and cells

mod matcher;
mod view_range;
mod viewport;

pub use matcher::{match_point, CanvasRect, MatchResult};
pub use view_range::{RenderCell, ViewRange, ViewRangeBuilder};
pub use viewport::{ScrollPos, Viewport};
