//! Data types shared by the cache, layout and renderer.

mod cell;
mod range;
mod selection;
mod sheet;
mod style;

pub use cell::*;
pub use range::*;
pub use selection::*;
pub use sheet::*;
pub use style::*;
