//! Sheet painting on top of the [`Canvas`](super::Canvas) abstraction.

mod frozen;
pub mod headers;
mod indicators;
mod renderer;

pub use renderer::SheetRenderer;
