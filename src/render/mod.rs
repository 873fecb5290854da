//! Rendering with pluggable canvas backends.
//!
//! This module provides:
//! - The backend-agnostic [`Canvas`] trait
//! - A Canvas 2D backend over `web-sys` (wasm32 only)
//! - A recording backend producing a serializable display list
//! - The sheet painter, headers and color utilities

pub mod backend;
pub mod cache;
pub mod canvas;
pub mod colors;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use backend::{Canvas, LineStyle, RenderParams, TextAlign, TextBaseline, TextPaint};
pub use cache::{LruCache, TextMeasureCache};
pub use canvas::SheetRenderer;
pub use colors::{palette, parse_color, CssColor};
pub use recording::{DrawOp, RecordingCanvas};

#[cfg(target_arch = "wasm32")]
pub use web::WebCanvas;
