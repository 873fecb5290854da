//! Common test utilities and assertion helpers.
//!
//! Sessions here talk to a [`QueueClient`], so tests can inspect every
//! transaction the view sends to the engine.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

// Re-export fixtures for convenience
pub use super::fixtures::*;

use sheetview::engine::{EditPayload, QueueClient};
use sheetview::layout::ViewRange;
use sheetview::render::DrawOp;
use sheetview::{Session, Settings};

/// Tolerance for pixel comparisons after pt/px conversions.
pub const PX_EPSILON: f64 = 1e-6;

// ============================================================================
// Session Helpers
// ============================================================================

/// A session with default settings on a `width` x `height` canvas, plus a
/// handle on its outbound queue.
pub fn session(width: f64, height: f64) -> (Session, QueueClient) {
    session_with(Settings::default(), width, height)
}

pub fn session_with(settings: Settings, width: f64, height: f64) -> (Session, QueueClient) {
    let client = QueueClient::new();
    let mut session = Session::new(settings, Box::new(client.clone()));
    session.resize_viewport(width, height);
    session.take_dirty();
    (session, client)
}

/// Every payload sent so far, flattened across transactions.
pub fn sent_payloads(client: &QueueClient) -> Vec<EditPayload> {
    client.take().into_iter().flat_map(|tx| tx.payloads).collect()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

pub fn assert_px(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < PX_EPSILON,
        "expected {expected}px, got {actual}px"
    );
}

/// Row indices of the visible row headers, in paint order.
pub fn visible_rows(view: &ViewRange) -> Vec<u32> {
    view.rows.iter().map(|r| r.coordinate.start_row).collect()
}

/// Column indices of the visible column headers, in paint order.
pub fn visible_cols(view: &ViewRange) -> Vec<u32> {
    view.cols.iter().map(|c| c.coordinate.start_col).collect()
}

/// The first `FillText` op drawing exactly `text`.
pub fn find_text<'a>(ops: &'a [DrawOp], text: &str) -> Option<&'a DrawOp> {
    ops.iter()
        .find(|op| matches!(op, DrawOp::FillText { text: t, .. } if t == text))
}

/// Fill colors of every `FillRect` op covering the point `(x, y)`.
pub fn fills_at(ops: &[DrawOp], x: f64, y: f64) -> Vec<&str> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { rect, color }
                if rect.start_col <= x && x <= rect.end_col && rect.start_row <= y && y <= rect.end_row =>
            {
                Some(color.as_str())
            }
            _ => None,
        })
        .collect()
}
