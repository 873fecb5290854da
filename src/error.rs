//! Structured error types for sheetview.
//!
//! Cache misses are never errors (lookups return `None` or a default-sized
//! value); only invalid coordinate input and broken preconditions surface here.

/// All errors that can occur in sheetview.
#[derive(Debug, thiserror::Error)]
pub enum SheetViewError {
    /// Invalid coordinate input (negative column index, malformed letters, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Render was requested without a canvas to paint on.
    #[error("No canvas element attached")]
    MissingCanvas,

    /// Rendering backend failure.
    #[error("Render error: {0}")]
    Render(String),

    /// Malformed inbound patch or settings object.
    #[error("Patch error: {0}")]
    Patch(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetViewError>;

impl SheetViewError {
    /// Shorthand for an [`SheetViewError::InvalidArgument`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<String> for SheetViewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SheetViewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SheetViewError> for wasm_bindgen::JsValue {
    fn from(e: SheetViewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
