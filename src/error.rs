//! Structured error types for gridview.
//!
//! Geometry never fails: out-of-range pixels and indexes clamp. Errors are
//! reserved for misuse of the gesture protocol, unknown object ids, bad
//! settings documents, and collaborator refusals.

/// All errors that can occur while driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A pointer-down arrived while another gesture still owns the channel.
    #[error("gesture {0} is still active")]
    GestureActive(u64),

    /// A move/release was delivered with a token that no longer owns the channel.
    #[error("stale gesture token {0}")]
    StaleGesture(u64),

    /// No floating object with this id.
    #[error("unknown floating object: {0}")]
    UnknownObject(String),

    /// Settings document could not be parsed.
    #[error("Settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// The cell store refused an operation (autofill over merges, paste shape mismatch, ...).
    #[error("Cell store refused: {0}")]
    Refused(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
