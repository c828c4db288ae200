//! Error types for the widget core.

/// Top-level error type for the assistant widget.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The remote assistant service returned a failure or an unusable payload.
    #[error("api error: {0}")]
    Api(String),

    /// The network is unreachable (no connection could be established).
    #[error("network is offline")]
    Offline,

    /// Settings could not be serialized or persisted.
    #[error("settings error: {0}")]
    Settings(String),

    /// Speech recognition or synthesis error.
    #[error("speech error: {0}")]
    Speech(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, WidgetError>;
