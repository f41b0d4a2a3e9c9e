//! Error types for the board renderer

use thiserror::Error;

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, rendering or serving boards
#[derive(Error, Debug)]
pub enum Error {
    /// A player record carries a field that cannot be interpreted.
    /// Callers skip the record instead of failing the whole render.
    #[error("Invalid token field `{field}`: {reason}")]
    InvalidTokenField { field: &'static str, reason: String },

    /// Failed to draw or encode the board
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Typeface could not be loaded
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Malformed request payload
    #[error("Invalid request: {0}")]
    RequestError(String),

    /// HTTP listener error
    #[cfg(feature = "server")]
    #[error("Server error: {0}")]
    ServerError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::RequestError(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::RenderError(err.to_string())
    }
}

impl Error {
    /// Whether the error is local to a single token (and therefore skippable)
    pub fn is_token_local(&self) -> bool {
        matches!(self, Error::InvalidTokenField { .. })
    }
}
