//! Core error types.

use thiserror::Error;

/// Result type alias using [`AssayError`].
pub type AssayResult<T> = Result<T, AssayError>;

/// Errors raised while building or reading test responses.
#[derive(Debug, Error)]
pub enum AssayError {
    /// Response body could not be collected.
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// Response body is not valid UTF-8.
    #[error("Body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl AssayError {
    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }
}
