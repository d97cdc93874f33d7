//! Error types for vManage operations

use thiserror::Error;

/// Result type alias for vManage operations
pub type Result<T> = std::result::Result<T, VManageError>;

/// vManage client errors
#[derive(Error, Debug)]
pub enum VManageError {
    /// Base or request URL is malformed or not `https`
    #[error("Invalid vManage URL: {0}")]
    UrlValidation(String),

    /// Login, token retrieval or cookie extraction failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authenticated GET failed or returned a malformed envelope
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Event query failed; wraps the underlying fetch error
    #[error("Event query failed: {0}")]
    Query(#[source] Box<VManageError>),

    /// Interface reset was rejected by the controller
    #[error("Interface reset failed (status {status}): {body}")]
    Reset { status: u16, body: String },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VManageError {
    /// Wrap a fetch failure as an event query failure
    pub(crate) fn query(inner: VManageError) -> Self {
        VManageError::Query(Box::new(inner))
    }

    /// Returns true if the controller rejected the credentials or session
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, VManageError::Authentication(_))
    }

    /// Returns true if the error was raised before any network call
    pub fn is_url_error(&self) -> bool {
        matches!(self, VManageError::UrlValidation(_))
    }
}

/// Replace every line break (`\r\n`, `\r` or `\n`) with a single space.
pub fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Squeeze all whitespace runs to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full single-line description of a transport error, including its causes
pub(crate) fn transport_message(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    collapse_line_breaks(&text)
}
