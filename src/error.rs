//! Custom error types for scholarstats.
//!
//! Every fetch and extraction step returns `Result<T, ScholarError>`; callers
//! render the error instead of propagating it past the report.

use thiserror::Error;

/// Main error type for scholarstats operations.
#[derive(Debug, Error)]
pub enum ScholarError {
    /// Network-level failure (DNS, connect, timeout, body read)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP error: {code} - {message}")]
    HttpStatus {
        /// Status code returned by the server
        code: u16,
        /// Status line or reason
        message: String,
    },

    /// Expected page structure missing or malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid client configuration (proxy, base URL, ...)
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using `ScholarError`
pub type Result<T> = std::result::Result<T, ScholarError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| ScholarError::Parse(msg.to_string()))
    }
}
