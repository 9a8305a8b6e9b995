//! AI client error types.

use thiserror::Error;

/// Result type for AI client operations.
pub type AiResult<T> = Result<T, AiError>;

/// Errors that can occur talking to the remote AI endpoints.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("no summary was generated")]
    NoSummary,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
