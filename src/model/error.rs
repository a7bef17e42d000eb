//! Error types for the model module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for completion requests
///
/// Only transport-level failures live here. A response that cannot be parsed
/// is not an error; it comes back as plain text in `ModelOutput`.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// The event stream was malformed
    #[error("Stream error: {0}")]
    Stream(String),

    /// Request serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<LlmError> for CrateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => CrateError::Http(e),
            LlmError::Json(e) => CrateError::Json(e),
            LlmError::Api {
                status_code,
                message,
            } => CrateError::Api {
                status_code,
                message,
            },
            LlmError::Stream(message) => CrateError::UnexpectedResponse(message),
        }
    }
}
