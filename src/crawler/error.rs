//! Error types for the crawler module

use crate::error::Error as CrateError;
use reqwest::StatusCode;
use thiserror::Error;

/// Error type for fetching a page
///
/// Every failure of a page fetch ends up here; the `Display` output is the
/// human-readable message carried into logs and error payloads.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, TLS or timeout failure
    #[error("Error crawling {url}: {source}")]
    Http {
        /// URL that was requested
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status at or above the configured threshold
    #[error("Error crawling {url}: request failed with status code {status}")]
    Status {
        /// URL that was requested
        url: String,
        /// Status returned by the server
        status: StatusCode,
    },

    /// The URL could not be parsed
    #[error("Error crawling {url}: invalid URL ({source})")]
    UrlParse {
        /// URL that was requested
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    /// URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            FetchError::Http { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::UrlParse { url, .. } => url,
        }
    }

    /// The failed-crawl record as it appears in JSON payloads
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        CrateError::Crawl(err.to_string())
    }
}
