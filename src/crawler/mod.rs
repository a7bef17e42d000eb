//! # Site Crawler Module
//!
//! Fetches a single page per site and turns it into a small metadata record
//! that the prompt layer can embed. Each analysed site (the user's and every
//! competitor) goes through here exactly once.
//!
//! ## Key Components
//!
//! - `FetcherConfig`: header set, certificate policy and success threshold
//! - `Fetcher`: issues the HTTP request and hands the body to the extractor
//! - `extract_metadata`: pure HTML → `SiteMetadata` extraction
//! - `FetchError`: every way a fetch can fail, with a readable message

pub mod config;
mod content_extraction;
mod error;
mod fetcher;

pub use config::FetcherConfig;
pub use content_extraction::{MAX_LINKS, collapse_whitespace, extract_metadata};
pub use error::FetchError;
pub use fetcher::Fetcher;

use serde::{Deserialize, Serialize};

/// Metadata extracted from a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    /// Title of the page, falling back to `og:title`
    pub title: String,

    /// Description of the page, falling back to `og:description`
    pub description: String,

    /// First anchors' hrefs in document order
    pub links: Vec<String>,

    /// Visible body text, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_metadata_serialization() {
        let metadata = SiteMetadata {
            title: "Test Page".to_string(),
            description: "Test description".to_string(),
            links: vec!["/about".to_string()],
            body_text: Some("Hello".to_string()),
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["title"], "Test Page");
        assert_eq!(json["bodyText"], "Hello");

        let without_body = SiteMetadata {
            body_text: None,
            ..metadata
        };
        let json = serde_json::to_value(&without_body).unwrap();
        assert!(json.get("bodyText").is_none());
    }
}
