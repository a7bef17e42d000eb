//! # Fetcher Configuration Module
//!
//! Configuration for the page fetcher: the header set sent to target sites,
//! the certificate policy, the status threshold that counts as success and
//! whether body text is extracted. Uses the same builder pattern as the rest
//! of the crate.
//!
//! The defaults mimic a desktop browser and tolerate self-signed or
//! misconfigured certificates, since target sites are arbitrary.

use std::time::Duration;

/// User agent sent with every page request
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header sent with every page request
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept-Language header sent with every page request
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Configuration for the fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User agent to use for requests
    pub user_agent: String,

    /// Accept header
    pub accept: String,

    /// Accept-Language header
    pub accept_language: String,

    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,

    /// Statuses below this value count as success. `None` accepts every status.
    pub max_status: Option<u16>,

    /// Request timeout. `None` leaves the client default (no timeout).
    pub timeout: Option<Duration>,

    /// Whether to extract the visible body text
    pub include_body_text: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: BROWSER_ACCEPT.to_string(),
            accept_language: BROWSER_ACCEPT_LANGUAGE.to_string(),
            accept_invalid_certs: true,
            max_status: Some(400),
            timeout: Some(Duration::from_secs(30)),
            include_body_text: true,
        }
    }
}

/// Builder for FetcherConfig
#[derive(Debug, Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: FetcherConfig::default(),
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the Accept-Language header
    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.config.accept_language = accept_language.into();
        self
    }

    /// Set whether invalid TLS certificates are accepted
    pub fn accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.config.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Set the exclusive status threshold for success
    pub fn max_status(mut self, max_status: Option<u16>) -> Self {
        self.config.max_status = max_status;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set whether body text is extracted
    pub fn include_body_text(mut self, include_body_text: bool) -> Self {
        self.config.include_body_text = include_body_text;
        self
    }

    /// Build the configuration
    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

impl FetcherConfig {
    /// Create a new builder
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::new()
    }

    /// Whether a response status counts as success
    pub fn is_success(&self, status: u16) -> bool {
        self.max_status.is_none_or(|max| status < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_threshold() {
        let config = FetcherConfig::default();

        assert!(config.is_success(200));
        assert!(config.is_success(304));
        assert!(!config.is_success(400));
        assert!(!config.is_success(503));
    }

    #[test]
    fn test_permissive_status_threshold() {
        let config = FetcherConfig::builder().max_status(None).build();

        assert!(config.is_success(404));
        assert!(config.is_success(500));
    }

    #[test]
    fn test_builder() {
        let config = FetcherConfig::builder()
            .user_agent("rivalscope-test")
            .accept_invalid_certs(false)
            .include_body_text(false)
            .timeout(None)
            .build();

        assert_eq!(config.user_agent, "rivalscope-test");
        assert_eq!(config.accept, BROWSER_ACCEPT);
        assert!(!config.accept_invalid_certs);
        assert!(!config.include_body_text);
        assert!(config.timeout.is_none());
    }
}
