//! Page fetching for the crawler module

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client as ReqwestClient;
use tracing::{debug, info, instrument};
use url::Url;

use crate::crawler::content_extraction::extract_metadata;
use crate::crawler::error::FetchError;
use crate::crawler::{FetcherConfig, SiteMetadata};

/// Fetches pages with a browser-like header set
#[derive(Debug, Clone)]
pub struct Fetcher {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Configuration the client was built from
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher from a configuration
    pub fn new(config: FetcherConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT, header_value(&config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);

        let mut builder = ReqwestClient::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// The configuration in use
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch the raw HTML of a page
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::UrlParse {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !self.config.is_success(status.as_u16()) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        debug!(status = %status, bytes = html.len(), "Fetched page");
        Ok(html)
    }

    /// Fetch a page and extract its metadata
    pub async fn crawl(&self, url: &str) -> Result<SiteMetadata, FetchError> {
        self.crawl_with_body(url, self.config.include_body_text).await
    }

    /// Fetch a page and extract its metadata, overriding the body-text setting
    #[instrument(skip(self))]
    pub async fn crawl_with_body(
        &self,
        url: &str,
        include_body_text: bool,
    ) -> Result<SiteMetadata, FetchError> {
        info!("Crawling {}", url);
        let html = self.fetch(url).await?;
        Ok(extract_metadata(&html, include_body_text))
    }
}

fn header_value(value: &str) -> crate::Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| crate::Error::InvalidRequest(format!("Invalid header value '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::config::{BROWSER_ACCEPT_LANGUAGE, BROWSER_USER_AGENT};
    use mockito::Server;

    const PAGE: &str = r#"<html><head><title>Test Page</title>
        <meta name="description" content="A test page"></head>
        <body><a href="/a">A</a><a href="/b">B</a> Some   text</body></html>"#;

    #[tokio::test]
    async fn test_crawl_success_sends_browser_headers() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/")
            .match_header("user-agent", BROWSER_USER_AGENT)
            .match_header("accept-language", BROWSER_ACCEPT_LANGUAGE)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .expect(1)
            .create_async()
            .await;

        let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
        let metadata = fetcher.crawl(&format!("{}/", server.url())).await.unwrap();

        assert_eq!(metadata.title, "Test Page");
        assert_eq!(metadata.description, "A test page");
        assert_eq!(metadata.links, vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(metadata.body_text.as_deref(), Some("AB Some text"));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;

        match result {
            Err(FetchError::Status { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {:?}", other),
        }

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_permissive_threshold_accepts_error_status() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/gone")
            .with_status(410)
            .with_body("<title>Gone</title>")
            .create_async()
            .await;

        let config = FetcherConfig::builder().max_status(None).build();
        let fetcher = Fetcher::new(config).unwrap();
        let metadata = fetcher.crawl(&format!("{}/gone", server.url())).await.unwrap();

        assert_eq!(metadata.title, "Gone");

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_fetch_error() {
        let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
        let result = fetcher.fetch("http://nonexistent.invalid/").await;

        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
        assert!(err.to_string().starts_with("Error crawling http://nonexistent.invalid/"));
    }

    #[tokio::test]
    async fn test_unparsable_url_is_fetch_error() {
        let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
        let result = fetcher.fetch("http://").await;

        assert!(matches!(result, Err(FetchError::UrlParse { .. })));
    }
}
