//! PageSpeed Insights client
//!
//! Queries the PageSpeed Insights v5 API for a URL and keeps the performance
//! score (rescaled to 0-100) and the diagnostic items.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, warn};

/// Default base URL for the PageSpeed API
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Error message reported in place of results
pub const PAGE_SPEED_FAILED: &str = "Failed to fetch PageSpeed insights.";

/// Default timeout for PageSpeed requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Error type for PageSpeed requests
#[derive(Debug, Error)]
pub enum PageSpeedError {
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

    /// The response lacked a performance score
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

impl From<PageSpeedError> for crate::Error {
    fn from(err: PageSpeedError) -> Self {
        match err {
            PageSpeedError::Http(e) => crate::Error::Http(e),
            PageSpeedError::Api {
                status_code,
                message,
            } => crate::Error::Api {
                status_code,
                message,
            },
            PageSpeedError::UnexpectedResponse(message) => {
                crate::Error::UnexpectedResponse(message)
            }
        }
    }
}

/// Page-speed section of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSpeedReport {
    /// Lighthouse performance results
    Metrics {
        /// Performance score in [0, 100]
        performance: f64,
        /// Diagnostic audit items
        suggestions: Vec<Value>,
    },
    /// The request failed
    Failed {
        /// Fixed failure message
        error: String,
    },
}

impl PageSpeedReport {
    /// The failure sentinel
    pub fn failed() -> Self {
        PageSpeedReport::Failed {
            error: PAGE_SPEED_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunPagespeedResponse {
    lighthouse_result: LighthouseResult,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    categories: Categories,
    #[serde(default)]
    audits: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Categories {
    performance: Category,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

/// Client for the PageSpeed Insights API
#[derive(Clone)]
pub struct PageSpeedClient {
    client: ReqwestClient,
    api_key: String,
    base_url: String,
    strategy: Option<String>,
}

impl std::fmt::Debug for PageSpeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSpeedClient")
            .field("base_url", &self.base_url)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl PageSpeedClient {
    /// Create a client against the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self, PageSpeedError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            strategy: None,
        })
    }

    /// Point the client at another host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the analysis strategy (`mobile` or `desktop`)
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Run an analysis and keep the performance score and diagnostics
    #[instrument(skip(self))]
    pub async fn run(&self, url: &str) -> Result<PageSpeedReport, PageSpeedError> {
        let endpoint = format!(
            "{}/pagespeedonline/v5/runPagespeed",
            self.base_url.trim_end_matches('/')
        );
        let mut query = vec![("url", url), ("key", self.api_key.as_str())];
        if let Some(strategy) = &self.strategy {
            query.push(("strategy", strategy.as_str()));
        }

        let response = self.client.get(endpoint).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageSpeedError::Api {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: RunPagespeedResponse = response.json().await?;
        let score = body.lighthouse_result.categories.performance.score.ok_or_else(|| {
            PageSpeedError::UnexpectedResponse("missing performance score".to_string())
        })?;

        let suggestions = body
            .lighthouse_result
            .audits
            .get("diagnostics")
            .and_then(|audit| audit.pointer("/details/items"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(PageSpeedReport::Metrics {
            performance: score * 100.0,
            suggestions,
        })
    }

    /// Run an analysis, reporting any failure as the fixed error sentinel
    pub async fn analyze(&self, url: &str) -> PageSpeedReport {
        match self.run(url).await {
            Ok(report) => report,
            Err(e) => {
                warn!(url, error = %e, "PageSpeed analysis failed");
                PageSpeedReport::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_run_extracts_score_and_diagnostics() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/pagespeedonline/v5/runPagespeed")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), "https://example.com/".into()),
                Matcher::UrlEncoded("key".into(), "psi-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "lighthouseResult": {
                        "categories": { "performance": { "score": 0.87 } },
                        "audits": {
                            "diagnostics": { "details": { "items": [{ "numRequests": 42 }] } }
                        }
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = PageSpeedClient::new("psi-key").unwrap().with_base_url(server.url());
        let report = client.run("https://example.com/").await.unwrap();

        match report {
            PageSpeedReport::Metrics {
                performance,
                suggestions,
            } => {
                assert!((performance - 87.0).abs() < 1e-9);
                assert_eq!(suggestions, vec![serde_json::json!({ "numRequests": 42 })]);
            }
            other => panic!("expected metrics, got {:?}", other),
        }

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_diagnostics_is_empty_list() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/pagespeedonline/v5/runPagespeed")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"lighthouseResult":{"categories":{"performance":{"score":1}}}}"#)
            .create_async()
            .await;

        let client = PageSpeedClient::new("k").unwrap().with_base_url(server.url());
        let report = client.analyze("https://example.com/").await;

        assert_eq!(
            report,
            PageSpeedReport::Metrics {
                performance: 100.0,
                suggestions: Vec::new(),
            }
        );

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_failure_is_sentinel() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/pagespeedonline/v5/runPagespeed")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = PageSpeedClient::new("k").unwrap().with_base_url(server.url());
        let report = client.analyze("https://example.com/").await;

        assert_eq!(report, PageSpeedReport::failed());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "error": PAGE_SPEED_FAILED })
        );

        mock_server.assert_async().await;
    }
}
