//! # SEO Analysis Module
//!
//! Turns a target URL into a competitor report. The assembler walks a fixed
//! sequence of stages (crawl, classify, score, compare, suggest) and the
//! normalizers validate each model answer before it enters the report.
//!
//! ## Key Components
//!
//! - `AnalysisOptions`: which optional sections to produce, competitor thresholds
//! - `ReportAssembler`: the per-request pipeline
//! - `normalize_*`: validation of classification, score and estimation answers
//! - `Report`: the aggregated, request-scoped result
//!
//! Only an invalid URL, an unreachable user site, too few competitors and a
//! failed completion for a required stage abort an analysis. Everything else
//! degrades to partial results.

mod assembler;
pub mod config;
mod error;
pub mod normalize;

pub use assembler::ReportAssembler;
pub use config::AnalysisOptions;
pub use error::AnalysisError;
pub use normalize::{normalize_estimation, normalize_purpose, normalize_score, parse_score};

use serde::{Deserialize, Serialize};

use crate::crawler::SiteMetadata;
use crate::insights::{PageSpeedReport, Readability};
use crate::model::ModelOutput;

/// Input of one analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// The site to analyse
    pub url: String,

    /// Competitors chosen by the caller instead of the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_urls: Option<Vec<String>>,
}

impl AnalysisRequest {
    /// Request for a URL, letting the model pick competitors
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            competitor_urls: None,
        }
    }

    /// Supply the competitor list
    pub fn with_competitors(mut self, competitor_urls: Vec<String>) -> Self {
        self.competitor_urls = Some(competitor_urls);
        self
    }
}

/// Industry classification and competitor list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurposeResult {
    /// Industry label
    pub category: String,

    /// Competitor URLs in the order the model gave them
    pub competitors: Vec<String>,
}

impl PurposeResult {
    /// Category used when classification fails
    pub const UNKNOWN: &'static str = "unknown";

    /// The failed-classification sentinel
    pub fn unknown() -> Self {
        Self {
            category: Self::UNKNOWN.to_string(),
            competitors: Vec::new(),
        }
    }
}

/// SEO score and the model's reasoning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Score in [0, 100], or `None` when the answer did not match the format
    pub score: Option<u8>,

    /// Explanation, or the whole answer when it did not match
    pub explanation: String,
}

/// A competitor that was fetched and scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorEntry {
    /// URL of the competitor
    pub url: String,

    /// Extracted metadata
    pub metadata: SiteMetadata,

    /// Score of the competitor's metadata
    pub seo_score: ScoreResult,
}

/// The analysed site's section of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSection {
    /// Extracted metadata
    pub metadata: SiteMetadata,

    /// Score of the metadata
    pub seo_score: Option<u8>,

    /// The model's reasoning for the score
    pub explanation: String,
}

/// A stage result that may have degraded to an error message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    /// The stage produced a value
    Ok(T),
    /// The stage failed; the report carries the message instead
    Failed {
        /// What went wrong
        error: String,
    },
}

impl<T> Outcome<T> {
    /// Wrap a failure message
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Outcome::Failed {
            error: error.to_string(),
        }
    }

    /// The value, if the stage succeeded
    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Failed { .. } => None,
        }
    }
}

/// The aggregated result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The URL that was analysed
    pub input_url: String,

    /// Detected industry
    pub purpose: String,

    /// The analysed site
    pub user: UserSection,

    /// Competitors that could be fetched, in order
    pub competitors: Vec<CompetitorEntry>,

    /// Improvement suggestions from the model
    pub suggestions: Outcome<ModelOutput>,

    /// PageSpeed Insights results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_speed: Option<PageSpeedReport>,

    /// Readability of the body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<Readability>,

    /// Estimated score increase in percentage points, as the model wrote it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimation_growth: Option<Outcome<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "competitorUrls": ["https://a.example"]}"#,
        )
        .unwrap();

        assert_eq!(
            request,
            AnalysisRequest::new("https://example.com")
                .with_competitors(vec!["https://a.example".to_string()])
        );
    }

    #[test]
    fn test_report_serialization() {
        let report = Report {
            input_url: "https://example.com".to_string(),
            purpose: "news".to_string(),
            user: UserSection {
                metadata: SiteMetadata::default(),
                seo_score: Some(70),
                explanation: "ok".to_string(),
            },
            competitors: vec![CompetitorEntry {
                url: "https://a.example".to_string(),
                metadata: SiteMetadata::default(),
                seo_score: ScoreResult {
                    score: None,
                    explanation: "unparsed".to_string(),
                },
            }],
            suggestions: Outcome::Ok(ModelOutput::Text("Add headings".to_string())),
            page_speed: None,
            readability: None,
            estimation_growth: Some(Outcome::failed("timed out")),
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["inputUrl"], "https://example.com");
        assert_eq!(json["user"]["seoScore"], 70);
        assert_eq!(json["competitors"][0]["seoScore"]["score"], serde_json::Value::Null);
        assert_eq!(json["suggestions"]["suggestion"], "Add headings");
        assert_eq!(json["estimationGrowth"]["error"], "timed out");
        assert!(json.get("pageSpeed").is_none());
        assert!(json.get("readability").is_none());
    }
}
