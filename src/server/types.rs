//! Request and response bodies of the HTTP function

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;

/// Query string of `/api/analyze`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeQuery {
    /// Target URL; takes precedence over the body
    pub url: Option<String>,
}

/// JSON body of `/api/analyze`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    /// Target URL
    pub url: Option<String>,
    /// Competitors chosen by the caller
    pub competitor_urls: Option<Vec<String>>,
}

/// Error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error label
    pub error: String,
    /// Detail, omitted for client errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Payload for an aborted analysis
    pub fn from_analysis(err: &AnalysisError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: (!err.is_client_error()).then(|| err.to_string()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always true while the process serves requests
    pub healthy: bool,
    /// Crate version
    pub version: String,
}
