//! HTTP handlers for the analysis function

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::types::{AnalyzeBody, AnalyzeQuery, ErrorResponse, HealthResponse};
use crate::analysis::{AnalysisRequest, ReportAssembler};

/// Shared state of the router
#[derive(Clone)]
pub struct AppState {
    /// Pipeline shared by every request
    pub assembler: Arc<ReportAssembler>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run an analysis for the URL in the query string or the JSON body
pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
    body: Bytes,
) -> Response {
    let request = match build_request(query, &body) {
        Some(request) => request,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid or missing URL.".to_string(),
                    message: None,
                }),
            )
                .into_response();
        }
    };

    info!("Processing {}", request.url);
    match state.assembler.analyze(request).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) if err.is_client_error() => {
            warn!(error = %err, "Rejected analysis request");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::from_analysis(&err))).into_response()
        }
        Err(err) => {
            error!(error = %err, "Analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from_analysis(&err)),
            )
                .into_response()
        }
    }
}

/// Merge query and body; the query URL wins. A body that is not JSON is ignored.
fn build_request(query: AnalyzeQuery, body: &[u8]) -> Option<AnalysisRequest> {
    let body: AnalyzeBody = if body.is_empty() {
        AnalyzeBody::default()
    } else {
        serde_json::from_slice(body).unwrap_or_default()
    };

    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .or(body.url)
        .filter(|url| !url.trim().is_empty())?;

    Some(AnalysisRequest {
        url,
        competitor_urls: body.competitor_urls,
    })
}
