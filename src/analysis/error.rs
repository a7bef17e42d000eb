//! Error types for the analysis module

use crate::crawler::FetchError;
use crate::error::Error as CrateError;
use crate::model::LlmError;
use thiserror::Error;

/// Conditions that abort an analysis
///
/// Everything recoverable (a competitor that cannot be fetched, an answer that
/// cannot be parsed) is absorbed by the assembler and never shows up here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input URL is missing or not an HTTP(S) URL
    #[error("Invalid or missing URL.")]
    InvalidUrl,

    /// The user's own page could not be fetched
    #[error(transparent)]
    PrimaryFetch(#[from] FetchError),

    /// Too few competitors to compare against
    #[error("Failed to retrieve competitor URLs (found {found}, need at least {required}).")]
    InsufficientCompetitors {
        /// Competitors available
        found: usize,
        /// Competitors required
        required: usize,
    },

    /// A required completion failed in transport
    #[error("Completion request failed: {0}")]
    Llm(#[from] LlmError),
}

impl AnalysisError {
    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidUrl)
    }

    /// Short label for the `error` field of error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUrl => "Invalid or missing URL.",
            AnalysisError::PrimaryFetch(_) => "Failed to crawl website",
            AnalysisError::InsufficientCompetitors { .. } => "Failed to retrieve competitor URLs",
            AnalysisError::Llm(_) => "Unexpected error",
        }
    }
}

impl From<AnalysisError> for CrateError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::PrimaryFetch(e) => e.into(),
            AnalysisError::Llm(e) => e.into(),
            AnalysisError::InvalidUrl => CrateError::InvalidRequest(err.to_string()),
            AnalysisError::InsufficientCompetitors { .. } => CrateError::Analysis(err.to_string()),
        }
    }
}
