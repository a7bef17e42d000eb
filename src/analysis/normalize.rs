//! Per-task validation of model output

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::error;

use super::{PurposeResult, ScoreResult};
use crate::model::ModelOutput;

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Score:\s*(\d{1,3}).*?Explanation:\s*(.*)").expect("invalid score regex")
});

/// Accept a classification only if it names enough competitors
///
/// Anything else is logged and replaced by the `unknown` sentinel.
pub fn normalize_purpose(output: &ModelOutput, min_competitors: usize) -> PurposeResult {
    let competitors: Option<Vec<String>> = output
        .as_object()
        .and_then(|object| object.get("competitors"))
        .and_then(Value::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        });

    match competitors {
        Some(competitors) if competitors.len() >= min_competitors => {
            let category = output
                .as_object()
                .and_then(|object| object.get("category"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .unwrap_or(PurposeResult::UNKNOWN)
                .to_string();
            PurposeResult {
                category,
                competitors,
            }
        }
        _ => {
            error!(payload = %output.to_value(), "Failed to parse purpose result");
            PurposeResult::unknown()
        }
    }
}

/// Pull `Score: <n>` and `Explanation: <text>` out of a scoring answer
pub fn normalize_score(output: &ModelOutput) -> ScoreResult {
    parse_score(&output.text())
}

/// Parse the two-line score format from raw text
pub fn parse_score(raw: &str) -> ScoreResult {
    if let Some(captures) = SCORE_PATTERN.captures(raw) {
        let score = captures
            .get(1)
            .and_then(|digits| digits.as_str().parse::<u16>().ok())
            .map(|score| score.min(100) as u8);
        let explanation = captures
            .get(2)
            .map(|text| text.as_str().trim().to_string())
            .unwrap_or_default();
        if score.is_some() {
            return ScoreResult { score, explanation };
        }
    }

    ScoreResult {
        score: None,
        explanation: raw.trim().to_string(),
    }
}

/// The estimation answer is used as-is
pub fn normalize_estimation(output: &ModelOutput) -> String {
    output.text().trim().to_string()
}
