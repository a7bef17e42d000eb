//! Prompt templates for the completion API
//!
//! Every prompt over-specifies its output grammar: the answers are parsed
//! with patterns, not a full parser, so the model is asked to constrain
//! itself.

use serde::Serialize;

use crate::crawler::SiteMetadata;
use crate::model::ModelOutput;

/// Classification into one industry label and four competitor URLs
pub fn purpose_prompt(metadata: &SiteMetadata) -> String {
    format!(
        r#"Given this metadata, classify the website's **main industry or category** using a single word or phrase, such as "e-commerce", "news", "education", "travel", etc.
Then, list **four URLs of real-world websites** that serve a similar purpose or are competitors in that category.
Return only JSON with this format:

{{
  "category": "<industry>",
  "competitors": ["https://...", "https://...", "https://...", "https://..."]
}}

Here is the metadata:
{}
"#,
        pretty_json(metadata)
    )
}

/// A 0-100 SEO score in the two-line `Score:` / `Explanation:` format
pub fn score_prompt(metadata: &SiteMetadata) -> String {
    format!(
        "Based on this metadata, give an SEO score between 0 to 100 and explain why:\n\n{}\n\nFormat:\nScore: <number>\nExplanation: <text>",
        compact_json(metadata)
    )
}

/// 3-5 actionable suggestions contrasting the user's site with two competitors
///
/// Only the first two competitors are used; a missing one renders as `null`.
pub fn suggestions_prompt(user: &SiteMetadata, competitors: &[&SiteMetadata]) -> String {
    format!(
        r#"
You are an expert SEO consultant.

Compare the following user's website metadata with two competitors.
Give 3–5 **clear, actionable** suggestions that can **improve the user's SEO**, using competitor insights.
Only give suggestions that are helpful and realistic to implement.

User Website Metadata:
{}

Competitor 1 Metadata:
{}

Competitor 2 Metadata:
{}

Suggestions:
"#,
        pretty_json(user),
        pretty_json(&competitors.first()),
        pretty_json(&competitors.get(1)),
    )
}

/// A bare integer estimate of the score increase the suggestions would bring
pub fn estimation_prompt(
    user: &SiteMetadata,
    suggestions: &ModelOutput,
    score: Option<u8>,
) -> String {
    let score = score.map_or_else(|| "unknown".to_string(), |score| score.to_string());
    format!(
        r#"You are an expert SEO consultant.

A website currently has an SEO score of {score} out of 100.

Website Metadata:
{}

Suggested improvements:
{}

Estimate by how many percentage points the SEO score would increase if every suggestion were implemented.
Respond with a single integer only, for example: 12
Do not include a percent sign, words, explanations, ranges or any other text."#,
        pretty_json(user),
        pretty_json(suggestions),
    )
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn compact_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(title: &str) -> SiteMetadata {
        SiteMetadata {
            title: title.to_string(),
            description: format!("{title} description"),
            links: vec!["/about".to_string()],
            body_text: None,
        }
    }

    #[test]
    fn test_purpose_prompt_embeds_metadata_and_shape() {
        let prompt = purpose_prompt(&metadata("Acme Travel"));

        assert!(prompt.contains("\"title\": \"Acme Travel\""));
        assert!(prompt.contains("\"competitors\": [\"https://...\""));
        assert!(prompt.contains("four URLs"));
    }

    #[test]
    fn test_score_prompt_format() {
        let prompt = score_prompt(&metadata("Acme"));

        assert!(prompt.contains("{\"title\":\"Acme\""));
        assert!(prompt.ends_with("Format:\nScore: <number>\nExplanation: <text>"));
    }

    #[test]
    fn test_suggestions_prompt_uses_two_competitors() {
        let user = metadata("User");
        let first = metadata("First");
        let second = metadata("Second");
        let third = metadata("Third");

        let prompt = suggestions_prompt(&user, &[&first, &second, &third]);

        assert!(prompt.contains("\"title\": \"First\""));
        assert!(prompt.contains("\"title\": \"Second\""));
        assert!(!prompt.contains("Third"));
    }

    #[test]
    fn test_suggestions_prompt_missing_competitor_is_null() {
        let user = metadata("User");
        let only = metadata("Only");

        let prompt = suggestions_prompt(&user, &[&only]);

        assert!(prompt.contains("Competitor 2 Metadata:\nnull"));
    }

    #[test]
    fn test_estimation_prompt() {
        let suggestions = ModelOutput::Text("Add a meta description".to_string());

        let prompt = estimation_prompt(&metadata("User"), &suggestions, Some(64));
        assert!(prompt.contains("SEO score of 64 out of 100"));
        assert!(prompt.contains("Add a meta description"));
        assert!(prompt.contains("single integer only"));

        let prompt = estimation_prompt(&metadata("User"), &suggestions, None);
        assert!(prompt.contains("SEO score of unknown out of 100"));
    }
}
