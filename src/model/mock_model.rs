//! # Mock Completion Model for Testing
//!
//! Provides a `MockCompletionModel` that implements the `CompletionModel` trait
//! for use in tests. Responses are scripted per prompt substring, and every
//! response is streamed back in small fragments so the reduction stage sees
//! the same shape as a real completion.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Mutex;

use super::{CompletionModel, FragmentStream, LlmError};

/// Size in characters of each streamed fragment
const FRAGMENT_CHARS: usize = 7;

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Failure(String),
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<(String, Scripted)>,
    fallback: Option<Scripted>,
    prompts: Vec<String>,
}

/// A mock completion model for testing purposes.
/// It returns a scripted response or error when a completion is requested.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionModel {
    /// Arc<Mutex<>> allows scripting after the model has been shared.
    script: Arc<Mutex<Script>>,
}

impl MockCompletionModel {
    /// Creates a new mock model that streams nothing unless scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response for prompts that match no rule.
    pub async fn set_text_response(&self, text: &str) {
        self.script.lock().await.fallback = Some(Scripted::Text(text.to_string()));
    }

    /// Responds with `text` to every prompt containing `needle`.
    /// Rules are checked in the order they were added.
    pub async fn respond_when(&self, needle: &str, text: &str) {
        self.script
            .lock()
            .await
            .rules
            .push((needle.to_string(), Scripted::Text(text.to_string())));
    }

    /// Fails every prompt containing `needle` with an API error.
    pub async fn fail_when(&self, needle: &str, message: &str) {
        self.script
            .lock()
            .await
            .rules
            .push((needle.to_string(), Scripted::Failure(message.to_string())));
    }

    /// Prompts received so far, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.script.lock().await.prompts.clone()
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn stream_completion(&self, prompt: &str) -> Result<FragmentStream, LlmError> {
        let scripted = {
            let mut script = self.script.lock().await;
            script.prompts.push(prompt.to_string());
            script
                .rules
                .iter()
                .find(|(needle, _)| prompt.contains(needle.as_str()))
                .map(|(_, scripted)| scripted.clone())
                .or_else(|| script.fallback.clone())
        };

        match scripted {
            Some(Scripted::Failure(message)) => Err(LlmError::Api {
                status_code: 500,
                message,
            }),
            Some(Scripted::Text(text)) => {
                let fragments: Vec<Result<String, LlmError>> =
                    split_fragments(&text).into_iter().map(Ok).collect();
                Ok(futures::stream::iter(fragments).boxed())
            }
            None => Ok(futures::stream::empty().boxed()),
        }
    }
}

fn split_fragments(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(FRAGMENT_CHARS)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelOutput, complete};

    #[tokio::test]
    async fn test_rules_match_in_order() {
        let model = MockCompletionModel::new();
        model.respond_when("SEO score", "Score: 50\nExplanation: ok").await;
        model.respond_when("score", "never used").await;
        model.set_text_response("fallback").await;

        let scored = complete(&model, "give an SEO score").await.unwrap();
        let other = complete(&model, "something else").await.unwrap();

        assert_eq!(scored, ModelOutput::Text("Score: 50\nExplanation: ok".to_string()));
        assert_eq!(other, ModelOutput::Text("fallback".to_string()));
        assert_eq!(model.prompts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_rule() {
        let model = MockCompletionModel::new();
        model.fail_when("boom", "scripted failure").await;

        let result = complete(&model, "boom").await;

        assert!(matches!(result, Err(LlmError::Api { status_code: 500, .. })));
    }

    #[test]
    fn test_split_fragments_keeps_text() {
        let text = "Ünïcödé text that spans several fragments";
        let fragments = split_fragments(text);

        assert!(fragments.len() > 1);
        assert_eq!(fragments.concat(), text);
    }
}
