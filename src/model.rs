//! # LLM Completion Module
//!
//! This module is the gateway to the completion API. A completion runs in two
//! stages: an async producer streams ordered text fragments, and a
//! synchronous reducer concatenates and parses them into a `ModelOutput`.
//!
//! ## Key Components
//!
//! - `CompletionModel`: the producer seam, implemented by the HTTP client and
//!   by the scripted mock used in tests
//! - `ChatCompletionClient`: streaming client for OpenAI-compatible APIs
//! - `ModelOutput`: the parsed result, tolerant of non-JSON answers
//! - `complete`: runs both stages for one prompt

use async_trait::async_trait;
use futures::TryStreamExt;
use futures::stream::BoxStream;
use tracing::{debug, info_span, Instrument};

pub mod error;
pub mod http;
pub mod mock_model;
pub mod output;
mod streaming;

pub use error::LlmError;
pub use http::{ChatCompletionClient, ChatCompletionConfig};
pub use mock_model::MockCompletionModel;
pub use output::ModelOutput;
pub use streaming::sse_fragments;

/// Ordered text fragments of one streamed completion
pub type FragmentStream = BoxStream<'static, Result<String, LlmError>>;

/// A model that answers a single user prompt with a stream of text fragments
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Start a completion for `prompt`
    async fn stream_completion(&self, prompt: &str) -> Result<FragmentStream, LlmError>;
}

/// Run a prompt to completion and parse the answer
///
/// Fragments are appended strictly in arrival order. A response that is not
/// JSON is a normal outcome and comes back as `ModelOutput::Text`.
pub async fn complete<M>(model: &M, prompt: &str) -> Result<ModelOutput, LlmError>
where
    M: CompletionModel + ?Sized,
{
    let fragments: Vec<String> = async {
        let stream = model.stream_completion(prompt).await?;
        stream.try_collect().await
    }
    .instrument(info_span!("completion", prompt_len = prompt.len()))
    .await?;

    debug!(fragments = fragments.len(), "Completion stream finished");
    Ok(ModelOutput::from_fragments(fragments))
}
