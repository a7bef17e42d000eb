//! Server-sent-event decoding for streamed chat completions
//!
//! Turns the raw byte stream of an OpenAI-compatible `/chat/completions`
//! response into the ordered sequence of text fragments it carries. Lines are
//! buffered as bytes so multi-byte characters split across network chunks
//! decode correctly.

use async_stream::try_stream;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use tracing::trace;

use super::error::LlmError;

/// Marker sent as the final `data:` payload
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// One decoded event line
#[derive(Debug, PartialEq)]
enum Event {
    Fragment(String),
    Done,
    Skip,
}

/// Decode an SSE byte stream into text fragments, in arrival order
///
/// Chunks without content (role announcements, empty deltas) are skipped.
/// The stream ends at `data: [DONE]` or when the body ends.
pub fn sse_fragments<S>(byte_stream: S) -> impl Stream<Item = Result<String, LlmError>> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    try_stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();
        let mut done = false;

        'outer: while let Some(chunk) = byte_stream.next().await {
            buffer.extend_from_slice(&chunk?);

            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                match decode_line(&line)? {
                    Event::Fragment(text) => yield text,
                    Event::Done => {
                        done = true;
                        break 'outer;
                    }
                    Event::Skip => {}
                }
            }
        }

        // A final line without a trailing newline
        if !done && !buffer.is_empty() {
            if let Event::Fragment(text) = decode_line(&buffer)? {
                yield text;
            }
        }
    }
}

fn decode_line(line: &[u8]) -> Result<Event, LlmError> {
    let line = std::str::from_utf8(line)
        .map_err(|e| LlmError::Stream(format!("Invalid UTF-8 in stream: {}", e)))?
        .trim();

    // Blank separators, comments and non-data fields ("event:", "id:", "retry:")
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(Event::Skip);
    };
    let data = data.trim();

    if data == DONE_MARKER {
        return Ok(Event::Done);
    }
    if data.is_empty() {
        return Ok(Event::Skip);
    }

    let chunk: StreamChunk = serde_json::from_str(data).map_err(|e| {
        LlmError::Stream(format!(
            "Failed to parse stream chunk: {} (data: {})",
            e,
            data.chars().take(200).collect::<String>()
        ))
    })?;
    trace!(?chunk, "Decoded stream chunk");

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .unwrap_or_default();

    if content.is_empty() {
        Ok(Event::Skip)
    } else {
        Ok(Event::Fragment(content))
    }
}
