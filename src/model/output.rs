//! Reduction of streamed fragments into a structured model output
//!
//! This is the synchronous half of the completion pipeline: once every
//! fragment has arrived, the concatenated text is parsed as strictly as
//! possible and otherwise kept as plain text.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Text returned in place of an empty completion
pub const NO_RESPONSE: &str = "No response from AI";

/// The parsed result of one completion
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// The model streamed nothing
    NoResponse,

    /// Free text, or a JSON document that was a bare string
    Text(String),

    /// Any JSON document other than a bare string
    Json(Value),
}

impl ModelOutput {
    /// Concatenate fragments in arrival order and parse the result
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut full = String::new();
        for fragment in fragments {
            full.push_str(fragment.as_ref());
        }
        Self::parse(&full)
    }

    /// Parse a complete response
    pub fn parse(full: &str) -> Self {
        if full.is_empty() {
            return ModelOutput::NoResponse;
        }

        if let Some(output) = parse_json(full) {
            return output;
        }

        // Models like to wrap JSON answers in a Markdown fence
        if let Some(output) = strip_code_fence(full).and_then(parse_json) {
            return output;
        }

        ModelOutput::Text(full.trim().to_string())
    }

    /// The parsed JSON object, if the output is one
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            ModelOutput::Json(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Best text rendering of the output
    ///
    /// Plain text as-is, the `suggestion` field of an object if it is a string,
    /// otherwise the JSON serialisation of the value.
    pub fn text(&self) -> String {
        match self {
            ModelOutput::NoResponse => NO_RESPONSE.to_string(),
            ModelOutput::Text(text) => text.clone(),
            ModelOutput::Json(value) => match value.get("suggestion").and_then(Value::as_str) {
                Some(suggestion) if !suggestion.is_empty() => suggestion.to_string(),
                _ => value.to_string(),
            },
        }
    }

    /// The JSON payload placed in reports
    pub fn to_value(&self) -> Value {
        match self {
            ModelOutput::NoResponse => serde_json::json!({ "suggestion": NO_RESPONSE }),
            ModelOutput::Text(text) => serde_json::json!({ "suggestion": text }),
            ModelOutput::Json(value) => value.clone(),
        }
    }
}

impl Serialize for ModelOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn parse_json(text: &str) -> Option<ModelOutput> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::String(text) => Some(ModelOutput::Text(text)),
        value => Some(ModelOutput::Json(value)),
    }
}

/// Body of a response that is exactly one fenced code block
fn strip_code_fence(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix("```")?.strip_suffix("```")?;
    // Drop the info string ("json") on the opening line
    let (_, body) = inner.split_once('\n')?;
    Some(body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_no_response() {
        let output = ModelOutput::from_fragments(Vec::<String>::new());

        assert_eq!(output, ModelOutput::NoResponse);
        assert_eq!(output.to_value(), serde_json::json!({ "suggestion": "No response from AI" }));
    }

    #[test]
    fn test_fragments_concatenate_in_order() {
        let output = ModelOutput::from_fragments(["{\"category\": ", "\"news\", ", "\"competitors\": []}"]);

        assert_eq!(
            output,
            ModelOutput::Json(serde_json::json!({ "category": "news", "competitors": [] }))
        );
    }

    #[test]
    fn test_repeated_fragments_are_kept() {
        let output = ModelOutput::from_fragments(["ha", "ha", "ha"]);

        assert_eq!(output, ModelOutput::Text("hahaha".to_string()));
    }

    #[test]
    fn test_json_string_is_wrapped() {
        let output = ModelOutput::parse("\"Improve your meta description\"");

        assert_eq!(output, ModelOutput::Text("Improve your meta description".to_string()));
        assert_eq!(
            output.to_value(),
            serde_json::json!({ "suggestion": "Improve your meta description" })
        );
    }

    #[test]
    fn test_unparsable_text_is_trimmed() {
        let output = ModelOutput::parse("\n  Score: 72\nExplanation: Fine.  \n");

        assert_eq!(output, ModelOutput::Text("Score: 72\nExplanation: Fine.".to_string()));
    }

    #[test]
    fn test_whitespace_only_is_empty_text() {
        assert_eq!(ModelOutput::parse("   "), ModelOutput::Text(String::new()));
    }

    #[test]
    fn test_bare_number_is_json() {
        let output = ModelOutput::parse("15");

        assert_eq!(output, ModelOutput::Json(serde_json::json!(15)));
        assert_eq!(output.text(), "15");
    }

    #[test]
    fn test_fenced_json_is_parsed() {
        let output = ModelOutput::parse("```json\n{\"category\": \"travel\"}\n```");

        assert_eq!(output, ModelOutput::Json(serde_json::json!({ "category": "travel" })));
    }

    #[test]
    fn test_text_prefers_suggestion_field() {
        let output = ModelOutput::Json(serde_json::json!({ "suggestion": "Score: 10" }));
        assert_eq!(output.text(), "Score: 10");

        let output = ModelOutput::Json(serde_json::json!({ "score": 10 }));
        assert_eq!(output.text(), "{\"score\":10}");
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let output = ModelOutput::Text("Add alt text".to_string());

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({ "suggestion": "Add alt text" })
        );
    }
}
