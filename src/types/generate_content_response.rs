use serde::{Deserialize, Serialize};

use crate::types::Content;

/// One generated reply candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content. Absent on some terminal chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, when it has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Response body for `generateContent`, and the shape of each streamed chunk
/// for `streamGenerateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates. Streaming chunks carry at most one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or the empty string when
    /// the chunk carries no text.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.text())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_streaming_chunk() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let chunk: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.text(), "Hello");
        assert_eq!(chunk.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn empty_chunk_has_empty_text() {
        let chunk: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(chunk.text(), "");
    }
}
