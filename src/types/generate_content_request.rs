use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig};

/// Request body for `generateContent` and `streamGenerateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, oldest turn first.
    pub contents: Vec<Content>,

    /// Optional system instruction applied to the whole conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Optional sampling parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request from a conversation.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::user(instruction));
        self
    }

    /// Sets the generation config.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request_omits_optional_fields() {
        let request = GenerateContentRequest::new(vec![Content::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
            })
        );
    }

    #[test]
    fn system_instruction_rename() {
        let request =
            GenerateContentRequest::new(vec![Content::user("hi")]).with_system_instruction("be kind");
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
    }
}
