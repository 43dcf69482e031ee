use serde::{Deserialize, Serialize};

/// Sampling parameters for a generation request.
///
/// All fields are optional; the service applies model defaults for any
/// field left unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum tokens in the generated reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Returns true if every field is unset.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.max_output_tokens.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_unset_fields() {
        let config = GenerationConfig {
            temperature: Some(0.7),
            ..GenerationConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, "{\"temperature\":0.7}");
    }

    #[test]
    fn camel_case_renames() {
        let config = GenerationConfig {
            max_output_tokens: Some(1024),
            top_k: Some(40),
            ..GenerationConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"topK": 40, "maxOutputTokens": 1024})
        );
    }
}
