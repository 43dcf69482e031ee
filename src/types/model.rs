use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private models)
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 2.5 Pro
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,

    /// Gemini 2.5 Flash
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,

    /// Gemini 2.5 Flash-Lite
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,

    /// Gemini 2.0 Flash-Lite
    #[serde(rename = "gemini-2.0-flash-lite")]
    Gemini20FlashLite,

    /// Gemini 1.5 Pro
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,

    /// Gemini 1.5 Flash
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
}

impl KnownModel {
    /// The wire identifier for this model.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Gemini25Pro => "gemini-2.5-pro",
            KnownModel::Gemini25Flash => "gemini-2.5-flash",
            KnownModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
            KnownModel::Gemini20Flash => "gemini-2.0-flash",
            KnownModel::Gemini20FlashLite => "gemini-2.0-flash-lite",
            KnownModel::Gemini15Pro => "gemini-1.5-pro",
            KnownModel::Gemini15Flash => "gemini-1.5-flash",
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl FromStr for KnownModel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini-2.5-pro" => Ok(KnownModel::Gemini25Pro),
            "gemini-2.5-flash" => Ok(KnownModel::Gemini25Flash),
            "gemini-2.5-flash-lite" => Ok(KnownModel::Gemini25FlashLite),
            "gemini-2.0-flash" => Ok(KnownModel::Gemini20Flash),
            "gemini-2.0-flash-lite" => Ok(KnownModel::Gemini20FlashLite),
            "gemini-1.5-pro" => Ok(KnownModel::Gemini15Pro),
            "gemini-1.5-flash" => Ok(KnownModel::Gemini15Flash),
            _ => Err(()),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        s.parse::<KnownModel>()
            .map(Model::Known)
            .unwrap_or_else(|_| Model::Custom(s.to_string()))
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        match s.parse::<KnownModel>() {
            Ok(known) => Model::Known(known),
            Err(()) => Model::Custom(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(
            Model::Known(KnownModel::Gemini25Flash).to_string(),
            "gemini-2.5-flash"
        );
        assert_eq!(
            Model::Custom("gemini-experimental".to_string()).to_string(),
            "gemini-experimental"
        );
    }

    #[test]
    fn parse_known_model() {
        assert_eq!(
            "gemini-2.5-pro".parse::<Model>(),
            Ok(Model::Known(KnownModel::Gemini25Pro))
        );
    }

    #[test]
    fn unknown_name_parses_as_custom() {
        assert_eq!(
            "no-such-model".parse::<Model>(),
            Ok(Model::Custom("no-such-model".to_string()))
        );
        assert_eq!(
            Model::from("no-such-model".to_string()),
            Model::Custom("no-such-model".to_string())
        );
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Model::Known(KnownModel::Gemini20Flash)).unwrap();
        assert_eq!(json, "\"gemini-2.0-flash\"");
    }
}
