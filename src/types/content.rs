use serde::{Deserialize, Serialize};

use crate::types::Role;

/// One piece of a content entry. Only text parts are in scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    /// The text of this part.
    pub text: String,
}

impl Part {
    /// Create a new text part.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A single conversation turn: a role plus an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// Who authored this turn.
    pub role: Role,

    /// The parts making up this turn.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new `Content` with the given role and a single text part.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::new(text)],
        }
    }

    /// Create a user turn from a string.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a model turn from a string.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::user(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::user(text)
    }
}
