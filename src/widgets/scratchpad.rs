//! Free-form notes area.

/// An ephemeral notes buffer. The whole buffer is replaced on every edit,
/// the way a text area reports its value.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad {
    notes: String,
}

impl Scratchpad {
    /// Creates an empty scratchpad.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the notes with the given text.
    pub fn replace(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// The current notes.
    pub fn as_str(&self) -> &str {
        &self.notes
    }

    /// True when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Discards the notes.
    pub fn clear(&mut self) {
        self.notes.clear();
    }
}
