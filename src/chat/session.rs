//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the remote
//! conversation context and hides the streaming API call behind a single
//! operation.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::chat::config::ChatConfig;
use crate::chat::reply::ReplyStream;
use crate::client::Gemini;
use crate::error::Result;
use crate::types::{Content, GenerateContentRequest, Model};

/// Source of streamed assistant replies.
///
/// This is the seam between the transcript controller and the remote
/// service: production code uses [`ChatSession`], tests substitute a
/// scripted source.
#[async_trait]
pub trait ReplySource: Send {
    /// Sends a user message and returns the fragment stream of the reply.
    ///
    /// The returned stream is finite and consumed exactly once, in order.
    /// Any `Err` item terminates the current reply.
    async fn send_message(&mut self, text: &str) -> Result<ReplyStream>;
}

/// A chat session that owns the conversation context and API interaction.
///
/// The context is an opaque handle: nothing outside the session reads it,
/// and it lives exactly as long as the session (there is no teardown). Each
/// `send_message` call extends it with the sent message and, once the reply
/// stream finishes or fails, with the reply text streamed up to that point.
pub struct ChatSession {
    client: Gemini,
    config: ChatConfig,
    contents: Vec<Content>,
    pending_reply: Option<oneshot::Receiver<String>>,
}

impl ChatSession {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Gemini, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            contents: Vec::new(),
            pending_reply: None,
        }
    }

    /// Folds the previously completed reply into the conversation context.
    ///
    /// The reply text travels back from the drained [`ReplyStream`] over a
    /// oneshot channel; it is absorbed lazily, on the next send.
    fn absorb_pending_reply(&mut self) {
        if let Some(mut rx) = self.pending_reply.take() {
            if let Ok(text) = rx.try_recv() {
                if !text.is_empty() {
                    self.contents.push(Content::model(text));
                }
            }
        }
    }

    fn request(&self) -> GenerateContentRequest {
        let mut request = GenerateContentRequest::new(self.contents.clone());
        if let Some(prompt) = &self.config.system_prompt {
            request = request.with_system_instruction(prompt.clone());
        }
        if let Some(generation_config) = self.config.generation_config() {
            request = request.with_generation_config(generation_config);
        }
        request
    }

    /// Starts the conversation over, dropping the accumulated context.
    pub fn clear(&mut self) {
        self.contents.clear();
        self.pending_reply = None;
    }

    /// Returns the number of turns in the conversation context.
    pub fn turn_count(&self) -> usize {
        self.contents.len()
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: Model) {
        self.config.model = model;
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Sets or clears the system prompt.
    pub fn set_system_prompt(&mut self, prompt: Option<String>) {
        self.config.system_prompt = prompt;
    }

    /// Returns the current system prompt, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.config.system_prompt.as_deref()
    }

    /// Sets the maximum tokens per response.
    pub fn set_max_output_tokens(&mut self, max_output_tokens: Option<u32>) {
        self.config.max_output_tokens = max_output_tokens;
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: Option<f32>) {
        self.config.temperature = temperature;
    }
}

#[async_trait]
impl ReplySource for ChatSession {
    async fn send_message(&mut self, text: &str) -> Result<ReplyStream> {
        self.absorb_pending_reply();

        let previous_len = self.contents.len();
        self.contents.push(Content::user(text));

        let request = self.request();
        match self.client.stream_generate(&self.config.model, &request).await {
            Ok(stream) => {
                let (reply, rx) = ReplyStream::new(stream);
                self.pending_reply = Some(rx);
                Ok(reply)
            }
            Err(err) => {
                self.contents.truncate(previous_len);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KnownModel, Role};

    fn session() -> ChatSession {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        ChatSession::new(client, ChatConfig::default())
    }

    #[test]
    fn new_session_empty() {
        assert_eq!(session().turn_count(), 0);
    }

    #[test]
    fn absorbs_completed_reply() {
        let mut session = session();
        let (tx, rx) = oneshot::channel();
        tx.send("hello there".to_string()).unwrap();
        session.pending_reply = Some(rx);

        session.absorb_pending_reply();
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.contents[0], Content::model("hello there"));
    }

    #[test]
    fn empty_reply_not_absorbed() {
        let mut session = session();
        let (tx, rx) = oneshot::channel();
        tx.send(String::new()).unwrap();
        session.pending_reply = Some(rx);

        session.absorb_pending_reply();
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn clear_session() {
        let mut session = session();
        session.contents.push(Content::user("test"));
        assert_eq!(session.turn_count(), 1);

        session.clear();
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn request_carries_system_prompt_and_history() {
        let mut session = session();
        session.contents.push(Content::user("q1"));
        session.contents.push(Content::model("a1"));

        let request = session.request();
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role, Role::User);
        assert_eq!(request.contents[1].role, Role::Model);
        assert!(request.system_instruction.is_some());
        assert!(request.generation_config.is_none());
    }

    #[test]
    fn request_carries_generation_config() {
        let mut session = session();
        session.set_max_output_tokens(Some(512));
        session.set_temperature(Some(0.3));

        let request = session.request();
        let generation = request.generation_config.unwrap();
        assert_eq!(generation.max_output_tokens, Some(512));
        assert_eq!(generation.temperature, Some(0.3));
    }

    #[test]
    fn set_model() {
        let mut session = session();
        assert_eq!(session.model(), &Model::Known(KnownModel::Gemini25Flash));

        session.set_model(Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(session.model(), &Model::Known(KnownModel::Gemini25Pro));
    }

    #[test]
    fn set_system_prompt() {
        let mut session = session();
        assert!(session.system_prompt().is_some());

        session.set_system_prompt(Some("Be helpful".to_string()));
        assert_eq!(session.system_prompt(), Some("Be helpful"));

        session.set_system_prompt(None);
        assert!(session.system_prompt().is_none());
    }
}
