//! Transcript state machine driving one streamed round-trip at a time.
//!
//! The controller owns the ordered list of exchanged messages. `submit`
//! appends the user's message, opens a placeholder for the reply, and
//! appends each incoming fragment to that placeholder until the stream ends
//! or fails. The accumulated text is re-rendered through the markdown
//! formatter on every fragment, and the view is asked to keep the latest
//! message visible after every mutation.

use futures::StreamExt;

use crate::chat::session::{ChatSession, ReplySource};
use crate::markdown;
use crate::observability;
use crate::render::Renderer;

/// Greeting seeded into every new transcript.
pub const GREETING: &str =
    "Hello! I am FocusFlow, your AI study partner. How can I help you today?";

/// Fixed reply shown when no credential was available at startup.
pub const MISSING_KEY_REPLY: &str = "I can't respond right now. My API key is missing.";

/// Error recorded when no credential was available at startup.
pub const MISSING_KEY_ERROR: &str =
    "API Key not configured. Please set up your API key to use the AI Tutor.";

/// Note appended to a reply cut short by a failure.
pub const FAILURE_NOTE: &str = "An error occurred while getting my response.";

/// Generic user-facing error recorded for a failed turn.
pub const GENERIC_ERROR: &str = "Sorry, something went wrong. Please try again.";

/// Who authored a transcript message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageRole {
    /// The person asking questions.
    User,

    /// The study tutor.
    Assistant,
}

/// One entry in the transcript.
///
/// Messages are append-only and ordered by creation time. The text of a
/// message mutates only while it is the last entry and a reply is being
/// streamed into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Who authored this message.
    pub role: MessageRole,

    /// The message content.
    pub text: String,
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

/// Phase of the current round-trip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    /// No reply in flight; submissions are accepted.
    Idle,

    /// A message was submitted; no fragment has arrived yet.
    AwaitingFirstFragment,

    /// Fragments are arriving.
    Streaming,
}

/// Drives one streamed exchange at a time over a [`ReplySource`].
///
/// `source` is `None` when no credential was available at startup; the
/// controller then answers every submission with a fixed fallback message
/// and never attempts a call. At most one message is open for streaming at
/// any time, and it is always the last transcript entry.
pub struct TranscriptController<S: ReplySource = ChatSession> {
    source: Option<S>,
    messages: Vec<Message>,
    phase: TurnPhase,
    last_error: Option<String>,
}

impl<S: ReplySource> TranscriptController<S> {
    /// Creates a controller with a freshly seeded transcript.
    pub fn new(source: Option<S>) -> Self {
        Self {
            source,
            messages: vec![Message::assistant(GREETING)],
            phase: TurnPhase::Idle,
            last_error: None,
        }
    }

    /// The transcript, oldest message first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True when a submission would reach the remote service.
    pub fn can_respond(&self) -> bool {
        self.source.is_some()
    }

    /// True from the moment a message is submitted until the reply stream
    /// resolves or fails. No second submission is accepted while true.
    pub fn is_streaming(&self) -> bool {
        self.phase != TurnPhase::Idle
    }

    /// Current phase of the round-trip state machine.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The user-facing error recorded for the last failed turn, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The underlying source, when one exists.
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Access to the underlying source for configuration commands.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Discards the transcript and reseeds the greeting.
    ///
    /// Ignored while a reply is in flight.
    pub fn reset(&mut self) {
        if self.phase != TurnPhase::Idle {
            return;
        }
        self.messages = vec![Message::assistant(GREETING)];
        self.last_error = None;
    }

    /// Submits a user message and streams the reply into the transcript.
    ///
    /// A submission is ignored while a reply is already in flight, and when
    /// the trimmed text is empty. Any failure preserves already-streamed
    /// text, appends a fixed note to the open message, and records a single
    /// generic error string for the view.
    pub async fn submit(&mut self, text: &str, renderer: &mut dyn Renderer) {
        if self.phase != TurnPhase::Idle {
            observability::CHAT_SUBMITS_REJECTED.click();
            return;
        }
        let text = text.trim();
        if text.is_empty() {
            observability::CHAT_SUBMITS_REJECTED.click();
            return;
        }
        observability::CHAT_SUBMITS.click();

        self.last_error = None;
        self.push(Message::user(text), renderer);
        self.push(Message::assistant(""), renderer);
        self.phase = TurnPhase::AwaitingFirstFragment;

        let Some(source) = self.source.as_mut() else {
            let message = self.open_message();
            message.text.push_str(MISSING_KEY_REPLY);
            renderer.print_fragment(MISSING_KEY_REPLY);
            renderer.render_markup(&markdown::render(MISSING_KEY_REPLY));
            renderer.scroll_to_latest();
            self.last_error = Some(MISSING_KEY_ERROR.to_string());
            self.phase = TurnPhase::Idle;
            renderer.finish_response();
            return;
        };

        let mut reply = match source.send_message(text).await {
            Ok(reply) => reply,
            Err(_) => {
                self.fail_turn(renderer);
                return;
            }
        };

        while let Some(item) = reply.next().await {
            match item {
                Ok(fragment) => {
                    self.phase = TurnPhase::Streaming;
                    let message = self.open_message();
                    message.text.push_str(&fragment);
                    let markup = markdown::render(&message.text);
                    renderer.print_fragment(&fragment);
                    renderer.render_markup(&markup);
                    renderer.scroll_to_latest();
                }
                Err(_) => {
                    self.fail_turn(renderer);
                    return;
                }
            }
        }

        self.phase = TurnPhase::Idle;
        renderer.finish_response();
    }

    /// The message currently open for streaming: always the last entry.
    fn open_message(&mut self) -> &mut Message {
        self.messages.last_mut().expect("transcript is never empty")
    }

    fn push(&mut self, message: Message, renderer: &mut dyn Renderer) {
        self.messages.push(message);
        renderer.scroll_to_latest();
    }

    fn fail_turn(&mut self, renderer: &mut dyn Renderer) {
        observability::CHAT_TURN_FAILURES.click();
        let message = self.open_message();
        if !message.text.is_empty() {
            message.text.push_str("\n\n");
        }
        message.text.push_str(FAILURE_NOTE);
        renderer.render_markup(&markdown::render(&message.text));
        renderer.scroll_to_latest();
        self.last_error = Some(GENERIC_ERROR.to_string());
        self.phase = TurnPhase::Idle;
        renderer.finish_response();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::session::ChatSession;

    fn controller() -> TranscriptController<ChatSession> {
        TranscriptController::new(None)
    }

    #[test]
    fn new_transcript_is_seeded_with_greeting() {
        let controller = controller();
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0], Message::assistant(GREETING));
        assert!(!controller.is_streaming());
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn reset_reseeds_greeting() {
        let mut controller = controller();
        controller.messages.push(Message::user("hi"));
        controller.last_error = Some("stale".to_string());

        controller.reset();
        assert_eq!(controller.messages().len(), 1);
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn reset_ignored_mid_stream() {
        let mut controller = controller();
        controller.messages.push(Message::user("hi"));
        controller.phase = TurnPhase::Streaming;

        controller.reset();
        assert_eq!(controller.messages().len(), 2);
    }

    #[test]
    fn credential_absence_is_visible() {
        assert!(!controller().can_respond());
    }

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn print_fragment(&mut self, _text: &str) {}
        fn print_error(&mut self, _error: &str) {}
        fn print_info(&mut self, _info: &str) {}
        fn finish_response(&mut self) {}
    }

    #[tokio::test]
    async fn submit_is_a_no_op_while_streaming() {
        let mut controller = controller();
        controller.phase = TurnPhase::Streaming;

        controller.submit("hello", &mut NullRenderer).await;
        assert_eq!(controller.messages().len(), 1);
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn blank_submissions_are_ignored() {
        let mut controller = controller();
        controller.submit("   \t ", &mut NullRenderer).await;
        assert_eq!(controller.messages().len(), 1);
        assert!(controller.last_error().is_none());
    }
}
