//! Scenario tests for the transcript controller, driven by a scripted reply
//! source and a capturing renderer.

use async_trait::async_trait;
use futures::stream;

use focusflow::chat::{
    FAILURE_NOTE, GENERIC_ERROR, GREETING, MISSING_KEY_ERROR, MISSING_KEY_REPLY, MessageRole,
    ReplySource, ReplyStream, Renderer, TranscriptController,
};
use focusflow::types::{Candidate, Content, GenerateContentResponse};
use focusflow::{Error, Result};

/// One scripted stream item.
#[derive(Clone)]
enum Step {
    Fragment(&'static str),
    Fail,
}

/// A reply source that plays back a fixed script instead of calling the
/// network.
struct ScriptedSource {
    steps: Vec<Step>,
    fail_on_send: bool,
    calls: usize,
}

impl ScriptedSource {
    fn fragments(fragments: &[&'static str]) -> Self {
        Self {
            steps: fragments.iter().copied().map(Step::Fragment).collect(),
            fail_on_send: false,
            calls: 0,
        }
    }

    fn with_failure_after(fragments: &[&'static str]) -> Self {
        let mut steps: Vec<Step> = fragments.iter().copied().map(Step::Fragment).collect();
        steps.push(Step::Fail);
        Self {
            steps,
            fail_on_send: false,
            calls: 0,
        }
    }

    fn failing_on_send() -> Self {
        Self {
            steps: Vec::new(),
            fail_on_send: true,
            calls: 0,
        }
    }
}

fn chunk(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content::model(text)),
            finish_reason: None,
        }],
    }
}

#[async_trait]
impl ReplySource for ScriptedSource {
    async fn send_message(&mut self, _text: &str) -> Result<ReplyStream> {
        self.calls += 1;
        if self.fail_on_send {
            return Err(Error::streaming("no route to host", None));
        }
        let items: Vec<Result<GenerateContentResponse>> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Fragment(text) => Ok(chunk(text)),
                Step::Fail => Err(Error::streaming("stream reset", None)),
            })
            .collect();
        let (reply, _rx) = ReplyStream::new(stream::iter(items));
        Ok(reply)
    }
}

/// Records everything the controller pushes at the view.
#[derive(Default)]
struct CapturingRenderer {
    fragments: Vec<String>,
    markups: Vec<String>,
    scrolls: usize,
    finishes: usize,
}

impl Renderer for CapturingRenderer {
    fn print_fragment(&mut self, text: &str) {
        self.fragments.push(text.to_string());
    }

    fn render_markup(&mut self, markup: &str) {
        self.markups.push(markup.to_string());
    }

    fn print_error(&mut self, _error: &str) {}

    fn print_info(&mut self, _info: &str) {}

    fn scroll_to_latest(&mut self) {
        self.scrolls += 1;
    }

    fn finish_response(&mut self) {
        self.finishes += 1;
    }
}

#[tokio::test]
async fn submit_appends_user_then_placeholder() {
    let mut controller = TranscriptController::new(Some(ScriptedSource::fragments(&[])));
    let mut renderer = CapturingRenderer::default();

    controller.submit("hello", &mut renderer).await;

    let messages = controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[1].text, "hello");
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].text, "");
    assert!(!controller.is_streaming());
}

#[tokio::test]
async fn end_to_end_streaming_round_trip() {
    let source = ScriptedSource::fragments(&["A bin", "ary tree is", " a data structure..."]);
    let mut controller = TranscriptController::new(Some(source));
    let mut renderer = CapturingRenderer::default();

    controller
        .submit("What is a binary tree?", &mut renderer)
        .await;

    let messages = controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].text, GREETING);
    assert_eq!(messages[1].text, "What is a binary tree?");
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].text, "A binary tree is a data structure...");
    assert!(!controller.is_streaming());
    assert!(controller.last_error().is_none());

    // The view saw each raw fragment plus a re-render of the accumulated
    // text, and was asked to scroll on every mutation.
    assert_eq!(renderer.fragments, vec!["A bin", "ary tree is", " a data structure..."]);
    assert_eq!(
        renderer.markups.last().map(String::as_str),
        Some("A binary tree is a data structure...")
    );
    assert_eq!(renderer.scrolls, 5);
    assert_eq!(renderer.finishes, 1);
    assert_eq!(controller.source().unwrap().calls, 1);
}

#[tokio::test]
async fn final_text_is_chunking_invariant() {
    let coarse = ScriptedSource::fragments(&["A binary tree is a data structure..."]);
    let fine = ScriptedSource::fragments(&["A", " binary", " tree", " is a data structure..."]);

    let mut first = TranscriptController::new(Some(coarse));
    let mut second = TranscriptController::new(Some(fine));
    let mut renderer = CapturingRenderer::default();

    first.submit("q", &mut renderer).await;
    second.submit("q", &mut renderer).await;

    assert_eq!(
        first.messages().last().unwrap().text,
        second.messages().last().unwrap().text
    );
}

#[tokio::test]
async fn missing_credential_short_circuits() {
    let mut controller = TranscriptController::<ScriptedSource>::new(None);
    let mut renderer = CapturingRenderer::default();

    controller.submit("hello", &mut renderer).await;

    let messages = controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].text, MISSING_KEY_REPLY);
    assert_eq!(controller.last_error(), Some(MISSING_KEY_ERROR));
    assert!(!controller.is_streaming());
}

#[tokio::test]
async fn mid_stream_failure_preserves_partial_text() {
    let source = ScriptedSource::with_failure_after(&["A bin", "ary tree is"]);
    let mut controller = TranscriptController::new(Some(source));
    let mut renderer = CapturingRenderer::default();

    controller
        .submit("What is a binary tree?", &mut renderer)
        .await;

    let messages = controller.messages();
    assert_eq!(
        messages.last().unwrap().text,
        format!("A binary tree is\n\n{FAILURE_NOTE}")
    );
    assert_eq!(controller.last_error(), Some(GENERIC_ERROR));
    assert!(!controller.is_streaming());
}

#[tokio::test]
async fn send_failure_fills_empty_placeholder_with_note() {
    let mut controller = TranscriptController::new(Some(ScriptedSource::failing_on_send()));
    let mut renderer = CapturingRenderer::default();

    controller.submit("hello", &mut renderer).await;

    let messages = controller.messages();
    assert_eq!(messages.last().unwrap().text, FAILURE_NOTE);
    assert_eq!(controller.last_error(), Some(GENERIC_ERROR));
    assert!(!controller.is_streaming());
}

#[tokio::test]
async fn error_clears_on_next_submission() {
    let mut controller = TranscriptController::new(Some(ScriptedSource::failing_on_send()));
    let mut renderer = CapturingRenderer::default();

    controller.submit("first", &mut renderer).await;
    assert!(controller.last_error().is_some());

    controller.source_mut().unwrap().fail_on_send = false;
    controller.source_mut().unwrap().steps = vec![Step::Fragment("ok")];
    controller.submit("second", &mut renderer).await;
    assert!(controller.last_error().is_none());
    assert_eq!(controller.messages().last().unwrap().text, "ok");
}

#[tokio::test]
async fn markup_is_rendered_from_accumulated_text() {
    let source = ScriptedSource::fragments(&["**bo", "ld**"]);
    let mut controller = TranscriptController::new(Some(source));
    let mut renderer = CapturingRenderer::default();

    controller.submit("emphasis please", &mut renderer).await;

    // Mid-stream the unmatched marker stays literal; the final re-render
    // resolves it.
    assert_eq!(renderer.markups, vec!["**bo", "<strong>bold</strong>"]);
}
