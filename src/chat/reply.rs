//! Turns a stream of response chunks into a stream of text fragments while
//! accumulating the complete reply.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::oneshot;

use crate::error::Result;
use crate::types::GenerateContentResponse;

/// A stream of the text fragments of one assistant reply.
///
/// Wraps the chunk stream of a single streaming call. Each item is a
/// non-empty text fragment; chunks carrying no text are skipped. The
/// concatenation of all fragments so far is sent through the oneshot
/// channel returned by [`ReplyStream::new`] when the stream ends, whether
/// by exhaustion or by its first error item, so the session can extend its
/// conversation context without buffering twice.
///
/// The stream is finite, consumed at most once, and not restartable. An
/// `Err` item means the reply was cut short; the caller must treat it as
/// terminating the reply.
pub struct ReplyStream {
    inner: Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>,
    text_tx: Option<oneshot::Sender<String>>,
    accumulated: String,
}

impl ReplyStream {
    /// Wraps a chunk stream.
    ///
    /// Returns the fragment stream and a receiver that will contain the
    /// accumulated reply text once the stream is fully drained.
    pub fn new<S>(stream: S) -> (Self, oneshot::Receiver<String>)
    where
        S: Stream<Item = Result<GenerateContentResponse>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let this = Self {
            inner: Box::pin(stream),
            text_tx: Some(tx),
            accumulated: String::new(),
        };
        (this, rx)
    }
}

impl Stream for ReplyStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    let text = chunk.text();
                    if text.is_empty() {
                        // Keepalive or metadata-only chunk.
                        continue;
                    }
                    self.accumulated.push_str(&text);
                    return Poll::Ready(Some(Ok(text)));
                }
                Poll::Ready(Some(Err(e))) => {
                    // An error terminates the reply; callers stop polling
                    // here, so report the partial text now.
                    if let Some(tx) = self.text_tx.take() {
                        let _ = tx.send(std::mem::take(&mut self.accumulated));
                    }
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    if let Some(tx) = self.text_tx.take() {
                        let _ = tx.send(std::mem::take(&mut self.accumulated));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::{StreamExt, stream};

    use super::*;
    use crate::error::Error;
    use crate::types::{Candidate, Content};

    fn chunk(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content::model(text)),
                finish_reason: None,
            }],
        }
    }

    #[tokio::test]
    async fn fragments_accumulate_into_full_reply() {
        let chunks = vec![Ok(chunk("A bin")), Ok(chunk("ary tree"))];
        let (mut reply, rx) = ReplyStream::new(stream::iter(chunks));

        assert_eq!(reply.next().await.unwrap().unwrap(), "A bin");
        assert_eq!(reply.next().await.unwrap().unwrap(), "ary tree");
        assert!(reply.next().await.is_none());

        assert_eq!(rx.await.unwrap(), "A binary tree");
    }

    #[tokio::test]
    async fn empty_chunks_are_skipped() {
        let chunks = vec![
            Ok(chunk("a")),
            Ok(GenerateContentResponse { candidates: vec![] }),
            Ok(chunk("b")),
        ];
        let (reply, _rx) = ReplyStream::new(stream::iter(chunks));

        let fragments: Vec<String> = reply.map(|f| f.unwrap()).collect().await;
        assert_eq!(fragments, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let chunks = vec![
            Ok(chunk("partial")),
            Err(Error::streaming("connection reset", None)),
        ];
        let (mut reply, _rx) = ReplyStream::new(stream::iter(chunks));

        assert_eq!(reply.next().await.unwrap().unwrap(), "partial");
        assert!(reply.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn partial_text_reported_on_error() {
        let chunks = vec![
            Ok(chunk("partial")),
            Err(Error::streaming("connection reset", None)),
        ];
        let (mut reply, mut rx) = ReplyStream::new(stream::iter(chunks));

        assert_eq!(reply.next().await.unwrap().unwrap(), "partial");
        assert!(reply.next().await.unwrap().is_err());
        assert_eq!(rx.try_recv().unwrap(), "partial");
    }
}
