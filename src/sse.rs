//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module handles parsing of SSE streams from the generative language
//! API, converting raw byte streams into structured chunk objects. The
//! service emits `data:`-only events with no event-type lines and no
//! terminator sentinel: the reply is complete when the stream ends.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability;
use crate::types::GenerateContentResponse;

/// Process a stream of bytes into a stream of response chunks.
///
/// This function takes a byte stream from an HTTP response and converts it
/// into a stream of parsed [`GenerateContentResponse`] chunks, handling SSE
/// framing, buffering across chunk boundaries, and error conditions.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the SSE stream
    let buffer = String::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => {
                            observability::STREAM_CHUNKS.click();
                            return Some((event, (stream, buffer)));
                        }
                        // An event with no data payload (comment or keepalive).
                        None => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        observability::STREAM_BYTES.count(bytes.len() as u64);
                        match String::from_utf8(bytes.to_vec()) {
                            Ok(text) => buffer.push_str(&text),
                            Err(e) => {
                                observability::STREAM_ERRORS.click();
                                return Some((
                                    Err(Error::encoding(
                                        format!("Invalid UTF-8 in stream: {e}"),
                                        Some(Box::new(e)),
                                    )),
                                    (stream, buffer),
                                ));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        observability::STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream: a final event may lack the trailing
                        // blank line.
                        if !buffer.is_empty() {
                            let leftover = std::mem::take(&mut buffer);
                            if let Some(event) = parse_event(&leftover) {
                                observability::STREAM_CHUNKS.click();
                                return Some((event, (stream, buffer)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract a complete SSE event from a buffer string.
///
/// Events are delimited by a blank line. Returns the parsed event (or `None`
/// for events carrying no data payload) and the remaining buffer.
fn extract_event(buffer: &str) -> Option<(Option<Result<GenerateContentResponse>>, String)> {
    let (event_text, rest) = split_event(buffer)?;
    Some((parse_event(event_text), rest.to_string()))
}

/// Split the buffer at the first blank line, tolerating CRLF framing.
fn split_event(buffer: &str) -> Option<(&str, &str)> {
    let lf = buffer.find("\n\n").map(|idx| (idx, 2));
    let crlf = buffer.find("\r\n\r\n").map(|idx| (idx, 4));
    let (idx, len) = match (lf, crlf) {
        (Some(a), Some(b)) => {
            if a.0 < b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some((&buffer[..idx], &buffer[idx + len..]))
}

/// Parse the `data:` payload of one event, or `None` when the event carries
/// no data lines.
fn parse_event(event_text: &str) -> Option<Result<GenerateContentResponse>> {
    let mut data = String::new();
    for line in event_text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(payload) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(payload.trim_start());
        }
    }

    if data.is_empty() {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(&data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => {
            observability::STREAM_ERRORS.click();
            Some(Err(Error::serialization(
                format!("Failed to parse event JSON: {e}"),
                Some(Box::new(e)),
            )))
        }
    }
}
