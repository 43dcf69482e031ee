use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("focusflow.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("focusflow.client.request_errors");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("focusflow.stream.chunks");
pub(crate) static STREAM_BYTES: Counter = Counter::new("focusflow.stream.bytes");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("focusflow.stream.errors");

pub(crate) static CHAT_SUBMITS: Counter = Counter::new("focusflow.chat.submits");
pub(crate) static CHAT_SUBMITS_REJECTED: Counter = Counter::new("focusflow.chat.submits_rejected");
pub(crate) static CHAT_TURN_FAILURES: Counter = Counter::new("focusflow.chat.turn_failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_counter(&STREAM_ERRORS);

    collector.register_counter(&CHAT_SUBMITS);
    collector.register_counter(&CHAT_SUBMITS_REJECTED);
    collector.register_counter(&CHAT_TURN_FAILURES);
}
