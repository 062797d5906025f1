//! Server-Sent Events decoding for streamed chat completions.
//!
//! The decoder is byte-oriented: network chunks may end anywhere, including
//! in the middle of a line or a multi-byte UTF-8 sequence. Lines end with
//! LF or CRLF; an empty line dispatches the pending event.

use super::client::{LlmClientError, Role};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::{debug, trace};

/// Payload that closes an OpenAI-style stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Boxed stream of decoded completion chunks.
pub type ChunkStream =
    Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, LlmClientError>> + Send>>;

/// A dispatched SSE event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the `event:` field, if any.
    pub event: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

/// Incremental SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    current: SseEvent,
    has_data: bool,
}

impl SseDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw[..pos]);
            let line = text.strip_suffix('\r').unwrap_or(&text);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Finish the stream, dispatching any event left without a blank line.
    pub fn flush(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let text = String::from_utf8_lossy(&raw);
            let line = text.strip_suffix('\r').unwrap_or(&text);
            if let Some(event) = self.process_line(line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            // keep-alive comment
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.current.event = Some(value.to_string()),
            "data" => {
                self.current.data.push_str(value);
                self.current.data.push('\n');
                self.has_data = true;
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if !self.has_data {
            self.current = SseEvent::default();
            return None;
        }
        self.has_data = false;
        let mut event = std::mem::take(&mut self.current);
        if event.data.ends_with('\n') {
            event.data.pop();
        }
        Some(event)
    }
}

/// Incremental message delta inside a streamed choice.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChunkDelta {
    /// Role, sent on the first chunk only.
    #[serde(default)]
    pub role: Option<Role>,
    /// Content fragment.
    #[serde(default)]
    pub content: Option<String>,
}

/// A choice inside a streamed chunk.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChunkChoice {
    /// Index of this choice.
    #[serde(default)]
    pub index: u32,
    /// The delta carried by this chunk.
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Set on the final content chunk.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One `chat.completion.chunk` object.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatCompletionChunk {
    /// Completion identifier shared by all chunks of a stream.
    #[serde(default)]
    pub id: String,
    /// Model name echoed by the server.
    #[serde(default)]
    pub model: String,
    /// Choices; empty on usage-only trailer chunks.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// The non-empty content fragment of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Turn one event payload into a chunk, or into the error it reports.
fn parse_chunk(data: &str) -> Result<ChatCompletionChunk, LlmClientError> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| LlmClientError::Malformed(e.to_string()))?;
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(serde_json::Value::as_str)
            .or_else(|| error.as_str())
            .map_or_else(|| error.to_string(), str::to_string);
        return Err(LlmClientError::Stream { message });
    }
    serde_json::from_value(value).map_err(|e| LlmClientError::Malformed(e.to_string()))
}

struct ChunkState<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<ChatCompletionChunk, LlmClientError>>,
    events: usize,
    done: bool,
}

impl<S> ChunkState<S> {
    fn push_event(&mut self, event: SseEvent) {
        if self.done {
            return;
        }
        self.events += 1;
        let data = event.data.trim();
        if data.is_empty() {
            return;
        }
        if data == DONE_SENTINEL {
            debug!(events = self.events, "stream finished");
            self.done = true;
            return;
        }
        trace!(data, "stream event");
        let parsed = parse_chunk(data);
        if parsed.is_err() {
            self.done = true;
        }
        self.pending.push_back(parsed);
    }
}

/// Decode an HTTP body byte stream into completion chunks.
///
/// The stream ends at the `[DONE]` sentinel, at the end of the body, or
/// right after the first error item.
pub fn decode_chunks<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<LlmClientError> + Send + 'static,
{
    let state = ChunkState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        events: 0,
        done: false,
    };

    let stream = futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for event in state.decoder.feed(chunk.as_ref()) {
                        state.push_event(event);
                    }
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    if let Some(event) = state.decoder.flush() {
                        state.push_event(event);
                    }
                    state.done = true;
                }
            }
        }
    });
    Box::pin(stream)
}
