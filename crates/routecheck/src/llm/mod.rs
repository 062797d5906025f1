//! OpenAI-compatible chat-completions client used by the smoke suite.
//!
//! - **Client**: HTTP client for `/chat/completions`, plain and streaming
//! - **Stream**: Server-Sent Events decoding into completion chunks

pub mod client;
pub mod stream;

pub use client::{
    AssistantMessage, ChatMessage, ChatRequest, ChatResponse, ChatResponseChoice, LlmClient,
    LlmClientError, Role, Usage,
};
pub use stream::{
    decode_chunks, ChatCompletionChunk, ChunkChoice, ChunkDelta, ChunkStream, SseDecoder,
    SseEvent, DONE_SENTINEL,
};
