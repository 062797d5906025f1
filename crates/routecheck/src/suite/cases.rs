//! The five smoke cases run against the router.
//!
//! Each case owns its error handling: transport and API failures become a
//! failure line and a `false` return, never an `Err` that could stop the
//! run.

use super::reporter::{Reporter, Tone};
use crate::llm::{ChatMessage, ChatRequest, ChatResponse, ChunkStream, LlmClient, LlmClientError};
use futures::StreamExt;
use serde::Serialize;
use tracing::debug;

/// Substring the router puts in its rejection of `n > 1`.
pub const MULTIPLE_COMPLETIONS_MARKER: &str = "Multiple completions";

const DEFAULT_MODEL: &str = "gpt-4";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Identifies a case, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// System + user prompt, token cap
    BasicCompletion,
    /// `stream: true`, fragments printed as they arrive
    Streaming,
    /// One minimal request per configured model identifier
    ModelMapping,
    /// Two consecutive system messages
    SystemMessages,
    /// `n = 2`, expected to be rejected
    UnsupportedFeature,
}

impl CaseKind {
    /// Every case, in the order the suite runs them.
    pub const ALL: [Self; 5] = [
        Self::BasicCompletion,
        Self::Streaming,
        Self::ModelMapping,
        Self::SystemMessages,
        Self::UnsupportedFeature,
    ];

    /// Section title printed before the case runs.
    pub const fn title(self) -> &'static str {
        match self {
            Self::BasicCompletion => "TEST 1: Basic Chat Completion",
            Self::Streaming => "TEST 2: Streaming Response",
            Self::ModelMapping => "TEST 3: Model Mapping",
            Self::SystemMessages => "TEST 4: Multiple System Messages",
            Self::UnsupportedFeature => "TEST 5: Error Handling (Unsupported Features)",
        }
    }

    /// Short identifier used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BasicCompletion => "basic_completion",
            Self::Streaming => "streaming",
            Self::ModelMapping => "model_mapping",
            Self::SystemMessages => "system_messages",
            Self::UnsupportedFeature => "unsupported_feature",
        }
    }
}

/// Send a system + user prompt and print model, reply, finish reason and usage.
pub async fn basic_completion(client: &LlmClient, reporter: &mut dyn Reporter) -> bool {
    reporter.section(CaseKind::BasicCompletion.title());

    let request = ChatRequest::new(
        DEFAULT_MODEL,
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user("Say 'Hello from routecheck!' in one sentence."),
        ],
    )
    .with_max_tokens(50);

    match client.chat_completion(&request).await {
        Ok(response) => {
            reporter.success("Request successful!");
            reporter.info(&format!("Model: {}", response.model));
            reporter.notice(&format!("Content: {}", response.first_content()));
            reporter.info(&format!(
                "Finish reason: {}",
                response.finish_reason().unwrap_or("<none>")
            ));
            match response.usage {
                Some(usage) => reporter.info(&format!(
                    "Tokens - Prompt: {}, Completion: {}, Total: {}",
                    usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
                )),
                None => reporter.notice("Tokens - usage not reported by server"),
            }
            true
        }
        Err(e) => {
            reporter.failure(&format!("FAILED: {e}"));
            false
        }
    }
}

/// Print every non-empty fragment of `stream` and return how many there were.
///
/// Chunks without choices are skipped. The first error item ends the drain.
pub async fn drain_stream(
    mut stream: ChunkStream,
    reporter: &mut dyn Reporter,
) -> Result<usize, LlmClientError> {
    let mut fragments = 0;
    while let Some(item) = stream.next().await {
        let chunk = match item {
            Ok(chunk) => chunk,
            Err(e) => {
                reporter.end_fragments();
                return Err(e);
            }
        };
        if let Some(text) = chunk.content() {
            reporter.fragment(text);
            fragments += 1;
        }
    }
    reporter.end_fragments();
    Ok(fragments)
}

/// Stream a short reply, printing fragments as they arrive.
pub async fn streaming_completion(client: &LlmClient, reporter: &mut dyn Reporter) -> bool {
    reporter.section(CaseKind::Streaming.title());

    let request = ChatRequest::new(
        DEFAULT_MODEL,
        vec![ChatMessage::user("Count from 1 to 3, one number per line.")],
    )
    .with_max_tokens(50)
    .streaming();

    reporter.success("Starting stream...");
    reporter.inline(Tone::Info, "Response: ");

    let result = match client.stream_chat(&request).await {
        Ok(stream) => drain_stream(stream, reporter).await,
        Err(e) => {
            reporter.end_fragments();
            Err(e)
        }
    };

    match result {
        Ok(fragments) => {
            debug!(fragments, "stream drained");
            reporter.success(&format!("Streaming complete! Received {fragments} chunks"));
            true
        }
        Err(e) => {
            reporter.failure(&format!("FAILED: {e}"));
            false
        }
    }
}

/// Result of probing one model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProbe {
    /// Identifier sent in the request
    pub requested: String,
    /// Echoed model name on success, error text on failure
    pub outcome: Result<String, String>,
}

impl ModelProbe {
    /// Whether the request succeeded
    pub const fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Send a minimal request for one identifier.
pub async fn probe_model(client: &LlmClient, model: &str) -> ModelProbe {
    let request = ChatRequest::new(model, vec![ChatMessage::user("Say hi")]).with_max_tokens(10);
    let outcome = client
        .chat_completion(&request)
        .await
        .map(|r| r.model)
        .map_err(|e| e.to_string());
    ModelProbe {
        requested: model.to_string(),
        outcome,
    }
}

/// Probe each identifier in turn. Per-model failures are printed, not returned.
pub async fn model_mapping(
    client: &LlmClient,
    models: &[String],
    reporter: &mut dyn Reporter,
) -> bool {
    reporter.section(CaseKind::ModelMapping.title());
    reporter.info("Testing model mappings:");

    for model in models {
        let probe = probe_model(client, model).await;
        match &probe.outcome {
            Ok(echoed) => reporter.success(&format!(
                "  {} → Success (returns: {echoed})",
                probe.requested
            )),
            Err(e) => reporter.failure(&format!("  {} → FAILED: {e}", probe.requested)),
        }
    }

    reporter.line(Tone::Plain, "");
    reporter.notice("Check router logs to see which backend model each identifier maps to");
    true
}

/// Send two consecutive system messages followed by a user message.
pub async fn system_messages(client: &LlmClient, reporter: &mut dyn Reporter) -> bool {
    reporter.section(CaseKind::SystemMessages.title());

    let request = ChatRequest::new(
        DEFAULT_MODEL,
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::system("You respond concisely."),
            ChatMessage::user("What is 2+2?"),
        ],
    )
    .with_max_tokens(50);

    match client.chat_completion(&request).await {
        Ok(response) => {
            reporter.success("Multiple system messages handled!");
            reporter.notice(&format!("Response: {}", response.first_content()));
            true
        }
        Err(e) => {
            reporter.failure(&format!("FAILED: {e}"));
            false
        }
    }
}

/// How the router answered a request it should reject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionVerdict {
    /// Rejected with the expected message
    Rejected(String),
    /// Rejected, but for some other reason
    WrongError(String),
    /// Not rejected at all
    Accepted,
}

impl RejectionVerdict {
    /// Whether the router behaved as expected
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Classify the outcome of an `n > 1` request by its error text.
pub fn classify_rejection(result: &Result<ChatResponse, LlmClientError>) -> RejectionVerdict {
    match result {
        Ok(_) => RejectionVerdict::Accepted,
        Err(e) => {
            let text = e.to_string();
            if text.contains(MULTIPLE_COMPLETIONS_MARKER) {
                RejectionVerdict::Rejected(text)
            } else {
                RejectionVerdict::WrongError(text)
            }
        }
    }
}

/// Send `n = 2` and check the router refuses it.
pub async fn rejection_verdict(client: &LlmClient) -> RejectionVerdict {
    let request = ChatRequest::new(DEFAULT_MODEL, vec![ChatMessage::user("Hello")])
        .with_n(2)
        .with_max_tokens(50);
    classify_rejection(&client.chat_completion(&request).await)
}

/// Expect the router to reject `n > 1`.
///
/// The verdict is printed but never fails the case: the check is
/// informational.
pub async fn unsupported_feature(client: &LlmClient, reporter: &mut dyn Reporter) -> bool {
    reporter.section(CaseKind::UnsupportedFeature.title());
    reporter.info("Testing n > 1 (should error)...");

    match rejection_verdict(client).await {
        RejectionVerdict::Rejected(text) => {
            reporter.success("Correctly rejected n > 1");
            reporter.info(&format!("  Error: {text}"));
        }
        RejectionVerdict::WrongError(text) => {
            reporter.failure(&format!("Wrong error: {text}"));
        }
        RejectionVerdict::Accepted => {
            reporter.failure("Should have raised an error for n > 1");
        }
    }
    true
}
