//! OpenAI-compatible HTTP client for the router's chat-completions endpoint.
//!
//! Covers the subset of the API the smoke suite exercises: plain and
//! streaming chat completions, the `n` parameter, and a reachability probe.

use super::stream::{decode_chunks, ChunkStream};
use crate::config::{SuiteConfig, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Chat message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt
    System,
    /// User message
    User,
    /// Assistant response
    #[default]
    Assistant,
}

/// A single chat message in a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// System-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Parameters for a chat completion request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    /// Model identifier, passed through to the router for mapping.
    pub model: String,
    /// The messages for the chat completion.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Number of completions to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
}

impl ChatRequest {
    /// Create a request with no optional parameters set.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            stream: None,
            n: None,
        }
    }

    /// Cap the number of generated tokens.
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request `n` completions.
    pub const fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    /// Ask for a streamed response.
    pub const fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// The assistant message inside a response choice.
///
/// `content` is nullable in the OpenAI schema (tool calls, refusals).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct AssistantMessage {
    /// Author role, normally `assistant`.
    #[serde(default)]
    pub role: Role,
    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponseChoice {
    /// Index of this choice.
    #[serde(default)]
    pub index: u32,
    /// The generated message.
    pub message: AssistantMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response from a chat completion endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion.
    #[serde(default)]
    pub id: String,
    /// Object type (normally "chat.completion").
    #[serde(default)]
    pub object: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: u64,
    /// Model name echoed back by the server.
    pub model: String,
    /// Generated choices.
    pub choices: Vec<ChatResponseChoice>,
    /// Token usage statistics, when the server reports them.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// The first choice. Responses returned by [`LlmClient`] always have one.
    pub fn first_choice(&self) -> Option<&ChatResponseChoice> {
        self.choices.first()
    }

    /// Content of the first choice, or `""` when absent.
    pub fn first_content(&self) -> &str {
        self.first_choice()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
    }

    /// Finish reason of the first choice, if reported.
    pub fn finish_reason(&self) -> Option<&str> {
        self.first_choice().and_then(|c| c.finish_reason.as_deref())
    }
}

/// Errors from the LLM client.
#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    /// Transport failure: connection refused, timeout, broken body.
    #[error("Connection error: {0}")]
    Http(#[from] reqwest::Error),
    /// Server answered with a non-success status.
    #[error("Error code: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },
    /// Server reported an error inside an open event stream.
    #[error("Stream error: {message}")]
    Stream {
        /// Error message carried by the event.
        message: String,
    },
    /// Response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// Base URL could not be turned into a request URL.
    #[error("Invalid base URL {url}: {message}")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
    /// Health check failed.
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the human-readable message out of an error body.
///
/// Accepts the OpenAI `{"error": {"message": ...}}` envelope (which the
/// Anthropic error shape also satisfies) and falls back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// OpenAI-compatible HTTP client.
#[derive(Debug, Clone)]
pub struct LlmClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl LlmClient {
    /// Create a new client pointing at the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - API root including the version prefix (e.g. `http://localhost:3000/v1`)
    /// * `api_key` - Bearer token; routers that handle auth themselves ignore it
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmClientError> {
        let config = SuiteConfig::new()
            .with_base_url(base_url)
            .with_api_key(api_key)
            .with_timeout(DEFAULT_TIMEOUT);
        Self::from_config(&config)
    }

    /// Build a client from suite configuration, honouring its timeout.
    pub fn from_config(config: &SuiteConfig) -> Result<Self, LlmClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(
            config.base_url.as_str(),
            config.api_key.as_str(),
            client,
        ))
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response, LlmClientError> {
        let url = self.completions_url();
        debug!(
            %url,
            model = %request.model,
            stream = request.stream.unwrap_or(false),
            n = ?request.n,
            "sending chat completion"
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        debug!(status = status.as_u16(), "chat completion responded");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmClientError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(resp)
    }

    /// Send a non-streaming chat completion.
    ///
    /// A response without choices is reported as [`LlmClientError::Malformed`].
    pub async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, LlmClientError> {
        let resp = self.post(request).await?;
        let body = resp.bytes().await?;
        trace!(bytes = body.len(), "received completion body");

        let response: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| LlmClientError::Malformed(e.to_string()))?;
        if response.choices.is_empty() {
            return Err(LlmClientError::Malformed(
                "response contained no choices".to_string(),
            ));
        }
        Ok(response)
    }

    /// Send a streaming chat completion and return the decoded chunk stream.
    ///
    /// `stream: true` is forced on the outgoing request. HTTP errors are
    /// returned here; errors after the stream opens arrive as stream items.
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<ChunkStream, LlmClientError> {
        let request = ChatRequest {
            stream: Some(true),
            ..request.clone()
        };
        let resp = self.post(&request).await?;
        Ok(decode_chunks(resp.bytes_stream()))
    }

    /// Check that the server answers on `{base}/models` or `/health`.
    pub async fn health_check(&self) -> Result<bool, LlmClientError> {
        let base = reqwest::Url::parse(&self.base_url).map_err(|e| {
            LlmClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: e.to_string(),
            }
        })?;
        let health = base
            .join("/health")
            .map_err(|e| LlmClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: e.to_string(),
            })?;

        for url in [format!("{}/models", self.base_url), health.to_string()] {
            if let Ok(resp) = self.client.get(&url).send().await {
                debug!(%url, status = resp.status().as_u16(), "health probe");
                if resp.status().is_success() {
                    return Ok(true);
                }
            }
        }
        Err(LlmClientError::HealthCheckFailed(format!(
            "No health endpoint responded at {}",
            self.base_url
        )))
    }
}
