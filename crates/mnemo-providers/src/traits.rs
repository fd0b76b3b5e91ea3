//! Completion provider trait — the completion-service boundary.
//!
//! The turn controller only sees this trait; the HTTP client in `http.rs`
//! is the production implementation, and tests substitute mocks.

use async_trait::async_trait;
use thiserror::Error;

use mnemo_core::types::{LlmResponse, Message, ToolDefinition};

/// Configuration passed to each completion call.
///
/// Both values are fixed per session: a low temperature favoring
/// deterministic tool selection and a bounded output size.
#[derive(Clone, Debug)]
pub struct RequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.2,
        }
    }
}

/// Failure calling the completion service.
///
/// Every variant is terminal for the running turn (the apology path); the
/// distinction exists for logging, not for control flow.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status (auth, rate limit, …).
    #[error("completion service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Trait all completion backends implement.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Full conversation history, replayed every call.
    /// * `tools`    — Tool definitions the model may call (tool-choice stays
    ///                with the model).
    /// * `model`    — Model identifier.
    /// * `config`   — Temperature and max_tokens.
    ///
    /// # Errors
    /// Any transport, HTTP, or decoding failure — callers treat all of them
    /// as a terminal turn outcome.
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &RequestConfig,
    ) -> Result<LlmResponse, CompletionError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
