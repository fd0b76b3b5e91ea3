//! HTTP completion client for OpenAI-compatible `/chat/completions` APIs.
//!
//! The completion backend speaks the OpenAI chat completions dialect, so a
//! single `reqwest` client covers it. Unlike tool failures, an error here is
//! surfaced as `Err` — the turn controller ends the turn on it instead of
//! feeding it back to the model.

use async_trait::async_trait;
use tracing::{debug, error};

use mnemo_core::config::CompletionConfig;
use mnemo_core::types::{
    ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message, ToolDefinition,
};

use crate::traits::{CompletionError, CompletionProvider, RequestConfig};

/// Default API base when the config doesn't override it.
const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Per-call HTTP timeout. Expiry surfaces as a transport error.
const HTTP_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// ChatClient
// ─────────────────────────────────────────────

/// Client for one OpenAI-compatible chat completions endpoint.
pub struct ChatClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.groq.com/openai/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this client instance.
    default_model: String,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl ChatClient {
    /// Create a new client from the completion config.
    pub fn new(config: &CompletionConfig, model: &str) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        ChatClient {
            client,
            api_base,
            api_key: config.api_key.clone(),
            default_model: model.to_string(),
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl CompletionProvider for ChatClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &RequestConfig,
    ) -> Result<LlmResponse, CompletionError> {
        debug!(
            model = %model,
            messages = messages.len(),
            tools = tools.map_or(0, |t| t.len()),
            "calling completion service"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| "auto".to_string()),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion HTTP request failed");
                CompletionError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %body, "completion service error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_resp = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to parse completion response");
                CompletionError::Malformed(e.to_string())
            })?;

        let llm_resp: LlmResponse = chat_resp.into();
        debug!(
            has_content = llm_resp.content.is_some(),
            tool_calls = llm_resp.tool_calls.len(),
            finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
            "completion response received"
        );
        Ok(llm_resp)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        "ChatClient"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> CompletionConfig {
        CompletionConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
        }
    }

    // ── Unit tests ──

    #[test]
    fn test_completions_url_trailing_slash() {
        let config = make_config("key", Some("https://api.groq.com/openai/v1/"));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");
        assert_eq!(
            client.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base() {
        let config = make_config("key", None);
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");
        assert_eq!(client.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_config_overrides_default_base() {
        let config = make_config("key", Some("https://custom.proxy.com/v1"));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");
        assert_eq!(client.api_base, "https://custom.proxy.com/v1");
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": {
                        "content": "Hello! I'm Mnemo.",
                        "tool_calls": null
                    },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 5,
                    "total_tokens": 15
                }
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("test-key-123", Some(&mock_server.uri()));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");

        let messages = vec![Message::system("You are Mnemo."), Message::user("Hello")];
        let resp = client
            .complete(&messages, None, "llama-3.3-70b-versatile", &RequestConfig::default())
            .await
            .unwrap();

        assert_eq!(resp.content.as_deref(), Some("Hello! I'm Mnemo."));
        assert!(!resp.has_tool_calls());
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.as_ref().unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn test_complete_with_tool_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-tools",
                "choices": [{
                    "message": {
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc123",
                            "type": "function",
                            "function": {
                                "name": "web_search",
                                "arguments": "{\"query\": \"Rust programming\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");

        let tool_def = mnemo_core::types::ToolDefinition::new(
            "web_search",
            "Search the web",
            serde_json::json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        );

        let messages = vec![Message::user("Search for Rust")];
        let resp = client
            .complete(
                &messages,
                Some(&[tool_def]),
                "llama-3.3-70b-versatile",
                &RequestConfig::default(),
            )
            .await
            .unwrap();

        assert!(resp.content.is_none());
        assert!(resp.has_tool_calls());
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].function.name, "web_search");
        assert_eq!(resp.tool_calls[0].id, "call_abc123");
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit exceeded",
                    "type": "rate_limit_error"
                }
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");

        let messages = vec![Message::user("Hello")];
        let err = client
            .complete(&messages, None, "llama-3.3-70b-versatile", &RequestConfig::default())
            .await
            .unwrap_err();

        match err {
            CompletionError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit exceeded"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        // Point to a port that's not listening
        let config = make_config("key", Some("http://127.0.0.1:1"));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");

        let messages = vec![Message::user("Hello")];
        let err = client
            .complete(&messages, None, "llama-3.3-70b-versatile", &RequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");

        let err = client
            .complete(
                &[Message::user("hi")],
                None,
                "llama-3.3-70b-versatile",
                &RequestConfig::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_complete_sends_correct_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "max_tokens": 4096,
                "temperature": 0.2,
                "tool_choice": "auto"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-body",
                "choices": [{
                    "message": { "content": "ok" },
                    "finish_reason": "stop"
                }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", Some(&mock_server.uri()));
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");

        let tool_def = mnemo_core::types::ToolDefinition::new(
            "web_search",
            "Search the web",
            serde_json::json!({"type": "object", "properties": {}}),
        );

        let resp = client
            .complete(
                &[Message::user("test")],
                Some(&[tool_def]),
                "llama-3.3-70b-versatile",
                &RequestConfig::default(),
            )
            .await
            .unwrap();

        // If the body matcher fails, wiremock returns 404 → we'd get an error
        assert_eq!(resp.content.as_deref(), Some("ok"));
    }

    #[test]
    fn test_default_model() {
        let config = make_config("key", None);
        let client = ChatClient::new(&config, "llama-3.3-70b-versatile");
        assert_eq!(client.default_model(), "llama-3.3-70b-versatile");
    }
}
