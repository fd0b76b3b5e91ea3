//! Remote tool service client.
//!
//! Talks to a tool host over a minimal JSON shape: `GET /ping` for liveness,
//! `GET /tools` for the catalog listing, `POST /tools/{name}` with the
//! argument object for execution. The shape is plumbing, not a committed
//! protocol — only this client and the host need to agree on it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use mnemo_core::types::ToolDescriptor;

use crate::service::{ToolService, ToolServiceError};

/// Per-call HTTP timeout. Expiry surfaces as a transport error, which the
/// dispatcher folds into the conversation like any other tool failure.
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Listing response envelope.
#[derive(Debug, Deserialize)]
struct ToolListing {
    tools: Vec<ToolDescriptor>,
}

/// Execution response envelope.
#[derive(Debug, Deserialize)]
struct CallOutcome {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

// ─────────────────────────────────────────────
// HttpToolService
// ─────────────────────────────────────────────

/// Client for a remote tool host.
pub struct HttpToolService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpToolService {
    /// Create a new client for the given tool host base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ToolService for HttpToolService {
    async fn ping(&self) -> Result<(), ToolServiceError> {
        let resp = self.client.get(self.url("ping")).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ToolServiceError::Remote(format!(
                "ping returned HTTP {}",
                resp.status()
            )))
        }
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolServiceError> {
        debug!(url = %self.base_url, "listing remote tools");

        let resp = self.client.get(self.url("tools")).send().await?;
        if !resp.status().is_success() {
            return Err(ToolServiceError::Remote(format!(
                "listing returned HTTP {}",
                resp.status()
            )));
        }

        let listing: ToolListing = resp
            .json()
            .await
            .map_err(|e| ToolServiceError::Remote(format!("malformed tool listing: {e}")))?;

        debug!(count = listing.tools.len(), "remote tools listed");
        Ok(listing.tools)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, ToolServiceError> {
        debug!(tool = name, "calling remote tool");

        let resp = self
            .client
            .post(self.url(&format!("tools/{name}")))
            .json(&Value::Object(arguments))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if status.as_u16() == 404 {
            return Err(ToolServiceError::UnknownTool(name.to_string()));
        }

        // Error detail comes in the body when the host produced one.
        let outcome: CallOutcome = serde_json::from_str(&body).unwrap_or(CallOutcome {
            result: None,
            error: None,
        });

        if !status.is_success() {
            let cause = outcome
                .error
                .unwrap_or_else(|| format!("HTTP {status}: {body}"));
            warn!(tool = name, cause = %cause, "remote tool failed");
            return Err(ToolServiceError::Remote(cause));
        }

        if let Some(error) = outcome.error {
            return Err(ToolServiceError::Remote(error));
        }

        Ok(outcome.result.unwrap_or(Value::Null))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
