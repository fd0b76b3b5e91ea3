//! Memory backend client — a thin wrapper over the hosted memory HTTP API.
//!
//! Memories are opaque JSON to this client; storage format and search
//! ranking live entirely on the backend.

use anyhow::Context;
use serde_json::{json, Map, Value};
use tracing::debug;

use mnemo_core::config::MemoryConfig;

/// Default API base when the config doesn't override it.
const DEFAULT_API_BASE: &str = "https://api.mem0.ai";

/// Per-call HTTP timeout.
const HTTP_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────
// MemoryClient
// ─────────────────────────────────────────────

/// Client for the hosted memory API.
///
/// Every request is authenticated with the configured token and scoped to
/// the configured organization/project when present.
pub struct MemoryClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    org_id: Option<String>,
    project_id: Option<String>,
}

impl MemoryClient {
    /// Create a new client from the memory config.
    pub fn new(config: &MemoryConfig) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            org_id: config.org_id.clone(),
            project_id: config.project_id.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Add org/project scoping fields to a request body.
    fn scope(&self, body: &mut Map<String, Value>) {
        if let Some(org) = &self.org_id {
            body.insert("org_id".into(), json!(org));
        }
        if let Some(project) = &self.project_id {
            body.insert("project_id".into(), json!(project));
        }
    }

    /// Send a request and decode the response body.
    ///
    /// Non-success statuses become errors; an empty success body becomes
    /// `null` (some operations, like delete, return nothing).
    async fn send(&self, req: reqwest::RequestBuilder, op: &str) -> anyhow::Result<Value> {
        let resp = req
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await
            .with_context(|| format!("memory {op} request failed"))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            anyhow::bail!("memory backend returned {status}: {body}");
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).or(Ok(Value::String(body)))
    }

    /// Store messages as a new memory entry.
    ///
    /// `run_id` marks the entry as ephemeral/session-scoped; `agent_id`
    /// attributes it to a bot identity. Either may be absent.
    pub async fn add(
        &self,
        messages: Value,
        user_id: &str,
        run_id: Option<&str>,
        agent_id: Option<&str>,
        async_mode: bool,
    ) -> anyhow::Result<Value> {
        debug!(user_id = %user_id, run_id = run_id.unwrap_or("-"), "adding memory");

        let mut body = Map::new();
        body.insert("messages".into(), messages);
        body.insert("user_id".into(), json!(user_id));
        if let Some(run) = run_id {
            body.insert("run_id".into(), json!(run));
        }
        if let Some(agent) = agent_id {
            body.insert("agent_id".into(), json!(agent));
        }
        body.insert("version".into(), json!("v2"));
        body.insert("async_mode".into(), json!(async_mode));
        self.scope(&mut body);

        self.send(self.client.post(self.url("v1/memories/")).json(&body), "add")
            .await
    }

    /// Semantic search over stored memories.
    pub async fn search(&self, query: &str, filters: Value) -> anyhow::Result<Value> {
        debug!(query = %query, "searching memories");

        let mut body = Map::new();
        body.insert("query".into(), json!(query));
        body.insert("filters".into(), filters);
        self.scope(&mut body);

        self.send(
            self.client.post(self.url("v2/memories/search/")).json(&body),
            "search",
        )
        .await
    }

    /// Fetch all memories matching a filter object.
    pub async fn get_all(&self, filters: Value) -> anyhow::Result<Value> {
        let mut body = Map::new();
        body.insert("filters".into(), filters);
        self.scope(&mut body);

        self.send(
            self.client.post(self.url("v2/memories/")).json(&body),
            "get_all",
        )
        .await
    }

    /// Fetch a single memory by id.
    pub async fn get(&self, memory_id: &str) -> anyhow::Result<Value> {
        self.send(
            self.client.get(self.url(&format!("v1/memories/{memory_id}/"))),
            "get",
        )
        .await
    }

    /// Fetch the edit history of a single memory.
    pub async fn history(&self, memory_id: &str) -> anyhow::Result<Value> {
        self.send(
            self.client
                .get(self.url(&format!("v1/memories/{memory_id}/history/"))),
            "history",
        )
        .await
    }

    /// Update the text and/or metadata of an existing memory.
    pub async fn update(
        &self,
        memory_id: &str,
        text: Option<&str>,
        metadata: Option<Value>,
    ) -> anyhow::Result<Value> {
        let mut body = Map::new();
        if let Some(text) = text {
            body.insert("text".into(), json!(text));
        }
        if let Some(metadata) = metadata {
            body.insert("metadata".into(), metadata);
        }

        self.send(
            self.client
                .put(self.url(&format!("v1/memories/{memory_id}/")))
                .json(&body),
            "update",
        )
        .await
    }

    /// Delete a memory by id.
    pub async fn delete(&self, memory_id: &str) -> anyhow::Result<Value> {
        self.send(
            self.client
                .delete(self.url(&format!("v1/memories/{memory_id}/"))),
            "delete",
        )
        .await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
