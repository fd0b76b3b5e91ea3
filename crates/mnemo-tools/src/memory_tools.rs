//! Memory tools — thin forwarding wrappers over the memory backend.
//!
//! Each tool validates its arguments and forwards to [`MemoryClient`];
//! nothing here interprets memory contents.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::base::{bool_or, optional_string, optional_value, require_string, require_value, Tool};
use crate::memory::MemoryClient;

/// Message-list schema fragment shared by the two add tools.
fn messages_schema() -> Value {
    json!({
        "type": "array",
        "description": "List of {\"role\": \"...\", \"content\": \"...\"} objects for this chat turn",
        "items": {
            "type": "object",
            "properties": {
                "role": { "type": "string" },
                "content": { "type": "string" }
            },
            "required": ["role", "content"]
        }
    })
}

// ─────────────────────────────────────────────
// AddShortMemoryTool
// ─────────────────────────────────────────────

/// Stores messages as session-scoped (ephemeral) memory.
///
/// The `run_id` argument is always overwritten by the dispatcher with the
/// session's own id before this tool runs; whatever the model supplied is
/// never trusted.
pub struct AddShortMemoryTool {
    client: Arc<MemoryClient>,
}

impl AddShortMemoryTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AddShortMemoryTool {
    fn name(&self) -> &str {
        "add_short_memory"
    }

    fn description(&self) -> &str {
        "Store a sequence of messages as short-term memory for this session. \
         Use for conversational context that should not outlive the session."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "messages": messages_schema(),
                "user_id": {
                    "type": "string",
                    "description": "Stable human identifier (e.g. \"alice\")"
                },
                "run_id": {
                    "type": "string",
                    "description": "Session identifier marking these facts as ephemeral"
                },
                "async_mode": {
                    "type": "boolean",
                    "description": "If true, returns immediately and processes in background"
                }
            },
            "required": ["messages", "user_id", "run_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let messages = require_value(&params, "messages")?;
        let user_id = require_string(&params, "user_id")?;
        let run_id = require_string(&params, "run_id")?;
        let async_mode = bool_or(&params, "async_mode", true);

        self.client
            .add(messages, &user_id, Some(&run_id), None, async_mode)
            .await?;

        let mode = if async_mode { "async" } else { "sync" };
        Ok(json!(format!(
            "Short-term memory ({mode}) scheduled for user={user_id}, run={run_id}"
        )))
    }
}

// ─────────────────────────────────────────────
// AddLongtermMemoryTool
// ─────────────────────────────────────────────

/// Persists key facts and preferences that should last beyond the session.
pub struct AddLongtermMemoryTool {
    client: Arc<MemoryClient>,
}

impl AddLongtermMemoryTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AddLongtermMemoryTool {
    fn name(&self) -> &str {
        "add_longterm_memory"
    }

    fn description(&self) -> &str {
        "Persist key metadata, preferences, and critical facts long-term."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "messages": messages_schema(),
                "user_id": {
                    "type": "string",
                    "description": "Stable human identifier (e.g. \"alice\")"
                },
                "agent_id": {
                    "type": "string",
                    "description": "Optional stable bot identifier"
                },
                "async_mode": {
                    "type": "boolean",
                    "description": "If true, returns immediately and processes in background"
                }
            },
            "required": ["messages", "user_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let messages = require_value(&params, "messages")?;
        let user_id = require_string(&params, "user_id")?;
        let agent_id = optional_string(&params, "agent_id");
        let async_mode = bool_or(&params, "async_mode", true);

        self.client
            .add(messages, &user_id, None, agent_id.as_deref(), async_mode)
            .await?;

        let mode = if async_mode { "async" } else { "sync" };
        let tag = match agent_id {
            Some(agent) => format!("user={user_id}, agent={agent}"),
            None => format!("user={user_id}"),
        };
        Ok(json!(format!("Long-term memory ({mode}) scheduled for {tag}")))
    }
}

// ─────────────────────────────────────────────
// SearchMemoriesTool
// ─────────────────────────────────────────────

/// Semantic search over stored memories. Ranking happens on the backend.
pub struct SearchMemoriesTool {
    client: Arc<MemoryClient>,
}

impl SearchMemoriesTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchMemoriesTool {
    fn name(&self) -> &str {
        "search_memories"
    }

    fn description(&self) -> &str {
        "Perform a semantic search over stored memories. \
         Use for specific questions about the past."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The natural-language search query"
                },
                "filters": {
                    "type": "object",
                    "description": "Filter object narrowing the search (e.g. {\"user_id\": \"alice\"}). \
                                    Supports AND/OR/NOT and comparison operators."
                }
            },
            "required": ["query", "filters"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let query = require_string(&params, "query")?;
        let filters = require_value(&params, "filters")?;
        self.client.search(&query, filters).await
    }
}

// ─────────────────────────────────────────────
// GetMemoriesTool
// ─────────────────────────────────────────────

/// Retrieves every memory for a user. A user with no memories yields `[]`.
pub struct GetMemoriesTool {
    client: Arc<MemoryClient>,
}

impl GetMemoriesTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetMemoriesTool {
    fn name(&self) -> &str {
        "get_memories"
    }

    fn description(&self) -> &str {
        "Retrieve all memories associated with a user_id. \
         Call at the start of a session to understand the user's history."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The stable identifier for the user"
                }
            },
            "required": ["user_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let user_id = require_string(&params, "user_id")?;
        if user_id.is_empty() {
            anyhow::bail!("user_id cannot be empty");
        }

        // The filter is constructed here so the model doesn't have to.
        let memories = self.client.get_all(json!({ "user_id": user_id })).await?;

        // Always a list, even when the backend returns nothing.
        match memories {
            Value::Null => Ok(json!([])),
            other => Ok(other),
        }
    }
}

// ─────────────────────────────────────────────
// GetMemoryTool
// ─────────────────────────────────────────────

/// Retrieve a single memory by its id.
pub struct GetMemoryTool {
    client: Arc<MemoryClient>,
}

impl GetMemoryTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetMemoryTool {
    fn name(&self) -> &str {
        "get_memory"
    }

    fn description(&self) -> &str {
        "Retrieve a single memory by its ID."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The unique identifier of the memory"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let memory_id = require_string(&params, "memory_id")?;
        self.client.get(&memory_id).await
    }
}

// ─────────────────────────────────────────────
// UpdateMemoryTool
// ─────────────────────────────────────────────

/// Update the content or metadata of an existing memory.
pub struct UpdateMemoryTool {
    client: Arc<MemoryClient>,
}

impl UpdateMemoryTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateMemoryTool {
    fn name(&self) -> &str {
        "update_memory"
    }

    fn description(&self) -> &str {
        "Update the content or metadata of an existing memory."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The ID of the memory to update"
                },
                "text": {
                    "type": "string",
                    "description": "New text content (optional)"
                },
                "metadata": {
                    "type": "object",
                    "description": "Additional metadata fields (optional)"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let memory_id = require_string(&params, "memory_id")?;
        let text = optional_string(&params, "text");
        let metadata = optional_value(&params, "metadata");
        self.client
            .update(&memory_id, text.as_deref(), metadata)
            .await
    }
}

// ─────────────────────────────────────────────
// DeleteMemoryTool
// ─────────────────────────────────────────────

/// Delete a memory entry by its id.
pub struct DeleteMemoryTool {
    client: Arc<MemoryClient>,
}

impl DeleteMemoryTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteMemoryTool {
    fn name(&self) -> &str {
        "delete_memory"
    }

    fn description(&self) -> &str {
        "Delete a memory entry by its ID."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The ID of the memory to delete"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let memory_id = require_string(&params, "memory_id")?;
        let result = self.client.delete(&memory_id).await?;
        match result {
            Value::Null => Ok(json!(format!("Memory {memory_id} deleted"))),
            other => Ok(other),
        }
    }
}

// ─────────────────────────────────────────────
// MemoryHistoryTool
// ─────────────────────────────────────────────

/// Fetch the full edit history of a single memory.
pub struct MemoryHistoryTool {
    client: Arc<MemoryClient>,
}

impl MemoryHistoryTool {
    pub fn new(client: Arc<MemoryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MemoryHistoryTool {
    fn name(&self) -> &str {
        "memory_history"
    }

    fn description(&self) -> &str {
        "Fetch the full edit history of a single memory."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The unique identifier of the memory to inspect"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let memory_id = require_string(&params, "memory_id")?;
        self.client.history(&memory_id).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
