//! Tool trait — the interface every built-in tool implements.

use async_trait::async_trait;
use serde_json::{Map, Value};

use mnemo_core::types::ToolDescriptor;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// A single executable tool.
///
/// The local tool service discovers tools via `name()`, lists their schemas
/// via `descriptor()`, and dispatches calls via `execute()`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used to call this tool (e.g. `"web_search"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// Returns an arbitrary serializable value. On failure, return an `Err` —
    /// the service boundary catches it and normalizes it downstream.
    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value>;

    /// Build the catalog descriptor for this tool.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: Some(self.parameters()),
        }
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Extract a required `String` param, returning a user-friendly error.
pub fn require_string(params: &Map<String, Value>, key: &str) -> anyhow::Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))
}

/// Extract a required param of any JSON shape.
pub fn require_value(params: &Map<String, Value>, key: &str) -> anyhow::Result<Value> {
    params
        .get(key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))
}

/// Extract an optional `String` param.
pub fn optional_string(params: &Map<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Extract an optional param of any JSON shape (absent or null → `None`).
pub fn optional_value(params: &Map<String, Value>, key: &str) -> Option<Value> {
    params.get(key).filter(|v| !v.is_null()).cloned()
}

/// Extract an optional boolean param with a default.
pub fn bool_or(params: &Map<String, Value>, key: &str, default: bool) -> bool {
    params.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}
