//! Tool registry — name-keyed store backing the in-process tool service.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use mnemo_core::types::ToolDescriptor;

use crate::base::Tool;
use crate::service::ToolServiceError;

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by name and dispatches calls.
///
/// Owns `Arc<dyn Tool>` so tools can be shared across threads.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        info!(tool = tool.name(), "registered tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools, sorted for determinism.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Catalog descriptors for all registered tools, sorted by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descs: Vec<ToolDescriptor> =
            self.tools.values().map(|t| t.descriptor()).collect();
        descs.sort_by(|a, b| a.name.cmp(&b.name));
        descs
    }

    /// Call a tool by name with the given arguments.
    pub async fn call(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, ToolServiceError> {
        let tool = self.tools.get(name).ok_or_else(|| {
            warn!(tool = name, "tool not found");
            ToolServiceError::UnknownTool(name.to_string())
        })?;

        tool.execute(arguments).await.map_err(|e| {
            warn!(tool = name, error = %e, "tool execution failed");
            ToolServiceError::Remote(e.to_string())
        })
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
