//! Tool schema adapter — catalog descriptors → completion-service definitions.
//!
//! Pure transformation, run once per session after discovery. Calling it
//! twice on the same catalog snapshot yields identical output.

use serde_json::json;

use mnemo_core::types::{ToolDefinition, ToolDescriptor};

/// Convert a tool catalog listing into the function-calling shape the
/// completion service expects.
///
/// A descriptor without a parameter schema becomes an empty object schema —
/// the service rejects definitions with no `parameters` field at all.
pub fn to_tool_definitions(catalog: &[ToolDescriptor]) -> Vec<ToolDefinition> {
    catalog
        .iter()
        .map(|desc| {
            let parameters = desc
                .parameters
                .clone()
                .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
            ToolDefinition::new(&desc.name, &desc.description, parameters)
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
