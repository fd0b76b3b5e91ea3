//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentConfig`, `CompletionConfig`,
//! `ToolServiceConfig`, `SearchConfig`, `MemoryConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! `#[serde(rename_all = "camelCase")]` handles the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.mnemo/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub completion: CompletionConfig,
    pub tool_service: ToolServiceConfig,
    pub search: SearchConfig,
    pub memory: MemoryConfig,
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Settings for the agent turn loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Display name used in the system prompt and CLI banner.
    pub name: String,
    /// Completion model identifier.
    pub model: String,
    /// Maximum tokens to generate per completion call.
    pub max_tokens: u32,
    /// Sampling temperature. Kept low to favor deterministic tool use.
    pub temperature: f64,
    /// Maximum completion ↔ tool iterations per turn before forcing an answer.
    pub max_turn_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Mnemo".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 4096,
            temperature: 0.2,
            max_turn_iterations: 20,
        }
    }
}

// ─────────────────────────────────────────────
// Completion service
// ─────────────────────────────────────────────

/// Completion-service credentials and endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionConfig {
    /// API key for Bearer authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides the built-in default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl CompletionConfig {
    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tool execution service
// ─────────────────────────────────────────────

/// Where tool calls are executed.
///
/// With a `url`, tools run on a remote tool host; without one, the built-in
/// tools run in-process.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolServiceConfig {
    /// Base URL of the remote tool host (e.g. `"http://localhost:8321"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ─────────────────────────────────────────────
// Search backend
// ─────────────────────────────────────────────

/// Web search backend credentials.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: String,
}

impl SearchConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Memory backend
// ─────────────────────────────────────────────

/// Hosted memory API credentials and scoping.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryConfig {
    #[serde(default)]
    pub api_key: String,
    /// Organization scoping for every memory request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Project scoping for every memory request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Custom API base URL (overrides the built-in default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl MemoryConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
