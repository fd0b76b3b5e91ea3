//! Tool service trait — the tool-execution-service boundary.
//!
//! The dispatcher only sees this trait. `LocalToolService` runs the built-in
//! tools in-process; `HttpToolService` (in `http.rs`) forwards to a remote
//! tool host.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use mnemo_core::types::ToolDescriptor;

use crate::registry::ToolRegistry;

/// Failure executing or listing tools.
#[derive(Debug, Error)]
pub enum ToolServiceError {
    /// The request never reached the service.
    #[error("tool service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No tool with that name is available.
    #[error("tool '{0}' is not available")]
    UnknownTool(String),

    /// The tool ran and reported an error.
    #[error("{0}")]
    Remote(String),
}

/// Trait all tool execution backends implement.
///
/// Discovery (`list_tools`) happens once at session start; execution
/// (`call_tool`) is addressed by tool name with an argument object.
#[async_trait]
pub trait ToolService: Send + Sync {
    /// Check the service is reachable.
    async fn ping(&self) -> Result<(), ToolServiceError>;

    /// List the available tool capability descriptors.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolServiceError>;

    /// Execute a tool by name, returning its raw serializable result.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, ToolServiceError>;
}

// ─────────────────────────────────────────────
// LocalToolService
// ─────────────────────────────────────────────

/// In-process tool service over a [`ToolRegistry`].
///
/// Used when no remote tool host is configured, and by tests.
pub struct LocalToolService {
    registry: ToolRegistry,
}

impl LocalToolService {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Access the underlying registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[async_trait]
impl ToolService for LocalToolService {
    async fn ping(&self) -> Result<(), ToolServiceError> {
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolServiceError> {
        Ok(self.registry.descriptors())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, ToolServiceError> {
        self.registry.call(name, arguments).await
    }
}
