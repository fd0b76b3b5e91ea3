//! Mnemo tools — the tool-execution-service boundary and the built-in tools.
//!
//! This crate contains:
//! - **service**: the `ToolService` trait, its error taxonomy, and the
//!   in-process implementation
//! - **http**: the remote tool host client
//! - **base** / **registry**: the `Tool` trait and name-keyed store
//! - **web** / **memory** / **memory_tools**: the built-in tool wrappers

pub mod base;
pub mod http;
pub mod memory;
pub mod memory_tools;
pub mod registry;
pub mod service;
pub mod web;

use std::sync::Arc;

use mnemo_core::config::Config;

pub use base::Tool;
pub use http::HttpToolService;
pub use memory::MemoryClient;
pub use registry::ToolRegistry;
pub use service::{LocalToolService, ToolService, ToolServiceError};
pub use web::WebSearchTool;

/// Build the default in-process tool registry from config.
pub fn default_registry(config: &Config) -> ToolRegistry {
    use memory_tools::*;

    let memory_client = Arc::new(MemoryClient::new(&config.memory));
    let search_key = if config.search.is_configured() {
        Some(config.search.api_key.clone())
    } else {
        None
    };

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(WebSearchTool::new(search_key)));
    registry.register(Arc::new(AddShortMemoryTool::new(memory_client.clone())));
    registry.register(Arc::new(AddLongtermMemoryTool::new(memory_client.clone())));
    registry.register(Arc::new(SearchMemoriesTool::new(memory_client.clone())));
    registry.register(Arc::new(GetMemoriesTool::new(memory_client.clone())));
    registry.register(Arc::new(GetMemoryTool::new(memory_client.clone())));
    registry.register(Arc::new(UpdateMemoryTool::new(memory_client.clone())));
    registry.register(Arc::new(DeleteMemoryTool::new(memory_client.clone())));
    registry.register(Arc::new(MemoryHistoryTool::new(memory_client)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_tools() {
        let registry = default_registry(&Config::default());
        let names = registry.tool_names();
        assert!(names.contains(&"web_search".into()));
        assert!(names.contains(&"add_short_memory".into()));
        assert!(names.contains(&"add_longterm_memory".into()));
        assert!(names.contains(&"search_memories".into()));
        assert!(names.contains(&"get_memories".into()));
        assert!(names.contains(&"get_memory".into()));
        assert!(names.contains(&"update_memory".into()));
        assert!(names.contains(&"delete_memory".into()));
        assert!(names.contains(&"memory_history".into()));
        assert_eq!(names.len(), 9);
    }
}
