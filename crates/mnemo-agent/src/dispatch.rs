//! Tool dispatcher — executes one invocation and normalizes the outcome.
//!
//! Whatever the tool service does (succeed, fail, vanish), the dispatcher
//! hands back a [`ToolResult`] the history can absorb. Session-scoped writes
//! get the session's `run_id` stamped into their arguments first: the
//! caller-supplied session id always wins over anything the model invents.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use mnemo_core::types::{ToolInvocation, ToolResult};
use mnemo_tools::ToolService;

/// Tools whose writes are scoped to the current session.
pub const SESSION_SCOPED_TOOLS: &[&str] = &["add_short_memory"];

/// Whether a tool name denotes a session-scoped write.
pub fn is_session_scoped(name: &str) -> bool {
    SESSION_SCOPED_TOOLS.contains(&name)
}

// ─────────────────────────────────────────────
// ToolDispatcher
// ─────────────────────────────────────────────

/// Executes parsed invocations against the tool execution service.
pub struct ToolDispatcher {
    service: Arc<dyn ToolService>,
}

impl ToolDispatcher {
    pub fn new(service: Arc<dyn ToolService>) -> Self {
        Self { service }
    }

    /// Execute an invocation. Never fails — failures become `ok: false`
    /// results that are fed back to the model.
    pub async fn dispatch(&self, invocation: &ToolInvocation, run_id: &str) -> ToolResult {
        let mut arguments = invocation.arguments.clone();

        if is_session_scoped(&invocation.name) {
            // Trust boundary: overwrite regardless of what the model supplied.
            arguments.insert("run_id".to_string(), json!(run_id));
        }

        info!(tool = %invocation.name, "executing tool call");

        match self.service.call_tool(&invocation.name, arguments).await {
            Ok(value) => ToolResult::ok(render_value(&value)),
            Err(e) => {
                warn!(tool = %invocation.name, error = %e, "tool call failed");
                ToolResult::failure(&invocation.name, e)
            }
        }
    }
}

/// Render a tool's JSON result as history-appendable text.
///
/// Strings pass through unquoted; everything else is compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mnemo_core::types::ToolDescriptor;
    use mnemo_tools::ToolServiceError;
    use serde_json::Map;
    use std::sync::Mutex;

    /// Records calls and returns canned results.
    struct MockService {
        calls: Mutex<Vec<(String, Map<String, Value>)>>,
        result: Mutex<Option<Result<Value, ToolServiceError>>>,
    }

    impl MockService {
        fn returning(result: Result<Value, ToolServiceError>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                result: Mutex::new(Some(result)),
            })
        }

        fn recorded_calls(&self) -> Vec<(String, Map<String, Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolService for MockService {
        async fn ping(&self) -> Result<(), ToolServiceError> {
            Ok(())
        }

        async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolServiceError> {
            Ok(Vec::new())
        }

        async fn call_tool(
            &self,
            name: &str,
            arguments: Map<String, Value>,
        ) -> Result<Value, ToolServiceError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), arguments));
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Value::Null))
        }
    }

    fn invocation(name: &str, args: Value) -> ToolInvocation {
        ToolInvocation {
            name: name.to_string(),
            arguments: args.as_object().cloned().unwrap_or_default(),
            call_id: Some("call_1".to_string()),
        }
    }

    #[test]
    fn test_session_scoped_names() {
        assert!(is_session_scoped("add_short_memory"));
        assert!(!is_session_scoped("add_longterm_memory"));
        assert!(!is_session_scoped("web_search"));
    }

    #[tokio::test]
    async fn test_run_id_injected_when_absent() {
        let service = MockService::returning(Ok(json!("stored")));
        let dispatcher = ToolDispatcher::new(service.clone());

        let inv = invocation(
            "add_short_memory",
            json!({"messages": [], "user_id": "Alice"}),
        );
        let result = dispatcher.dispatch(&inv, "session-run-1").await;

        assert!(result.ok);
        let calls = service.recorded_calls();
        assert_eq!(calls[0].1["run_id"], json!("session-run-1"));
    }

    #[tokio::test]
    async fn test_run_id_overwrites_model_supplied_value() {
        let service = MockService::returning(Ok(json!("stored")));
        let dispatcher = ToolDispatcher::new(service.clone());

        let inv = invocation(
            "add_short_memory",
            json!({"messages": [], "user_id": "Alice", "run_id": "model-invented"}),
        );
        dispatcher.dispatch(&inv, "session-run-1").await;

        let calls = service.recorded_calls();
        assert_eq!(calls[0].1["run_id"], json!("session-run-1"));
    }

    #[tokio::test]
    async fn test_run_id_not_injected_for_other_tools() {
        let service = MockService::returning(Ok(json!("ok")));
        let dispatcher = ToolDispatcher::new(service.clone());

        let inv = invocation("web_search", json!({"query": "weather"}));
        dispatcher.dispatch(&inv, "session-run-1").await;

        let calls = service.recorded_calls();
        assert!(calls[0].1.get("run_id").is_none());
    }

    #[tokio::test]
    async fn test_string_result_passes_through() {
        let service = MockService::returning(Ok(json!("plain text result")));
        let dispatcher = ToolDispatcher::new(service);

        let result = dispatcher
            .dispatch(&invocation("web_search", json!({})), "run")
            .await;

        assert!(result.ok);
        assert_eq!(result.content, "plain text result");
    }

    #[tokio::test]
    async fn test_json_result_is_stringified() {
        let service = MockService::returning(Ok(json!([{"id": "m1"}])));
        let dispatcher = ToolDispatcher::new(service);

        let result = dispatcher
            .dispatch(&invocation("get_memories", json!({"user_id": "Alice"})), "run")
            .await;

        assert!(result.ok);
        assert_eq!(result.content, r#"[{"id":"m1"}]"#);
    }

    #[tokio::test]
    async fn test_failure_is_normalized() {
        let service = MockService::returning(Err(ToolServiceError::Remote(
            "backend quota exceeded".to_string(),
        )));
        let dispatcher = ToolDispatcher::new(service);

        let result = dispatcher
            .dispatch(&invocation("web_search", json!({"query": "x"})), "run")
            .await;

        assert!(!result.ok);
        assert_eq!(result.content, "web_search failed: backend quota exceeded");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_normalized() {
        let service = MockService::returning(Err(ToolServiceError::UnknownTool(
            "nope".to_string(),
        )));
        let dispatcher = ToolDispatcher::new(service);

        let result = dispatcher.dispatch(&invocation("nope", json!({})), "run").await;

        assert!(!result.ok);
        assert!(result.content.starts_with("nope failed:"));
        assert!(result.content.contains("not available"));
    }
}
