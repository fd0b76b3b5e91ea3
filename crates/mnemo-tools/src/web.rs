//! Web search tool — forwards to the Tavily search API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::base::{optional_value, require_string, Tool};

/// Tavily search endpoint.
const SEARCH_URL: &str = "https://api.tavily.com/search";

/// Max search results returned to the model.
const DEFAULT_MAX_RESULTS: u64 = 5;

// ─────────────────────────────────────────────
// WebSearchTool
// ─────────────────────────────────────────────

/// Searches the web using the Tavily API.
pub struct WebSearchTool {
    api_key: Option<String>,
    client: Client,
}

impl WebSearchTool {
    /// Create a new web search tool.
    ///
    /// `api_key` can be `None`; it will fall back to the `TAVILY_API_KEY`
    /// env var.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("TAVILY_API_KEY").ok())
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns a numbered list of results with titles, URLs, and snippets. \
         Use only when the answer is not already known and is likely on the internet."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Number of results (1-10, default 5)",
                    "minimum": 1,
                    "maximum": 10
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Map<String, Value>) -> anyhow::Result<Value> {
        let query = require_string(&params, "query")?;
        let max_results = optional_value(&params, "max_results")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, 10);

        let api_key = self
            .resolve_api_key()
            .ok_or_else(|| anyhow::anyhow!("No search API key configured (set TAVILY_API_KEY)"))?;

        debug!(query = %query, max_results = max_results, "searching web");

        let resp = self
            .client
            .post(SEARCH_URL)
            .json(&json!({
                "api_key": api_key,
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("search request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("search backend returned {status}: {body}");
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to parse search response: {e}"))?;

        let results = body["results"].as_array().cloned().unwrap_or_default();
        if results.is_empty() {
            return Ok(json!("No results found."));
        }

        let mut output = Vec::new();
        for (i, r) in results.iter().enumerate() {
            let title = r["title"].as_str().unwrap_or("(no title)");
            let url = r["url"].as_str().unwrap_or("");
            let snippet = r["content"].as_str().unwrap_or("");
            output.push(format!("{}. {}\n   {}\n   {}", i + 1, title, url, snippet));
        }

        Ok(json!(output.join("\n\n")))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_search_descriptor() {
        let tool = WebSearchTool::new(None);
        let desc = tool.descriptor();
        assert_eq!(desc.name, "web_search");
        let params = desc.parameters.unwrap();
        assert_eq!(params["required"][0], "query");
    }

    #[tokio::test]
    async fn test_web_search_missing_query() {
        let tool = WebSearchTool::new(Some("tvly-test".into()));
        let result = tool.execute(Map::new()).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing required parameter"));
    }

    #[tokio::test]
    async fn test_web_search_no_api_key() {
        std::env::remove_var("TAVILY_API_KEY");
        let tool = WebSearchTool::new(None);
        let mut params = Map::new();
        params.insert("query".into(), json!("test"));
        let result = tool.execute(params).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key"));
    }
}
