//! Tool system exposed over MCP.
//!
//! Each tool describes itself with a JSON Schema parameter object; the
//! registry validates arguments against that schema before execution. Tool
//! execution follows a strict contract: the caller always receives a plain
//! text result string. Backend failures are rendered into that string at this
//! boundary and never escape as protocol errors — only dispatch-level
//! problems (unknown tool, invalid parameters) surface as [`ToolError`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::client::OllamaClient;
use crate::error::{OllamaError, OllamaResult};

pub mod ollama;

/// One externally callable operation with a fixed name, argument schema and
/// string return contract.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool name, description and JSON Schema parameter object.
    fn describe(&self) -> ToolDescription;

    /// Executes with arguments already validated against the schema from
    /// `describe()`. Returns the formatted success string, or the backend
    /// failure for the registry to render.
    async fn execute(&self, arguments: &Value) -> OllamaResult<String>;
}

/// Tool metadata surfaced through `tools/list`.
#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Dispatch-level errors. These map to JSON-RPC error responses; execution
/// failures never take this path.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
}

/// Registry holding the nine Ollama tools in their listing order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(ollama::ListModelsTool::new(client.clone())),
            Box::new(ollama::ListRunningModelsTool::new(client.clone())),
            Box::new(ollama::ShowModelTool::new(client.clone())),
            Box::new(ollama::ChatTool::new(client.clone())),
            Box::new(ollama::GenerateTool::new(client.clone())),
            Box::new(ollama::EmbedTool::new(client.clone())),
            Box::new(ollama::CopyModelTool::new(client.clone())),
            Box::new(ollama::PullModelTool::new(client.clone())),
            Box::new(ollama::DeleteModelTool::new(client)),
        ];
        Self { tools }
    }

    /// Descriptions of every registered tool, in registration order.
    pub fn describe(&self) -> Vec<ToolDescription> {
        self.tools.iter().map(|tool| tool.describe()).collect()
    }

    /// Validate arguments and execute the named tool.
    ///
    /// The `Ok` string is the tool result — possibly a rendered failure
    /// message; `Err` only ever reports dispatch problems.
    pub async fn call(&self, name: &str, arguments: &Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.describe().name == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        Self::validate_arguments(&tool.describe(), arguments)?;

        Ok(match tool.execute(arguments).await {
            Ok(text) => text,
            Err(e) => render_failure(name, e),
        })
    }

    /// Arguments MUST match the tool's schema before execution.
    fn validate_arguments(
        description: &ToolDescription,
        arguments: &Value,
    ) -> Result<(), ToolError> {
        let validator = jsonschema::validator_for(&description.parameters)
            .map_err(|e| ToolError::SchemaError(format!("Schema compilation error: {e}")))?;

        validator.validate(arguments).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::ValidationError(error_messages.join("; "))
        })
    }
}

/// The single formatting layer turning an execution failure into the result
/// string the caller sees.
fn render_failure(name: &str, failure: OllamaError) -> String {
    if failure.is_transport() {
        warn!(tool = name, %failure, "Ollama request failed");
        format!("Ollama request failed: {failure}")
    } else {
        error!(tool = name, %failure, "tool execution failed");
        format!("Error: {failure}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OllamaConfig;
    use serde_json::json;

    fn test_registry() -> ToolRegistry {
        let client = OllamaClient::new(OllamaConfig::default()).unwrap();
        ToolRegistry::new(Arc::new(client))
    }

    #[test]
    fn test_registry_lists_all_nine_tools() {
        let names: Vec<String> = test_registry()
            .describe()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "list_models",
                "list_running_models",
                "show_model",
                "chat",
                "generate",
                "embed",
                "copy_model",
                "pull_model",
                "delete_model",
            ]
        );
    }

    #[test]
    fn test_every_tool_schema_compiles() {
        for description in test_registry().describe() {
            assert!(
                jsonschema::validator_for(&description.parameters).is_ok(),
                "schema for {} does not compile",
                description.name
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_dispatch_error() {
        let result = test_registry().call("no_such_tool", &json!({})).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_missing_required_argument_fails_validation() {
        let result = test_registry().call("show_model", &json!({})).await;
        assert!(matches!(result, Err(ToolError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_wrong_argument_type_fails_validation() {
        let result = test_registry()
            .call("chat", &json!({"model": "llama3.2", "messages": "hello"}))
            .await;
        assert!(matches!(result, Err(ToolError::ValidationError(_))));
    }

    #[test]
    fn test_transport_failure_renders_as_request_failed() {
        let rendered = render_failure(
            "list_models",
            OllamaError::Unreachable("connection refused".to_string()),
        );
        assert_eq!(rendered, "Ollama request failed: connection refused");
    }

    #[test]
    fn test_http_failure_renders_with_status_detail() {
        let rendered = render_failure(
            "show_model",
            OllamaError::Http {
                status: 404,
                body: "model not found".to_string(),
            },
        );
        assert_eq!(rendered, "Ollama request failed: HTTP 404: model not found");
    }

    #[test]
    fn test_unexpected_failure_renders_as_generic_error() {
        let rendered = render_failure(
            "embed",
            OllamaError::UnexpectedResponse("missing field".to_string()),
        );
        assert_eq!(rendered, "Error: unexpected response from Ollama: missing field");
    }
}
