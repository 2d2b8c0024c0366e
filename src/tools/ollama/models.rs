//! Model inventory tools: `list_models`, `list_running_models`, `show_model`.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::OllamaClient;
use crate::error::{OllamaError, OllamaResult};
use crate::tools::{Tool, ToolDescription};

/// Lists every installed model as a bullet line with its size.
pub struct ListModelsTool {
    client: Arc<OllamaClient>,
}

impl ListModelsTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    /// One bullet per model: `- name (size MB)`; unknown sizes render as `?`.
    fn format_models(models: &[Value]) -> String {
        models
            .iter()
            .map(|model| {
                let name = model.get("name").and_then(Value::as_str).unwrap_or("?");
                let size = model
                    .get("size")
                    .and_then(Value::as_u64)
                    .filter(|&bytes| bytes > 0)
                    .map(|bytes| format!("{:.0} MB", bytes as f64 / (1024.0 * 1024.0)))
                    .unwrap_or_else(|| "?".to_string());
                format!("- {name} ({size})")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Tool for ListModelsTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "list_models".to_string(),
            description: "List all installed Ollama models (name, size, modified).".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, _arguments: &Value) -> OllamaResult<String> {
        let data = self.client.request(Method::GET, "tags", None).await?;
        let models = data
            .get("models")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if models.is_empty() {
            return Ok(
                "No models installed. Use pull_model to pull a model (e.g. llama3.2).".to_string(),
            );
        }
        Ok(Self::format_models(&models))
    }
}

/// Lists the models currently loaded into memory.
pub struct ListRunningModelsTool {
    client: Arc<OllamaClient>,
}

impl ListRunningModelsTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListRunningModelsTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "list_running_models".to_string(),
            description: "List models currently loaded in Ollama (running).".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, _arguments: &Value) -> OllamaResult<String> {
        let data = self.client.request(Method::GET, "ps", None).await?;
        let models = data
            .get("models")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if models.is_empty() {
            return Ok("No models currently loaded.".to_string());
        }
        Ok(models
            .iter()
            .map(|model| {
                let name = model.get("name").and_then(Value::as_str).unwrap_or("?");
                format!("- {name}")
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Dumps the full details of one installed model as pretty-printed JSON.
pub struct ShowModelTool {
    client: Arc<OllamaClient>,
}

impl ShowModelTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ShowModelTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "show_model".to_string(),
            description:
                "Get details for an installed model (parameters, family, size, etc.).".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "model": {
                        "type": "string",
                        "description": "Model name (e.g. llama3.2, gemma3)."
                    }
                },
                "required": ["model"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let model = arguments["model"].as_str().unwrap_or_default();
        let payload = json!({"name": model});
        let data = self
            .client
            .request(Method::POST, "show", Some(&payload))
            .await?;
        serde_json::to_string_pretty(&data)
            .map_err(|e| OllamaError::UnexpectedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_models_includes_size_in_megabytes() {
        let models = vec![json!({"name": "llama3.2", "size": 5 * 1024 * 1024})];
        assert_eq!(ListModelsTool::format_models(&models), "- llama3.2 (5 MB)");
    }

    #[test]
    fn test_format_models_handles_missing_size() {
        let models = vec![json!({"name": "gemma3"})];
        assert_eq!(ListModelsTool::format_models(&models), "- gemma3 (?)");
    }

    #[test]
    fn test_format_models_treats_zero_size_as_unknown() {
        let models = vec![json!({"name": "tiny", "size": 0})];
        assert_eq!(ListModelsTool::format_models(&models), "- tiny (?)");
    }

    #[test]
    fn test_format_models_joins_with_newlines() {
        let models = vec![
            json!({"name": "a", "size": 1024 * 1024}),
            json!({"name": "b", "size": 2 * 1024 * 1024}),
        ];
        assert_eq!(
            ListModelsTool::format_models(&models),
            "- a (1 MB)\n- b (2 MB)"
        );
    }
}
