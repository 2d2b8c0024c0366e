//! Model lifecycle tools: `copy_model`, `pull_model`, `delete_model`.
//!
//! `pull_model` is the one lifecycle operation whose backend endpoint reports
//! progress as an incremental stream; it reuses the stream fold discipline
//! with a status accumulator instead of a content one.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::OllamaClient;
use crate::error::OllamaResult;
use crate::tools::{Tool, ToolDescription};

/// Copies an installed model under a new name.
pub struct CopyModelTool {
    client: Arc<OllamaClient>,
}

impl CopyModelTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CopyModelTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "copy_model".to_string(),
            description: "Copy an installed model to a new name.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "source": {
                        "type": "string",
                        "description": "Existing model name to copy from."
                    },
                    "destination": {
                        "type": "string",
                        "description": "New model name to copy to."
                    }
                },
                "required": ["source", "destination"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let source = arguments["source"].as_str().unwrap_or_default();
        let destination = arguments["destination"].as_str().unwrap_or_default();

        let payload = json!({"source": source, "destination": destination});
        self.client
            .request(Method::POST, "copy", Some(&payload))
            .await?;
        Ok(format!("Copied model: {source} -> {destination}"))
    }
}

/// Pulls a model from the registry, folding the progress stream to its final
/// status.
pub struct PullModelTool {
    client: Arc<OllamaClient>,
}

impl PullModelTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for PullModelTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "pull_model".to_string(),
            description: "Pull a model from the registry (e.g. llama3.2, gemma3). May take a while."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Model name to pull (e.g. llama3.2, mistral)."
                    },
                    "insecure": {
                        "type": "boolean",
                        "description": "Allow insecure connections to the registry.",
                        "default": false
                    }
                },
                "required": ["name"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let name = arguments["name"].as_str().unwrap_or_default();
        let insecure = arguments
            .get("insecure")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut payload = json!({"name": name});
        if insecure {
            payload["insecure"] = Value::Bool(true);
        }

        let status = self.client.request_status_stream("pull", &payload).await?;
        Ok(format!(
            "Pull status: {status}. Check Ollama for progress."
        ))
    }
}

/// Deletes an installed model.
pub struct DeleteModelTool {
    client: Arc<OllamaClient>,
}

impl DeleteModelTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteModelTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "delete_model".to_string(),
            description: "Delete an installed model from Ollama.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Exact model name to delete."
                    }
                },
                "required": ["name"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let name = arguments["name"].as_str().unwrap_or_default();

        let payload = json!({"name": name});
        self.client
            .request(Method::DELETE, "delete", Some(&payload))
            .await?;
        Ok(format!("Deleted model: {name}"))
    }
}
