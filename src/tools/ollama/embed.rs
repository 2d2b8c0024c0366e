//! The `embed` tool: embeddings for one string or a batch of strings.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::OllamaClient;
use crate::error::{OllamaError, OllamaResult};
use crate::tools::{Tool, ToolDescription};

pub struct EmbedTool {
    client: Arc<OllamaClient>,
}

impl EmbedTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for EmbedTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "embed".to_string(),
            description: "Get embeddings for text. Text can be a string or list of strings."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "model": {
                        "type": "string",
                        "description": "Embedding model name (e.g. nomic-embed-text)."
                    },
                    "text": {
                        "type": ["string", "array"],
                        "items": { "type": "string" },
                        "description": "Single string or list of strings to embed."
                    }
                },
                "required": ["model", "text"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let model = arguments["model"].as_str().unwrap_or_default();

        // The backend always takes a list; coerce a scalar into one.
        let input = match &arguments["text"] {
            Value::String(text) => json!([text]),
            other => other.clone(),
        };

        let payload = json!({"model": model, "input": input});
        let data = self
            .client
            .request(Method::POST, "embed", Some(&payload))
            .await?;

        let embeddings = data
            .get("embeddings")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let count = embeddings.len();

        serde_json::to_string(&json!({"embeddings": embeddings, "count": count}))
            .map_err(|e| OllamaError::UnexpectedResponse(e.to_string()))
    }
}
