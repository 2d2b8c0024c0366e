//! The `generate` tool: single-prompt completion with no conversation history.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::{generate_fragment, OllamaClient};
use crate::error::OllamaResult;
use crate::tools::{Tool, ToolDescription};

pub struct GenerateTool {
    client: Arc<OllamaClient>,
}

impl GenerateTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GenerateTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "generate".to_string(),
            description: "Generate a completion for a single prompt (no conversation history)."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "model": {
                        "type": "string",
                        "description": "Model name (e.g. llama3.2, gemma3)."
                    },
                    "prompt": {
                        "type": "string",
                        "description": "The user prompt text."
                    },
                    "system": {
                        "type": "string",
                        "description": "Optional system prompt."
                    },
                    "stream": {
                        "type": "boolean",
                        "description": "If true, Ollama streams tokens and the full reply is accumulated before returning.",
                        "default": false
                    }
                },
                "required": ["model", "prompt"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let model = arguments["model"].as_str().unwrap_or_default();
        let prompt = arguments["prompt"].as_str().unwrap_or_default();
        let stream = arguments
            .get("stream")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut payload = json!({"model": model, "prompt": prompt});
        if let Some(system) = arguments
            .get("system")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            payload["system"] = Value::String(system.to_string());
        }

        if stream {
            return self
                .client
                .request_stream("generate", &payload, generate_fragment)
                .await;
        }

        payload["stream"] = Value::Bool(false);
        let data = self
            .client
            .request(Method::POST, "generate", Some(&payload))
            .await?;

        let response = data
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let thinking = data
            .get("thinking")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        Ok(match thinking {
            Some(thinking) => format!("[Thinking] {thinking}\n\n{response}"),
            None => response.to_string(),
        })
    }
}
