//! The `chat` tool: next assistant message for a multi-turn conversation.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::{chat_fragment, OllamaClient};
use crate::error::OllamaResult;
use crate::tools::{Tool, ToolDescription};

pub struct ChatTool {
    client: Arc<OllamaClient>,
}

impl ChatTool {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ChatTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "chat".to_string(),
            description: "Generate the next assistant message for a conversation (multi-turn)."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "model": {
                        "type": "string",
                        "description": "Model name (e.g. llama3.2, gemma3)."
                    },
                    "messages": {
                        "type": "array",
                        "description": "Conversation so far, oldest first.",
                        "items": {
                            "type": "object",
                            "properties": {
                                "role": { "type": "string" },
                                "content": { "type": "string" }
                            },
                            "required": ["role", "content"],
                            "additionalProperties": false
                        }
                    },
                    "stream": {
                        "type": "boolean",
                        "description": "If true, Ollama streams tokens and the full reply is accumulated before returning.",
                        "default": false
                    }
                },
                "required": ["model", "messages"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, arguments: &Value) -> OllamaResult<String> {
        // Validated against the schema before dispatch.
        let model = arguments["model"].as_str().unwrap_or_default();
        let messages = arguments["messages"].clone();
        let stream = arguments
            .get("stream")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut payload = json!({"model": model, "messages": messages});
        if stream {
            return self
                .client
                .request_stream("chat", &payload, chat_fragment)
                .await;
        }

        payload["stream"] = Value::Bool(false);
        let data = self
            .client
            .request(Method::POST, "chat", Some(&payload))
            .await?;

        let message = data.get("message").and_then(Value::as_object);
        let content = message
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let thinking = message
            .and_then(|m| m.get("thinking"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        Ok(match thinking {
            Some(thinking) => format!("[Thinking] {thinking}\n\n{content}"),
            None => content.to_string(),
        })
    }
}
