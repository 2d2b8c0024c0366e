//! MCP dispatch over stdio: JSON-RPC 2.0, one message per line.
//!
//! This layer is deliberately thin. It declares the tool schemas through
//! `tools/list`, routes `tools/call` into the registry, and serializes the
//! registry's string result into the MCP text-content envelope. Requests
//! without an `id` are notifications and produce no response.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::tools::ToolRegistry;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// One incoming JSON-RPC 2.0 message.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

/// One outgoing JSON-RPC 2.0 message.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }
}

/// Stdio MCP server wrapping a [`ToolRegistry`].
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Serve until the reader reaches EOF. Exactly one response line is
    /// written per request; the writer is flushed after each so interactive
    /// clients see responses immediately.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(line).await {
                match serde_json::to_string(&response) {
                    Ok(serialized) => {
                        writer.write_all(serialized.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                    }
                    Err(e) => warn!(error = %e, "failed to serialize response"),
                }
            }
        }
        Ok(())
    }

    /// Decode one line and dispatch it; `None` means no response is owed.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            )),
        }
    }

    /// Dispatch one decoded request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "handling request");

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools_result()),
            "tools/call" => self.call_tool(&request.params).await,
            method if method.starts_with("notifications/") => return None,
            method => Err((METHOD_NOT_FOUND, format!("Method not found: {method}"))),
        };

        // No id means notification: results and errors alike are dropped.
        let id = request.id?;
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err((code, message)) => JsonRpcResponse::failure(id, code, message),
        })
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": "ollama-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            }
        })
    }

    fn list_tools_result(&self) -> Value {
        let tools: Vec<Value> = self
            .registry
            .describe()
            .into_iter()
            .map(|description| {
                json!({
                    "name": description.name,
                    "description": description.description,
                    "inputSchema": description.parameters,
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, (i64, String)> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| (INVALID_PARAMS, "Missing tool name".to_string()))?;
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        match self.registry.call(name, &arguments).await {
            Ok(text) => Ok(json!({
                "content": [{ "type": "text", "text": text }],
                "isError": false
            })),
            Err(e) => Err((INVALID_PARAMS, e.to_string())),
        }
    }
}
