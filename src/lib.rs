//! Ollama MCP bridge.
//!
//! Exposes a local Ollama HTTP API as callable tools over the Model Context
//! Protocol (JSON-RPC 2.0 over stdio), so editors and assistants can list
//! models, chat, generate, embed and manage model lifecycle without speaking
//! Ollama's native API.
//!
//! # Overview
//!
//! - [`client`] - unary request executor and the streaming NDJSON accumulator
//! - [`tools`] - the nine tool operations with JSON Schema validation
//! - [`server`] - thin JSON-RPC dispatch over stdio
//! - [`config`] / [`logging`] - process wiring
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ollama_mcp::client::OllamaClient;
//! use ollama_mcp::config::OllamaConfig;
//! use ollama_mcp::server::McpServer;
//! use ollama_mcp::tools::ToolRegistry;
//!
//! let client = Arc::new(OllamaClient::new(OllamaConfig::default()).unwrap());
//! let server = McpServer::new(ToolRegistry::new(client));
//! // server.serve(tokio::io::stdin(), tokio::io::stdout()).await
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod tools;

pub use client::OllamaClient;
pub use config::OllamaConfig;
pub use error::{OllamaError, OllamaResult};
pub use server::McpServer;
pub use tools::{Tool, ToolDescription, ToolError, ToolRegistry};
