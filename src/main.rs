//! Ollama MCP bridge - Main Entry Point
//!
//! Speaks MCP over stdio; all logging goes to stderr because stdout carries
//! the protocol.

use clap::Parser;
use ollama_mcp::client::OllamaClient;
use ollama_mcp::config::{OllamaConfig, DEFAULT_BASE_URL};
use ollama_mcp::logging::init_default_logging;
use ollama_mcp::server::McpServer;
use ollama_mcp::tools::ToolRegistry;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// MCP server bridging a local Ollama instance
#[derive(Parser)]
#[command(name = "ollama-mcp")]
#[command(about = "Expose a local Ollama HTTP API as MCP tools over stdio")]
#[command(version)]
struct Cli {
    /// Base URL of the Ollama server
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Upper bound on any single backend call, in seconds
    #[arg(long, env = "OLLAMA_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match OllamaConfig::new(&cli.base_url, Duration::from_secs(cli.timeout_secs)) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    info!(
        base_url = %config.base_url(),
        "Starting ollama-mcp v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = match OllamaClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            process::exit(1);
        }
    };

    let server = McpServer::new(ToolRegistry::new(client));
    if let Err(e) = server.serve(tokio::io::stdin(), tokio::io::stdout()).await {
        error!("Transport error: {e}");
        process::exit(1);
    }

    info!("stdin closed, shutting down");
}
