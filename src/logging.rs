//! Structured logging using the tracing crate.
//!
//! All output goes to stderr: stdout carries the MCP stdio transport and must
//! never see a log line.
//!
//! ## Environment Variables
//!
//! - `LOG_LEVEL`: Log level (ERROR, WARN, INFO, DEBUG, TRACE) - defaults to INFO
//! - `LOG_FORMAT`: Output format (json, pretty, compact) - defaults to json
//! - `RUST_LOG`: Override log filtering (follows env_logger format)

use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// JSON format for structured logging (machine-readable)
    Json,
    /// Pretty format with colors and indentation (human-readable)
    Pretty,
    /// Compact format with minimal spacing (terminal-friendly)
    Compact,
}

impl LogFormat {
    /// Parse log format from string
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

/// Initialize logging with manual configuration
pub fn init_logging(level: Level, format: LogFormat) {
    let mut filter = EnvFilter::new(level.to_string())
        // Reduce noise from dependencies
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap())
        .add_directive("tokio=warn".parse().unwrap());

    // Allow RUST_LOG to override
    if let Ok(rust_log) = env::var("RUST_LOG") {
        filter = EnvFilter::new(rust_log);
    }

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer().json().with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_ansi(true)
                .with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_ansi(false)
                .with_target(false)
                .with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
    }
}

/// Initialize logging from environment variables
pub fn init_default_logging() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    let level = match log_level.to_uppercase().as_str() {
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "INFO" => Level::INFO,
        "DEBUG" => Level::DEBUG,
        "TRACE" => Level::TRACE,
        _ => Level::INFO,
    };

    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    init_logging(level, LogFormat::parse(&format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse_known_formats() {
        assert!(matches!(LogFormat::parse("json"), LogFormat::Json));
        assert!(matches!(LogFormat::parse("pretty"), LogFormat::Pretty));
        assert!(matches!(LogFormat::parse("compact"), LogFormat::Compact));
    }

    #[test]
    fn test_log_format_parse_is_case_insensitive() {
        assert!(matches!(LogFormat::parse("JSON"), LogFormat::Json));
        assert!(matches!(LogFormat::parse("PrEtTy"), LogFormat::Pretty));
    }

    #[test]
    fn test_log_format_parse_invalid_defaults_to_json() {
        assert!(matches!(LogFormat::parse("invalid"), LogFormat::Json));
        assert!(matches!(LogFormat::parse(""), LogFormat::Json));
    }
}
