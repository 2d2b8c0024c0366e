//! Failure taxonomy for calls against the Ollama backend.
//!
//! Every tool operation is its own error boundary: these variants never reach
//! an MCP client as a protocol error. The registry renders transport-level
//! failures (`Http`, `Unreachable`) as "Ollama request failed" result strings
//! and anything else as a generic error string.

use thiserror::Error;

/// Errors raised by the Ollama HTTP client.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The backend could not be reached, or the connection failed mid-call
    /// (connection refused, DNS failure, timeout, dropped stream).
    #[error("{0}")]
    Unreachable(String),

    /// The backend answered 2xx but the body did not have the expected shape.
    #[error("unexpected response from Ollama: {0}")]
    UnexpectedResponse(String),
}

impl OllamaError {
    /// True for failures of the HTTP exchange itself, as opposed to failures
    /// interpreting a successful response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Unreachable(_))
    }
}

/// Result type for Ollama client operations.
pub type OllamaResult<T> = Result<T, OllamaError>;
