//! HTTP client for the Ollama backend.
//!
//! Two call shapes: [`OllamaClient::request`] performs one unary exchange and
//! decodes a single JSON body; the streaming variants in [`stream`] fold a
//! newline-delimited incremental body into one result. A single failed
//! attempt is terminal — there are no retries at this layer.

use reqwest::{Client, Method, Response};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::OllamaConfig;
use crate::error::{OllamaError, OllamaResult};

pub mod stream;

pub use stream::{chat_fragment, generate_fragment, FieldLocator, Fragment};

/// Client for one Ollama instance. Cheap to share behind an `Arc`; each call
/// opens, consumes and releases its own connection lifetime independently.
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> OllamaResult<Self> {
        // The client-level timeout bounds the whole call, body included, so it
        // also serves as the ceiling for streaming reads.
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OllamaError::Unreachable(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Perform one unary call against `base_url + /api/ + path`.
    ///
    /// Non-2xx statuses become [`OllamaError::Http`], transport failures
    /// [`OllamaError::Unreachable`]. A successful empty body decodes to `{}`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> OllamaResult<Value> {
        let url = self.config.api_url(path);
        debug!(%method, %url, "Ollama request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(connection_error)?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await.map_err(connection_error)?;
        if bytes.is_empty() {
            return Ok(json!({}));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| OllamaError::UnexpectedResponse(format!("invalid JSON body: {e}")))
    }

    /// Map a non-success status to `Http`, consuming the body for detail.
    pub(crate) async fn check_status(response: Response) -> OllamaResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Ollama returned error status");
        Err(OllamaError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

fn connection_error(e: reqwest::Error) -> OllamaError {
    OllamaError::Unreachable(e.to_string())
}
