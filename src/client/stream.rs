//! Streaming response accumulator.
//!
//! Ollama's streaming endpoints emit newline-delimited JSON: one complete
//! object per line, with a final line whose `done` flag is true. Stream EOF is
//! the authoritative terminator — the fold never relies on `done` to stop.
//!
//! Chat responses nest their fields under a `message` object; generate
//! responses carry them at the top level. The accumulator stays agnostic of
//! that split by taking a [`FieldLocator`] from the caller, so one fold serves
//! both endpoint families. A sibling fold accumulates `status` fields for the
//! lifecycle endpoints instead of content.

use bytes::BytesMut;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, trace};

use super::{connection_error, OllamaClient};
use crate::error::{OllamaError, OllamaResult};

/// Fields extracted from one decoded stream fragment.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Primary output text; `Some("")` when the field is present but null.
    pub content: Option<String>,
    /// Reasoning side-channel text, when present and non-empty.
    pub thinking: Option<String>,
}

/// Extracts the relevant fields from one decoded fragment. Passed by the tool
/// operation so the fold itself knows nothing about endpoint semantics.
pub type FieldLocator = fn(&Value) -> Fragment;

/// Locator for conversational (`/api/chat`) fragments: content lives at
/// `message.content`.
pub fn chat_fragment(chunk: &Value) -> Fragment {
    locate(chunk, "content")
}

/// Locator for single-prompt (`/api/generate`) fragments: content lives at
/// the top-level `response` field.
pub fn generate_fragment(chunk: &Value) -> Fragment {
    locate(chunk, "response")
}

fn locate(chunk: &Value, content_key: &str) -> Fragment {
    let message = chunk.get("message").and_then(Value::as_object);

    // Nested thinking wins; the top-level field is only consulted when the
    // message object carries none, so one fragment never contributes twice.
    let thinking = message
        .and_then(|m| m.get("thinking"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            chunk
                .get("thinking")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        });

    // Content is presence-based: a present-but-null field still contributes
    // the empty string, and the nested location shadows the top-level one.
    let content = match message.and_then(|m| m.get(content_key)) {
        Some(value) => Some(text_or_empty(value)),
        None => chunk.get(content_key).map(text_or_empty),
    };

    Fragment { content, thinking }
}

fn text_or_empty(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// Running fold state for one in-flight accumulation. Call-local, never
/// shared across concurrent requests.
#[derive(Debug, Default)]
struct Accumulated {
    content: String,
    thinking: Vec<String>,
}

impl Accumulated {
    fn push(&mut self, fragment: Fragment) {
        if let Some(thinking) = fragment.thinking {
            self.thinking.push(thinking);
        }
        if let Some(content) = fragment.content {
            self.content.push_str(&content);
        }
    }

    fn finish(self) -> String {
        if self.thinking.is_empty() {
            return self.content;
        }
        format!(
            "[Thinking] {}\n\n{}",
            self.thinking.join(" ").trim(),
            self.content
        )
    }
}

impl OllamaClient {
    /// POST a streaming request and fold the NDJSON body into a single string
    /// in arrival order, prefixed with a `[Thinking]` block when any fragment
    /// carried reasoning text.
    pub async fn request_stream(
        &self,
        path: &str,
        payload: &Value,
        locator: FieldLocator,
    ) -> OllamaResult<String> {
        let mut accumulated = Accumulated::default();
        self.fold_stream(path, payload, |chunk| accumulated.push(locator(chunk)))
            .await?;
        Ok(accumulated.finish())
    }

    /// Streaming variant for lifecycle endpoints that report progress through
    /// a top-level `status` field: same line discipline, folds to the last
    /// non-empty status seen before EOF.
    pub async fn request_status_stream(&self, path: &str, payload: &Value) -> OllamaResult<String> {
        let mut status: Option<String> = None;
        self.fold_stream(path, payload, |chunk| {
            if let Some(s) = chunk.get("status").and_then(Value::as_str) {
                if !s.is_empty() {
                    status = Some(s.to_string());
                }
            }
        })
        .await?;
        Ok(status.unwrap_or_else(|| "unknown".to_string()))
    }

    /// Open one streaming POST and feed each decoded line to `fold`.
    ///
    /// Undecodable lines are keepalive noise, not errors: they are skipped
    /// and the fold continues. A failure mid-read discards the partial fold
    /// and surfaces as [`OllamaError::Unreachable`].
    async fn fold_stream<F>(&self, path: &str, payload: &Value, mut fold: F) -> OllamaResult<()>
    where
        F: FnMut(&Value),
    {
        let url = self.config.api_url(path);

        // Force incremental mode regardless of what the caller built.
        let mut payload = payload.clone();
        if let Some(map) = payload.as_object_mut() {
            map.insert("stream".to_string(), Value::Bool(true));
        }
        debug!(%url, "Ollama streaming request");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(connection_error)?;
        let response = Self::check_status(response).await?;

        let mut body = response.bytes_stream();
        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.next().await {
            let chunk =
                chunk.map_err(|e| OllamaError::Unreachable(format!("stream interrupted: {e}")))?;
            buffer.extend_from_slice(&chunk);
            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(newline + 1);
                fold_line(&line[..newline], &mut fold);
            }
        }

        // The final line may arrive without a trailing newline.
        if !buffer.is_empty() {
            fold_line(&buffer, &mut fold);
        }
        Ok(())
    }
}

fn fold_line<F: FnMut(&Value)>(raw: &[u8], fold: &mut F) {
    let Ok(line) = std::str::from_utf8(raw) else {
        return;
    };
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<Value>(line) {
        Ok(chunk) => fold(&chunk),
        Err(e) => trace!(error = %e, "skipping undecodable stream line"),
    }
}
