//! Process-wide Ollama connection settings.
//!
//! Built once at start-up and handed to every component that issues network
//! calls; nothing mutates it afterwards.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL used when `OLLAMA_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ceiling on the total duration of any single backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Immutable backend address and call ceiling.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    base_url: String,
    pub timeout: Duration,
}

impl OllamaConfig {
    /// Validate and normalize the backend base URL. Trailing slashes are
    /// stripped so `api_url` can concatenate paths unambiguously.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend-relative API path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_path() {
        let config = OllamaConfig::default();
        assert_eq!(config.api_url("tags"), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_api_url_normalizes_slashes() {
        let config =
            OllamaConfig::new("http://localhost:11434/", Duration::from_secs(5)).unwrap();
        assert_eq!(config.api_url("/chat"), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_trailing_slashes_stripped_from_base() {
        let config = OllamaConfig::new("http://ollama.local//", Duration::from_secs(5)).unwrap();
        assert_eq!(config.base_url(), "http://ollama.local");
    }

    #[test]
    fn test_rejects_malformed_url() {
        let result = OllamaConfig::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = OllamaConfig::new("ftp://localhost:11434", Duration::from_secs(5));
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_default_points_at_local_instance() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url(), "http://localhost:11434");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
