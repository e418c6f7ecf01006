//! # Portfolio Models
//!
//! Model configuration for the generative completion service used by
//! launch milestone generation.
//!
//! The API key is never stored in the config itself; only the name of the
//! environment variable it is read from.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::milestones::GenerationError;

/// Default Gemini model for milestone generation
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default Gemini REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Primary environment variable holding the service key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Fallback environment variable holding the service key
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Configuration for the completion model
///
/// ## Example
/// ```rust,ignore
/// use portfolio_core::models::ModelConfig;
///
/// let config = ModelConfig::default().with_base_url("http://localhost:9090");
/// let key = config.api_key()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Model name (e.g., "gemini-3-flash-preview")
    pub model: String,
    /// Optional endpoint override (proxies, test servers)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable the API key is read from
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// HTTP timeout for a single generation call; 0 means the default
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelConfig {
    /// Create a config for a specific model with default endpoint and key variable
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set base URL (for proxies or local test servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP timeout in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Effective HTTP timeout. Zero would fail every request, so it falls back to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(default_timeout_secs()),
            secs => Duration::from_secs(secs),
        }
    }

    /// Endpoint to send requests to, without a trailing slash
    pub fn endpoint(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string()
    }

    /// Resolve the API key from the environment.
    ///
    /// Reads `api_key_env` first, then `API_KEY`. Blank values count as unset.
    pub fn api_key(&self) -> Result<String, GenerationError> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(self.api_key_env.clone()))
    }
}
