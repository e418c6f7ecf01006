//! # Console Configuration
//!
//! Optional overrides persisted in `.portfolio/config.json` and merged over
//! the model defaults. API keys live in `.portfolio/.env`, never here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use portfolio_core::models::ModelConfig;

/// Directory holding console state
pub const CONFIG_DIR: &str = ".portfolio";

/// Persisted configuration (every field optional)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PersistedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl PersistedConfig {
    pub fn path() -> PathBuf {
        Path::new(CONFIG_DIR).join("config.json")
    }

    /// Load from the default location; a missing or unreadable file yields defaults
    pub async fn load() -> Self {
        Self::load_from(&Self::path()).await
    }

    pub async fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config");
                Self::default()
            }
        }
    }

    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::path()).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Overlay every field `other` sets
    pub fn merge(&mut self, other: PersistedConfig) {
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.api_key_env.is_some() {
            self.api_key_env = other.api_key_env;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Set one field by its key, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let text = || (!value.is_empty()).then(|| value.to_string());
        match key {
            "model" => self.model = text(),
            "base_url" => self.base_url = text(),
            "api_key_env" => self.api_key_env = text(),
            "timeout_secs" => {
                self.timeout_secs = if value.is_empty() {
                    None
                } else {
                    let secs: u64 = value
                        .parse()
                        .with_context(|| format!("timeout_secs must be a number, got '{}'", value))?;
                    if secs == 0 {
                        anyhow::bail!("timeout_secs must be at least 1");
                    }
                    Some(secs)
                }
            }
            other => anyhow::bail!(
                "Unknown config key: {} (expected model, base_url, api_key_env or timeout_secs)",
                other
            ),
        }
        Ok(())
    }

    /// Resolve into a model config over the built-in defaults
    pub fn to_model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::default();
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(env) = &self.api_key_env {
            config.api_key_env = env.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        config
    }
}

/// Load `.portfolio/.env`, then `.env`; variables already set win.
///
/// Runs before logging is set up so the files can carry `RUST_LOG`; returns
/// the files that were loaded.
pub fn load_env() -> Vec<PathBuf> {
    let mut loaded: Vec<PathBuf> = load_env_file(&Path::new(CONFIG_DIR).join(".env"))
        .into_iter()
        .collect();
    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }
    loaded
}

fn load_env_file(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::models::DEFAULT_MODEL;

    #[test]
    fn test_empty_config_resolves_to_defaults() {
        assert_eq!(PersistedConfig::default().to_model_config(), ModelConfig::default());
    }

    #[test]
    fn test_merge_and_resolve() {
        let mut config = PersistedConfig {
            model: Some("gemini-2.5-pro".to_string()),
            ..PersistedConfig::default()
        };
        config.merge(PersistedConfig {
            base_url: Some("http://localhost:9090".to_string()),
            timeout_secs: Some(5),
            ..PersistedConfig::default()
        });

        let resolved = config.to_model_config();
        assert_eq!(resolved.model, "gemini-2.5-pro");
        assert_eq!(resolved.endpoint(), "http://localhost:9090");
        assert_eq!(resolved.timeout_secs, 5);
    }

    #[test]
    fn test_set_keys() {
        let mut config = PersistedConfig::default();
        config.set("model", DEFAULT_MODEL).unwrap();
        config.set("timeout_secs", "30").unwrap();
        assert_eq!(config.timeout_secs, Some(30));

        config.set("model", "").unwrap();
        assert!(config.model.is_none());

        assert!(config.set("timeout_secs", "soon").is_err());
        assert!(config.set("timeout_secs", "0").is_err());
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.set("temperature", "0.2").is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("portfolio-config-{}", std::process::id()));
        let path = dir.join("config.json");

        let config = PersistedConfig {
            model: Some("gemini-2.5-flash".to_string()),
            ..PersistedConfig::default()
        };
        config.save_to(&path).await.unwrap();
        assert_eq!(PersistedConfig::load_from(&path).await, config);

        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert_eq!(PersistedConfig::load_from(&path).await, PersistedConfig::default());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[test]
    fn test_env_file_sets_log_filter_variable() {
        let dir = std::env::temp_dir().join(format!("portfolio-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".env");
        std::fs::write(&path, "PORTFOLIO_TEST_RUST_LOG=portfolio_core=debug\n").unwrap();

        assert_eq!(load_env_file(&path), Some(path.clone()));
        assert_eq!(
            std::env::var("PORTFOLIO_TEST_RUST_LOG").unwrap(),
            "portfolio_core=debug"
        );
        assert_eq!(load_env_file(&dir.join("missing.env")), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
