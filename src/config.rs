//! Configuration management for Lexo using the prefer crate.
//!
//! Precedence, lowest to highest: built-in defaults, config file,
//! `LEXO_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{ApiKey, LlmConfig, RetryPolicy};

/// Environment variable holding the generative-AI API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Options for loading configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API key. Prefer `GEMINI_API_KEY` over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model endpoint and generation settings.
    #[serde(default = "LlmConfig::base_default")]
    pub llm: LlmConfig,
    /// Retry wrapper settings (disabled by default).
    #[serde(default)]
    pub retry: RetryPolicy,
    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::base_default(),
            retry: RetryPolicy::default(),
            api_key: None,
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers lexo config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("lexo").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}; using defaults", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => {
                // No config file found, use defaults with env overrides
                Self::default_with_env()
            }
        }
    }

    /// Load with explicit options. An explicit path must exist and parse.
    pub async fn load_with_options(options: &LoadOptions) -> Result<Self, ConfigError> {
        match options.config_path {
            Some(ref path) => Self::load_from_path(path).await,
            None => Ok(Self::load().await),
        }
    }

    /// Create a default config with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(path, &contents)?;
        tracing::debug!("Loaded config from {}", path.display());
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_err("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_err("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_err("JSON", e.to_string())),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// - `LEXO_*` client settings, see [`LlmConfig::with_env_overrides`]
    /// - `LEXO_MAX_RETRIES`: retries for transient transport failures
    pub fn with_env_overrides(mut self) -> Self {
        self.llm = self.llm.with_env_overrides();
        if let Ok(val) = std::env::var("LEXO_MAX_RETRIES") {
            if let Ok(n) = val.parse() {
                self.retry.max_retries = n;
            }
        }
        self
    }

    /// Resolve the API key: explicit value, then `GEMINI_API_KEY`, then the
    /// config file. Empty values are skipped.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<ApiKey> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        let key = [explicit, env_key.as_deref(), self.api_key.as_deref()]
            .into_iter()
            .flatten()
            .map(ApiKey::new)
            .find(|key| !key.is_empty());
        key
    }

    /// Config rendered as TOML with the key redacted.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        shown.api_key = shown
            .api_key
            .as_deref()
            .map(|k| ApiKey::new(k).redacted());
        toml::to_string_pretty(&shown)
    }
}
