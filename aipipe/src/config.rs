//! Configuration for aipipe.
//!
//! Settings come from two places, read once at startup:
//! 1. Environment variables (`GROQ_API_KEY`, `GROQ_ENDPOINT`, `GROQ_MODEL`,
//!    `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`)
//! 2. An optional user config file (`~/.aipipe/config.toml`) whose values
//!    override the environment
//!
//! A missing credential is not an error here; it surfaces later as an
//! authentication failure from the remote API.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Resolved configuration for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for the Groq-compatible endpoint.
    pub groq_api_key: Option<String>,
    /// Base URL of the Groq-compatible endpoint.
    pub groq_endpoint: Option<String>,
    /// Default model served by the Groq-compatible endpoint.
    pub groq_model: Option<String>,
    /// Anthropic API key.
    pub anthropic_api_key: Option<String>,
    /// OpenAI API key, used by the GPT-4 path.
    pub openai_api_key: Option<String>,
}

/// User config file schema (`~/.aipipe/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// API key for the Groq-compatible endpoint.
    #[serde(default)]
    pub groq_api_key: Option<String>,
    /// Base URL of the Groq-compatible endpoint.
    #[serde(default)]
    pub groq_endpoint: Option<String>,
    /// Default model served by the Groq-compatible endpoint.
    #[serde(default)]
    pub groq_model: Option<String>,
    /// Anthropic API key.
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    /// OpenAI API key.
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aipipe")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

impl Config {
    /// Read configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            groq_api_key: std::env::var("GROQ_API_KEY").ok(),
            groq_endpoint: std::env::var("GROQ_ENDPOINT").ok(),
            groq_model: std::env::var("GROQ_MODEL").ok(),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
        }
    }

    /// Load configuration from the environment, then overlay the user
    /// config file if one exists.
    ///
    /// An unreadable or malformed config file is reported as a warning
    /// and the environment values are kept.
    pub async fn load() -> Self {
        let mut config = Self::from_env();
        match load_file_config(&config_path()).await {
            Ok(Some(file)) => config.apply(file),
            Ok(None) => {}
            Err(e) => warn!("failed to load user config: {e}"),
        }
        config
    }

    /// Overlay values from a config file. File values win.
    pub fn apply(&mut self, file: FileConfig) {
        if file.groq_api_key.is_some() {
            self.groq_api_key = file.groq_api_key;
        }
        if file.groq_endpoint.is_some() {
            self.groq_endpoint = file.groq_endpoint;
        }
        if file.groq_model.is_some() {
            self.groq_model = file.groq_model;
        }
        if file.anthropic_api_key.is_some() {
            self.anthropic_api_key = file.anthropic_api_key;
        }
        if file.openai_api_key.is_some() {
            self.openai_api_key = file.openai_api_key;
        }
    }
}

/// Load the user config file from a specific path.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed as TOML.
pub async fn load_file_config(path: &Path) -> ConfigResult<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(path).await?;
    let file: FileConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded user config file");

    Ok(Some(file))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn default_paths() {
        let path = config_path();
        assert!(path.ends_with(".aipipe/config.toml"));
    }

    #[test]
    fn apply_overrides_present_values_only() {
        let mut config = Config {
            groq_api_key: Some("env-key".into()),
            groq_endpoint: Some("https://env.example.com/v1".into()),
            groq_model: Some("env-model".into()),
            anthropic_api_key: None,
            openai_api_key: None,
        };

        config.apply(FileConfig {
            groq_api_key: Some("file-key".into()),
            anthropic_api_key: Some("file-anthropic".into()),
            ..FileConfig::default()
        });

        assert_eq!(config.groq_api_key.as_deref(), Some("file-key"));
        assert_eq!(
            config.groq_endpoint.as_deref(),
            Some("https://env.example.com/v1")
        );
        assert_eq!(config.groq_model.as_deref(), Some("env-model"));
        assert_eq!(config.anthropic_api_key.as_deref(), Some("file-anthropic"));
        assert!(config.openai_api_key.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.child("config.toml");

        let loaded = load_file_config(path.path()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn file_config_parses_partial_toml() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("config.toml");
        file.write_str("groq_model = \"mixtral-8x7b-32768\"\n").unwrap();

        let loaded = load_file_config(file.path()).await.unwrap().unwrap();
        assert_eq!(loaded.groq_model.as_deref(), Some("mixtral-8x7b-32768"));
        assert!(loaded.groq_api_key.is_none());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("config.toml");
        file.write_str("groq_model = [not toml").unwrap();

        let result = load_file_config(file.path()).await;
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
