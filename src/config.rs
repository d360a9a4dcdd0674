//! Configuration management for Chatroll
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChatrollError, Result};
use crate::model::TitleRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Chatroll
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Limits applied to chat titles before rename
    #[serde(default)]
    pub titles: TitleRules,
}

/// Chat backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chat backend, without trailing `/chat`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Bearer token; when unset the OS keyring is consulted
    #[serde(default)]
    pub token: Option<String>,

    /// Read the token from the OS keyring when `token` is unset
    #[serde(default = "default_use_keyring")]
    pub use_keyring: bool,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_use_keyring() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            token: None,
            use_keyring: default_use_keyring(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    /// `CHATROLL_*` environment variables are applied next, then the
    /// `--api-base` and `--token` flags.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, whose flags take precedence
    ///
    /// # Returns
    ///
    /// The merged configuration. Call [`Config::validate`] before use.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatrollError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatrollError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("CHATROLL_API_BASE") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("CHATROLL_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.api.timeout_seconds = value,
                Err(_) => tracing::warn!("Ignoring invalid CHATROLL_TIMEOUT_SECONDS={}", timeout),
            }
        }

        if let Ok(token) = std::env::var("CHATROLL_TOKEN") {
            self.api.token = Some(token);
        }

        if let Ok(min) = std::env::var("CHATROLL_TITLE_MIN") {
            match min.parse() {
                Ok(value) => self.titles.min_length = value,
                Err(_) => tracing::warn!("Ignoring invalid CHATROLL_TITLE_MIN={}", min),
            }
        }

        if let Ok(max) = std::env::var("CHATROLL_TITLE_MAX") {
            match max.parse() {
                Ok(value) => self.titles.max_length = value,
                Err(_) => tracing::warn!("Ignoring invalid CHATROLL_TITLE_MAX={}", max),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.api_base {
            self.api.base_url = base_url.clone();
        }
        if let Some(token) = &cli.token {
            self.api.token = Some(token.clone());
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            ChatrollError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ChatrollError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(ChatrollError::Config(
                "api.timeout_seconds must be between 1 and 300".to_string(),
            )
            .into());
        }

        if self.titles.min_length == 0 {
            return Err(ChatrollError::Config(
                "titles.min_length must be greater than 0".to_string(),
            )
            .into());
        }

        if self.titles.min_length > self.titles.max_length {
            return Err(ChatrollError::Config(
                "titles.min_length must not exceed titles.max_length".to_string(),
            )
            .into());
        }

        if self.titles.max_length > 500 {
            return Err(ChatrollError::Config(
                "titles.max_length must be less than or equal to 500".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
