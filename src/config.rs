//! Configuration management for tai.
//!
//! Optional settings are loaded from `~/.config/tai/config.toml`; the API
//! key comes only from the `GEMINI_API_KEY` environment variable and its
//! absence is a fatal configuration error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiSettings,
}

/// Settings for the Gemini endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Model name (default: gemini-2.0-flash).
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("tai"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// The generateContent URL for the configured model.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api.base_url.trim_end_matches('/'),
            self.api.model
        )
    }

    /// Resolve the full API configuration, requiring the key from the
    /// environment. Called once per process from the entry point.
    pub fn api_config(&self) -> Result<ApiConfig> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .with_context(|| format!("{API_KEY_VAR} environment variable is not set"))?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Ok(ApiConfig {
            api_key,
            endpoint_url: self.endpoint_url(),
            headers,
            timeout: Duration::from_secs(self.api.timeout_secs),
        })
    }
}

/// Resolved, read-only connection details for the Gemini endpoint.
/// Constructed once in the entry point and passed to the suggester.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub endpoint_url: String,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
}
