//! CLI configuration file support
//!
//! Loads configuration from ~/.config/studyflow/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use studyflow_core::ClientConfig;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default settings
    #[serde(default)]
    pub default: DefaultConfig,
    /// API client settings
    #[serde(default)]
    pub api: ClientConfig,
}

/// Default configuration values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Default database path
    pub db_path: Option<String>,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studyflow").join("config.toml"))
    }

    /// Client config with the `--api-url` / `STUDYFLOW_API_URL` override applied.
    ///
    /// The root URL follows the base URL with its `/api` suffix removed.
    pub fn client_config(&self, api_url: Option<&str>) -> ClientConfig {
        let mut config = self.api.clone();
        if let Some(url) = api_url.map(|u| u.trim().trim_end_matches('/'))
            && !url.is_empty()
        {
            config.base_url = url.to_string();
            config.root_url = url.strip_suffix("/api").unwrap_or(url).to_string();
        }
        config
    }
}
