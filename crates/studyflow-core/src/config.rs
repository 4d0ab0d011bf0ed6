//! API client configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_API_ROOT_URL: &str = "http://localhost:3000";
const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
const DEFAULT_SIGN_IN_PATH: &str = "/auth/signin";
const DEFAULT_LOGIN_ROUTE: &str = "/login";
const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
const MIN_TIMEOUT_SECONDS: u64 = 1;

/// Configuration for the session gateway and its HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL for routes under `/api`
    pub base_url: String,
    /// Base URL for routes outside `/api` (e.g. `/health`)
    pub root_url: String,
    /// Path of the credential renewal endpoint, relative to `base_url`
    pub refresh_path: String,
    /// Path of the sign-in endpoint, relative to `base_url`
    pub sign_in_path: String,
    /// Sign-in entry point announced when the session expires
    pub login_route: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            root_url: DEFAULT_API_ROOT_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Config pointing both API and root URLs at one server.
    ///
    /// `base_url` gets the `/api` suffix the server mounts its routes under.
    pub fn for_server(root_url: &str) -> Self {
        let root = root_url.trim_end_matches('/');
        Self {
            base_url: format!("{root}/api"),
            root_url: root.to_string(),
            ..Self::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("base_url", &self.base_url), ("root_url", &self.root_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        for (name, path) in [
            ("refresh_path", &self.refresh_path),
            ("sign_in_path", &self.sign_in_path),
            ("login_route", &self.login_route),
        ] {
            if !path.starts_with('/') {
                return Err(anyhow::anyhow!("{} must start with '/', got '{}'", name, path));
            }
        }

        if self.timeout_seconds < MIN_TIMEOUT_SECONDS {
            return Err(anyhow::anyhow!(
                "Timeout must be at least {} second",
                MIN_TIMEOUT_SECONDS
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Join a path onto `base_url`.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Join a path onto `root_url`.
    pub fn root_url_for(&self, path: &str) -> String {
        join_url(&self.root_url, path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.api_url("/auth/refresh"), "http://localhost:3000/api/auth/refresh");
        assert_eq!(config.root_url_for("health"), "http://localhost:3000/health");
    }

    #[test]
    fn test_for_server_appends_api_prefix() {
        let config = ClientConfig::for_server("http://127.0.0.1:4000/");
        assert_eq!(config.base_url, "http://127.0.0.1:4000/api");
        assert_eq!(config.root_url, "http://127.0.0.1:4000");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_seconds": 30}"#).unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.refresh_path, "/auth/refresh");
    }

    #[test]
    fn test_invalid_config() {
        let config = ClientConfig {
            base_url: "localhost:3000".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            timeout_seconds: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            refresh_path: "auth/refresh".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
