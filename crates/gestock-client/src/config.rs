//! # Client Configuration
//!
//! Where the backend lives and where the session is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GESTOCK_API_URL=https://api.example.com/api                        │
//! │     GESTOCK_AUTH_URL=https://api.example.com/api                       │
//! │     GESTOCK_STORAGE_PATH=/var/lib/gestock/session.json                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gestock/gestock.toml (Linux)                             │
//! │     ~/Library/Application Support/com.gestock.gestock/gestock.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/api                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # gestock.toml
//! [api]
//! base_url = "http://localhost:3000/api"
//! auth_url = "http://localhost:3000/api"
//!
//! [storage]
//! path = "/home/awa/.local/share/gestock/session.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

const CONFIG_FILE_NAME: &str = "gestock.toml";
const SESSION_FILE_NAME: &str = "session.json";

// =============================================================================
// Sections
// =============================================================================

/// Backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root of the REST resources (`/produits`, `/ventes`, ...).
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Root for `/auth/login`. Usually the same host as `base_url`.
    #[serde(default = "default_api_url")]
    pub auth_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    format!("gestock-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            auth_url: default_api_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Session persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Session file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Client Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    /// Config pointing at `base_url` for both resources and login.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            api: ApiSettings {
                auth_url: base_url.clone(),
                base_url,
                ..ApiSettings::default()
            },
            storage: StorageSettings::default(),
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (gestock.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        validate_http_url("api.base_url", &self.api.base_url)?;
        validate_http_url("api.auth_url", &self.api.auth_url)?;

        if self.api.user_agent.trim().is_empty() {
            return Err(ClientError::Config("api.user_agent must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `GESTOCK_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GESTOCK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = lookup("GESTOCK_AUTH_URL") {
            debug!(url = %url, "Overriding auth URL from environment");
            self.api.auth_url = url;
        }

        if let Some(path) = lookup("GESTOCK_STORAGE_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "gestock", "gestock")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Session file in use: the configured one, else the platform data dir.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
        })
    }

    /// Base URL of the REST resources, without trailing slash.
    pub fn api_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Base URL for authentication, without trailing slash.
    pub fn auth_url(&self) -> &str {
        self.api.auth_url.trim_end_matches('/')
    }
}

fn validate_http_url(field: &str, value: &str) -> ClientResult<()> {
    let parsed = Url::parse(value)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ClientError::InvalidUrl(format!(
            "{} must start with http:// or https://, got: {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url(), "http://localhost:3000/api");
        assert_eq!(config.auth_url(), "http://localhost:3000/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ws://localhost:3000".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://gestock.example.com/api/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_url(), "https://gestock.example.com/api");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("GESTOCK_API_URL", "https://api.example.com/api"),
            ("GESTOCK_STORAGE_PATH", "/tmp/gestock-session.json"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.api.auth_url, DEFAULT_API_URL);
        assert_eq!(
            config.storage_path(),
            Some(PathBuf::from("/tmp/gestock-session.json"))
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.api.auth_url, DEFAULT_API_URL);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = ClientConfig::with_base_url("https://gestock.example.com/api");
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }
}
