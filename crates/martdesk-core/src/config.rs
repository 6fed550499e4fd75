//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API origin, where the session token is kept, and the
//! last email used to log in.
//!
//! Configuration is stored at `~/.config/martdesk/config.json`. Environment
//! variables override the file: `MARTDESK_API_URL`, `MARTDESK_TOKEN_BACKEND`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{DEFAULT_API_ORIGIN, REQUEST_TIMEOUT_SECS};
use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "martdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "MARTDESK_API_URL";
pub const ENV_TOKEN_BACKEND: &str = "MARTDESK_TOKEN_BACKEND";

/// Where the bearer token is persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// JSON file in the data directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

impl std::str::FromStr for TokenBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(TokenBackend::File),
            "keyring" | "keychain" => Ok(TokenBackend::Keyring),
            other => Err(format!("unknown token backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub token_backend: TokenBackend,
    pub last_email: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_ORIGIN.to_string(),
            token_backend: TokenBackend::default(),
            last_email: None,
            log_dir: None,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent) and apply env overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in `load`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TOKEN_BACKEND) {
            match raw.parse() {
                Ok(backend) => self.token_backend = backend,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_TOKEN_BACKEND),
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Build the token store selected by `token_backend`
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        Ok(match self.token_backend {
            TokenBackend::File => Arc::new(FileTokenStore::new(self.data_dir()?)),
            TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_url":"https://shop.test"}"#).unwrap();
        assert_eq!(config.api_url, "https://shop.test");
        assert_eq!(config.token_backend, TokenBackend::File);
        assert_eq!(config.request_timeout_secs, REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            ENV_API_URL => Some("https://staging.shop.test".to_string()),
            ENV_TOKEN_BACKEND => Some("Keyring".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "https://staging.shop.test");
        assert_eq!(config.token_backend, TokenBackend::Keyring);
    }

    #[test]
    fn test_bad_backend_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == ENV_TOKEN_BACKEND).then(|| "floppy".to_string()));
        assert_eq!(config.token_backend, TokenBackend::File);
    }
}
