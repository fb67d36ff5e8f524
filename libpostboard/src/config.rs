//! Configuration management for Postboard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Environment variable that points at an explicit config file
pub const CONFIG_ENV: &str = "POSTBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub events: EventsConfig,
}

/// Where the remote data lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub posts_path: String,
    pub users_path: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Events buffered per subscriber before the oldest are dropped
    pub capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            posts_path: "/fakeApi/posts".to_string(),
            users_path: "/fakeApi/users".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: crate::store::DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Load configuration
    ///
    /// Reads `$POSTBOARD_CONFIG` when set (the file must exist), otherwise
    /// the file in the user's config directory. A missing default file is not
    /// an error; the built-in defaults are used instead.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if std::env::var_os(CONFIG_ENV).is_none() && !config_path.exists() {
            tracing::debug!(
                path = %config_path.display(),
                "No config file found, using defaults"
            );
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            events: EventsConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let gateway = &self.gateway;

        if gateway.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("gateway.base_url".to_string()).into());
        }
        if !(gateway.base_url.starts_with("http://") || gateway.base_url.starts_with("https://")) {
            return Err(invalid("gateway.base_url", "must start with http:// or https://"));
        }
        for (field, path) in [
            ("gateway.posts_path", &gateway.posts_path),
            ("gateway.users_path", &gateway.users_path),
        ] {
            if !path.starts_with('/') {
                return Err(invalid(field, "must start with '/'"));
            }
        }
        if gateway.timeout_secs == 0 {
            return Err(invalid("gateway.timeout_secs", "must be greater than zero"));
        }
        if self.events.capacity == 0 {
            return Err(invalid("events.capacity", "must be greater than zero"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::PostboardError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        // Only UTF-8 paths can be tilde-expanded; anything else is used as-is
        return Ok(match path.to_str() {
            Some(text) => PathBuf::from(shellexpand::tilde(text).to_string()),
            None => PathBuf::from(path),
        });
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("postboard").join("config.toml"))
}
