//! Configuration management for adlens
//!
//! Config files are stored in platform-appropriate locations:
//! - Linux: ~/.config/adlens/
//! - macOS: ~/Library/Application Support/adlens/
//! - Windows: %APPDATA%\adlens\
//!
//! A few environment variables override the file, mirroring how the web
//! build injected its API base URL at build time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoDirFound,

    #[error("Invalid API base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub tui: TuiConfig,
}

/// Backend API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_profile_path")]
    pub profile_path: String,

    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Session lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Refreshes allowed in one lifecycle pass
    #[serde(default = "default_refresh_attempts")]
    pub max_refresh_attempts: u32,

    /// Keep session cookies across restarts
    #[serde(default = "default_true")]
    pub persist_credentials: bool,
}

/// TUI-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    format!("http://localhost:{}/api", crate::DEFAULT_API_PORT)
}
fn default_profile_path() -> String {
    "/user-profile".to_string()
}
fn default_refresh_path() -> String {
    "/refresh-token".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_attempts() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_tick_ms() -> u64 {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile_path: default_profile_path(),
            refresh_path: default_refresh_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_refresh_attempts: default_refresh_attempts(),
            persist_credentials: true,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl ApiConfig {
    /// Base URL with any trailing slash removed
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base(), path.trim_start_matches('/'))
    }

    /// Base URL parsed for cookie scoping
    pub fn cookie_scope(&self) -> Result<reqwest::Url, ConfigError> {
        // Trailing slash so the cookie scope covers paths under the base
        let url = format!("{}/", self.base());
        url.parse::<reqwest::Url>()
            .map_err(|e| ConfigError::InvalidUrl {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join("adlens"))
            .ok_or(ConfigError::NoDirFound)
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from default location, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Load config from specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `ADLENS_API_BASE_URL` replaces the configured base URL
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("ADLENS_API_BASE_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }
}
