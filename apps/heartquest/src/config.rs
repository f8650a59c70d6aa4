//! # Configuration
//!
//! Server settings, layered lowest to highest:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config heartquest.toml`)
//! 3. Environment variables
//! 4. CLI flags (applied by the `server` command)
//!
//! ## Environment Variables
//!
//! - `HEARTQUEST_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `HEARTQUEST_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all
//! - `HEARTQUEST_API_KEY`: Enables the `/admin` routes
//! - `HEARTQUEST_SESSION_IDLE_SECS`: Idle time before a session is purged (default: 3600)
//! - `HEARTQUEST_SECURE_COOKIE`: `true` adds the `Secure` cookie attribute

use heartquest_core::QuestError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default global rate limit, requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Default idle time before a session is purged.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

/// Longest pause between two purge sweeps.
const MAX_REAPER_INTERVAL_SECS: u64 = 60;

/// Largest accepted config file (64 KiB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// SETTINGS
// =============================================================================

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Raw origin list. `None` means localhost only.
    pub cors_origins: Option<String>,
    /// Key required by `/admin` routes. `None` locks them.
    pub api_key: Option<String>,
    pub session_idle_secs: u64,
    pub secure_cookie: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
            api_key: None,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            secure_cookie: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, QuestError> {
        let settings: Self = toml::from_str(raw)
            .map_err(|e| QuestError::ConfigError(format!("Invalid config: {}", e)))?;
        Ok(settings.normalized())
    }

    /// Read the optional config file, then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, QuestError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, QuestError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            QuestError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(QuestError::ConfigError(format!(
                "Config file {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            QuestError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Overlay `HEARTQUEST_*` variables from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay `HEARTQUEST_*` variables from `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("HEARTQUEST_RATE_LIMIT") {
            match raw.trim().parse() {
                Ok(rps) => self.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid HEARTQUEST_RATE_LIMIT '{}'", raw),
            }
        }
        if let Some(raw) = lookup("HEARTQUEST_CORS_ORIGINS") {
            self.cors_origins = Some(raw);
        }
        if let Some(raw) = lookup("HEARTQUEST_API_KEY") {
            self.api_key = Some(raw);
        }
        if let Some(raw) = lookup("HEARTQUEST_SESSION_IDLE_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.session_idle_secs = secs,
                Err(_) => {
                    tracing::warn!("Ignoring invalid HEARTQUEST_SESSION_IDLE_SECS '{}'", raw);
                }
            }
        }
        if let Some(raw) = lookup("HEARTQUEST_SECURE_COOKIE") {
            match raw.trim().parse() {
                Ok(secure) => self.secure_cookie = secure,
                Err(_) => tracing::warn!("Ignoring invalid HEARTQUEST_SECURE_COOKIE '{}'", raw),
            }
        }

        *self = std::mem::take(self).normalized();
    }

    /// Empty strings mean "unset".
    fn normalized(mut self) -> Self {
        self.api_key = self.api_key.filter(|k| !k.is_empty());
        self.cors_origins = self.cors_origins.filter(|o| !o.trim().is_empty());
        self
    }

    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// How long a session may sit unused before it is purged.
    #[must_use]
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Pause between purge sweeps: the idle limit, capped at one minute.
    #[must_use]
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs.clamp(1, MAX_REAPER_INTERVAL_SECS))
    }
}

// =============================================================================
// TESTS
// =============================================================================
