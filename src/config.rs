//! User configuration file (`config.toml`).
//!
//! Every key is optional. A missing file means defaults; a malformed one is
//! logged and ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logger;

/// Where the config directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigDirSource {
    Flag,
    Env,
    Default,
}

impl ConfigDirSource {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Flag => "--config-dir",
            Self::Env => constants::ENV_CONFIG_DIR,
            Self::Default => "default",
        }
    }
}

/// Pick the config directory: flag, then environment, then platform default.
#[must_use]
pub fn resolve_config_dir(flag: Option<PathBuf>) -> (PathBuf, ConfigDirSource) {
    resolve_config_dir_from(flag, std::env::var_os(constants::ENV_CONFIG_DIR).map(PathBuf::from))
}

fn resolve_config_dir_from(flag: Option<PathBuf>, env: Option<PathBuf>) -> (PathBuf, ConfigDirSource) {
    if let Some(dir) = flag {
        return (dir, ConfigDirSource::Flag);
    }
    if let Some(dir) = env.filter(|d| !d.as_os_str().is_empty()) {
        return (dir, ConfigDirSource::Env);
    }
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    (base.join(constants::CONFIG_DIR_NAME), ConfigDirSource::Default)
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Explicit path to `adguardvpn-cli`, tried before the built-in search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cli_path: Option<PathBuf>,
    pub poll_interval_secs: u64,
    pub connect_refresh_delay_secs: u64,
    pub tick_rate_ms: u64,
    pub ip_lookup_timeout_secs: u64,
    /// JSON endpoints answering with an `ip` or `origin` field.
    pub ip_services: Vec<String>,
    /// Mirror the activity log to `<config_dir>/logs`.
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cli_path: None,
            poll_interval_secs: constants::DEFAULT_POLL_INTERVAL_SECS,
            connect_refresh_delay_secs: constants::DEFAULT_CONNECT_REFRESH_DELAY_SECS,
            tick_rate_ms: constants::DEFAULT_TICK_RATE,
            ip_lookup_timeout_secs: constants::IP_LOOKUP_TIMEOUT_SECS,
            ip_services: constants::IP_SERVICES.iter().map(ToString::to_string).collect(),
            log_to_file: true,
        }
    }
}

impl AppConfig {
    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or wrongly typed keys.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `<dir>/config.toml`, falling back to defaults.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(constants::CONFIG_FILE_NAME);
        let Ok(text) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::parse(&text) {
            Ok(config) => {
                logger::info("CFG", &format!("Loaded {}", path.display()));
                config
            }
            Err(e) => {
                logger::warn(
                    "CFG",
                    &format!("Ignoring malformed {}: {}", path.display(), e.message()),
                );
                Self::default()
            }
        }
    }

    /// Effective settings as TOML, for diagnostics.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    #[must_use]
    pub fn connect_refresh_delay(&self) -> Duration {
        Duration::from_secs(self.connect_refresh_delay_secs)
    }

    #[must_use]
    pub fn tick_rate_ms(&self) -> u64 {
        self.tick_rate_ms.max(50)
    }

    #[must_use]
    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ip_lookup_timeout_secs.max(1))
    }
}
