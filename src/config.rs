//! Application Configuration
//!
//! Resolved from the environment, or from a JSON file when
//! `LEDGERDASH_CONFIG` points at one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const OWNER_VAR: &str = "LEDGERDASH_OWNER_ID";
pub const TIMEOUT_VAR: &str = "LEDGERDASH_TIMEOUT_SECS";
pub const LOG_DIR_VAR: &str = "LEDGERDASH_LOG_DIR";
pub const CONFIG_PATH_VAR: &str = "LEDGERDASH_CONFIG";

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOG_DIR: &str = "logs";
const DEMO_OWNER: &str = "demo-user";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which table store backs the facade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreSettings {
    Rest { url: String, anon_key: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub owner_id: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub query_timeout_secs: Option<u64>,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

impl AppConfig {
    /// File config when `LEDGERDASH_CONFIG` is set, environment otherwise
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path)),
            _ => Self::from_env(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let url = get(URL_VAR).ok_or(ConfigError::Missing(URL_VAR))?;
        let anon_key = get(ANON_KEY_VAR).ok_or(ConfigError::Missing(ANON_KEY_VAR))?;
        let owner_id = get(OWNER_VAR).ok_or(ConfigError::Missing(OWNER_VAR))?;

        let request_timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => parse_secs(TIMEOUT_VAR, &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let log_dir = get(LOG_DIR_VAR).map(PathBuf::from).unwrap_or_else(default_log_dir);

        let config = Self {
            store: StoreSettings::Rest { url, anon_key },
            owner_id,
            request_timeout_secs,
            query_timeout_secs: None,
            log_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory store owned by a fixed demo user
    pub fn demo() -> Self {
        Self {
            store: StoreSettings::Memory,
            owner_id: DEMO_OWNER.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            query_timeout_secs: None,
            log_dir: default_log_dir(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_id.trim().is_empty() {
            return Err(ConfigError::Missing(OWNER_VAR));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: TIMEOUT_VAR,
                message: "must be at least one second".into(),
            });
        }
        if let StoreSettings::Rest { url, anon_key } = &self.store {
            if url.trim().is_empty() {
                return Err(ConfigError::Missing(URL_VAR));
            }
            if anon_key.trim().is_empty() {
                return Err(ConfigError::Missing(ANON_KEY_VAR));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: URL_VAR,
                    message: format!("expected an http(s) URL, got {url}"),
                });
            }
        }
        Ok(())
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|err| ConfigError::Invalid {
        key,
        message: err.to_string(),
    })
}
