// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher configuration.
//!
//! Configuration is stored in a TOML file (default `evsync.toml`):
//! - `database`: path of the SQLite database, relative to the config file
//! - `[remote]`: collector endpoint and credentials; absent disables sync
//! - `[dispatch]`: poll period, backoff bounds and response timeout
//!
//! `EVSYNC_REMOTE_URL`, `EVSYNC_ACCESS_KEY` and `EVSYNC_SECRET` override the
//! file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::{DispatcherConfig, Endpoint};

pub const DEFAULT_CONFIG_FILE: &str = "evsync.toml";
const DEFAULT_DATABASE: &str = "evsync.db";

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Database path (relative to the config file's directory, or absolute).
    #[serde(default = "default_database")]
    pub database: String,
    /// Collector connection. Synchronization is disabled when absent.
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Collector endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// `ws://...` or `wss://...`
    pub url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret: String,
}

/// Poll loop timing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,
    #[serde(default = "default_backoff_min_ms")]
    pub backoff_min_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_poll_period_ms() -> u64 {
    5_000
}

fn default_backoff_min_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    300_000
}

fn default_response_timeout_ms() -> u64 {
    30_000
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            poll_period_ms: default_poll_period_ms(),
            backoff_min_ms: default_backoff_min_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: default_database(),
            remote: None,
            dispatch: DispatchConfig::default(),
        }
    }
}

/// Values taken from the environment that override the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub remote_url: Option<String>,
    pub access_key: Option<String>,
    pub secret: Option<String>,
}

impl EnvOverrides {
    /// Reads `EVSYNC_REMOTE_URL`, `EVSYNC_ACCESS_KEY` and `EVSYNC_SECRET`.
    pub fn from_env() -> Self {
        EnvOverrides {
            remote_url: env::remote_url(),
            access_key: env::access_key(),
            secret: env::secret(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Loads `path`, applies environment overrides and validates the result.
    pub fn resolve(path: &Path) -> Result<Self> {
        let mut config = Config::load(path)?;
        config.apply_overrides(&EnvOverrides::from_env());
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to `path`.
    #[cfg(test)]
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Applies environment overrides.
    ///
    /// A URL override enables synchronization even if the file has no
    /// `[remote]` table. Credential overrides without any remote are ignored.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) {
        if let Some(url) = &overrides.remote_url {
            match &mut self.remote {
                Some(remote) => remote.url = url.clone(),
                None => {
                    self.remote = Some(RemoteConfig {
                        url: url.clone(),
                        access_key: String::new(),
                        secret: String::new(),
                    })
                }
            }
        }
        if let Some(remote) = &mut self.remote {
            if let Some(key) = &overrides.access_key {
                remote.access_key = key.clone();
            }
            if let Some(secret) = &overrides.secret {
                remote.secret = secret.clone();
            }
        }
    }

    /// Checks the remote URL scheme and the dispatch timings.
    pub fn validate(&self) -> Result<()> {
        if let Some(remote) = &self.remote {
            if !(remote.url.starts_with("ws://") || remote.url.starts_with("wss://")) {
                return Err(Error::Config(format!(
                    "invalid remote URL '{}': must be ws:// or wss://",
                    remote.url
                )));
            }
        }

        let dispatch = &self.dispatch;
        for (name, value) in [
            ("poll_period_ms", dispatch.poll_period_ms),
            ("backoff_min_ms", dispatch.backoff_min_ms),
            ("response_timeout_ms", dispatch.response_timeout_ms),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", name)));
            }
        }
        if dispatch.backoff_min_ms > dispatch.backoff_max_ms {
            return Err(Error::Config(format!(
                "backoff_min_ms ({}) exceeds backoff_max_ms ({})",
                dispatch.backoff_min_ms, dispatch.backoff_max_ms
            )));
        }
        Ok(())
    }

    /// Returns true if a collector is configured.
    pub fn is_remote_mode(&self) -> bool {
        self.remote.is_some()
    }

    /// Resolves the database path against the config file's directory.
    pub fn database_path(&self, config_path: &Path) -> PathBuf {
        let database = Path::new(&self.database);
        if database.is_absolute() {
            return database.to_path_buf();
        }
        match config_path.parent() {
            Some(dir) => dir.join(database),
            None => database.to_path_buf(),
        }
    }

    /// Dispatcher timings.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        let dispatch = &self.dispatch;
        DispatcherConfig {
            period: Duration::from_millis(dispatch.poll_period_ms),
            backoff_min: Duration::from_millis(dispatch.backoff_min_ms),
            backoff_max: Duration::from_millis(dispatch.backoff_max_ms),
            response_timeout: Duration::from_millis(dispatch.response_timeout_ms),
        }
    }

    /// Collector endpoint, if configured.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.remote.as_ref().map(|remote| Endpoint {
            url: remote.url.clone(),
            access_key: remote.access_key.clone(),
            secret: remote.secret.clone(),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
