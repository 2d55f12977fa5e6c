//! Optional user settings for termination timing.
//!
//! Read from `~/.portctl/config.json` (or `$PORTCTL_CONFIG`). The file is
//! user-authored; this crate never writes it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::application::{
    KillOptions, DEFAULT_FORCE_WAIT, DEFAULT_GRACE_PERIOD, DEFAULT_POLL_INTERVAL, MAX_WAIT,
};
use crate::error::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "PORTCTL_CONFIG";

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Wait after SIGTERM before deciding on escalation, in milliseconds.
    #[serde(default = "default_grace_period_ms", rename = "gracePeriodMs")]
    pub grace_period_ms: u64,

    /// Liveness polling interval while waiting, in milliseconds.
    #[serde(default = "default_poll_interval_ms", rename = "pollIntervalMs")]
    pub poll_interval_ms: u64,

    /// Wait after SIGKILL before declaring failure, in milliseconds.
    #[serde(default = "default_force_wait_ms", rename = "forceWaitMs")]
    pub force_wait_ms: u64,
}

fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD.as_millis() as u64
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_force_wait_ms() -> u64 {
    DEFAULT_FORCE_WAIT.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grace_period_ms: default_grace_period_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            force_wait_ms: default_force_wait_ms(),
        }
    }
}

impl Config {
    /// Reject values that would make the wait loop meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("pollIntervalMs must be greater than 0".to_string()));
        }
        let max_ms = MAX_WAIT.as_millis() as u64;
        for (key, value) in [
            ("gracePeriodMs", self.grace_period_ms),
            ("forceWaitMs", self.force_wait_ms),
        ] {
            if value > max_ms {
                return Err(Error::Config(format!(
                    "{} ({}) exceeds the maximum of {} ms",
                    key, value, max_ms
                )));
            }
        }
        if self.poll_interval_ms > self.grace_period_ms.max(self.force_wait_ms) {
            return Err(Error::Config(format!(
                "pollIntervalMs ({}) is longer than every wait it polls",
                self.poll_interval_ms
            )));
        }
        Ok(())
    }

    /// Termination options seeded from this configuration.
    pub fn kill_options(&self) -> KillOptions {
        KillOptions {
            grace_period: Duration::from_millis(self.grace_period_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            force_wait: Duration::from_millis(self.force_wait_ms),
            ..KillOptions::default()
        }
    }
}

/// Locates and reads the configuration file.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a config store with the default path.
    ///
    /// Default path: `~/.portctl/config.json`, unless `$PORTCTL_CONFIG` is set.
    pub fn new() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(Self::with_path(PathBuf::from(path)));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Ok(Self::with_path(home.join(".portctl").join("config.json")))
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
