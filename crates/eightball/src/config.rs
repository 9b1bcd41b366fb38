//! Configuration management for eightball.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "eightball";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "EIGHTBALL_";

/// Placeholder printed instead of the anonymous key.
const REDACTED: &str = "(redacted)";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `EIGHTBALL_`, `__` between sections)
/// 2. TOML config file at `~/.config/eightball/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosted store connection.
    pub store: StoreConfig,
    /// Rotation and animation timings.
    pub rotation: RotationConfig,
    /// User-facing messages.
    pub messages: MessageConfig,
}

/// Hosted store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store project, e.g. `https://abc.supabase.co`.
    pub url: Option<String>,
    /// Anonymous access key sent with every request.
    pub anon_key: Option<String>,
    /// Table holding submitted projects.
    pub table: String,
    /// Object bucket holding screenshots.
    pub bucket: String,
}

/// Rotation timing configuration, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Interval between automatic rotations.
    pub interval_ms: u64,
    /// Length of the shake gesture.
    pub shake_ms: u64,
    /// Fade-out duration before the card content is swapped.
    pub fade_out_ms: u64,
    /// Pause after the swap before the card fades back in.
    pub fade_settle_ms: u64,
}

/// User-facing messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Banner shown when the store has no projects.
    pub empty: String,
    /// Banner shown when loading fails.
    pub fetch_failed: String,
    /// Message shown after a successful submission.
    pub submit_success: String,
    /// Message shown after a failed submission.
    pub submit_failed: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "student_projects".to_string(),
            bucket: "project-screenshots".to_string(),
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
            shake_ms: 800,
            fade_out_ms: 500,
            fade_settle_ms: 50,
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            empty: "No projects submitted yet. Be the first to submit!".to_string(),
            fetch_failed: "Failed to load projects. Please try again later.".to_string(),
            submit_success: "Project submitted successfully! 🎉".to_string(),
            submit_failed: "Failed to submit project. Please try again.".to_string(),
        }
    }
}

/// Resolved connection details for the hosted store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
    /// Base URL.
    pub url: Url,
    /// Anonymous access key.
    pub anon_key: String,
    /// Projects table.
    pub table: String,
    /// Screenshot bucket.
    pub bucket: String,
}

/// Animation and rotation timings as durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Interval between automatic rotations.
    pub interval: Duration,
    /// Length of the shake gesture.
    pub shake: Duration,
    /// Fade-out duration.
    pub fade_out: Duration,
    /// Settle delay before fading back in.
    pub fade_settle: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        RotationConfig::default().timings()
    }
}

impl RotationConfig {
    /// Convert the millisecond settings into durations.
    #[must_use]
    pub fn timings(&self) -> Timings {
        Timings {
            interval: Duration::from_millis(self.interval_ms),
            shake: Duration::from_millis(self.shake_ms),
            fade_out: Duration::from_millis(self.fade_out_ms),
            fade_settle: Duration::from_millis(self.fade_settle_ms),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let rotation = &self.rotation;
        for (name, value) in [
            ("interval_ms", rotation.interval_ms),
            ("shake_ms", rotation.shake_ms),
            ("fade_out_ms", rotation.fade_out_ms),
            ("fade_settle_ms", rotation.fade_settle_ms),
        ] {
            if value == 0 {
                return Err(Error::config_validation(format!(
                    "rotation.{name} must be greater than 0"
                )));
            }
        }

        if let Some(url) = &self.store.url {
            Url::parse(url).map_err(|e| {
                Error::config_validation(format!("store.url is not a valid URL ({url}): {e}"))
            })?;
        }

        if self.store.table.trim().is_empty() {
            return Err(Error::config_validation("store.table must not be empty"));
        }
        if self.store.bucket.trim().is_empty() {
            return Err(Error::config_validation("store.bucket must not be empty"));
        }

        Ok(())
    }

    /// Resolve the store endpoint, failing if the URL or key is unset.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the missing setting.
    pub fn store_endpoint(&self) -> Result<StoreEndpoint> {
        let url = self
            .store
            .url
            .as_deref()
            .ok_or_else(|| Error::config_validation("store.url is not set"))?;
        let url = Url::parse(url)
            .map_err(|e| Error::config_validation(format!("store.url is not a valid URL: {e}")))?;
        let anon_key = self
            .store
            .anon_key
            .clone()
            .ok_or_else(|| Error::config_validation("store.anon_key is not set"))?;

        Ok(StoreEndpoint {
            url,
            anon_key,
            table: self.store.table.clone(),
            bucket: self.store.bucket.clone(),
        })
    }

    /// Get the rotation timings as durations.
    #[must_use]
    pub fn timings(&self) -> Timings {
        self.rotation.timings()
    }

    /// A copy safe to print, with the anonymous key masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.store.anon_key.is_some() {
            config.store.anon_key = Some(REDACTED.to_string());
        }
        config
    }
}
