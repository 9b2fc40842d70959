//! Configuration management for Mediafiler.
//!
//! This module handles loading, saving, and managing Mediafiler configuration.
//! Command-line flags override whatever is loaded here.
//!
//! ## Configuration File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/mediafiler/config.toml` |
//! | macOS | `~/Library/Application Support/Mediafiler/config.toml` |
//! | Windows | `%APPDATA%\Mediafiler\config.toml` |
//!
//! ## Example
//!
//! ```toml
//! [library]
//! dirs = ["/srv/videos"]
//! suffixes = ["mp4", "mkv", "webm"]
//! archive_dir = "/mnt/archive"
//!
//! [web]
//! port = 5555
//!
//! [reaper]
//! grace_period = "11m"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration struct for Mediafiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library settings
    pub library: LibraryConfig,
    /// Web server settings
    pub web: WebConfig,
    /// Reaper settings
    pub reaper: ReaperConfig,
}

/// Which files are listed and where archived files go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directories to scan
    pub dirs: Vec<PathBuf>,
    /// File suffixes to list, without the leading dot
    pub suffixes: Vec<String>,
    /// Destination of archived files (archiving is disabled when unset)
    pub archive_dir: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            suffixes: crate::DEFAULT_SUFFIXES
                .split(',')
                .map(String::from)
                .collect(),
            archive_dir: None,
        }
    }
}

/// Web interface configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Web server port
    pub port: u16,
    /// Bind to localhost only
    pub localhost_only: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_PORT,
            localhost_only: false,
        }
    }
}

/// Reaper configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    /// How long a mark stays reversible before the file is deleted or archived
    #[serde(with = "humantime_serde")]
    pub grace_period: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            grace_period: crate::DEFAULT_GRACE_PERIOD,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// If the configuration file doesn't exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    ///
    /// Creates the configuration directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)
            .map_err(|e| Error::ConfigError(format!("Failed to write config: {e}")))
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Check values that parse fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.reaper.grace_period.is_zero() {
            return Err(Error::InvalidConfig {
                key: "reaper.grace_period".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.reaper.grace_period > crate::MAX_GRACE_PERIOD {
            return Err(Error::InvalidConfig {
                key: "reaper.grace_period".into(),
                reason: format!(
                    "must be at most {}m",
                    crate::MAX_GRACE_PERIOD.as_secs() / 60
                ),
            });
        }
        if self.library.suffixes.iter().all(|s| s.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                key: "library.suffixes".into(),
                reason: "at least one suffix is required".into(),
            });
        }
        Ok(())
    }

    /// Get the default configuration directory path.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mediafiler", "Mediafiler")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the full path to the configuration file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }
}

pub(crate) mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_duration(&s).ok_or_else(|| serde::de::Error::custom("invalid duration format"))
    }
}

/// Parse a duration written as `<n>s` or `<n>m`.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        return secs.parse().ok().map(Duration::from_secs);
    }
    s.strip_suffix('m')
        .and_then(|mins| mins.parse::<u64>().ok())
        .and_then(|m| m.checked_mul(60))
        .map(Duration::from_secs)
}
