//! # Configuration
//!
//! Startup settings, read once from TOML. Every field has a default, so an
//! empty file is a valid configuration.
//!
//! ```toml
//! [memory]
//! transient_capacity_mb = 50
//!
//! [log]
//! level = "warn"
//! color = false
//!
//! [assets]
//! root = "assets"
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use kiln_core::log::{Logger, Severity};
use kiln_core::units::mb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default transient storage size in MiB.
pub const DEFAULT_TRANSIENT_CAPACITY_MB: usize = 50;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`KilnConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Transient storage settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Size of the transient arena in MiB.
    pub transient_capacity_mb: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            transient_capacity_mb: DEFAULT_TRANSIENT_CAPACITY_MB,
        }
    }
}

/// Console logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Lowest severity written.
    pub level: Severity,
    /// Color lines with ANSI codes.
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Severity::Trace,
            color: true,
        }
    }
}

/// Asset lookup settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory relative asset paths are resolved against.
    pub root: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Complete host configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KilnConfig {
    /// Transient storage.
    pub memory: MemoryConfig,
    /// Logging.
    pub log: LogConfig,
    /// Assets.
    pub assets: AssetConfig,
}

impl KilnConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`KilnConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a zero or unaddressable transient capacity.
    pub fn validate(&self) -> ConfigResult<()> {
        let capacity_mb = self.memory.transient_capacity_mb;
        if capacity_mb == 0 {
            return Err(ConfigError::Invalid(
                "memory.transient_capacity_mb must be greater than zero".to_string(),
            ));
        }
        if capacity_mb.checked_mul(mb(1)).is_none() {
            return Err(ConfigError::Invalid(format!(
                "memory.transient_capacity_mb too large: {capacity_mb}"
            )));
        }
        Ok(())
    }

    /// Transient arena size in bytes.
    #[must_use]
    pub fn transient_capacity(&self) -> usize {
        self.memory.transient_capacity_mb.saturating_mul(mb(1))
    }

    /// A stdout logger following the `[log]` section.
    #[must_use]
    pub fn logger(&self) -> Logger {
        self.logger_with_sink(std::io::stdout())
    }

    /// A logger writing to `sink`, following the `[log]` section.
    #[must_use]
    pub fn logger_with_sink(&self, sink: impl Write + Send + 'static) -> Logger {
        Logger::with_sink(sink)
            .with_min_severity(self.log.level)
            .with_color(self.log.color)
    }
}
