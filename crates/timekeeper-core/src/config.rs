//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `timekeeper-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! A missing file means defaults everywhere; the game rules themselves are
//! compile-time constants in the catalog and progression modules.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::input::TimedAction;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `timekeeper-config.yaml`. All fields have
/// sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Frame cadence and session bounds.
    #[serde(default)]
    pub session: SessionConfig,

    /// Tunable gameplay values that are not catalog constants.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optional timed action script driving the session (demo runs and
    /// integration tests).
    #[serde(default)]
    pub script: Vec<TimedAction>,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Frame cadence and session bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Milliseconds between frame evaluations.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Milliseconds between wall-clock re-samples (>= 1 Hz).
    #[serde(default = "default_clock_sample_interval_ms")]
    pub clock_sample_interval_ms: u64,

    /// Maximum frames before the runner gives up (0 = unlimited).
    #[serde(default)]
    pub max_frames: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            clock_sample_interval_ms: default_clock_sample_interval_ms(),
            max_frames: 0,
        }
    }
}

/// Tunable gameplay values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// How much the glitch level softens on a reset. Resets never zero it.
    #[serde(default = "default_reset_glitch_decrement")]
    pub reset_glitch_decrement: Decimal,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            reset_glitch_decrement: default_reset_glitch_decrement(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_frame_interval_ms() -> u64 {
    100
}

const fn default_clock_sample_interval_ms() -> u64 {
    1_000
}

fn default_reset_glitch_decrement() -> Decimal {
    Decimal::new(25, 2) // 0.25
}

fn default_log_level() -> String {
    "info".to_owned()
}
