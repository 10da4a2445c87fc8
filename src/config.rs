//! Configuration management for memsession.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;
use crate::session::{ManagerConfig, DEFAULT_ID_BYTES, MAX_INITIAL_CAPACITY, MIN_ID_BYTES};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session manager configuration.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Session manager configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Random bytes per session identifier.
    pub id_bytes: usize,
    /// Registry capacity to reserve at startup.
    pub initial_capacity: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            id_bytes: DEFAULT_ID_BYTES,
            initial_capacity: 0,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(bytes) = std::env::var("MEMSESSION_ID_BYTES") {
            if let Ok(bytes) = bytes.parse() {
                self.session.id_bytes = bytes;
            }
        }

        if let Ok(level) = std::env::var("MEMSESSION_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(bytes) = args.id_bytes {
            self.session.id_bytes = bytes;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to a validated [`ManagerConfig`].
    pub fn to_manager_config(&self) -> Result<ManagerConfig, ConfigError> {
        let config = ManagerConfig {
            id_bytes: self.session.id_bytes,
            initial_capacity: self.session.initial_capacity,
        };

        if config.id_bytes < MIN_ID_BYTES {
            return Err(ConfigError::IdTooShort(config.id_bytes));
        }
        if config.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::CapacityTooLarge(config.initial_capacity));
        }
        Ok(config)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// Identifier size below the accepted minimum.
    #[error("id_bytes must be at least {min}, got {0}", min = MIN_ID_BYTES)]
    IdTooShort(usize),
    /// Registry reservation above the accepted maximum.
    #[error("initial_capacity must be at most {max}, got {0}", max = MAX_INITIAL_CAPACITY)]
    CapacityTooLarge(usize),
}
