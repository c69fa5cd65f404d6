//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Worker pool and engine settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log filter settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.ingest.workers == 0 {
            return Err(AppError::validation("ingest.workers must be > 0"));
        }
        if self.ingest.lock_stripes == 0 {
            return Err(AppError::validation("ingest.lock_stripes must be > 0"));
        }
        if self.output.dir.trim().is_empty() {
            return Err(AppError::validation("output.dir is empty"));
        }
        Ok(())
    }
}

/// Worker pool and dedup engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Number of worker threads
    #[serde(default = "defaults::workers")]
    pub workers: usize,

    /// Number of lock stripes guarding uuid/title keys
    #[serde(default = "defaults::lock_stripes")]
    pub lock_stripes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: defaults::workers(),
            lock_stripes: defaults::lock_stripes(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the report files
    #[serde(default = "defaults::output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter (overridden by RUST_LOG)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn workers() -> usize {
        4
    }
    pub fn lock_stripes() -> usize {
        64
    }
    pub fn output_dir() -> String {
        ".".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let mut config = Config::default();
        config.ingest.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_stripes() {
        let mut config = Config::default();
        config.ingest.lock_stripes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_output_dir() {
        let mut config = Config::default();
        config.output.dir = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[ingest]\nworkers = 8\n").unwrap();
        assert_eq!(config.ingest.workers, 8);
        assert_eq!(config.ingest.lock_stripes, 64);
        assert_eq!(config.output.dir, ".");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/aggregator.toml").is_err());
    }
}
