//! Configuration handling
//!
//! Manages the `sqlext.toml` configuration file. Every setting has a default, so a
//! missing file is not an error.
//!
//! ## Environment Variables
//!
//! The following environment variables override config file settings:
//!
//! - `SQLEXT_MERGE_FILTER_SIZE` - Largest input file (in bytes) the scan filter accepts
//! - `SQLEXT_SKIP_PATH_FILTER` - Accept every input file (`true`/`false`)
//! - `SQLEXT_LOG` - Log filter directive used when `RUST_LOG` is unset
//! - `SQLEXT_OUTPUT` - Output format of the CLI (`json` or `debug`)
//!
//! These can be set in a `.env` file next to the configuration file.

use crate::error::{ExtError, ExtResult};
use crate::scan::{DEFAULT_MERGE_FILTER_SIZE, MERGE_FILTER_SIZE_KEY, SKIP_PATH_FILTER_KEY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "sqlext.toml";

/// Environment variable names
pub const ENV_MERGE_FILTER_SIZE: &str = "SQLEXT_MERGE_FILTER_SIZE";
pub const ENV_SKIP_PATH_FILTER: &str = "SQLEXT_SKIP_PATH_FILTER";
pub const ENV_LOG: &str = "SQLEXT_LOG";
pub const ENV_OUTPUT: &str = "SQLEXT_OUTPUT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for the scan-input file filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Files larger than this many bytes are not merged into a scan
    #[serde(default = "default_merge_filter_size")]
    pub merge_filter_size: u64,
    /// Accept every file without looking at it
    #[serde(default)]
    pub skip_path_filter: bool,
}

fn default_merge_filter_size() -> u64 {
    DEFAULT_MERGE_FILTER_SIZE
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            merge_filter_size: default_merge_filter_size(),
            skip_path_filter: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "sqlext=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Debug,
}

impl std::str::FromStr for OutputFormat {
    type Err = ExtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "debug" => Ok(OutputFormat::Debug),
            other => Err(ExtError::Config(format!("unknown output format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// This also loads any `.env` file in the directory and applies
    /// environment variable overrides.
    pub fn load(dir: &Path) -> ExtResult<Self> {
        // Load env file if present (ignore errors)
        let env_path = dir.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }

        let config_path = dir.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Config::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) -> ExtResult<()> {
        if let Ok(size) = std::env::var(ENV_MERGE_FILTER_SIZE) {
            self.scan.merge_filter_size = size.trim().parse().map_err(|_| {
                ExtError::Config(format!("{} must be a byte count, got '{}'", ENV_MERGE_FILTER_SIZE, size))
            })?;
        }

        if let Ok(skip) = std::env::var(ENV_SKIP_PATH_FILTER) {
            self.scan.skip_path_filter = skip.trim().parse().map_err(|_| {
                ExtError::Config(format!("{} must be true or false, got '{}'", ENV_SKIP_PATH_FILTER, skip))
            })?;
        }

        if let Ok(filter) = std::env::var(ENV_LOG) {
            if !filter.is_empty() {
                self.log.filter = filter;
            }
        }

        if let Ok(format) = std::env::var(ENV_OUTPUT) {
            self.output.format = format.parse()?;
        }

        Ok(())
    }

    /// Save configuration to a directory
    pub fn save(&self, dir: &Path) -> ExtResult<()> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Value of a scan setting by its context key, as the scan filter reads it.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            MERGE_FILTER_SIZE_KEY => Some(self.scan.merge_filter_size.to_string()),
            SKIP_PATH_FILTER_KEY => Some(self.scan.skip_path_filter.to_string()),
            _ => None,
        }
    }
}
