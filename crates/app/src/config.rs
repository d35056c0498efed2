//! Application configuration
//!
//! Read from `courtside.toml` in the platform config directory. Every field
//! has a default, so a missing file or an empty one is fine.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "courtside.toml";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Could not determine the platform directories")]
    NoProjectDirs,
}

fn default_database_file() -> String {
    "courtside.db".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
    /// Database file name inside the data directory
    pub database_file: String,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Keep everything in memory; nothing survives a restart
    pub in_memory: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: default_database_file(),
            log_filter: default_log_filter(),
            in_memory: false,
        }
    }
}

impl AppConfig {
    pub fn project_dirs() -> Result<ProjectDirs, ConfigError> {
        ProjectDirs::from("nl", "courtside", "courtside").ok_or(ConfigError::NoProjectDirs)
    }

    /// Load from the platform config directory
    pub fn load() -> Result<Self, ConfigError> {
        let dirs = Self::project_dirs()?;
        let mut config = Self::load_from(&dirs.config_dir().join(CONFIG_FILE))?;
        if config.data_dir.is_none() {
            config.data_dir = Some(dirs.data_dir().to_path_buf());
        }
        Ok(config)
    }

    /// Load from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Full path of the database file, if a data directory is known
    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(&self.database_file))
    }
}
