//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::snapshot::STORAGE_KEY;

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "OPHUB_DATA_DIR";

/// Environment variable overriding the storage key
pub const ENV_STORAGE_KEY: &str = "OPHUB_STORAGE_KEY";

/// ophub configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Directory holding the snapshot file
    pub data_dir: Option<PathBuf>,

    /// Key (file stem) the snapshot is stored under
    pub storage_key: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/ophub/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match std::fs::read_to_string(&global_path)
                    .map_err(|e| e.to_string())
                    .and_then(|s| serde_yml::from_str::<Config>(&s).map_err(|e| e.to_string()))
                {
                    Ok(global) => config.merge(global),
                    Err(e) => tracing::warn!(
                        path = %global_path.display(),
                        error = %e,
                        "ignoring unreadable config file"
                    ),
                }
            }
        }

        // 3. Environment variables
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(key) = std::env::var(ENV_STORAGE_KEY) {
            if !key.is_empty() {
                config.storage_key = Some(key);
            }
        }

        config
    }

    /// Apply a command-line data directory, which beats every other layer
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.data_dir = dir;
        }
        self
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ophub")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.storage_key.is_some() {
            self.storage_key = other.storage_key;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Resolved data directory: configured value, else the platform data dir,
    /// else the working directory
    pub fn data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "ophub")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(STORAGE_KEY)
    }
}
