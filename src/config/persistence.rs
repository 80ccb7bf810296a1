// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Locating and loading the config file.

use crate::config::AppConfig;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Manages configuration file persistence.
pub struct ConfigManager {
    config_dir: PathBuf,
    state_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager, initializing directories.
    pub fn new() -> Result<Self, ConfigError> {
        let project_dirs =
            ProjectDirs::from("", "", "soundctl").ok_or(ConfigError::NoConfigDir)?;

        let config_dir = project_dirs.config_dir().to_path_buf();
        // State dir holds the log file
        let state_dir = project_dirs
            .state_dir()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| config_dir.join("state"));

        Self::with_dirs(config_dir, state_dir)
    }

    /// Config manager rooted at explicit directories.
    pub fn with_dirs(config_dir: PathBuf, state_dir: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&state_dir)?;
        Ok(Self {
            config_dir,
            state_dir,
        })
    }

    /// Get the path to the main config file.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default preset file when the config does not override it.
    pub fn presets_path(&self) -> PathBuf {
        self.config_dir.join("presets.toml")
    }

    /// Default log file.
    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("soundctl.log")
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load the application config.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let path = self.config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(AppConfig::from_toml(&content)?)
        } else {
            Ok(AppConfig::default())
        }
    }
}
