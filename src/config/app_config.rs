// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Application configuration (timing, logging, presets, live updates).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// General controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Quiet period before a burst of change events triggers a reload.
    pub debounce_ms: u64,
    /// Length of a Bluetooth discovery run.
    pub scan_seconds: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            scan_seconds: 8,
        }
    }
}

impl GeneralConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
    /// Log file; defaults to `soundctl.log` in the state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Override for the preset file.
    pub path: Option<PathBuf>,
}

/// External notification streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionsConfig {
    pub enabled: bool,
    pub audio_command: Vec<String>,
    pub bluetooth_command: Vec<String>,
}

impl Default for SubscriptionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            audio_command: vec!["pactl".to_string(), "subscribe".to_string()],
            bluetooth_command: vec![
                "dbus-monitor".to_string(),
                "--system".to_string(),
                "type='signal',sender='org.bluez'".to_string(),
            ],
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub presets: PresetsConfig,
    #[serde(default)]
    pub subscriptions: SubscriptionsConfig,
}

impl AppConfig {
    /// Load config from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
