// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Named audio presets and their TOML persistence.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Route target meaning "whatever the preset's default sink is".
pub const FOLLOW_DEFAULT: &str = "follow_default";

/// Volume and mute state for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    /// Percentage, nominally 0-150.
    pub level: u32,
    #[serde(default)]
    pub muted: bool,
}

/// A named, declarative audio configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_sink: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Card name to profile name.
    #[serde(default)]
    pub card_profiles: BTreeMap<String, String>,
    /// Channel (sink) name to volume.
    #[serde(default)]
    pub volumes: BTreeMap<String, VolumeSpec>,
    /// Application name to sink name or [`FOLLOW_DEFAULT`].
    #[serde(default)]
    pub app_routes: BTreeMap<String, String>,
}

impl Preset {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Resolve an app route target against this preset's default sink.
    pub fn resolve_route<'a>(&'a self, target: &'a str) -> &'a str {
        if target == FOLLOW_DEFAULT {
            &self.default_sink
        } else {
            target
        }
    }
}

/// One discrepancy between two presets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub field: String,
    pub from: String,
    pub to: String,
}

impl DiffLine {
    pub fn new(field: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Load and save presets by name.
pub trait PresetStore: Send + Sync {
    /// Every saved preset. A store with nothing saved yields an empty list.
    fn list(&self) -> ServiceResult<Vec<Preset>>;
    /// Fails with [`ServiceError::NotFound`] when absent.
    fn get(&self, name: &str) -> ServiceResult<Preset>;
    /// Insert or replace by name, keeping the original creation time.
    fn save(&self, preset: Preset) -> ServiceResult<()>;
    /// Fails with [`ServiceError::NotFound`] when absent.
    fn delete(&self, name: &str) -> ServiceResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PresetFile {
    #[serde(default)]
    presets: Vec<Preset>,
}

/// All presets in one TOML document.
pub struct TomlPresetStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl TomlPresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Store at `<config dir>/presets.toml`.
    pub fn in_config_dir() -> ServiceResult<Self> {
        let dirs = ProjectDirs::from("", "", "soundctl").ok_or(ServiceError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("presets.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ServiceResult<Vec<Preset>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: PresetFile = toml::from_str(&content)?;
        Ok(file.presets)
    }

    fn write(&self, presets: Vec<Preset>) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&PresetFile { presets })?;
        fs::write(&self.path, content)?;
        debug!("Wrote presets to {:?}", self.path);
        Ok(())
    }
}

impl PresetStore for TomlPresetStore {
    fn list(&self) -> ServiceResult<Vec<Preset>> {
        let _guard = self.lock.read();
        self.read()
    }

    fn get(&self, name: &str) -> ServiceResult<Preset> {
        self.list()?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ServiceError::NotFound {
                kind: "preset",
                name: name.to_string(),
            })
    }

    fn save(&self, mut preset: Preset) -> ServiceResult<()> {
        if preset.name.trim().is_empty() {
            return Err(ServiceError::MissingArgument("preset name"));
        }
        let _guard = self.lock.write();

        let now = Utc::now();
        preset.created_at.get_or_insert(now);
        preset.updated_at = Some(now);

        let mut presets = self.read()?;
        match presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => {
                preset.created_at = existing.created_at.or(preset.created_at);
                *existing = preset;
            }
            None => {
                info!("Saving new preset {:?}", preset.name);
                presets.push(preset);
            }
        }
        self.write(presets)
    }

    fn delete(&self, name: &str) -> ServiceResult<()> {
        let _guard = self.lock.write();

        let mut presets = self.read()?;
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            return Err(ServiceError::NotFound {
                kind: "preset",
                name: name.to_string(),
            });
        }
        info!("Deleting preset {:?}", name);
        self.write(presets)
    }
}
