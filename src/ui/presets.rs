// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Saved presets.

use super::keys::Action;
use super::Cursor;
use crate::command::Command;
use crate::message::Outcome;
use chrono::{DateTime, Local};
use soundctl_services::Preset;

/// Name for a snapshot taken at `now`.
pub fn snapshot_name(now: DateTime<Local>) -> String {
    now.format("Snapshot %Y-%m-%d %H:%M").to_string()
}

#[derive(Debug, Default)]
pub struct PresetsPane {
    presets: Vec<Preset>,
    /// Most recently applied preset.
    active: Option<String>,
    cursor: Cursor,
}

impl PresetsPane {
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, name: &str) {
        self.active = Some(name.to_string());
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn selected(&self) -> Option<&Preset> {
        self.presets.get(self.cursor.get())
    }

    pub fn loaded(&mut self, result: Outcome<Vec<Preset>>) -> Vec<Command> {
        match result {
            Ok(presets) => {
                self.presets = presets;
                self.cursor.clamp(self.presets.len());
                Vec::new()
            }
            Err(e) => vec![Command::Error(format!("load presets: {}", e))],
        }
    }

    pub fn deleted(&mut self, name: &str, result: Outcome<()>) -> Vec<Command> {
        match result {
            Ok(()) => {
                if self.active.as_deref() == Some(name) {
                    self.active = None;
                }
                vec![
                    Command::LoadPresets,
                    Command::Status(format!("Deleted preset {:?}", name)),
                ]
            }
            Err(e) => vec![Command::Error(format!("delete preset {:?}: {}", name, e))],
        }
    }

    pub fn saved(&mut self, name: &str, result: Outcome<()>) -> Vec<Command> {
        match result {
            Ok(()) => vec![
                Command::LoadPresets,
                Command::Status(format!("Saved preset {:?}", name)),
            ],
            Err(e) => vec![Command::Error(format!("save preset {:?}: {}", name, e))],
        }
    }

    /// Pane keys. Selecting a preset only previews it; applying happens
    /// from the confirmation overlay.
    pub fn handle(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Up => {
                self.cursor.up();
            }
            Action::Down => {
                self.cursor.down(self.presets.len());
            }
            Action::Select => {
                if let Some(preset) = self.selected() {
                    return vec![Command::PreviewPreset(preset.clone())];
                }
            }
            Action::Scan => return vec![Command::SnapshotPreset(snapshot_name(Local::now()))],
            Action::Forget => {
                if let Some(preset) = self.selected() {
                    return vec![Command::DeletePreset(preset.name.clone())];
                }
            }
            Action::Refresh => return vec![Command::LoadPresets],
            _ => {}
        }
        Vec::new()
    }
}
