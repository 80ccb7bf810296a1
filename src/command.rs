// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Side effects requested by the controller.
//!
//! The controller never calls a service itself. It returns commands, and the
//! executor runs each one off the event loop and reports back with a
//! [`Message`](crate::message::Message).

use crate::message::{DeviceAction, SinkAction};
use soundctl_services::Preset;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ==================== Loads ====================
    LoadDevices,
    LoadSinks,
    LoadProfiles,
    LoadPresets,

    // ==================== Bluetooth ====================
    Device(DeviceAction, String),
    /// Timed discovery for the scanner session `generation`.
    Discover { generation: u64, seconds: u32 },
    /// Pair, trust, then connect; stops at the first failure. `generation`
    /// is the scanner session the pair was started from.
    Pair { generation: u64, address: String },

    // ==================== Audio ====================
    Sink(SinkAction),
    SetProfile { card: String, profile: String },

    // ==================== Presets ====================
    /// Snapshot live state to diff the preset against.
    PreviewPreset(Preset),
    ApplyPreset(Preset),
    DeletePreset(String),
    /// Save the live state under this name.
    SnapshotPreset(String),

    // ==================== Control ====================
    /// Send `RefreshTick` after the delay.
    ScheduleRefresh(Duration),
    Status(String),
    Error(String),
}

impl Command {
    /// Reload of every pane's data source.
    pub fn reload_all() -> Vec<Command> {
        vec![
            Command::LoadDevices,
            Command::LoadSinks,
            Command::LoadProfiles,
            Command::LoadPresets,
        ]
    }
}
