// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Message types for key input, live events and service results.

use crate::reconcile::ApplyResult;
use crate::subscription::{AudioEvent, BluetoothEvent};
use crate::ui::keys::Key;
use soundctl_services::{
    AudioEndpoint, Card, ControllerStatus, Defaults, Device, DiscoveredDevice, EndpointKind,
    Preset, SinkInput,
};

/// Result of a service call; errors are already rendered for the status line.
pub type Outcome<T> = Result<T, String>;

/// Everything the Devices pane shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicesData {
    pub devices: Vec<Device>,
    pub controller: ControllerStatus,
}

/// Everything the Sinks pane shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinksData {
    pub sinks: Vec<AudioEndpoint>,
    pub sources: Vec<AudioEndpoint>,
    pub inputs: Vec<SinkInput>,
    pub defaults: Defaults,
}

/// Mutations on a known Bluetooth device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    Connect,
    Disconnect,
    Forget,
}

impl DeviceAction {
    pub fn verb(&self) -> &'static str {
        match self {
            DeviceAction::Connect => "connect",
            DeviceAction::Disconnect => "disconnect",
            DeviceAction::Forget => "forget",
        }
    }

    pub fn done(&self) -> &'static str {
        match self {
            DeviceAction::Connect => "Connected",
            DeviceAction::Disconnect => "Disconnected",
            DeviceAction::Forget => "Removed",
        }
    }
}

/// Mutations issued from the Sinks pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkAction {
    SetDefault { kind: EndpointKind, name: String },
    ToggleMute { kind: EndpointKind, name: String },
    MoveStream { index: u32, sink: String },
}

impl SinkAction {
    /// `set default sink alsa_output.pci` style label for errors.
    pub fn describe(&self) -> String {
        match self {
            SinkAction::SetDefault { kind, name } => format!("set default {} {}", kind, name),
            SinkAction::ToggleMute { kind, name } => format!("toggle mute {} {}", kind, name),
            SinkAction::MoveStream { index, sink } => format!("move stream {} → {}", index, sink),
        }
    }

    pub fn done(&self) -> String {
        match self {
            SinkAction::SetDefault { kind, name } => format!("Set default {}: {}", kind, name),
            SinkAction::ToggleMute { kind, name } => format!("Toggled mute on {} {}", kind, name),
            SinkAction::MoveStream { index, sink } => {
                format!("Moved stream {} → {}", index, sink)
            }
        }
    }
}

/// All messages in the application.
#[derive(Debug)]
pub enum Message {
    // ==================== Input ====================
    /// A key press from the terminal.
    Key(Key),
    /// The terminal was resized; only a redraw is needed.
    Resize,

    // ==================== Status Line ====================
    /// Informational status.
    Status(String),
    /// Error status.
    Error(String),

    // ==================== Live Updates ====================
    /// Audio server change notification.
    AudioEvent(AudioEvent),
    /// BlueZ change notification.
    BluetoothEvent(BluetoothEvent),
    /// The debounce timer fired.
    RefreshTick,

    // ==================== Devices ====================
    DevicesLoaded(Outcome<DevicesData>),
    DeviceActionDone {
        action: DeviceAction,
        address: String,
        result: Outcome<()>,
    },
    /// A discovery run ended. `generation` identifies the scanner session.
    DiscoveryFinished {
        generation: u64,
        result: Outcome<Vec<DiscoveredDevice>>,
    },
    /// Pair, trust and connect finished (or the first of them failed).
    PairFinished {
        generation: u64,
        address: String,
        result: Outcome<()>,
    },

    // ==================== Sinks ====================
    SinksLoaded(Outcome<SinksData>),
    SinkActionDone {
        action: SinkAction,
        result: Outcome<()>,
    },

    // ==================== Profiles ====================
    ProfilesLoaded(Outcome<Vec<Card>>),
    ProfileSet {
        card: String,
        profile: String,
        result: Outcome<()>,
    },

    // ==================== Presets ====================
    PresetsLoaded(Outcome<Vec<Preset>>),
    /// Live state to diff a preset against; `None` if it could not be read.
    PreviewReady {
        preset: Preset,
        current: Option<Preset>,
    },
    PresetApplied {
        name: String,
        result: ApplyResult,
    },
    PresetDeleted {
        name: String,
        result: Outcome<()>,
    },
    PresetSaved {
        name: String,
        result: Outcome<()>,
    },
}
