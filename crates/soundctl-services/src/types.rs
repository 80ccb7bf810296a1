// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Records exchanged between the services and the controller.
//!
//! Every list is rebuilt wholesale on each reload; nothing here is mutated
//! in place after construction.

use std::fmt;

/// An audio sink or source as reported by `pactl list short`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioEndpoint {
    pub id: u32,
    /// Stable name used for control calls.
    pub name: String,
    pub driver: String,
    pub sample_spec: String,
    /// RUNNING, IDLE, SUSPENDED, ...
    pub state: String,
}

/// Current default sink and source names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub sink: String,
    pub source: String,
    pub server_name: String,
}

/// An active playback stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkInput {
    pub index: u32,
    pub sink_index: u32,
    /// Resolved from `sink_index`; empty when the sink is unknown.
    pub sink_name: String,
    pub app_name: String,
    pub media_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardProfile {
    pub name: String,
    pub description: String,
    pub available: bool,
}

/// An audio card with its selectable profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub index: u32,
    pub name: String,
    pub driver: String,
    pub profiles: Vec<CardProfile>,
    /// Empty, or the name of one of `profiles`.
    pub active_profile: String,
}

impl Card {
    pub fn active(&self) -> Option<&CardProfile> {
        self.profiles.iter().find(|p| p.name == self.active_profile)
    }
}

/// Which kind of endpoint a volume or mute call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Sink,
    Source,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Sink => "sink",
            EndpointKind::Source => "source",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Volume percentage and mute state of one endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeLevel {
    pub percent: u32,
    pub muted: bool,
}

/// How a known Bluetooth device relates to this host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionMode {
    Connected,
    Paired,
    #[default]
    Saved,
}

impl ConnectionMode {
    pub fn from_flags(paired: bool, connected: bool) -> Self {
        if connected {
            ConnectionMode::Connected
        } else if paired {
            ConnectionMode::Paired
        } else {
            ConnectionMode::Saved
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionMode::Connected => "Connected",
            ConnectionMode::Paired => "Paired",
            ConnectionMode::Saved => "Saved",
        }
    }
}

/// A known Bluetooth device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    /// MAC address, unique per device.
    pub address: String,
    pub name: String,
    pub paired: bool,
    pub trusted: bool,
    pub connected: bool,
    pub mode: ConnectionMode,
}

/// Output of `bluetoothctl info <address>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub address: String,
    pub name: String,
    pub alias: String,
    pub paired: bool,
    pub trusted: bool,
    pub connected: bool,
}

/// Output of `bluetoothctl show`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerStatus {
    pub address: String,
    pub alias: String,
    pub powered: bool,
    pub pairable: bool,
    pub discovering: bool,
}

/// A device seen during a timed discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub address: String,
    pub name: String,
}

impl DiscoveredDevice {
    /// Name for display, falling back to a shortened address.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() || self.name == self.address {
            let prefix: String = self.address.chars().take(8).collect();
            format!("Unknown ({}…)", prefix)
        } else {
            self.name.clone()
        }
    }
}
