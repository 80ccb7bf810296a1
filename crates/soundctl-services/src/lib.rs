// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Audio, Bluetooth and preset services for SoundCtl.
//!
//! Each service is a `Send + Sync` trait with a blocking implementation over
//! an external command-line tool (or a TOML file for presets).

pub mod audio;
pub mod bluetooth;
pub mod error;
pub mod exec;
pub mod parse;
pub mod preset;
pub mod types;

pub use audio::{AudioControl, PactlAudio, MAX_VOLUME_PERCENT};
pub use bluetooth::{BluetoothControl, BluetoothCtl, DEFAULT_DISCOVERY_SECONDS};
pub use error::{ServiceError, ServiceResult};
pub use exec::{CommandRunner, SystemRunner};
pub use preset::{DiffLine, Preset, PresetStore, TomlPresetStore, VolumeSpec, FOLLOW_DEFAULT};
pub use types::*;
