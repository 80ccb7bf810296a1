// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs controller commands against the services, off the event loop.
//!
//! Every service call shells out and may block for seconds (a discovery run
//! blocks for its whole duration), so each command runs on the blocking pool
//! and reports back through the message channel.

use crate::command::Command;
use crate::message::{DeviceAction, DevicesData, Message, SinkAction, SinksData};
use crate::reconcile;
use soundctl_services::{
    AudioControl, BluetoothControl, EndpointKind, PresetStore, ServiceResult,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, warn};

/// The service handles commands run against.
#[derive(Clone)]
pub struct Services {
    pub audio: Arc<dyn AudioControl>,
    pub bluetooth: Arc<dyn BluetoothControl>,
    pub presets: Arc<dyn PresetStore>,
}

/// Spawns one task per command. Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct Executor {
    services: Services,
    tx: UnboundedSender<Message>,
}

impl Executor {
    pub fn new(services: Services, tx: UnboundedSender<Message>) -> Self {
        Self { services, tx }
    }

    pub fn run(&self, command: Command) {
        match command {
            Command::Status(text) => self.post(Message::Status(text)),
            Command::Error(text) => self.post(Message::Error(text)),
            Command::ScheduleRefresh(delay) => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Message::RefreshTick);
                });
            }
            command => {
                debug!("Running {:?}", command);
                let services = self.services.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    match tokio::task::spawn_blocking(move || perform(&services, command)).await {
                        Ok(message) => {
                            let _ = tx.send(message);
                        }
                        Err(e) => error!("Service task failed: {}", e),
                    }
                });
            }
        }
    }

    fn post(&self, message: Message) {
        if self.tx.send(message).is_err() {
            debug!("Message channel closed");
        }
    }
}

/// Run one service command to completion and describe the outcome.
///
/// `Status`, `Error` and `ScheduleRefresh` never reach here; they are
/// handled by [`Executor::run`] directly.
pub fn perform(services: &Services, command: Command) -> Message {
    let audio = services.audio.as_ref();
    let bluetooth = services.bluetooth.as_ref();
    let store = services.presets.as_ref();

    match command {
        // ==================== Loads ====================
        Command::LoadDevices => {
            Message::DevicesLoaded(load_devices(bluetooth).map_err(|e| e.to_string()))
        }
        Command::LoadSinks => Message::SinksLoaded(load_sinks(audio).map_err(|e| e.to_string())),
        Command::LoadProfiles => {
            Message::ProfilesLoaded(audio.list_cards_detailed().map_err(|e| e.to_string()))
        }
        Command::LoadPresets => Message::PresetsLoaded(store.list().map_err(|e| e.to_string())),

        // ==================== Bluetooth ====================
        Command::Device(action, address) => {
            let result = match action {
                DeviceAction::Connect => bluetooth.connect(&address),
                DeviceAction::Disconnect => bluetooth.disconnect(&address),
                DeviceAction::Forget => bluetooth.remove(&address),
            };
            Message::DeviceActionDone {
                action,
                address,
                result: result.map_err(|e| e.to_string()),
            }
        }
        Command::Discover { generation, seconds } => Message::DiscoveryFinished {
            generation,
            result: bluetooth.discover(seconds).map_err(|e| e.to_string()),
        },
        Command::Pair {
            generation,
            address,
        } => {
            let result = bluetooth
                .pair(&address)
                .and_then(|()| bluetooth.trust(&address))
                .and_then(|()| bluetooth.connect(&address));
            Message::PairFinished {
                generation,
                address,
                result: result.map_err(|e| e.to_string()),
            }
        }

        // ==================== Audio ====================
        Command::Sink(action) => {
            let result = match &action {
                SinkAction::SetDefault {
                    kind: EndpointKind::Sink,
                    name,
                } => audio.set_default_sink(name),
                SinkAction::SetDefault {
                    kind: EndpointKind::Source,
                    name,
                } => audio.set_default_source(name),
                SinkAction::ToggleMute { kind, name } => audio.toggle_mute(*kind, name),
                SinkAction::MoveStream { index, sink } => audio.move_sink_input(*index, sink),
            };
            Message::SinkActionDone {
                action,
                result: result.map_err(|e| e.to_string()),
            }
        }
        Command::SetProfile { card, profile } => {
            let result = audio.set_card_profile(&card, &profile).map_err(|e| e.to_string());
            Message::ProfileSet {
                card,
                profile,
                result,
            }
        }

        // ==================== Presets ====================
        Command::PreviewPreset(preset) => {
            let current = match reconcile::snapshot(audio) {
                Ok(current) => Some(current),
                Err(e) => {
                    warn!("Could not read live state for preview: {}", e);
                    None
                }
            };
            Message::PreviewReady { preset, current }
        }
        Command::ApplyPreset(preset) => {
            let result = reconcile::apply(&preset, audio);
            Message::PresetApplied {
                name: preset.name,
                result,
            }
        }
        Command::DeletePreset(name) => {
            let result = store.delete(&name).map_err(|e| e.to_string());
            Message::PresetDeleted { name, result }
        }
        Command::SnapshotPreset(name) => {
            let result = reconcile::snapshot(audio)
                .and_then(|mut preset| {
                    preset.name = name.clone();
                    store.save(preset)
                })
                .map_err(|e| e.to_string());
            Message::PresetSaved { name, result }
        }

        // ==================== Control ====================
        Command::Status(text) => Message::Status(text),
        Command::Error(text) => Message::Error(text),
        Command::ScheduleRefresh(_) => Message::RefreshTick,
    }
}

fn load_devices(bluetooth: &dyn BluetoothControl) -> ServiceResult<DevicesData> {
    let devices = bluetooth.list_devices()?;
    let controller = bluetooth.controller_status().unwrap_or_else(|e| {
        warn!("Controller status unavailable: {}", e);
        Default::default()
    });
    Ok(DevicesData { devices, controller })
}

fn load_sinks(audio: &dyn AudioControl) -> ServiceResult<SinksData> {
    Ok(SinksData {
        sinks: audio.list_sinks()?,
        sources: audio.list_sources()?,
        inputs: audio.list_sink_inputs()?,
        defaults: audio.get_defaults()?,
    })
}
