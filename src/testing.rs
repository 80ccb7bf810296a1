// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Recording in-memory services for tests.

use parking_lot::Mutex;
use soundctl_services::{
    AudioControl, AudioEndpoint, BluetoothControl, Card, ControllerStatus, Defaults, Device,
    DeviceInfo, DiscoveredDevice, EndpointKind, Preset, PresetStore, ServiceError,
    ServiceResult, SinkInput, VolumeLevel,
};
use std::collections::{HashMap, HashSet};

fn scripted_failure(op: &str) -> ServiceError {
    ServiceError::CommandFailed {
        command: op.to_string(),
        message: "scripted failure".to_string(),
    }
}

/// An [`AudioControl`] call as recorded by [`FakeAudio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSinks,
    ListSources,
    ListCards,
    ListCardsDetailed,
    ListSinkInputs,
    GetDefaults,
    SetDefaultSink(String),
    SetDefaultSource(String),
    SetCardProfile(String, String),
    SetVolume(EndpointKind, String, u32),
    ToggleMute(EndpointKind, String),
    GetVolume(EndpointKind, String),
    MoveSinkInput(u32, String),
}

#[derive(Default)]
struct AudioState {
    sinks: Vec<AudioEndpoint>,
    sources: Vec<AudioEndpoint>,
    cards: Vec<Card>,
    streams: Vec<SinkInput>,
    defaults: Defaults,
    volumes: HashMap<String, VolumeLevel>,
    failing: HashSet<&'static str>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeAudio {
    state: Mutex<AudioState>,
}

impl FakeAudio {
    /// Make every call of the named trait method fail.
    pub fn fail_on(&self, op: &'static str) {
        self.state.lock().failing.insert(op);
    }

    pub fn set_sinks(&self, sinks: Vec<AudioEndpoint>) {
        self.state.lock().sinks = sinks;
    }

    pub fn set_cards(&self, cards: Vec<Card>) {
        self.state.lock().cards = cards;
    }

    pub fn set_streams(&self, streams: Vec<SinkInput>) {
        self.state.lock().streams = streams;
    }

    pub fn set_defaults(&self, defaults: Defaults) {
        self.state.lock().defaults = defaults;
    }

    pub fn set_volume_level(&self, name: &str, level: VolumeLevel) {
        self.state.lock().volumes.insert(name.to_string(), level);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    fn call(&self, op: &'static str, call: Call) -> ServiceResult<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if state.failing.contains(op) {
            Err(scripted_failure(op))
        } else {
            Ok(())
        }
    }
}

impl AudioControl for FakeAudio {
    fn list_sinks(&self) -> ServiceResult<Vec<AudioEndpoint>> {
        self.call("list_sinks", Call::ListSinks)?;
        Ok(self.state.lock().sinks.clone())
    }

    fn list_sources(&self) -> ServiceResult<Vec<AudioEndpoint>> {
        self.call("list_sources", Call::ListSources)?;
        Ok(self.state.lock().sources.clone())
    }

    fn list_cards(&self) -> ServiceResult<Vec<AudioEndpoint>> {
        self.call("list_cards", Call::ListCards)?;
        let cards = self.state.lock().cards.clone();
        Ok(cards
            .into_iter()
            .map(|c| AudioEndpoint {
                id: c.index,
                name: c.name,
                driver: c.driver,
                ..AudioEndpoint::default()
            })
            .collect())
    }

    fn list_cards_detailed(&self) -> ServiceResult<Vec<Card>> {
        self.call("list_cards_detailed", Call::ListCardsDetailed)?;
        Ok(self.state.lock().cards.clone())
    }

    fn list_sink_inputs(&self) -> ServiceResult<Vec<SinkInput>> {
        self.call("list_sink_inputs", Call::ListSinkInputs)?;
        Ok(self.state.lock().streams.clone())
    }

    fn get_defaults(&self) -> ServiceResult<Defaults> {
        self.call("get_defaults", Call::GetDefaults)?;
        Ok(self.state.lock().defaults.clone())
    }

    fn set_default_sink(&self, name: &str) -> ServiceResult<()> {
        self.call("set_default_sink", Call::SetDefaultSink(name.to_string()))
    }

    fn set_default_source(&self, name: &str) -> ServiceResult<()> {
        self.call("set_default_source", Call::SetDefaultSource(name.to_string()))
    }

    fn set_card_profile(&self, card: &str, profile: &str) -> ServiceResult<()> {
        self.call(
            "set_card_profile",
            Call::SetCardProfile(card.to_string(), profile.to_string()),
        )
    }

    fn set_volume(&self, kind: EndpointKind, name: &str, percent: u32) -> ServiceResult<()> {
        self.call("set_volume", Call::SetVolume(kind, name.to_string(), percent))
    }

    fn toggle_mute(&self, kind: EndpointKind, name: &str) -> ServiceResult<()> {
        self.call("toggle_mute", Call::ToggleMute(kind, name.to_string()))
    }

    fn get_volume(&self, kind: EndpointKind, name: &str) -> ServiceResult<VolumeLevel> {
        self.call("get_volume", Call::GetVolume(kind, name.to_string()))?;
        self.state
            .lock()
            .volumes
            .get(name)
            .copied()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "sink",
                name: name.to_string(),
            })
    }

    fn move_sink_input(&self, index: u32, sink: &str) -> ServiceResult<()> {
        self.call("move_sink_input", Call::MoveSinkInput(index, sink.to_string()))
    }
}

#[derive(Default)]
struct BluetoothState {
    devices: Vec<Device>,
    controller: ControllerStatus,
    discovered: Vec<DiscoveredDevice>,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
}

/// Records calls as `"<method> <address>"`.
#[derive(Default)]
pub struct FakeBluetooth {
    state: Mutex<BluetoothState>,
}

impl FakeBluetooth {
    pub fn fail_on(&self, op: &'static str) {
        self.state.lock().failing.insert(op);
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        self.state.lock().devices = devices;
    }

    pub fn set_discovered(&self, discovered: Vec<DiscoveredDevice>) {
        self.state.lock().discovered = discovered;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn call(&self, op: &'static str, arg: &str) -> ServiceResult<()> {
        let mut state = self.state.lock();
        state.calls.push(if arg.is_empty() {
            op.to_string()
        } else {
            format!("{} {}", op, arg)
        });
        if state.failing.contains(op) {
            Err(scripted_failure(op))
        } else {
            Ok(())
        }
    }
}

impl BluetoothControl for FakeBluetooth {
    fn list_devices(&self) -> ServiceResult<Vec<Device>> {
        self.call("list_devices", "")?;
        Ok(self.state.lock().devices.clone())
    }

    fn controller_status(&self) -> ServiceResult<ControllerStatus> {
        self.call("controller_status", "")?;
        Ok(self.state.lock().controller.clone())
    }

    fn info(&self, address: &str) -> ServiceResult<DeviceInfo> {
        self.call("info", address)?;
        Ok(DeviceInfo {
            address: address.to_string(),
            ..DeviceInfo::default()
        })
    }

    fn connect(&self, address: &str) -> ServiceResult<()> {
        self.call("connect", address)
    }

    fn disconnect(&self, address: &str) -> ServiceResult<()> {
        self.call("disconnect", address)
    }

    fn trust(&self, address: &str) -> ServiceResult<()> {
        self.call("trust", address)
    }

    fn remove(&self, address: &str) -> ServiceResult<()> {
        self.call("remove", address)
    }

    fn pair(&self, address: &str) -> ServiceResult<()> {
        self.call("pair", address)
    }

    fn start_scan(&self) -> ServiceResult<()> {
        self.call("start_scan", "")
    }

    fn stop_scan(&self) -> ServiceResult<()> {
        self.call("stop_scan", "")
    }

    fn discover(&self, seconds: u32) -> ServiceResult<Vec<DiscoveredDevice>> {
        self.call("discover", &seconds.to_string())?;
        Ok(self.state.lock().discovered.clone())
    }
}

/// [`PresetStore`] over a plain list.
#[derive(Default)]
pub struct MemoryStore {
    presets: Mutex<Vec<Preset>>,
}

impl MemoryStore {
    pub fn names(&self) -> Vec<String> {
        self.presets.lock().iter().map(|p| p.name.clone()).collect()
    }
}

impl PresetStore for MemoryStore {
    fn list(&self) -> ServiceResult<Vec<Preset>> {
        Ok(self.presets.lock().clone())
    }

    fn get(&self, name: &str) -> ServiceResult<Preset> {
        self.presets
            .lock()
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "preset",
                name: name.to_string(),
            })
    }

    fn save(&self, preset: Preset) -> ServiceResult<()> {
        let mut presets = self.presets.lock();
        match presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => presets.push(preset),
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> ServiceResult<()> {
        let mut presets = self.presets.lock();
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            return Err(ServiceError::NotFound {
                kind: "preset",
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
