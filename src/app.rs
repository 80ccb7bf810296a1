// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Main application state and update logic.

use crate::command::Command;
use crate::config::app_config::GeneralConfig;
use crate::debounce::DebounceScheduler;
use crate::message::Message;
use crate::reconcile::ApplyResult;
use crate::ui::confirm::ConfirmReply;
use crate::ui::keys::{Action, Key};
use crate::ui::scanner::ScannerReply;
use crate::ui::{
    ConfirmOverlay, DevicesPane, PresetsPane, ProfilesPane, ScannerOverlay, SinksPane, Tab,
};
use soundctl_services::Preset;
use tracing::{debug, info, trace, warn};

/// The modal overlay, if any. It receives every key while open.
#[derive(Debug)]
pub enum Overlay {
    Scanner(ScannerOverlay),
    Confirm(ConfirmOverlay),
}

/// The status line: last outcome wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Empty,
    Info(String),
    Error(String),
}

/// Root controller. Owns every pane and overlay; never calls a service.
#[derive(Debug)]
pub struct App {
    tab: Tab,
    overlay: Option<Overlay>,
    status: Status,
    devices: DevicesPane,
    sinks: SinksPane,
    profiles: ProfilesPane,
    presets: PresetsPane,
    debounce: DebounceScheduler,
    scan_generation: u64,
    scan_seconds: u32,
    quit: bool,
}

impl App {
    pub fn new(settings: &GeneralConfig) -> Self {
        Self {
            tab: Tab::default(),
            overlay: None,
            status: Status::default(),
            devices: DevicesPane::default(),
            sinks: SinksPane::default(),
            profiles: ProfilesPane::default(),
            presets: PresetsPane::default(),
            debounce: DebounceScheduler::new(settings.debounce()),
            scan_generation: 0,
            scan_seconds: settings.scan_seconds,
            quit: false,
        }
    }

    /// Commands to run at startup.
    pub fn init(&self) -> Vec<Command> {
        Command::reload_all()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn devices(&self) -> &DevicesPane {
        &self.devices
    }

    pub fn sinks(&self) -> &SinksPane {
        &self.sinks
    }

    pub fn profiles(&self) -> &ProfilesPane {
        &self.profiles
    }

    pub fn presets(&self) -> &PresetsPane {
        &self.presets
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Handle one message to completion.
    pub fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            // ==================== Input ====================
            Message::Key(key) => self.handle_key(key),
            Message::Resize => Vec::new(),

            // ==================== Status Line ====================
            Message::Status(text) => {
                self.status = Status::Info(text);
                Vec::new()
            }
            Message::Error(text) => {
                warn!("{}", text);
                self.status = Status::Error(text);
                Vec::new()
            }

            // ==================== Live Updates ====================
            Message::AudioEvent(event) => {
                trace!("Audio event: {} on {}", event.event_type, event.facility);
                self.schedule_refresh()
            }
            Message::BluetoothEvent(event) => {
                trace!("Bluetooth event: {:?}", event.kind);
                self.schedule_refresh()
            }
            Message::RefreshTick => {
                if self.debounce.fire() {
                    debug!("Refreshing after change events");
                    Command::reload_all()
                } else {
                    Vec::new()
                }
            }

            // ==================== Devices ====================
            Message::DevicesLoaded(result) => self.devices.loaded(result),
            Message::DeviceActionDone {
                action,
                address,
                result,
            } => self.devices.action_done(action, &address, result),
            Message::DiscoveryFinished { generation, result } => {
                let Some(Overlay::Scanner(scanner)) = self.overlay.as_mut() else {
                    debug!("Dropping discovery {} for a closed scanner", generation);
                    return Vec::new();
                };
                match scanner.discovery_finished(generation, result) {
                    Ok(()) => Vec::new(),
                    Err(e) => vec![Command::Error(format!("scan: {}", e))],
                }
            }
            Message::PairFinished {
                generation,
                address,
                result,
            } => self.pair_finished(generation, address, result),

            // ==================== Sinks ====================
            Message::SinksLoaded(result) => self.sinks.loaded(result),
            Message::SinkActionDone { action, result } => self.sinks.action_done(&action, result),

            // ==================== Profiles ====================
            Message::ProfilesLoaded(result) => self.profiles.loaded(result),
            Message::ProfileSet {
                card,
                profile,
                result,
            } => self.profiles.profile_set(&card, &profile, result),

            // ==================== Presets ====================
            Message::PresetsLoaded(result) => self.presets.loaded(result),
            Message::PreviewReady { preset, current } => {
                self.open_confirm(preset, current);
                Vec::new()
            }
            Message::PresetApplied { name, result } => self.preset_applied(name, result),
            Message::PresetDeleted { name, result } => self.presets.deleted(&name, result),
            Message::PresetSaved { name, result } => self.presets.saved(&name, result),
        }
    }

    fn schedule_refresh(&mut self) -> Vec<Command> {
        self.debounce
            .event()
            .map(Command::ScheduleRefresh)
            .into_iter()
            .collect()
    }

    fn handle_key(&mut self, key: Key) -> Vec<Command> {
        let Some(action) = Action::from_key(key) else {
            return Vec::new();
        };

        if let Some(overlay) = self.overlay.as_mut() {
            return match overlay {
                Overlay::Scanner(scanner) => match scanner.handle(action) {
                    ScannerReply::None => Vec::new(),
                    ScannerReply::Close => {
                        self.overlay = None;
                        Vec::new()
                    }
                    ScannerReply::Rescan => {
                        self.scan_generation += 1;
                        scanner.restart(self.scan_generation);
                        vec![self.discover_command()]
                    }
                    ScannerReply::Pair(address) => vec![Command::Pair {
                        generation: self.scan_generation,
                        address,
                    }],
                },
                Overlay::Confirm(confirm) => match confirm.handle(action) {
                    ConfirmReply::None => Vec::new(),
                    ConfirmReply::Close => {
                        self.overlay = None;
                        Vec::new()
                    }
                    ConfirmReply::Apply(preset) => vec![Command::ApplyPreset(preset)],
                },
            };
        }

        match action {
            Action::Quit => {
                info!("Quit requested");
                self.quit = true;
                Vec::new()
            }
            Action::NextTab => {
                self.tab = self.tab.next();
                Vec::new()
            }
            Action::PrevTab => {
                self.tab = self.tab.prev();
                Vec::new()
            }
            Action::Scan if self.tab == Tab::Devices => self.open_scanner(),
            _ => match self.tab {
                Tab::Devices => self.devices.handle(action),
                Tab::Sinks => self.sinks.handle(action),
                Tab::Profiles => self.profiles.handle(action),
                Tab::Presets => self.presets.handle(action),
            },
        }
    }

    fn discover_command(&self) -> Command {
        Command::Discover {
            generation: self.scan_generation,
            seconds: self.scan_seconds,
        }
    }

    fn open_scanner(&mut self) -> Vec<Command> {
        self.scan_generation += 1;
        debug!("Opening scanner (generation {})", self.scan_generation);
        self.overlay = Some(Overlay::Scanner(ScannerOverlay::scanning(self.scan_generation)));
        vec![self.discover_command()]
    }

    fn open_confirm(&mut self, preset: Preset, current: Option<Preset>) {
        if self.tab != Tab::Presets {
            debug!("Left the presets tab, dropping preview of {:?}", preset.name);
            return;
        }
        if self.overlay.is_some() {
            debug!("Overlay already open, dropping preview of {:?}", preset.name);
            return;
        }
        let current = current.unwrap_or_else(|| {
            warn!("No live snapshot for {:?}, diffing against an empty preset", preset.name);
            Preset::default()
        });
        self.overlay = Some(Overlay::Confirm(ConfirmOverlay::new(preset, &current)));
    }

    /// The scanner session that started this pair, if it is still open.
    fn scanner_for(&mut self, generation: u64) -> Option<&mut ScannerOverlay> {
        match self.overlay.as_mut() {
            Some(Overlay::Scanner(scanner)) if scanner.generation() == generation => Some(scanner),
            _ => None,
        }
    }

    fn pair_finished(
        &mut self,
        generation: u64,
        address: String,
        result: Result<(), String>,
    ) -> Vec<Command> {
        match result {
            Ok(()) => {
                if self.scanner_for(generation).is_some() {
                    self.overlay = None;
                } else {
                    debug!("Pair of {} finished after its scanner closed", address);
                }
                vec![
                    Command::LoadDevices,
                    Command::Status(format!("Paired + connected {}", address)),
                ]
            }
            Err(e) => {
                if let Some(scanner) = self.scanner_for(generation) {
                    scanner.pair_failed();
                }
                vec![Command::Error(format!("pair {}: {}", address, e))]
            }
        }
    }

    /// Only the confirmation that started this apply is closed or reset.
    fn preset_applied(&mut self, name: String, result: ApplyResult) -> Vec<Command> {
        self.presets.set_active(&name);
        let confirm = match self.overlay.as_mut() {
            Some(Overlay::Confirm(confirm))
                if confirm.is_applying() && confirm.preset().name == name =>
            {
                Some(confirm)
            }
            _ => None,
        };

        if !result.is_success() {
            if let Some(confirm) = confirm {
                confirm.apply_failed();
            }
            return vec![Command::Error(format!(
                "Preset {:?} applied with {} error(s)",
                name,
                result.errors.len()
            ))];
        }

        info!("Applied preset {:?}: {} change(s)", name, result.applied.len());
        if confirm.is_some() {
            self.overlay = None;
        }
        vec![
            Command::LoadPresets,
            Command::Status(format!("Preset {:?} applied", name)),
        ]
    }
}
