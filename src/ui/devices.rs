// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Known Bluetooth devices and the controller status.

use super::keys::Action;
use super::Cursor;
use crate::command::Command;
use crate::message::{DeviceAction, DevicesData, Outcome};
use soundctl_services::{ControllerStatus, Device};

#[derive(Debug, Default)]
pub struct DevicesPane {
    data: DevicesData,
    cursor: Cursor,
}

impl DevicesPane {
    pub fn devices(&self) -> &[Device] {
        &self.data.devices
    }

    pub fn controller(&self) -> &ControllerStatus {
        &self.data.controller
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn selected(&self) -> Option<&Device> {
        self.data.devices.get(self.cursor.get())
    }

    pub fn loaded(&mut self, result: Outcome<DevicesData>) -> Vec<Command> {
        match result {
            Ok(data) => {
                self.data = data;
                self.cursor.clamp(self.data.devices.len());
                Vec::new()
            }
            Err(e) => vec![Command::Error(format!("load devices: {}", e))],
        }
    }

    pub fn action_done(
        &mut self,
        action: DeviceAction,
        address: &str,
        result: Outcome<()>,
    ) -> Vec<Command> {
        match result {
            Ok(()) => vec![
                Command::LoadDevices,
                Command::Status(format!("{} {}", action.done(), address)),
            ],
            Err(e) => vec![Command::Error(format!("{} {}: {}", action.verb(), address, e))],
        }
    }

    /// Pane keys. Scanning is handled by the app, which owns the overlay.
    pub fn handle(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Up => {
                self.cursor.up();
            }
            Action::Down => {
                self.cursor.down(self.data.devices.len());
            }
            Action::Select => {
                if let Some(device) = self.selected() {
                    let toggle = if device.connected {
                        DeviceAction::Disconnect
                    } else {
                        DeviceAction::Connect
                    };
                    return vec![Command::Device(toggle, device.address.clone())];
                }
            }
            Action::Disconnect => {
                if let Some(device) = self.selected().filter(|d| d.connected) {
                    return vec![Command::Device(DeviceAction::Disconnect, device.address.clone())];
                }
            }
            Action::Forget => {
                if let Some(device) = self.selected() {
                    return vec![Command::Device(DeviceAction::Forget, device.address.clone())];
                }
            }
            Action::Refresh => return vec![Command::LoadDevices],
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundctl_services::ConnectionMode;

    fn device(address: &str, connected: bool) -> Device {
        Device {
            address: address.into(),
            name: format!("Device {}", address),
            paired: true,
            connected,
            mode: ConnectionMode::from_flags(true, connected),
            ..Device::default()
        }
    }

    fn pane(devices: Vec<Device>) -> DevicesPane {
        let mut pane = DevicesPane::default();
        let commands = pane.loaded(Ok(DevicesData {
            devices,
            ..DevicesData::default()
        }));
        assert!(commands.is_empty());
        pane
    }

    #[test]
    fn test_select_toggles_connection() {
        let mut pane = pane(vec![device("AA", false), device("BB", true)]);
        assert_eq!(
            pane.handle(Action::Select),
            vec![Command::Device(DeviceAction::Connect, "AA".into())]
        );

        pane.handle(Action::Down);
        assert_eq!(
            pane.handle(Action::Select),
            vec![Command::Device(DeviceAction::Disconnect, "BB".into())]
        );
    }

    #[test]
    fn test_disconnect_only_when_connected() {
        let mut pane = pane(vec![device("AA", false)]);
        assert!(pane.handle(Action::Disconnect).is_empty());
        assert_eq!(
            pane.handle(Action::Forget),
            vec![Command::Device(DeviceAction::Forget, "AA".into())]
        );
    }

    #[test]
    fn test_empty_list_ignores_actions() {
        let mut pane = DevicesPane::default();
        assert!(pane.handle(Action::Select).is_empty());
        assert!(pane.handle(Action::Forget).is_empty());
        assert!(pane.handle(Action::Down).is_empty());
        assert_eq!(pane.cursor(), 0);
        assert_eq!(pane.handle(Action::Refresh), vec![Command::LoadDevices]);
    }

    #[test]
    fn test_cursor_stops_at_end_and_clamps_on_reload() {
        let mut pane = pane(vec![device("AA", false), device("BB", false), device("CC", false)]);
        for _ in 0..5 {
            pane.handle(Action::Down);
        }
        assert_eq!(pane.cursor(), 2);

        pane.loaded(Ok(DevicesData {
            devices: vec![device("AA", false)],
            ..DevicesData::default()
        }));
        assert_eq!(pane.cursor(), 0);
        assert_eq!(pane.selected().map(|d| d.address.as_str()), Some("AA"));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut pane = pane(vec![device("AA", false), device("BB", false)]);
        pane.handle(Action::Down);

        let commands = pane.loaded(Err("bluetoothctl not found".into()));
        assert_eq!(commands, vec![Command::Error("load devices: bluetoothctl not found".into())]);
        assert_eq!(pane.devices().len(), 2);
        assert_eq!(pane.cursor(), 1);
    }

    #[test]
    fn test_action_results() {
        let mut pane = DevicesPane::default();
        assert_eq!(
            pane.action_done(DeviceAction::Connect, "AA", Ok(())),
            vec![Command::LoadDevices, Command::Status("Connected AA".into())]
        );
        assert_eq!(
            pane.action_done(DeviceAction::Forget, "AA", Err("not available".into())),
            vec![Command::Error("forget AA: not available".into())]
        );
    }
}
