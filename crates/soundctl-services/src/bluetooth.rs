// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bluetooth control through `bluetoothctl`.

use crate::error::{ServiceError, ServiceResult};
use crate::exec::CommandRunner;
use crate::parse::bluetoothctl;
use crate::types::{ConnectionMode, ControllerStatus, Device, DeviceInfo, DiscoveredDevice};
use std::sync::Arc;
use tracing::{debug, info};

/// Discovery length used when a caller asks for a non-positive duration.
pub const DEFAULT_DISCOVERY_SECONDS: u32 = 8;

/// Operations against the host Bluetooth controller.
pub trait BluetoothControl: Send + Sync {
    /// Known devices with their flags filled in from `info`.
    fn list_devices(&self) -> ServiceResult<Vec<Device>>;
    fn controller_status(&self) -> ServiceResult<ControllerStatus>;
    fn info(&self, address: &str) -> ServiceResult<DeviceInfo>;
    fn connect(&self, address: &str) -> ServiceResult<()>;
    fn disconnect(&self, address: &str) -> ServiceResult<()>;
    fn trust(&self, address: &str) -> ServiceResult<()>;
    fn remove(&self, address: &str) -> ServiceResult<()>;
    fn pair(&self, address: &str) -> ServiceResult<()>;
    fn start_scan(&self) -> ServiceResult<()>;
    fn stop_scan(&self) -> ServiceResult<()>;
    /// Scan for `seconds` and return every device seen, de-duplicated by address.
    fn discover(&self, seconds: u32) -> ServiceResult<Vec<DiscoveredDevice>>;
}

/// [`BluetoothControl`] backed by the `bluetoothctl` command-line tool.
pub struct BluetoothCtl {
    runner: Arc<dyn CommandRunner>,
}

impl BluetoothCtl {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn bluetoothctl(&self, args: &[&str]) -> ServiceResult<String> {
        self.runner.run("bluetoothctl", args)
    }

    fn on_address(&self, operation: &str, address: &str) -> ServiceResult<()> {
        if address.trim().is_empty() {
            return Err(ServiceError::MissingArgument("address"));
        }
        debug!("bluetoothctl {} {}", operation, address);
        self.bluetoothctl(&[operation, address]).map(drop)
    }
}

impl BluetoothControl for BluetoothCtl {
    fn list_devices(&self) -> ServiceResult<Vec<Device>> {
        let entries = bluetoothctl::parse_devices(&self.bluetoothctl(&["devices"])?)?;
        entries
            .into_iter()
            .map(|entry| {
                let info = self.info(&entry.address)?;
                Ok(Device {
                    mode: ConnectionMode::from_flags(info.paired, info.connected),
                    address: entry.address,
                    name: entry.name,
                    paired: info.paired,
                    trusted: info.trusted,
                    connected: info.connected,
                })
            })
            .collect()
    }

    fn controller_status(&self) -> ServiceResult<ControllerStatus> {
        bluetoothctl::parse_show(&self.bluetoothctl(&["show"])?)
    }

    fn info(&self, address: &str) -> ServiceResult<DeviceInfo> {
        if address.trim().is_empty() {
            return Err(ServiceError::MissingArgument("address"));
        }
        bluetoothctl::parse_info(&self.bluetoothctl(&["info", address])?)
    }

    fn connect(&self, address: &str) -> ServiceResult<()> {
        self.on_address("connect", address)
    }

    fn disconnect(&self, address: &str) -> ServiceResult<()> {
        self.on_address("disconnect", address)
    }

    fn trust(&self, address: &str) -> ServiceResult<()> {
        self.on_address("trust", address)
    }

    fn remove(&self, address: &str) -> ServiceResult<()> {
        self.on_address("remove", address)
    }

    fn pair(&self, address: &str) -> ServiceResult<()> {
        match self.on_address("pair", address) {
            Err(ServiceError::CommandFailed { ref message, .. })
                if message.contains("AlreadyExists") =>
            {
                debug!("{} is already paired", address);
                Ok(())
            }
            other => other,
        }
    }

    fn start_scan(&self) -> ServiceResult<()> {
        self.bluetoothctl(&["scan", "on"]).map(drop)
    }

    fn stop_scan(&self) -> ServiceResult<()> {
        self.bluetoothctl(&["scan", "off"]).map(drop)
    }

    fn discover(&self, seconds: u32) -> ServiceResult<Vec<DiscoveredDevice>> {
        let seconds = if seconds == 0 {
            DEFAULT_DISCOVERY_SECONDS
        } else {
            seconds
        };
        info!("Discovering Bluetooth devices for {}s", seconds);

        let timeout = seconds.to_string();
        let output = self.bluetoothctl(&["--timeout", &timeout, "scan", "on"])?;
        let found = bluetoothctl::parse_discovery(&output);
        debug!("Discovery found {} device(s)", found.len());
        Ok(found)
    }
}
