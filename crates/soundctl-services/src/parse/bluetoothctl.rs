// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parsers for `bluetoothctl` output.

use super::{field, yes};
use crate::error::{ServiceError, ServiceResult};
use crate::types::{ControllerStatus, DeviceInfo, DiscoveredDevice};
use regex::Regex;
use std::sync::OnceLock;

const TOOL: &str = "bluetoothctl";

/// One `Device <address> <name>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub address: String,
    pub name: String,
}

/// Parse `bluetoothctl devices`.
pub fn parse_devices(output: &str) -> ServiceResult<Vec<DeviceEntry>> {
    let mut devices = Vec::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let rest = line.strip_prefix("Device ").ok_or_else(|| {
            ServiceError::parse(TOOL, format!("unexpected devices line: {:?}", line))
        })?;
        let (address, name) = rest.split_once(' ').ok_or_else(|| {
            ServiceError::parse(TOOL, format!("malformed devices line: {:?}", line))
        })?;
        devices.push(DeviceEntry {
            address: address.to_string(),
            name: name.trim().to_string(),
        });
    }
    Ok(devices)
}

/// Parse `bluetoothctl info <address>`.
pub fn parse_info(output: &str) -> ServiceResult<DeviceInfo> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next().unwrap_or_default();
    let rest = header.strip_prefix("Device ").ok_or_else(|| {
        let message = format!("expected info header starting with Device, got {:?}", header);
        ServiceError::parse(TOOL, message)
    })?;

    let mut parts = rest.splitn(2, ' ');
    let mut info = DeviceInfo {
        address: parts.next().unwrap_or_default().to_string(),
        ..DeviceInfo::default()
    };
    if info.address.is_empty() {
        return Err(ServiceError::parse(TOOL, "missing device address in info output"));
    }
    if let Some(name) = parts.next() {
        info.name = name.trim().to_string();
    }

    for line in lines {
        if let Some(v) = field(line, "Name") {
            info.name = v.to_string();
        } else if let Some(v) = field(line, "Alias") {
            info.alias = v.to_string();
        } else if let Some(v) = field(line, "Paired") {
            info.paired = yes(v);
        } else if let Some(v) = field(line, "Trusted") {
            info.trusted = yes(v);
        } else if let Some(v) = field(line, "Connected") {
            info.connected = yes(v);
        }
    }
    Ok(info)
}

/// Parse `bluetoothctl show`.
pub fn parse_show(output: &str) -> ServiceResult<ControllerStatus> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next().unwrap_or_default();
    let address = header
        .strip_prefix("Controller ")
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| {
            ServiceError::parse(TOOL, format!("expected controller header, got {:?}", header))
        })?;

    let mut status = ControllerStatus {
        address: address.to_string(),
        ..ControllerStatus::default()
    };
    for line in lines {
        if let Some(v) = field(line, "Alias") {
            status.alias = v.to_string();
        } else if let Some(v) = field(line, "Powered") {
            status.powered = yes(v);
        } else if let Some(v) = field(line, "Pairable") {
            status.pairable = yes(v);
        } else if let Some(v) = field(line, "Discovering") {
            status.discovering = yes(v);
        }
    }
    Ok(status)
}

fn ansi_escape() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").ok()).as_ref()
}

fn discovery_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\[(?P<kind>NEW|CHG)\] Device (?P<addr>[0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})(?: (?P<rest>.*))?$",
        )
        .ok()
    })
    .as_ref()
}

/// Parse the transcript of `bluetoothctl --timeout N scan on`.
///
/// Devices are de-duplicated by address in first-seen order; the last name
/// reported for an address wins.
pub fn parse_discovery(output: &str) -> Vec<DiscoveredDevice> {
    let mut found: Vec<DiscoveredDevice> = Vec::new();
    let (Some(ansi), Some(pattern)) = (ansi_escape(), discovery_line()) else {
        return found;
    };

    for raw in output.lines() {
        let line = ansi.replace_all(raw, "");
        let Some(caps) = pattern.captures(line.trim()) else {
            continue;
        };
        let address = caps["addr"].to_string();
        let rest = caps.name("rest").map(|m| m.as_str().trim()).unwrap_or_default();

        let name = match &caps["kind"] {
            "NEW" => Some(rest.to_string()),
            // [CHG] lines also carry RSSI, ManufacturerData, ...
            _ => field(rest, "Name")
                .or_else(|| field(rest, "Alias"))
                .map(str::to_string),
        };

        match found.iter_mut().find(|d| d.address == address) {
            Some(existing) => {
                if let Some(name) = name.filter(|n| !n.is_empty()) {
                    existing.name = name;
                }
            }
            None => {
                // A [CHG] for a device never announced is still a sighting.
                found.push(DiscoveredDevice {
                    name: name.unwrap_or_else(|| address.clone()),
                    address,
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_devices() {
        let input = "Device 08:FF:44:2B:4C:90 Manuel's AirPods Max\nDevice C0:95:6D:A9:79:3C Big Daddy's AirPods Pro";
        let devices = parse_devices(input).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].address, "08:FF:44:2B:4C:90");
        assert_eq!(devices[0].name, "Manuel's AirPods Max");
        assert!(parse_devices("").unwrap().is_empty());
        assert!(parse_devices("Controller AA:BB").is_err());
    }

    #[test]
    fn test_parse_info() {
        let input = "Device 08:FF:44:2B:4C:90 (public)\n\tName: Manuel's AirPods Max\n\tAlias: Manuel's AirPods Max\n\tPaired: yes\n\tTrusted: no\n\tConnected: yes";
        let info = parse_info(input).unwrap();
        assert_eq!(info.address, "08:FF:44:2B:4C:90");
        assert_eq!(info.name, "Manuel's AirPods Max");
        assert!(info.paired);
        assert!(!info.trusted);
        assert!(info.connected);
    }

    #[test]
    fn test_parse_info_requires_header() {
        assert!(parse_info("Name: foo").is_err());
        assert!(parse_info("").is_err());
    }

    #[test]
    fn test_parse_show() {
        let input = "Controller AA:BB:CC:DD:EE:FF (public)\n\tAlias: TestController\n\tPowered: yes\n\tPairable: yes\n\tDiscovering: no";
        let status = parse_show(input).unwrap();
        assert_eq!(status.address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(status.alias, "TestController");
        assert!(status.powered);
        assert!(status.pairable);
        assert!(!status.discovering);
    }

    #[test]
    fn test_parse_discovery_dedupes_last_name_wins() {
        let input = "Discovery started\n\
            [CHG] Controller AA:BB:CC:DD:EE:FF Discovering: yes\n\
            [NEW] Device 90:62:3F:92:B1:A7 90-62-3F-92-B1-A7\n\
            [NEW] Device 11:22:33:44:55:66 Speaker\n\
            [CHG] Device 90:62:3F:92:B1:A7 RSSI: -60\n\
            [CHG] Device 90:62:3F:92:B1:A7 Name: AirPods Max";
        let found = parse_discovery(input);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].address, "90:62:3F:92:B1:A7");
        assert_eq!(found[0].name, "AirPods Max");
        assert_eq!(found[1].name, "Speaker");
    }

    #[test]
    fn test_parse_discovery_strips_color_codes() {
        let input = "[\x1b[0;92mNEW\x1b[0m] Device 90:62:3F:92:B1:A7 AirPods Max #3 - Find My";
        let found = parse_discovery(input);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "AirPods Max #3 - Find My");
    }
}
