// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parsers for `pactl` output.

use super::field;
use crate::error::{ServiceError, ServiceResult};
use crate::types::{AudioEndpoint, Card, CardProfile, Defaults, SinkInput};

const TOOL: &str = "pactl";

/// Parse `pactl list short sinks|sources|cards`.
///
/// Rows are tab separated: id, name, then optional driver, sample spec and state.
pub fn parse_short(output: &str) -> ServiceResult<Vec<AudioEndpoint>> {
    let mut rows = Vec::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 2 {
            return Err(ServiceError::parse(TOOL, format!("invalid short row: {:?}", line)));
        }
        let id = cols[0]
            .parse()
            .map_err(|_| ServiceError::parse(TOOL, format!("invalid id {:?}", cols[0])))?;
        let col = |i: usize| cols.get(i).map(|s| s.to_string()).unwrap_or_default();
        rows.push(AudioEndpoint {
            id,
            name: col(1),
            driver: col(2),
            sample_spec: col(3),
            state: col(4),
        });
    }
    Ok(rows)
}

/// Parse `pactl info` for the default sink and source.
pub fn parse_info(output: &str) -> Defaults {
    let mut defaults = Defaults::default();
    for line in output.lines().map(str::trim) {
        if let Some(v) = field(line, "Default Sink") {
            defaults.sink = v.to_string();
        } else if let Some(v) = field(line, "Default Source") {
            defaults.source = v.to_string();
        } else if let Some(v) = field(line, "Server Name") {
            defaults.server_name = v.to_string();
        }
    }
    defaults
}

/// Parse `pactl list sink-inputs`. Sink names are left empty for the caller
/// to resolve.
pub fn parse_sink_inputs(output: &str) -> Vec<SinkInput> {
    let mut inputs = Vec::new();
    let mut current: Option<SinkInput> = None;

    for line in output.lines().map(str::trim) {
        if let Some(index) = line.strip_prefix("Sink Input #") {
            inputs.extend(current.take());
            current = Some(SinkInput {
                index: index.trim().parse().unwrap_or_default(),
                ..SinkInput::default()
            });
            continue;
        }
        let Some(stream) = current.as_mut() else {
            continue;
        };
        if let Some(v) = field(line, "Sink") {
            stream.sink_index = v.parse().unwrap_or_default();
        } else if let Some(v) = line.strip_prefix("application.name = ") {
            stream.app_name = unquote(v).to_string();
        } else if let Some(v) = line.strip_prefix("media.name = ") {
            stream.media_name = unquote(v).to_string();
        }
    }
    inputs.extend(current);
    inputs
}

/// Parse `pactl list cards` including each card's profile list.
pub fn parse_cards(output: &str) -> Vec<Card> {
    let mut cards = Vec::new();
    let mut current: Option<Card> = None;
    let mut in_profiles = false;

    for line in output.lines().map(str::trim) {
        if let Some(index) = line.strip_prefix("Card #") {
            cards.extend(current.take());
            current = Some(Card {
                index: index.trim().parse().unwrap_or_default(),
                ..Card::default()
            });
            in_profiles = false;
            continue;
        }
        let Some(card) = current.as_mut() else {
            continue;
        };

        if let Some(v) = field(line, "Name") {
            card.name = v.to_string();
            in_profiles = false;
        } else if let Some(v) = field(line, "Driver") {
            card.driver = v.to_string();
            in_profiles = false;
        } else if let Some(v) = field(line, "Active Profile") {
            card.active_profile = v.to_string();
            in_profiles = false;
        } else if line == "Profiles:" {
            in_profiles = true;
        } else if in_profiles {
            match parse_profile_line(line) {
                Some(profile) => card.profiles.push(profile),
                None => in_profiles = false,
            }
        }
    }
    cards.extend(current);
    cards
}

/// `output:analog-stereo: Analog Stereo Output (sinks: 1, ..., available: yes)`
fn parse_profile_line(line: &str) -> Option<CardProfile> {
    if line.starts_with("Part of") {
        return None;
    }
    let (name, rest) = line.split_once(": ")?;
    if name.is_empty() {
        return None;
    }
    let (description, details) = match rest.find(" (") {
        Some(idx) if idx > 0 => (&rest[..idx], &rest[idx..]),
        _ => (rest, ""),
    };
    Some(CardProfile {
        name: name.to_string(),
        description: description.to_string(),
        available: !details.contains("available: no"),
    })
}

/// First percentage in `pactl get-sink-volume` output.
///
/// `Volume: front-left: 52429 /  80% / -5.81 dB,   front-right: ...`
pub fn parse_volume_percent(output: &str) -> ServiceResult<u32> {
    output
        .split_whitespace()
        .find_map(|token| token.strip_suffix('%').and_then(|n| n.parse().ok()))
        .ok_or_else(|| ServiceError::parse(TOOL, format!("no volume percentage in {:?}", output)))
}

/// `Mute: yes` / `Mute: no`.
pub fn parse_mute(output: &str) -> ServiceResult<bool> {
    output
        .lines()
        .map(str::trim)
        .find_map(|line| field(line, "Mute"))
        .map(super::yes)
        .ok_or_else(|| ServiceError::parse(TOOL, format!("no mute state in {:?}", output)))
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short() {
        let input = "47\talsa_output.pci-0000_00_1f.3.analog-stereo\tPipeWire\ts32le 2ch 48000Hz\tRUNNING";
        let rows = parse_short(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 47);
        assert_eq!(rows[0].name, "alsa_output.pci-0000_00_1f.3.analog-stereo");
        assert_eq!(rows[0].sample_spec, "s32le 2ch 48000Hz");
        assert_eq!(rows[0].state, "RUNNING");
    }

    #[test]
    fn test_parse_short_partial_and_empty() {
        assert!(parse_short("").unwrap().is_empty());
        let rows = parse_short("0\ttest-card\tmodule-alsa-card.c").unwrap();
        assert_eq!(rows[0].driver, "module-alsa-card.c");
        assert_eq!(rows[0].state, "");
    }

    #[test]
    fn test_parse_short_rejects_garbage() {
        assert!(parse_short("no-tabs-here").is_err());
        assert!(parse_short("x\tname").is_err());
    }

    #[test]
    fn test_parse_info() {
        let defaults =
            parse_info("Server Name: PipeWire\nDefault Sink: bt-sink\nDefault Source: mic");
        assert_eq!(defaults.sink, "bt-sink");
        assert_eq!(defaults.source, "mic");
        assert_eq!(defaults.server_name, "PipeWire");
    }

    #[test]
    fn test_parse_sink_inputs() {
        let input = "Sink Input #57\n\tDriver: PipeWire\n\tSink: 1\n\tProperties:\n\t\tapplication.name = \"Firefox\"\n\t\tmedia.name = \"YouTube\"\n\nSink Input #58\n\tSink: 2\n\tProperties:\n\t\tapplication.name = \"Spotify\"\n";
        let inputs = parse_sink_inputs(input);
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].index, 57);
        assert_eq!(inputs[0].sink_index, 1);
        assert_eq!(inputs[0].app_name, "Firefox");
        assert_eq!(inputs[0].media_name, "YouTube");
        assert_eq!(inputs[1].app_name, "Spotify");
        assert_eq!(inputs[1].sink_index, 2);
    }

    #[test]
    fn test_parse_cards() {
        let input = "Card #0\n\tName: bluez_card.sony\n\tDriver: bluez5\n\tProfiles:\n\t\ta2dp-sink: A2DP (sinks: 1, sources: 0, priority: 40, available: yes)\n\t\theadset-head-unit: HSP/HFP (sinks: 1, sources: 1, priority: 30, available: no)\n\t\toff: Off (sinks: 0, sources: 0, priority: 0, available: yes)\n\tActive Profile: a2dp-sink\n\tPorts:\n";
        let cards = parse_cards(input);
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.name, "bluez_card.sony");
        assert_eq!(card.driver, "bluez5");
        assert_eq!(card.active_profile, "a2dp-sink");
        assert_eq!(card.profiles.len(), 3);
        assert_eq!(card.profiles[0].description, "A2DP");
        assert!(!card.profiles[1].available);
    }

    #[test]
    fn test_parse_cards_profile_names_with_colons() {
        let input = "Card #3\n\tName: alsa_card.pci\n\tProfiles:\n\t\toutput:analog-stereo+input:analog-stereo: Analog Stereo Duplex (sinks: 1, sources: 1, priority: 6565, available: yes)\n\tActive Profile: output:analog-stereo+input:analog-stereo\n";
        let cards = parse_cards(input);
        assert_eq!(cards[0].index, 3);
        assert_eq!(cards[0].profiles[0].name, "output:analog-stereo+input:analog-stereo");
        assert_eq!(cards[0].profiles[0].description, "Analog Stereo Duplex");
        assert!(cards[0].active().is_some());
    }

    #[test]
    fn test_parse_volume_and_mute() {
        let volume = "Volume: front-left: 52429 /  80% / -5.81 dB,   front-right: 52429 /  80% / -5.81 dB\n        balance 0.00";
        assert_eq!(parse_volume_percent(volume).unwrap(), 80);
        assert!(parse_volume_percent("Volume: n/a").is_err());
        assert!(parse_mute("Mute: yes").unwrap());
        assert!(!parse_mute("Mute: no").unwrap());
        assert!(parse_mute("").is_err());
    }
}
