// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Audio control through `pactl`.

use crate::error::{ServiceError, ServiceResult};
use crate::exec::CommandRunner;
use crate::parse::pactl;
use crate::types::{AudioEndpoint, Card, Defaults, EndpointKind, SinkInput, VolumeLevel};
use std::sync::Arc;
use tracing::debug;

/// Highest volume percentage accepted by [`AudioControl::set_volume`].
pub const MAX_VOLUME_PERCENT: u32 = 150;

/// Operations against the host audio server.
///
/// Calls block on the external tool; callers run them off the event loop.
pub trait AudioControl: Send + Sync {
    fn list_sinks(&self) -> ServiceResult<Vec<AudioEndpoint>>;
    fn list_sources(&self) -> ServiceResult<Vec<AudioEndpoint>>;
    /// Short card listing (no profiles).
    fn list_cards(&self) -> ServiceResult<Vec<AudioEndpoint>>;
    fn list_cards_detailed(&self) -> ServiceResult<Vec<Card>>;
    /// Active streams with `sink_name` resolved.
    fn list_sink_inputs(&self) -> ServiceResult<Vec<SinkInput>>;
    fn get_defaults(&self) -> ServiceResult<Defaults>;
    fn set_default_sink(&self, name: &str) -> ServiceResult<()>;
    fn set_default_source(&self, name: &str) -> ServiceResult<()>;
    fn set_card_profile(&self, card: &str, profile: &str) -> ServiceResult<()>;
    fn set_volume(&self, kind: EndpointKind, name: &str, percent: u32) -> ServiceResult<()>;
    fn toggle_mute(&self, kind: EndpointKind, name: &str) -> ServiceResult<()>;
    fn get_volume(&self, kind: EndpointKind, name: &str) -> ServiceResult<VolumeLevel>;
    fn move_sink_input(&self, index: u32, sink: &str) -> ServiceResult<()>;
}

/// [`AudioControl`] backed by the `pactl` command-line tool.
pub struct PactlAudio {
    runner: Arc<dyn CommandRunner>,
}

impl PactlAudio {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn pactl(&self, args: &[&str]) -> ServiceResult<String> {
        self.runner.run("pactl", args)
    }
}

fn require(value: &str, what: &'static str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::MissingArgument(what))
    } else {
        Ok(())
    }
}

impl AudioControl for PactlAudio {
    fn list_sinks(&self) -> ServiceResult<Vec<AudioEndpoint>> {
        pactl::parse_short(&self.pactl(&["list", "short", "sinks"])?)
    }

    fn list_sources(&self) -> ServiceResult<Vec<AudioEndpoint>> {
        pactl::parse_short(&self.pactl(&["list", "short", "sources"])?)
    }

    fn list_cards(&self) -> ServiceResult<Vec<AudioEndpoint>> {
        pactl::parse_short(&self.pactl(&["list", "short", "cards"])?)
    }

    fn list_cards_detailed(&self) -> ServiceResult<Vec<Card>> {
        Ok(pactl::parse_cards(&self.pactl(&["list", "cards"])?))
    }

    fn list_sink_inputs(&self) -> ServiceResult<Vec<SinkInput>> {
        let mut inputs = pactl::parse_sink_inputs(&self.pactl(&["list", "sink-inputs"])?);
        if inputs.is_empty() {
            return Ok(inputs);
        }

        let sinks = self.list_sinks()?;
        for input in &mut inputs {
            if let Some(sink) = sinks.iter().find(|s| s.id == input.sink_index) {
                input.sink_name = sink.name.clone();
            }
        }
        Ok(inputs)
    }

    fn get_defaults(&self) -> ServiceResult<Defaults> {
        Ok(pactl::parse_info(&self.pactl(&["info"])?))
    }

    fn set_default_sink(&self, name: &str) -> ServiceResult<()> {
        require(name, "sink name")?;
        debug!("Setting default sink to {}", name);
        self.pactl(&["set-default-sink", name]).map(drop)
    }

    fn set_default_source(&self, name: &str) -> ServiceResult<()> {
        require(name, "source name")?;
        debug!("Setting default source to {}", name);
        self.pactl(&["set-default-source", name]).map(drop)
    }

    fn set_card_profile(&self, card: &str, profile: &str) -> ServiceResult<()> {
        require(card, "card name")?;
        require(profile, "profile name")?;
        debug!("Setting card {} profile to {}", card, profile);
        self.pactl(&["set-card-profile", card, profile]).map(drop)
    }

    fn set_volume(&self, kind: EndpointKind, name: &str, percent: u32) -> ServiceResult<()> {
        require(name, "endpoint name")?;
        if percent > MAX_VOLUME_PERCENT {
            return Err(ServiceError::InvalidArgument {
                what: "volume percent",
                value: percent.to_string(),
            });
        }

        debug!("Setting {} {} volume to {}%", kind, name, percent);
        let command = format!("set-{}-volume", kind);
        let level = format!("{}%", percent);
        self.pactl(&[&command, name, &level]).map(drop)
    }

    fn toggle_mute(&self, kind: EndpointKind, name: &str) -> ServiceResult<()> {
        require(name, "endpoint name")?;
        debug!("Toggling mute on {} {}", kind, name);
        let command = format!("set-{}-mute", kind);
        self.pactl(&[&command, name, "toggle"]).map(drop)
    }

    fn get_volume(&self, kind: EndpointKind, name: &str) -> ServiceResult<VolumeLevel> {
        require(name, "endpoint name")?;
        let percent =
            pactl::parse_volume_percent(&self.pactl(&[&format!("get-{}-volume", kind), name])?)?;
        let muted = pactl::parse_mute(&self.pactl(&[&format!("get-{}-mute", kind), name])?)?;
        Ok(VolumeLevel { percent, muted })
    }

    fn move_sink_input(&self, index: u32, sink: &str) -> ServiceResult<()> {
        require(sink, "sink name")?;
        debug!("Moving sink input {} to {}", index, sink);
        self.pactl(&["move-sink-input", &index.to_string(), sink]).map(drop)
    }
}
