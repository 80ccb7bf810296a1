// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Comparing presets against live state and applying them.

use soundctl_services::{
    AudioControl, DiffLine, EndpointKind, Preset, ServiceError, ServiceResult, VolumeSpec,
    FOLLOW_DEFAULT,
};
use thiserror::Error;
use tracing::{debug, warn};

/// One failed step of [`apply`].
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("set profile {card} to {profile}: {source}")]
    CardProfile {
        card: String,
        profile: String,
        #[source]
        source: ServiceError,
    },
    #[error("set default sink {sink}: {source}")]
    DefaultSink {
        sink: String,
        #[source]
        source: ServiceError,
    },
    #[error("set volume {channel} to {level}%: {source}")]
    Volume {
        channel: String,
        level: u32,
        #[source]
        source: ServiceError,
    },
    #[error("list sink inputs: {source}")]
    ListStreams {
        #[source]
        source: ServiceError,
    },
    #[error("route {app} (stream {index}) to {sink}: {source}")]
    Route {
        app: String,
        index: u32,
        sink: String,
        #[source]
        source: ServiceError,
    },
}

/// What [`apply`] changed and what failed. Both may be non-empty.
#[derive(Debug, Default)]
pub struct ApplyResult {
    pub applied: Vec<String>,
    pub errors: Vec<ApplyError>,
}

impl ApplyResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(
        &mut self,
        outcome: ServiceResult<()>,
        applied: String,
        error: impl FnOnce(ServiceError) -> ApplyError,
    ) {
        match outcome {
            Ok(()) => self.applied.push(applied),
            Err(source) => {
                let error = error(source);
                warn!("Preset step failed: {}", error);
                self.errors.push(error);
            }
        }
    }
}

fn mute_label(muted: bool) -> &'static str {
    if muted {
        "muted"
    } else {
        "unmuted"
    }
}

/// Changes applying `target` would make over `current`.
///
/// Lines are grouped by facet (profiles, default sink, volumes, routes).
/// Anything `target` leaves unset never shows up. Entries missing from
/// `current` compare as empty, or as 0% unmuted for volumes.
pub fn diff(current: &Preset, target: &Preset) -> Vec<DiffLine> {
    let mut lines = Vec::new();

    for (card, profile) in &target.card_profiles {
        let from = current.card_profiles.get(card).map(String::as_str).unwrap_or_default();
        if from != profile {
            lines.push(DiffLine::new(format!("{} profile", card), from, profile.as_str()));
        }
    }

    if !target.default_sink.is_empty() && current.default_sink != target.default_sink {
        lines.push(DiffLine::new(
            "Default sink",
            current.default_sink.as_str(),
            target.default_sink.as_str(),
        ));
    }

    for (channel, wanted) in &target.volumes {
        let have = current.volumes.get(channel).copied().unwrap_or_default();
        if have.level != wanted.level {
            lines.push(DiffLine::new(
                format!("{} volume", channel),
                format!("{}%", have.level),
                format!("{}%", wanted.level),
            ));
        }
        if have.muted != wanted.muted {
            lines.push(DiffLine::new(
                format!("{} mute", channel),
                mute_label(have.muted),
                mute_label(wanted.muted),
            ));
        }
    }

    for (app, sink) in &target.app_routes {
        let from = current.app_routes.get(app).map(String::as_str).unwrap_or_default();
        if from != sink {
            lines.push(DiffLine::new(format!("{} route", app), from, sink.as_str()));
        }
    }

    lines
}

/// Apply `target` step by step: card profiles, default sink, volumes, then
/// app routes. A failed step is recorded and the rest still run.
///
/// Only volume levels are written; the `muted` flag is not applied.
pub fn apply(target: &Preset, audio: &dyn AudioControl) -> ApplyResult {
    let mut result = ApplyResult::default();
    debug!("Applying preset {:?}", target.name);

    for (card, profile) in &target.card_profiles {
        result.record(
            audio.set_card_profile(card, profile),
            format!("Profile {} → {}", card, profile),
            |source| ApplyError::CardProfile {
                card: card.clone(),
                profile: profile.clone(),
                source,
            },
        );
    }

    if !target.default_sink.is_empty() {
        result.record(
            audio.set_default_sink(&target.default_sink),
            format!("Default sink → {}", target.default_sink),
            |source| ApplyError::DefaultSink {
                sink: target.default_sink.clone(),
                source,
            },
        );
    }

    for (channel, spec) in &target.volumes {
        result.record(
            audio.set_volume(EndpointKind::Sink, channel, spec.level),
            format!("Volume {} → {}%", channel, spec.level),
            |source| ApplyError::Volume {
                channel: channel.clone(),
                level: spec.level,
                source,
            },
        );
    }

    if target.app_routes.is_empty() {
        return result;
    }
    let streams = match audio.list_sink_inputs() {
        Ok(streams) => streams,
        Err(source) => {
            let error = ApplyError::ListStreams { source };
            warn!("Preset step failed: {}", error);
            result.errors.push(error);
            return result;
        }
    };
    for stream in streams {
        let Some(route) = target.app_routes.get(&stream.app_name) else {
            continue;
        };
        let sink = target.resolve_route(route);
        if sink.is_empty() || sink == stream.sink_name {
            continue;
        }
        result.record(
            audio.move_sink_input(stream.index, sink),
            format!("Route {} → {}", stream.app_name, sink),
            |source| ApplyError::Route {
                app: stream.app_name.clone(),
                index: stream.index,
                sink: sink.to_string(),
                source,
            },
        );
    }

    result
}

/// Capture the live audio state as an unnamed preset.
pub fn snapshot(audio: &dyn AudioControl) -> ServiceResult<Preset> {
    let mut preset = Preset::default();

    let defaults = audio.get_defaults()?;
    preset.default_sink = defaults.sink;

    for card in audio.list_cards_detailed()? {
        if !card.active_profile.is_empty() {
            preset.card_profiles.insert(card.name, card.active_profile);
        }
    }

    for stream in audio.list_sink_inputs()? {
        if stream.app_name.is_empty() {
            continue;
        }
        let route = if stream.sink_name == preset.default_sink {
            FOLLOW_DEFAULT.to_string()
        } else {
            stream.sink_name
        };
        preset.app_routes.insert(stream.app_name, route);
    }

    for sink in audio.list_sinks()? {
        match audio.get_volume(EndpointKind::Sink, &sink.name) {
            Ok(level) => {
                preset.volumes.insert(
                    sink.name,
                    VolumeSpec {
                        level: level.percent,
                        muted: level.muted,
                    },
                );
            }
            Err(e) => debug!("Skipping volume of {}: {}", sink.name, e),
        }
    }

    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAudio, Call};
    use soundctl_services::{AudioEndpoint, Card, Defaults, SinkInput, VolumeLevel};

    fn music() -> Preset {
        let mut preset = Preset::empty("Music");
        preset.card_profiles.insert("cardA".into(), "a2dp".into());
        preset.default_sink = "bt".into();
        preset.volumes.insert("Master".into(), VolumeSpec { level: 80, muted: false });
        preset
    }

    fn stream(index: u32, app: &str, sink: &str) -> SinkInput {
        SinkInput {
            index,
            app_name: app.into(),
            sink_name: sink.into(),
            ..SinkInput::default()
        }
    }

    #[test]
    fn test_diff_is_reflexive() {
        let mut preset = music();
        preset.volumes.insert("bt".into(), VolumeSpec { level: 40, muted: true });
        preset.app_routes.insert("Spotify".into(), FOLLOW_DEFAULT.into());
        assert!(diff(&preset, &preset).is_empty());
        assert!(diff(&Preset::default(), &Preset::default()).is_empty());
    }

    #[test]
    fn test_diff_default_sink() {
        let mut a = Preset::default();
        a.default_sink = "a".into();
        let mut b = Preset::default();
        b.default_sink = "b".into();

        assert!(diff(&a, &a.clone()).is_empty());
        assert_eq!(diff(&a, &b), vec![DiffLine::new("Default sink", "a", "b")]);
        // An unset target never diffs.
        assert!(diff(&a, &Preset::default()).is_empty());
    }

    #[test]
    fn test_diff_against_empty_lists_every_facet() {
        let mut target = music();
        target.volumes.insert("Master".into(), VolumeSpec { level: 80, muted: true });
        target.app_routes.insert("Spotify".into(), "bt".into());

        let lines = diff(&Preset::default(), &target);
        assert_eq!(
            lines,
            vec![
                DiffLine::new("cardA profile", "", "a2dp"),
                DiffLine::new("Default sink", "", "bt"),
                DiffLine::new("Master volume", "0%", "80%"),
                DiffLine::new("Master mute", "unmuted", "muted"),
                DiffLine::new("Spotify route", "", "bt"),
            ]
        );
    }

    #[test]
    fn test_diff_volume_and_mute_independent() {
        let mut current = Preset::default();
        current.volumes.insert("Master".into(), VolumeSpec { level: 80, muted: false });
        let mut target = Preset::default();
        target.volumes.insert("Master".into(), VolumeSpec { level: 80, muted: true });

        assert_eq!(diff(&current, &target), vec![DiffLine::new("Master mute", "unmuted", "muted")]);
    }

    #[test]
    fn test_apply_music_with_volume_failure() {
        let audio = FakeAudio::default();
        audio.fail_on("set_volume");

        let result = apply(&music(), &audio);
        assert_eq!(result.applied, vec!["Profile cardA → a2dp", "Default sink → bt"]);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            &result.errors[0],
            ApplyError::Volume { channel, .. } if channel == "Master"
        ));
        assert!(result.errors[0].to_string().contains("Master"));
        assert!(!result.is_success());
    }

    #[test]
    fn test_apply_continues_after_profile_failure() {
        let audio = FakeAudio::default();
        audio.fail_on("set_card_profile");
        audio.set_streams(vec![stream(7, "Spotify", "speakers")]);

        let mut target = music();
        target.app_routes.insert("Spotify".into(), FOLLOW_DEFAULT.into());

        let result = apply(&target, &audio);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            &result.errors[0],
            ApplyError::CardProfile { card, .. } if card == "cardA"
        ));
        assert_eq!(result.applied.len(), 3);
        assert_eq!(
            audio.calls(),
            vec![
                Call::SetCardProfile("cardA".into(), "a2dp".into()),
                Call::SetDefaultSink("bt".into()),
                Call::SetVolume(EndpointKind::Sink, "Master".into(), 80),
                Call::ListSinkInputs,
                Call::MoveSinkInput(7, "bt".into()),
            ]
        );
    }

    #[test]
    fn test_apply_sets_default_sink_once() {
        let audio = FakeAudio::default();
        let target = music();
        let lines = diff(&Preset::default(), &target);
        assert!(lines.contains(&DiffLine::new("Default sink", "", "bt")));

        assert!(apply(&target, &audio).is_success());
        let default_calls = audio
            .calls()
            .into_iter()
            .filter(|c| *c == Call::SetDefaultSink("bt".into()))
            .count();
        assert_eq!(default_calls, 1);
    }

    #[test]
    fn test_follow_default_route_moves_once() {
        let audio = FakeAudio::default();
        audio.set_streams(vec![stream(3, "Firefox", "speakers"), stream(4, "mpv", "speakers")]);

        let mut target = Preset::empty("Follow");
        target.default_sink = "bt-sink".into();
        target.app_routes.insert("Firefox".into(), FOLLOW_DEFAULT.into());

        let result = apply(&target, &audio);
        assert!(result.is_success());
        let moves: Vec<_> = audio
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::MoveSinkInput(..)))
            .collect();
        assert_eq!(moves, vec![Call::MoveSinkInput(3, "bt-sink".into())]);
    }

    #[test]
    fn test_route_already_on_target_is_skipped() {
        let audio = FakeAudio::default();
        audio.set_streams(vec![stream(3, "Firefox", "bt-sink")]);

        let mut target = Preset::empty("Follow");
        target.default_sink = "bt-sink".into();
        target.app_routes.insert("Firefox".into(), FOLLOW_DEFAULT.into());

        let result = apply(&target, &audio);
        assert!(result.is_success());
        assert!(!audio.calls().iter().any(|c| matches!(c, Call::MoveSinkInput(..))));
    }

    #[test]
    fn test_follow_default_without_default_sink_is_skipped() {
        let audio = FakeAudio::default();
        audio.set_streams(vec![stream(3, "Firefox", "speakers")]);

        let mut target = Preset::empty("Follow");
        target.app_routes.insert("Firefox".into(), FOLLOW_DEFAULT.into());

        assert!(apply(&target, &audio).applied.is_empty());
        assert!(!audio.calls().iter().any(|c| matches!(c, Call::MoveSinkInput(..))));
    }

    #[test]
    fn test_list_streams_failure_is_recorded() {
        let audio = FakeAudio::default();
        audio.fail_on("list_sink_inputs");

        let mut target = Preset::empty("Routes");
        target.app_routes.insert("Firefox".into(), "bt".into());

        let result = apply(&target, &audio);
        assert!(matches!(result.errors.as_slice(), [ApplyError::ListStreams { .. }]));
    }

    #[test]
    fn test_apply_never_touches_mute() {
        let audio = FakeAudio::default();
        let mut target = Preset::empty("Muted");
        target.volumes.insert("Master".into(), VolumeSpec { level: 30, muted: true });

        // The mute facet shows up in the diff...
        assert!(diff(&Preset::default(), &target).iter().any(|l| l.field == "Master mute"));
        // ...but only the level is written.
        assert!(apply(&target, &audio).is_success());
        assert_eq!(audio.calls(), vec![Call::SetVolume(EndpointKind::Sink, "Master".into(), 30)]);
    }

    #[test]
    fn test_snapshot_captures_live_state() {
        let audio = FakeAudio::default();
        audio.set_defaults(Defaults {
            sink: "bt".into(),
            ..Defaults::default()
        });
        audio.set_cards(vec![
            Card {
                name: "cardA".into(),
                active_profile: "a2dp".into(),
                ..Card::default()
            },
            Card {
                name: "cardB".into(),
                ..Card::default()
            },
        ]);
        audio.set_streams(vec![
            stream(1, "Spotify", "bt"),
            stream(2, "Firefox", "speakers"),
            stream(3, "", "bt"),
        ]);
        audio.set_sinks(vec![
            AudioEndpoint {
                name: "bt".into(),
                ..AudioEndpoint::default()
            },
            AudioEndpoint {
                name: "speakers".into(),
                ..AudioEndpoint::default()
            },
        ]);
        audio.set_volume_level("bt", VolumeLevel { percent: 65, muted: true });

        let preset = snapshot(&audio).unwrap();
        assert_eq!(preset.default_sink, "bt");
        assert_eq!(preset.card_profiles.len(), 1);
        assert_eq!(preset.card_profiles["cardA"], "a2dp");
        assert_eq!(preset.app_routes["Spotify"], FOLLOW_DEFAULT);
        assert_eq!(preset.app_routes["Firefox"], "speakers");
        assert_eq!(preset.app_routes.len(), 2);
        // "speakers" has no readable volume and is skipped.
        assert_eq!(preset.volumes.len(), 1);
        assert_eq!(preset.volumes["bt"], VolumeSpec { level: 65, muted: true });

        // A snapshot diffed against itself is empty.
        assert!(diff(&preset, &preset).is_empty());
    }

    #[test]
    fn test_snapshot_fails_when_defaults_fail() {
        let audio = FakeAudio::default();
        audio.fail_on("get_defaults");
        assert!(snapshot(&audio).is_err());
    }
}
