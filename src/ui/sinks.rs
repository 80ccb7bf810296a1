// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Output sinks, input sources and per-application routing.

use super::keys::Action;
use super::Cursor;
use crate::command::Command;
use crate::message::{Outcome, SinkAction, SinksData};
use soundctl_services::{AudioEndpoint, EndpointKind, SinkInput};

/// Sub-lists of the pane, top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Outputs,
    Inputs,
    Routes,
}

impl Section {
    fn above(&self) -> Option<Section> {
        match self {
            Section::Outputs => None,
            Section::Inputs => Some(Section::Outputs),
            Section::Routes => Some(Section::Inputs),
        }
    }

    fn below(&self) -> Option<Section> {
        match self {
            Section::Outputs => Some(Section::Inputs),
            Section::Inputs => Some(Section::Routes),
            Section::Routes => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SinksPane {
    data: SinksData,
    section: Section,
    cursor: Cursor,
}

impl SinksPane {
    pub fn data(&self) -> &SinksData {
        &self.data
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    fn len_of(&self, section: Section) -> usize {
        match section {
            Section::Outputs => self.data.sinks.len(),
            Section::Inputs => self.data.sources.len(),
            Section::Routes => self.data.inputs.len(),
        }
    }

    /// The selected endpoint and its kind, in the outputs or inputs section.
    fn selected_endpoint(&self) -> Option<(EndpointKind, &AudioEndpoint)> {
        match self.section {
            Section::Outputs => {
                self.data.sinks.get(self.cursor.get()).map(|s| (EndpointKind::Sink, s))
            }
            Section::Inputs => {
                self.data.sources.get(self.cursor.get()).map(|s| (EndpointKind::Source, s))
            }
            Section::Routes => None,
        }
    }

    fn selected_stream(&self) -> Option<&SinkInput> {
        match self.section {
            Section::Routes => self.data.inputs.get(self.cursor.get()),
            _ => None,
        }
    }

    /// The output after the stream's current one, wrapping around.
    fn next_sink_for(&self, stream: &SinkInput) -> Option<&AudioEndpoint> {
        let sinks = &self.data.sinks;
        let next = match sinks.iter().position(|s| s.name == stream.sink_name) {
            Some(i) => sinks.get((i + 1) % sinks.len()),
            None => sinks.first(),
        }?;
        (next.name != stream.sink_name).then_some(next)
    }

    pub fn loaded(&mut self, result: Outcome<SinksData>) -> Vec<Command> {
        match result {
            Ok(data) => {
                self.data = data;
                self.cursor.clamp(self.len_of(self.section));
                Vec::new()
            }
            Err(e) => vec![Command::Error(format!("load sinks: {}", e))],
        }
    }

    pub fn action_done(&mut self, action: &SinkAction, result: Outcome<()>) -> Vec<Command> {
        match result {
            Ok(()) => vec![Command::LoadSinks, Command::Status(action.done())],
            Err(e) => vec![Command::Error(format!("{}: {}", action.describe(), e))],
        }
    }

    pub fn handle(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Up => {
                if !self.cursor.up() {
                    if let Some(above) = self.section.above() {
                        self.section = above;
                        self.cursor.last(self.len_of(above));
                    }
                }
            }
            Action::Down => {
                if !self.cursor.down(self.len_of(self.section)) {
                    if let Some(below) = self.section.below() {
                        self.section = below;
                        self.cursor.reset();
                    }
                }
            }
            Action::SetDefault => {
                if let Some((kind, endpoint)) = self.selected_endpoint() {
                    return vec![Command::Sink(SinkAction::SetDefault {
                        kind,
                        name: endpoint.name.clone(),
                    })];
                }
            }
            Action::Mute => {
                if let Some((kind, endpoint)) = self.selected_endpoint() {
                    return vec![Command::Sink(SinkAction::ToggleMute {
                        kind,
                        name: endpoint.name.clone(),
                    })];
                }
            }
            Action::Select => {
                if let Some(stream) = self.selected_stream() {
                    if let Some(sink) = self.next_sink_for(stream) {
                        return vec![Command::Sink(SinkAction::MoveStream {
                            index: stream.index,
                            sink: sink.name.clone(),
                        })];
                    }
                }
            }
            Action::Refresh => return vec![Command::LoadSinks],
            _ => {}
        }
        Vec::new()
    }
}
