// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Card profiles, one row per profile of every card.

use super::keys::Action;
use super::Cursor;
use crate::command::Command;
use crate::message::Outcome;
use soundctl_services::{Card, CardProfile};

/// A flattened row.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRow<'a> {
    pub card: &'a Card,
    pub profile: &'a CardProfile,
}

impl ProfileRow<'_> {
    pub fn is_active(&self) -> bool {
        self.card.active_profile == self.profile.name
    }
}

#[derive(Debug, Default)]
pub struct ProfilesPane {
    cards: Vec<Card>,
    cursor: Cursor,
}

impl ProfilesPane {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn rows(&self) -> impl Iterator<Item = ProfileRow<'_>> {
        self.cards
            .iter()
            .flat_map(|card| card.profiles.iter().map(move |profile| ProfileRow { card, profile }))
    }

    fn row_count(&self) -> usize {
        self.cards.iter().map(|c| c.profiles.len()).sum()
    }

    pub fn selected(&self) -> Option<ProfileRow<'_>> {
        self.rows().nth(self.cursor.get())
    }

    pub fn loaded(&mut self, result: Outcome<Vec<Card>>) -> Vec<Command> {
        match result {
            Ok(cards) => {
                self.cards = cards;
                self.cursor.clamp(self.row_count());
                Vec::new()
            }
            Err(e) => vec![Command::Error(format!("load profiles: {}", e))],
        }
    }

    pub fn profile_set(&mut self, card: &str, profile: &str, result: Outcome<()>) -> Vec<Command> {
        match result {
            Ok(()) => vec![
                Command::LoadProfiles,
                Command::Status(format!("Profile {} → {}", card, profile)),
            ],
            Err(e) => vec![Command::Error(format!("set profile {} {}: {}", card, profile, e))],
        }
    }

    pub fn handle(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Up => {
                self.cursor.up();
            }
            Action::Down => {
                self.cursor.down(self.row_count());
            }
            Action::Select => {
                if let Some(row) = self.selected().filter(|row| !row.is_active()) {
                    return vec![Command::SetProfile {
                        card: row.card.name.clone(),
                        profile: row.profile.name.clone(),
                    }];
                }
            }
            Action::Refresh => return vec![Command::LoadProfiles],
            _ => {}
        }
        Vec::new()
    }
}
