// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Preset apply confirmation overlay.

use super::keys::Action;
use crate::reconcile;
use soundctl_services::{DiffLine, Preset};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmFocus {
    #[default]
    Apply,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmReply {
    None,
    Close,
    Apply(Preset),
}

/// Shows what applying a preset would change and asks before doing it.
#[derive(Debug)]
pub struct ConfirmOverlay {
    preset: Preset,
    diff: Vec<DiffLine>,
    focus: ConfirmFocus,
    applying: bool,
}

impl ConfirmOverlay {
    /// Diff `preset` against `current` live state.
    pub fn new(preset: Preset, current: &Preset) -> Self {
        let diff = reconcile::diff(current, &preset);
        Self {
            preset,
            diff,
            focus: ConfirmFocus::default(),
            applying: false,
        }
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn diff(&self) -> &[DiffLine] {
        &self.diff
    }

    pub fn focus(&self) -> ConfirmFocus {
        self.focus
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    /// The apply finished with errors; the overlay stays for another try.
    pub fn apply_failed(&mut self) {
        self.applying = false;
    }

    pub fn handle(&mut self, action: Action) -> ConfirmReply {
        match action {
            Action::Back => return ConfirmReply::Close,
            _ if self.applying => {}
            Action::Left => self.focus = ConfirmFocus::Apply,
            Action::Right => self.focus = ConfirmFocus::Cancel,
            Action::Select => match self.focus {
                ConfirmFocus::Apply => {
                    self.applying = true;
                    return ConfirmReply::Apply(self.preset.clone());
                }
                ConfirmFocus::Cancel => return ConfirmReply::Close,
            },
            _ => {}
        }
        ConfirmReply::None
    }
}
