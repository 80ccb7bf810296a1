// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! UI components for SoundCtl.

pub mod confirm;
pub mod devices;
pub mod keys;
pub mod presets;
pub mod profiles;
pub mod scanner;
pub mod sinks;
pub mod theme;
pub mod view;

pub use confirm::ConfirmOverlay;
pub use devices::DevicesPane;
pub use presets::PresetsPane;
pub use profiles::ProfilesPane;
pub use scanner::ScannerOverlay;
pub use sinks::SinksPane;
pub use theme::Theme;

/// Top-level tabs, in cycling order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Devices,
    Sinks,
    Profiles,
    Presets,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Devices, Tab::Sinks, Tab::Profiles, Tab::Presets];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Devices => "Devices",
            Tab::Sinks => "Sinks",
            Tab::Profiles => "Profiles",
            Tab::Presets => "Presets",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or_default()
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Selection index into a list that is replaced wholesale on reload.
///
/// Always within `[0, len - 1]`, or 0 for an empty list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(usize);

impl Cursor {
    pub fn get(&self) -> usize {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Jump to the last row.
    pub fn last(&mut self, len: usize) {
        self.0 = len.saturating_sub(1);
    }

    /// Move up. Returns false when already at the top.
    pub fn up(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }

    /// Move down. Returns false when already at the bottom.
    pub fn down(&mut self, len: usize) -> bool {
        if self.0 + 1 >= len {
            return false;
        }
        self.0 += 1;
        true
    }

    pub fn clamp(&mut self, len: usize) {
        self.0 = self.0.min(len.saturating_sub(1));
    }
}
