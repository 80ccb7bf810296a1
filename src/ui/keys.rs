// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Key input and bindings.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    BackTab,
    /// Ctrl+C.
    Interrupt,
    Char(char),
}

impl Key {
    /// Translate a terminal key event. Releases and unbound keys yield `None`.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Char(c) => Key::Char(c),
            _ => return None,
        };
        Some(key)
    }
}

/// What a key means. Panes and overlays decide which actions they honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    /// Scan (Devices), snapshot (Presets), rescan (scanner).
    Scan,
    Disconnect,
    /// Forget a device or delete a preset.
    Forget,
    SetDefault,
    Mute,
    Refresh,
}

impl Action {
    pub fn from_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Interrupt | Key::Char('q') => Action::Quit,
            Key::Tab => Action::NextTab,
            Key::BackTab => Action::PrevTab,
            Key::Up | Key::Char('k') => Action::Up,
            Key::Down | Key::Char('j') => Action::Down,
            Key::Left | Key::Char('h') => Action::Left,
            Key::Right | Key::Char('l') => Action::Right,
            Key::Enter => Action::Select,
            Key::Esc => Action::Back,
            Key::Char('s') => Action::Scan,
            Key::Char('D') => Action::Disconnect,
            Key::Char('X') => Action::Forget,
            Key::Char('d') => Action::SetDefault,
            Key::Char('m') => Action::Mute,
            Key::Char('r') => Action::Refresh,
            Key::Char(_) => return None,
        };
        Some(action)
    }
}
