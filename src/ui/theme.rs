// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors and styles for SoundCtl.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Color Constants (Dark Theme)
// ============================================================================

/// Main text color.
pub const TEXT: Color = Color::Rgb(230, 230, 235);

/// Dimmed text color.
pub const TEXT_DIM: Color = Color::Rgb(153, 153, 166);

/// Primary accent color (blue).
pub const PRIMARY: Color = Color::Rgb(102, 166, 242);

/// Secondary accent color (orange).
pub const ACCENT: Color = Color::Rgb(242, 153, 51);

/// Muted/error indicator (red).
pub const ERROR: Color = Color::Rgb(217, 77, 77);

/// Success/active indicator (green).
pub const SUCCESS: Color = Color::Rgb(102, 191, 102);

/// Warning indicator (yellow).
pub const WARNING: Color = Color::Rgb(230, 191, 51);

/// Border color for panels.
pub const BORDER: Color = Color::Rgb(77, 77, 82);

/// Background of the selected row.
pub const SELECTION: Color = Color::Rgb(46, 46, 51);

// ============================================================================
// Theme
// ============================================================================

/// Styles handed to the view. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Style,
    pub dim: Style,
    pub title: Style,
    pub border: Style,
    pub selected: Style,
    pub active: Style,
    pub info: Style,
    pub error: Style,
    pub warning: Style,
    pub button: Style,
    pub button_focused: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Style::new().fg(TEXT),
            dim: Style::new().fg(TEXT_DIM),
            title: Style::new().fg(PRIMARY).add_modifier(Modifier::BOLD),
            border: Style::new().fg(BORDER),
            selected: Style::new().bg(SELECTION).add_modifier(Modifier::BOLD),
            active: Style::new().fg(SUCCESS),
            info: Style::new().fg(SUCCESS),
            error: Style::new().fg(ERROR).add_modifier(Modifier::BOLD),
            warning: Style::new().fg(WARNING),
            button: Style::new().fg(TEXT_DIM),
            button_focused: Style::new().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD),
        }
    }
}
