// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Terminal rendering. Reads the controller, never mutates it.

use super::confirm::{ConfirmFocus, ConfirmOverlay};
use super::scanner::{ScanState, ScannerOverlay};
use super::sinks::Section;
use super::{Tab, Theme};
use crate::app::{App, Overlay, Status};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;

/// Draw the whole screen.
pub fn draw(frame: &mut Frame, app: &App, theme: &Theme) {
    let [tabs, body, status, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(frame, tabs, app.tab(), theme);
    match app.tab() {
        Tab::Devices => draw_devices(frame, body, app, theme),
        Tab::Sinks => draw_sinks(frame, body, app, theme),
        Tab::Profiles => draw_profiles(frame, body, app, theme),
        Tab::Presets => draw_presets(frame, body, app, theme),
    }
    draw_status(frame, status, app.status(), theme);
    frame.render_widget(Paragraph::new(help_text(app)).style(theme.dim), help);

    match app.overlay() {
        Some(Overlay::Scanner(scanner)) => draw_scanner(frame, scanner, theme),
        Some(Overlay::Confirm(confirm)) => draw_confirm(frame, confirm, theme),
        None => {}
    }
}

/// Key hints for whatever currently receives input.
pub fn help_text(app: &App) -> &'static str {
    match app.overlay() {
        Some(Overlay::Scanner(_)) => "j/k move  enter pair  s rescan  esc close",
        Some(Overlay::Confirm(_)) => "h/l focus  enter confirm  esc cancel",
        None => match app.tab() {
            Tab::Devices => {
                "tab switch  j/k move  enter connect/disconnect  D disconnect  X forget  s scan  r refresh  q quit"
            }
            Tab::Sinks => {
                "tab switch  j/k move  d set default  m mute  enter move stream  r refresh  q quit"
            }
            Tab::Profiles => "tab switch  j/k move  enter set profile  r refresh  q quit",
            Tab::Presets => {
                "tab switch  j/k move  enter preview  s snapshot  X delete  r refresh  q quit"
            }
        },
    }
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", title), theme.title))
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    rows: Vec<ListItem>,
    selected: Option<usize>,
    theme: &Theme,
) {
    let empty = rows.is_empty();
    let list = List::new(rows)
        .block(block)
        .style(theme.text)
        .highlight_style(theme.selected)
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(if empty { None } else { selected });
    frame.render_stateful_widget(list, area, &mut state);
}

fn marker(on: bool) -> &'static str {
    if on {
        "*"
    } else {
        " "
    }
}

// ==================== Chrome ====================

fn draw_tabs(frame: &mut Frame, area: Rect, tab: Tab, theme: &Theme) {
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .select(tab.index())
        .style(theme.dim)
        .highlight_style(theme.title)
        .block(panel("SoundCtl", theme));
    frame.render_widget(tabs, area);
}

fn draw_status(frame: &mut Frame, area: Rect, status: &Status, theme: &Theme) {
    let line = match status {
        Status::Empty => Line::default(),
        Status::Info(text) => Line::styled(text.as_str(), theme.info),
        Status::Error(text) => Line::styled(format!("Error: {}", text), theme.error),
    };
    frame.render_widget(Paragraph::new(line), area);
}

// ==================== Panes ====================

fn draw_devices(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let pane = app.devices();
    let controller = pane.controller();
    let [header, list] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let power = if controller.powered { "on" } else { "off" };
    let mut spans = vec![
        Span::styled("Controller: ", theme.dim),
        Span::styled(
            if controller.alias.is_empty() {
                controller.address.clone()
            } else {
                controller.alias.clone()
            },
            theme.text,
        ),
        Span::styled(format!("  power {}", power), theme.dim),
    ];
    if controller.discovering {
        spans.push(Span::styled("  discovering", theme.warning));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), header);

    let rows = pane
        .devices()
        .iter()
        .map(|d| {
            let style = if d.connected { theme.active } else { theme.text };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<28}", d.name), style),
                Span::styled(format!("{:<19}", d.address), theme.dim),
                Span::styled(d.mode.label(), style),
                Span::styled(if d.trusted { "  trusted" } else { "" }, theme.dim),
            ]))
        })
        .collect();
    draw_list(frame, list, panel("Devices", theme), rows, Some(pane.cursor()), theme);
}

fn draw_sinks(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let pane = app.sinks();
    let data = pane.data();
    let [outputs, inputs, routes] = Layout::vertical([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);
    let cursor_in = |section: Section| (pane.section() == section).then(|| pane.cursor());

    let endpoint_rows = |endpoints: &[soundctl_services::AudioEndpoint], default: &str| {
        endpoints
            .iter()
            .map(|e| {
                let is_default = e.name == default;
                ListItem::new(Line::from(vec![
                    Span::styled(marker(is_default), theme.active),
                    Span::raw(" "),
                    Span::styled(
                        e.name.clone(),
                        if is_default { theme.active } else { theme.text },
                    ),
                    Span::styled(format!("  {}", e.state), theme.dim),
                ]))
            })
            .collect::<Vec<_>>()
    };

    draw_list(
        frame,
        outputs,
        panel("Outputs", theme),
        endpoint_rows(&data.sinks, &data.defaults.sink),
        cursor_in(Section::Outputs),
        theme,
    );
    draw_list(
        frame,
        inputs,
        panel("Inputs", theme),
        endpoint_rows(&data.sources, &data.defaults.source),
        cursor_in(Section::Inputs),
        theme,
    );

    let stream_rows = data
        .inputs
        .iter()
        .map(|s| {
            let app_name = if s.app_name.is_empty() { &s.media_name } else { &s.app_name };
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{:<5}", s.index), theme.dim),
                Span::styled(app_name.clone(), theme.text),
                Span::styled(" → ", theme.dim),
                Span::styled(s.sink_name.clone(), theme.text),
            ]))
        })
        .collect();
    draw_list(
        frame,
        routes,
        panel("Streams", theme),
        stream_rows,
        cursor_in(Section::Routes),
        theme,
    );
}

fn draw_profiles(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let pane = app.profiles();
    let rows = pane
        .rows()
        .map(|row| {
            let active = row.is_active();
            let mut spans = vec![
                Span::styled(marker(active), theme.active),
                Span::raw(" "),
                Span::styled(format!("{:<40}", row.card.name), theme.dim),
                Span::styled(
                    row.profile.name.clone(),
                    if active { theme.active } else { theme.text },
                ),
            ];
            if !row.profile.description.is_empty() {
                spans.push(Span::styled(format!("  {}", row.profile.description), theme.dim));
            }
            if !row.profile.available {
                spans.push(Span::styled("  unavailable", theme.warning));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    draw_list(frame, area, panel("Card Profiles", theme), rows, Some(pane.cursor()), theme);
}

fn draw_presets(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let pane = app.presets();
    let rows = pane
        .presets()
        .iter()
        .map(|p| {
            let active = pane.active() == Some(p.name.as_str());
            let mut spans = vec![
                Span::styled(marker(active), theme.active),
                Span::raw(" "),
                Span::styled(p.name.clone(), if active { theme.active } else { theme.text }),
            ];
            if !p.default_sink.is_empty() {
                spans.push(Span::styled(format!("  sink {}", p.default_sink), theme.dim));
            }
            if let Some(updated) = p.updated_at {
                spans.push(Span::styled(
                    format!("  updated {}", updated.format("%Y-%m-%d %H:%M")),
                    theme.dim,
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    draw_list(frame, area, panel("Presets", theme), rows, Some(pane.cursor()), theme);
}

// ==================== Overlays ====================

/// A rectangle centered in `area`, sized as a percentage of it.
fn centered(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

fn draw_scanner(frame: &mut Frame, scanner: &ScannerOverlay, theme: &Theme) {
    let area = centered(70, 60, frame.area());
    frame.render_widget(Clear, area);

    match scanner.state() {
        ScanState::Scanning => {
            let text = Paragraph::new(Line::styled("Scanning for devices…", theme.warning))
                .block(panel("Scan", theme));
            frame.render_widget(text, area);
        }
        ScanState::Results if scanner.discovered().is_empty() => {
            let text = Paragraph::new(Line::styled(
                "No devices found. Press s to scan again.",
                theme.dim,
            ))
            .block(panel("Scan", theme));
            frame.render_widget(text, area);
        }
        ScanState::Results => {
            let [list, footer] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
            let rows = scanner
                .discovered()
                .iter()
                .map(|d| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{:<32}", d.display_name()), theme.text),
                        Span::styled(d.address.clone(), theme.dim),
                    ]))
                })
                .collect();
            draw_list(frame, list, panel("Discovered", theme), rows, Some(scanner.cursor()), theme);
            if let Some(address) = scanner.pairing() {
                frame.render_widget(
                    Paragraph::new(Line::styled(format!(" Pairing {}…", address), theme.warning)),
                    footer,
                );
            }
        }
    }
}

fn draw_confirm(frame: &mut Frame, confirm: &ConfirmOverlay, theme: &Theme) {
    let area = centered(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = if confirm.diff().is_empty() {
        vec![Line::styled("(no detected changes)", theme.dim)]
    } else {
        confirm
            .diff()
            .iter()
            .map(|d| {
                Line::from(vec![
                    Span::styled(format!("{}: ", d.field), theme.text),
                    Span::styled(
                        if d.from.is_empty() { "-".to_string() } else { d.from.clone() },
                        theme.dim,
                    ),
                    Span::styled(" → ", theme.dim),
                    Span::styled(d.to.clone(), theme.active),
                ])
            })
            .collect()
    };

    lines.push(Line::default());
    if confirm.is_applying() {
        lines.push(Line::styled("Applying…", theme.warning));
    } else {
        let style_for = |focus: ConfirmFocus| {
            if confirm.focus() == focus {
                theme.button_focused
            } else {
                theme.button
            }
        };
        lines.push(Line::from(vec![
            Span::styled(" Apply ", style_for(ConfirmFocus::Apply)),
            Span::raw("   "),
            Span::styled(" Cancel ", style_for(ConfirmFocus::Cancel)),
        ]));
    }

    let title = format!("Apply preset \"{}\"?", confirm.preset().name);
    let body = Paragraph::new(lines)
        .block(panel(&title, theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}
