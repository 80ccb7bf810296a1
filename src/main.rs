// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SoundCtl - Terminal controller for audio devices, Bluetooth and presets.
//!
//! Drives `pactl` and `bluetoothctl`, and keeps named presets of card
//! profiles, volumes and stream routes.

mod app;
mod command;
mod config;
mod debounce;
mod executor;
mod logging;
mod message;
mod reconcile;
mod subscription;
mod ui;

#[cfg(test)]
mod testing;

use app::App;
use command::Command;
use config::app_config::SubscriptionsConfig;
use config::{AppConfig, ConfigManager};
use executor::{Executor, Services};
use message::Message;
use ratatui::crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use soundctl_services::{BluetoothCtl, CommandRunner, PactlAudio, SystemRunner, TomlPresetStore};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use subscription::{parse_audio_event, parse_bluetooth_event, EventSubscription};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use ui::keys::Key;
use ui::Theme;

fn main() -> ExitCode {
    let manager = match ConfigManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("soundctl: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let (config, config_error) = match manager.load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let log_path = config
        .logging
        .file
        .clone()
        .unwrap_or_else(|| manager.log_path());
    if !logging::init(&config.logging, &log_path) {
        eprintln!("soundctl: cannot log to {}, logging disabled", log_path.display());
    }
    info!("Starting SoundCtl");
    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let presets_path = config
        .presets
        .path
        .clone()
        .unwrap_or_else(|| manager.presets_path());
    let services = Services {
        audio: Arc::new(PactlAudio::new(runner.clone())),
        bluetooth: Arc::new(BluetoothCtl::new(runner)),
        presets: Arc::new(TomlPresetStore::new(presets_path)),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("soundctl: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let result = runtime.block_on(run(config, services));
    // Discovery runs block a pool thread for their whole duration.
    runtime.shutdown_timeout(Duration::from_millis(500));

    match result {
        Ok(()) => {
            info!("Exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Terminal error: {}", e);
            eprintln!("soundctl: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig, services: Services) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = Executor::new(services, tx.clone());
    let (cancel_tx, cancel_rx) = watch::channel(false);

    if config.subscriptions.enabled {
        spawn_listeners(&config.subscriptions, &tx, cancel_rx);
    } else {
        info!("Live updates disabled");
    }

    let mut app = App::new(&config.general);
    for command in app.init() {
        executor.run(command);
    }

    let mut terminal = ratatui::try_init()?;
    spawn_key_reader(tx);
    let result = event_loop(&mut terminal, &mut app, &executor, &mut rx).await;
    ratatui::restore();

    let _ = cancel_tx.send(true);
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    executor: &Executor,
    rx: &mut UnboundedReceiver<Message>,
) -> io::Result<()> {
    let theme = Theme::default();
    loop {
        terminal.draw(|frame| ui::view::draw(frame, app, &theme))?;

        let Some(message) = rx.recv().await else {
            debug!("Message channel closed");
            return Ok(());
        };
        drain(app, message, rx, |command| executor.run(command));

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Handle `first` and whatever queued up behind it while drawing. Nothing
/// after a quit is handled.
fn drain(
    app: &mut App,
    first: Message,
    rx: &mut UnboundedReceiver<Message>,
    mut run: impl FnMut(Command),
) {
    let mut next = Some(first);
    while let Some(message) = next {
        for command in app.update(message) {
            run(command);
        }
        if app.should_quit() {
            return;
        }
        next = rx.try_recv().ok();
    }
}

/// Blocking terminal reader on its own thread, so it never holds up runtime
/// shutdown.
fn spawn_key_reader(tx: UnboundedSender<Message>) {
    let spawned = std::thread::Builder::new()
        .name("soundctl-input".to_string())
        .spawn(move || loop {
            let message = match event::read() {
                Ok(Event::Key(event)) => match Key::from_event(&event) {
                    Some(key) => Message::Key(key),
                    None => continue,
                },
                Ok(Event::Resize(..)) => Message::Resize,
                Ok(_) => continue,
                Err(e) => {
                    error!("Terminal input failed: {}", e);
                    // No input means no way to quit; leave instead.
                    let _ = tx.send(Message::Key(Key::Interrupt));
                    return;
                }
            };
            if tx.send(message).is_err() {
                return;
            }
        });
    if let Err(e) = spawned {
        error!("Failed to start input thread: {}", e);
    }
}

fn spawn_listeners(
    config: &SubscriptionsConfig,
    tx: &UnboundedSender<Message>,
    cancel: watch::Receiver<bool>,
) {
    let mut audio =
        EventSubscription::start(&config.audio_command, parse_audio_event, cancel.clone());
    let audio_tx = tx.clone();
    tokio::spawn(async move {
        while let Some(event) = audio.next().await {
            if audio_tx.send(Message::AudioEvent(event)).is_err() {
                break;
            }
        }
    });

    let mut bluetooth =
        EventSubscription::start(&config.bluetooth_command, parse_bluetooth_event, cancel);
    let bluetooth_tx = tx.clone();
    tokio::spawn(async move {
        while let Some(event) = bluetooth.next().await {
            if bluetooth_tx.send(Message::BluetoothEvent(event)).is_err() {
                break;
            }
        }
    });
}
