// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Live change notifications from external monitor processes.
//!
//! A subscription owns a background task that reads the monitor's stdout
//! line by line, keeps the lines that parse as events and hands them over a
//! bounded queue. If the monitor cannot be started the subscription is
//! simply empty.

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

/// Events buffered between the reader task and the consumer.
const QUEUE_CAPACITY: usize = 32;

/// One line of `pactl subscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEvent {
    /// `new`, `change`, `remove`.
    pub event_type: String,
    /// `sink`, `source`, `card`, `sink-input`, `server`, ...
    pub facility: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BluetoothEventKind {
    PropertyChanged,
    DeviceAdded,
    DeviceRemoved,
}

/// A BlueZ signal seen on the system bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BluetoothEvent {
    pub kind: BluetoothEventKind,
    /// The raw trace line.
    pub detail: String,
}

/// `Event 'change' on sink #52` -> `change`, `sink`.
pub fn parse_audio_event(line: &str) -> Option<AudioEvent> {
    let rest = line.trim().strip_prefix("Event '")?;
    let (event_type, rest) = rest.split_once("' on ")?;
    let facility = rest.split_whitespace().next()?;
    if event_type.is_empty() {
        return None;
    }
    Some(AudioEvent {
        event_type: event_type.to_string(),
        facility: facility.to_string(),
    })
}

/// Classify a `dbus-monitor` line by the BlueZ signal it carries.
pub fn parse_bluetooth_event(line: &str) -> Option<BluetoothEvent> {
    let kind = if line.contains("member=PropertiesChanged") {
        BluetoothEventKind::PropertyChanged
    } else if line.contains("member=InterfacesAdded") {
        BluetoothEventKind::DeviceAdded
    } else if line.contains("member=InterfacesRemoved") {
        BluetoothEventKind::DeviceRemoved
    } else {
        return None;
    };
    Some(BluetoothEvent {
        kind,
        detail: line.trim().to_string(),
    })
}

/// Turns a line parser into typed events from a monitor stream.
pub type LineParser<E> = fn(&str) -> Option<E>;

/// A running notification stream.
pub struct EventSubscription<E> {
    events: mpsc::Receiver<E>,
    cancel: watch::Receiver<bool>,
}

impl<E: Send + 'static> EventSubscription<E> {
    /// Spawn `command` and subscribe to its stdout.
    ///
    /// Must be called inside a Tokio runtime. The child is killed when the
    /// token is cancelled or the subscription is dropped.
    pub fn start(command: &[String], parser: LineParser<E>, cancel: watch::Receiver<bool>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let subscription = Self {
            events: rx,
            cancel: cancel.clone(),
        };

        let Some((program, args)) = command.split_first() else {
            warn!("Empty subscription command, live updates disabled");
            return subscription;
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start {}: {}; live updates disabled", program, e);
                return subscription;
            }
        };
        let Some(stdout) = child.stdout.take() else {
            warn!("{} has no stdout; live updates disabled", program);
            return subscription;
        };

        info!("Subscribed to {}", program);
        let program = program.clone();
        tokio::spawn(async move {
            pump(stdout, parser, tx, cancel).await;
            if let Err(e) = child.kill().await {
                trace!("{} already exited: {}", program, e);
            }
            debug!("Subscription to {} ended", program);
        });

        subscription
    }

    /// Subscribe to an arbitrary line stream.
    pub fn from_reader<R>(reader: R, parser: LineParser<E>, cancel: watch::Receiver<bool>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(pump(reader, parser, tx, cancel.clone()));
        Self { events: rx, cancel }
    }

    /// Wait for the next event. `None` once cancelled or the stream ended.
    pub async fn next(&mut self) -> Option<E> {
        if *self.cancel.borrow() {
            return None;
        }
        tokio::select! {
            event = self.events.recv() => event,
            _ = self.cancel.changed() => None,
        }
    }
}

async fn pump<R, E>(
    reader: R,
    parser: LineParser<E>,
    tx: mpsc::Sender<E>,
    mut cancel: watch::Receiver<bool>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let Some(event) = parser(&line) else {
                        continue;
                    };
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Subscription read failed: {}", e);
                    break;
                }
            },
            _ = cancel.changed() => break,
        }
    }
}
