// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bluetooth discovery overlay.

use super::keys::Action;
use super::Cursor;
use crate::message::Outcome;
use soundctl_services::DiscoveredDevice;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    Results,
}

/// What the app should do after a key in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerReply {
    None,
    Close,
    /// Start another discovery run.
    Rescan,
    /// Pair, trust and connect the address.
    Pair(String),
}

/// One discovery session. `generation` tags the discovery it is waiting for.
#[derive(Debug)]
pub struct ScannerOverlay {
    generation: u64,
    state: ScanState,
    discovered: Vec<DiscoveredDevice>,
    cursor: Cursor,
    pairing: Option<String>,
}

impl ScannerOverlay {
    /// A new overlay already scanning.
    pub fn scanning(generation: u64) -> Self {
        Self {
            generation,
            state: ScanState::Scanning,
            discovered: Vec::new(),
            cursor: Cursor::default(),
            pairing: None,
        }
    }

    /// Restart scanning under a new generation, discarding results.
    pub fn restart(&mut self, generation: u64) {
        *self = Self::scanning(generation);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn discovered(&self) -> &[DiscoveredDevice] {
        &self.discovered
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn pairing(&self) -> Option<&str> {
        self.pairing.as_deref()
    }

    /// Take discovery results. Results of another session are ignored; a
    /// failed discovery shows an empty list and hands the error back.
    pub fn discovery_finished(
        &mut self,
        generation: u64,
        result: Outcome<Vec<DiscoveredDevice>>,
    ) -> Result<(), String> {
        if generation != self.generation {
            debug!("Dropping stale discovery {} (current {})", generation, self.generation);
            return Ok(());
        }
        self.state = ScanState::Results;
        self.cursor.reset();
        match result {
            Ok(devices) => {
                self.discovered = devices;
                Ok(())
            }
            Err(e) => {
                self.discovered.clear();
                Err(e)
            }
        }
    }

    /// A pair flow failed; allow another attempt.
    pub fn pair_failed(&mut self) {
        self.pairing = None;
    }

    pub fn handle(&mut self, action: Action) -> ScannerReply {
        if action == Action::Back {
            return ScannerReply::Close;
        }
        if self.state == ScanState::Scanning || self.pairing.is_some() {
            return ScannerReply::None;
        }
        match action {
            Action::Up => {
                self.cursor.up();
            }
            Action::Down => {
                self.cursor.down(self.discovered.len());
            }
            Action::Select => {
                if let Some(device) = self.discovered.get(self.cursor.get()) {
                    self.pairing = Some(device.address.clone());
                    return ScannerReply::Pair(device.address.clone());
                }
            }
            Action::Scan => return ScannerReply::Rescan,
            _ => {}
        }
        ScannerReply::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(addresses: &[&str]) -> Vec<DiscoveredDevice> {
        addresses
            .iter()
            .map(|a| DiscoveredDevice {
                address: a.to_string(),
                name: format!("Speaker {}", a),
            })
            .collect()
    }

    #[test]
    fn test_scanning_only_allows_cancel() {
        let mut scanner = ScannerOverlay::scanning(1);
        assert_eq!(scanner.handle(Action::Down), ScannerReply::None);
        assert_eq!(scanner.handle(Action::Select), ScannerReply::None);
        assert_eq!(scanner.handle(Action::Scan), ScannerReply::None);
        assert_eq!(scanner.handle(Action::Quit), ScannerReply::None);
        assert_eq!(scanner.handle(Action::Back), ScannerReply::Close);
    }

    #[test]
    fn test_results_then_pair() {
        let mut scanner = ScannerOverlay::scanning(1);
        scanner.discovery_finished(1, Ok(found(&["AA", "BB"]))).unwrap();
        assert_eq!(scanner.state(), ScanState::Results);

        scanner.handle(Action::Down);
        assert_eq!(scanner.handle(Action::Select), ScannerReply::Pair("BB".into()));
        assert_eq!(scanner.pairing(), Some("BB"));
        // Further input waits for the pair flow, except cancel.
        assert_eq!(scanner.handle(Action::Select), ScannerReply::None);

        scanner.pair_failed();
        assert_eq!(scanner.handle(Action::Select), ScannerReply::Pair("BB".into()));
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut scanner = ScannerOverlay::scanning(2);
        scanner.discovery_finished(1, Ok(found(&["AA"]))).unwrap();
        assert_eq!(scanner.state(), ScanState::Scanning);
        assert!(scanner.discovered().is_empty());
    }

    #[test]
    fn test_discovery_error_shows_empty_results() {
        let mut scanner = ScannerOverlay::scanning(1);
        assert_eq!(
            scanner.discovery_finished(1, Err("No default controller".into())),
            Err("No default controller".to_string())
        );
        assert_eq!(scanner.state(), ScanState::Results);
        assert_eq!(scanner.handle(Action::Scan), ScannerReply::Rescan);
    }

    #[test]
    fn test_restart_clears_results() {
        let mut scanner = ScannerOverlay::scanning(1);
        scanner.discovery_finished(1, Ok(found(&["AA"]))).unwrap();
        scanner.restart(2);
        assert_eq!(scanner.generation(), 2);
        assert_eq!(scanner.state(), ScanState::Scanning);
        assert!(scanner.discovered().is_empty());
    }
}
