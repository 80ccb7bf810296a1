// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Coalescing bursts of change events into a single reload.

use std::time::Duration;
use tracing::trace;

/// Delay between the first event of a burst and the reload.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// At most one timer is armed at a time; events arriving while it is armed
/// are covered by it.
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    delay: Duration,
    pending: bool,
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: false,
        }
    }

    /// Record an event. Returns the delay to arm a timer with, or `None` if
    /// one is already pending.
    pub fn event(&mut self) -> Option<Duration> {
        if self.pending {
            trace!("Refresh already pending");
            return None;
        }
        self.pending = true;
        trace!("Arming refresh in {:?}", self.delay);
        Some(self.delay)
    }

    /// The armed timer fired. Returns whether a reload should happen.
    pub fn fire(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{self, Instant};

    #[test]
    fn test_burst_arms_once() {
        let mut debounce = DebounceScheduler::default();
        assert_eq!(debounce.event(), Some(DEFAULT_DELAY));
        assert_eq!(debounce.event(), None);
        assert_eq!(debounce.event(), None);
        assert!(debounce.is_pending());

        assert!(debounce.fire());
        assert!(!debounce.is_pending());
        assert!(!debounce.fire());

        // A new burst arms again.
        assert_eq!(debounce.event(), Some(DEFAULT_DELAY));
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_refresh_timed_from_first_event() {
        let start = Instant::now();
        let mut debounce = DebounceScheduler::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Five events 50ms apart, all inside the window.
        for _ in 0..5 {
            if let Some(delay) = debounce.event() {
                let tx = tx.clone();
                tokio::spawn(async move {
                    time::sleep(delay).await;
                    let _ = tx.send(Instant::now());
                });
            }
            time::sleep(Duration::from_millis(50)).await;
        }
        drop(tx);

        let fired_at = rx.recv().await.unwrap();
        assert!(debounce.fire());
        assert_eq!(fired_at - start, DEFAULT_DELAY);
        assert!(rx.recv().await.is_none());
    }
}
