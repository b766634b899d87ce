//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "One-directional signal flags raised by event callbacks."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::Arc;

use tokio::sync::watch;

/// Boolean gate raised by a callback when an expected event occurs.
///
/// A flag moves from unset to set exactly once and is never reset. Every
/// raise also bumps an occurrence counter so callers can await a given
/// number of events. Clones share the same state.
#[derive(Debug, Clone)]
pub struct SignalFlag {
    name: Arc<str>,
    occurrences: Arc<watch::Sender<u64>>,
}

impl SignalFlag {
    /// Create an unset flag.
    pub fn new(name: impl AsRef<str>) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            name: Arc::from(name.as_ref()),
            occurrences: Arc::new(tx),
        }
    }

    /// Label used in logs and timeout errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one occurrence and return the new total.
    pub fn raise(&self) -> u64 {
        let mut total = 0;
        self.occurrences.send_modify(|count| {
            *count += 1;
            total = *count;
        });
        total
    }

    /// Whether the flag has been raised at least once.
    pub fn is_set(&self) -> bool {
        self.count() > 0
    }

    /// Number of times the flag has been raised.
    pub fn count(&self) -> u64 {
        *self.occurrences.borrow()
    }

    /// Subscribe to occurrence changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.occurrences.subscribe()
    }

    /// Resolve once at least `min` occurrences have been recorded.
    ///
    /// Resolves immediately when the threshold is already reached. No
    /// deadline is applied here; callers go through
    /// [`crate::FlagWaiter`] for that.
    pub async fn reached(&self, min: u64) -> u64 {
        let mut rx = self.subscribe();
        loop {
            let current = *rx.borrow_and_update();
            if current >= min {
                return current;
            }
            // The sender lives in `self`, so the channel cannot close here.
            if rx.changed().await.is_err() {
                return *rx.borrow();
            }
        }
    }
}
