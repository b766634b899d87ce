//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Captured results paired with their signal flags."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;

use crate::event::Event;
use crate::flag::SignalFlag;
use crate::registry::EventHandler;
use crate::{BridgeError, Result};

/// Last event recorded by a callback, readable once its flag is set.
///
/// [`EventSlot::record`] stores the event before raising the flag, so any
/// reader that has observed the flag also observes the payload.
#[derive(Debug, Clone)]
pub struct EventSlot {
    flag: SignalFlag,
    value: Arc<Mutex<Option<Event>>>,
}

impl EventSlot {
    /// Create an empty slot with a fresh flag.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            flag: SignalFlag::new(name),
            value: Arc::new(Mutex::new(None)),
        }
    }

    /// Flag raised whenever an event is recorded.
    pub fn flag(&self) -> &SignalFlag {
        &self.flag
    }

    /// Slot label.
    pub fn name(&self) -> &str {
        self.flag.name()
    }

    /// Store an event and raise the flag. Later events replace earlier ones.
    pub fn record(&self, event: &Event) -> u64 {
        *self.value.lock() = Some(event.clone());
        self.flag.raise()
    }

    /// Handler that records every event it receives into this slot.
    pub fn handler(&self) -> EventHandler {
        let slot = self.clone();
        Arc::new(move |event: &Event| {
            slot.record(event);
        })
    }

    /// Whether at least one event has been recorded.
    pub fn is_set(&self) -> bool {
        self.flag.is_set()
    }

    /// The captured event. Fails if the flag has not been raised yet.
    pub fn captured(&self) -> Result<Event> {
        if !self.flag.is_set() {
            return Err(BridgeError::NotSignalled(self.name().to_owned()));
        }
        self.value
            .lock()
            .clone()
            .ok_or_else(|| BridgeError::NotSignalled(self.name().to_owned()))
    }

    /// Decode the captured payload into a concrete type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        self.captured()?.decode()
    }
}
