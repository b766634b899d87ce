//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Named callback slots shared by event targets."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::event::Event;

/// Callback invoked with every event emitted under its registered name.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Identifier returned when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric identifier.
    pub fn get(&self) -> u64 {
        self.0
    }
}

struct Listener {
    id: ListenerId,
    handler: EventHandler,
    once: bool,
}

/// Ordered listener lists keyed by event name.
///
/// Handlers run in registration order. The internal lock is released
/// before any handler is invoked, so handlers may register or remove
/// listeners on the same registry.
#[derive(Default)]
pub struct HandlerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<IndexMap<String, Vec<Listener>>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler invoked for every matching event.
    pub fn add(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.insert(event, handler, false)
    }

    /// Register a handler removed after its first invocation.
    pub fn add_once(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.insert(event, handler, true)
    }

    fn insert(&self, event: &str, handler: EventHandler, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .entry(event.to_owned())
            .or_default()
            .push(Listener { id, handler, once });
        id
    }

    /// Remove a single listener. Returns false when it was not registered.
    pub fn remove(&self, event: &str, id: ListenerId) -> bool {
        let mut guard = self.listeners.lock();
        let Some(list) = guard.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|listener| listener.id != id);
        before != list.len()
    }

    /// Remove every listener for an event, returning how many were dropped.
    pub fn remove_all(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .shift_remove(event)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Drop all listeners for all events.
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    /// Number of listeners registered for an event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Deliver an event to its listeners and return how many were invoked.
    pub fn emit(&self, event: &Event) -> usize {
        let handlers: Vec<EventHandler> = {
            let mut guard = self.listeners.lock();
            let Some(list) = guard.get_mut(&event.name) else {
                return 0;
            };
            let handlers = list
                .iter()
                .map(|listener| listener.handler.clone())
                .collect();
            list.retain(|listener| !listener.once);
            handlers
        };
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.listeners.lock();
        let counts: Vec<(&str, usize)> = guard
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("HandlerRegistry")
            .field("listeners", &counts)
            .finish()
    }
}
