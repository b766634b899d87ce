//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Contract implemented by external asynchronous objects."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use crate::event::Event;
use crate::registry::{EventHandler, ListenerId};
use crate::Result;

/// External asynchronous object driven by a test through callbacks.
///
/// Implementations deliver events from their own task; a handler is never
/// invoked synchronously from inside [`EventTarget::dispatch`].
pub trait EventTarget: Send + Sync {
    /// Short kind name used in logs and metrics (`worker`, `sensor`).
    fn kind(&self) -> &'static str;

    /// Register a handler for every event with the given name.
    fn add_listener(&self, event: &str, handler: EventHandler) -> ListenerId;

    /// Register a handler removed after its first invocation.
    fn add_listener_once(&self, event: &str, handler: EventHandler) -> ListenerId;

    /// Remove a previously registered handler.
    fn remove_listener(&self, event: &str, id: ListenerId) -> bool;

    /// Remove every handler registered for an event.
    fn remove_all_listeners(&self, event: &str) -> usize;

    /// Queue an event for delivery to the target's listeners.
    fn dispatch(&self, event: Event) -> Result<()>;

    /// Release the target. Must be idempotent: only the first call has an effect.
    fn terminate(&self) -> Result<()>;

    /// Whether [`EventTarget::terminate`] has been called.
    fn is_terminated(&self) -> bool;
}
