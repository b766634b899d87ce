//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Event bridge primitives and shared error type."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
//! Adapts callback-driven asynchronous objects (workers, sensors, other
//! event sources) into linear `await`-style test procedures.
//!
//! A callback records its payload into an [`EventSlot`] and raises the
//! slot's [`SignalFlag`]; the test body then awaits the flag through a
//! [`FlagWaiter`], which either polls on a fixed tick or subscribes to the
//! flag directly, always under an optional deadline.
#![warn(missing_docs)]

use std::time::Duration;

pub mod bridge;
pub mod event;
pub mod flag;
pub mod metrics;
pub mod poll;
pub mod registry;
pub mod slot;
pub mod target;
pub mod waiter;

/// Shared result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors surfaced by the bridge and by event targets built on it.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A wait exceeded its deadline before the awaited condition held.
    #[error("wait for '{label}' timed out after {waited:?} ({ticks} poll ticks)")]
    WaitTimeout {
        /// Label of the flag or predicate being awaited.
        label: String,
        /// Deadline that expired.
        waited: Duration,
        /// Poll ticks consumed before expiry (zero for event-driven waits).
        ticks: u64,
    },
    /// A captured result was read before its flag was raised.
    #[error("captured result for '{0}' read before its flag was set")]
    NotSignalled(String),
    /// The target has been terminated and no longer accepts input.
    #[error("{0} has been terminated")]
    TargetClosed(&'static str),
    /// The caller supplied an argument the target rejects.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A captured payload could not be decoded into the requested type.
    #[error("payload decode error: {0}")]
    Json(#[from] serde_json::Error),
}

pub use bridge::EventBridge;
pub use event::{ErrorEvent, Event, EVENT_CHANGE, EVENT_ERROR, EVENT_EXIT, EVENT_MESSAGE};
pub use flag::SignalFlag;
pub use metrics::BridgeMetrics;
pub use poll::{poll_tick, PollToken, Poller, DEFAULT_POLL_INTERVAL};
pub use registry::{EventHandler, HandlerRegistry, ListenerId};
pub use slot::EventSlot;
pub use target::EventTarget;
pub use waiter::{FlagWaiter, WaitPolicy, WaitReport};
