//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Event bridge harness wiring callbacks onto external objects."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::Arc;

use tracing::debug;

use crate::event::Event;
use crate::flag::SignalFlag;
use crate::registry::{EventHandler, ListenerId};
use crate::slot::EventSlot;
use crate::target::EventTarget;
use crate::waiter::FlagWaiter;
use crate::Result;

/// Registers capture callbacks on an [`EventTarget`] and awaits them.
///
/// Each callback stores the event payload and then raises its flag.
/// Several flags may coexist on one target and are awaited one after
/// another. Every listener the bridge registered is removed again by
/// [`EventBridge::detach`] or when the bridge is dropped.
pub struct EventBridge<T: EventTarget + ?Sized> {
    target: Arc<T>,
    waiter: FlagWaiter,
    registrations: Vec<(String, ListenerId)>,
}

impl<T: EventTarget + ?Sized> EventBridge<T> {
    /// Wrap a target with the provided waiter.
    pub fn new(target: Arc<T>, waiter: FlagWaiter) -> Self {
        Self {
            target,
            waiter,
            registrations: Vec::new(),
        }
    }

    /// The wrapped target.
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// Waiter used by the `await_*` helpers.
    pub fn waiter(&self) -> &FlagWaiter {
        &self.waiter
    }

    /// Capture every `event` into a fresh slot.
    pub fn capture(&mut self, event: &str) -> EventSlot {
        let slot = EventSlot::new(self.label(event));
        let handler = self.recording_handler(&slot);
        let id = self.target.add_listener(event, handler);
        self.track(event, id);
        slot
    }

    /// Capture only the next `event` into a fresh slot.
    pub fn capture_once(&mut self, event: &str) -> EventSlot {
        let slot = EventSlot::new(self.label(event));
        let handler = self.recording_handler(&slot);
        let id = self.target.add_listener_once(event, handler);
        self.track(event, id);
        slot
    }

    /// Count occurrences of `event` without keeping payloads.
    pub fn counter(&mut self, event: &str) -> SignalFlag {
        let flag = SignalFlag::new(self.label(event));
        let raised = flag.clone();
        let id = self.target.add_listener(
            event,
            Arc::new(move |_event: &Event| {
                raised.raise();
            }),
        );
        self.track(event, id);
        flag
    }

    /// Register an arbitrary callback.
    pub fn on<F>(&mut self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = self.target.add_listener(event, Arc::new(callback));
        self.track(event, id);
        id
    }

    /// Wait for the slot's flag, then return the captured event.
    pub async fn await_event(&self, slot: &EventSlot) -> Result<Event> {
        self.waiter.wait_flag(slot.flag()).await?;
        slot.captured()
    }

    /// Same as [`EventBridge::await_event`] but checks the flag on poll ticks.
    pub async fn poll_event(&self, slot: &EventSlot) -> Result<Event> {
        self.waiter.poll_flag(slot.flag()).await?;
        slot.captured()
    }

    /// Wait until the flag has been raised `min` times and return the observed count.
    pub async fn await_count(&self, flag: &SignalFlag, min: u64) -> Result<u64> {
        self.waiter.wait_count(flag, min).await?;
        Ok(flag.count())
    }

    /// Forward an event to the target for asynchronous delivery.
    pub fn dispatch(&self, event: Event) -> Result<()> {
        self.target.dispatch(event)
    }

    /// Forward to the target's lifecycle method.
    pub fn terminate(&self) -> Result<()> {
        self.target.terminate()
    }

    /// Remove every listener this bridge registered. Returns how many were still present.
    pub fn detach(&mut self) -> usize {
        let mut removed = 0;
        for (event, id) in self.registrations.drain(..) {
            if self.target.remove_listener(&event, id) {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(target: "acts::bridge", kind = self.target.kind(), removed, "detached listeners");
        }
        removed
    }

    fn label(&self, event: &str) -> String {
        format!("{}:{}", self.target.kind(), event)
    }

    fn track(&mut self, event: &str, id: ListenerId) {
        debug!(target: "acts::bridge", kind = self.target.kind(), event, listener = id.get(), "listener registered");
        self.registrations.push((event.to_owned(), id));
    }

    fn recording_handler(&self, slot: &EventSlot) -> EventHandler {
        let slot = slot.clone();
        let metrics = self.waiter.metrics().cloned();
        let kind = self.target.kind();
        Arc::new(move |event: &Event| {
            slot.record(event);
            if let Some(metrics) = &metrics {
                metrics.inc_captured(kind, &event.name);
            }
        })
    }
}

impl<T: EventTarget + ?Sized> Drop for EventBridge<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T: EventTarget + ?Sized> std::fmt::Debug for EventBridge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("target", &self.target.kind())
            .field("waiter", &self.waiter)
            .field("registrations", &self.registrations.len())
            .finish()
    }
}
