//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "tests"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Event bridge behaviour against a loopback target."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use acts_bridge::{
    BridgeError, Event, EventBridge, EventHandler, EventTarget, FlagWaiter, HandlerRegistry,
    ListenerId, WaitPolicy, EVENT_EXIT, EVENT_MESSAGE,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;

/// Delivers dispatched events back to its own listeners from a spawned task.
struct LoopbackTarget {
    registry: Arc<HandlerRegistry>,
    tx: Mutex<Option<mpsc::UnboundedSender<Event>>>,
    terminated: AtomicBool,
}

impl LoopbackTarget {
    fn spawn() -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
        let registry = Arc::new(HandlerRegistry::new());
        let delivery = registry.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                delivery.emit(&event);
            }
            delivery.emit(&Event::exit(0));
        });
        Arc::new(Self {
            registry,
            tx: Mutex::new(Some(tx)),
            terminated: AtomicBool::new(false),
        })
    }
}

impl EventTarget for LoopbackTarget {
    fn kind(&self) -> &'static str {
        "loopback"
    }

    fn add_listener(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.registry.add(event, handler)
    }

    fn add_listener_once(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.registry.add_once(event, handler)
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        self.registry.remove(event, id)
    }

    fn remove_all_listeners(&self, event: &str) -> usize {
        self.registry.remove_all(event)
    }

    fn dispatch(&self, event: Event) -> acts_bridge::Result<()> {
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(BridgeError::TargetClosed("loopback"))?;
        tx.send(event)
            .map_err(|_| BridgeError::TargetClosed("loopback"))
    }

    fn terminate(&self) -> acts_bridge::Result<()> {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.tx.lock().take();
        Ok(())
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

fn waiter() -> FlagWaiter {
    FlagWaiter::new(WaitPolicy::new(
        Duration::from_millis(10),
        Some(Duration::from_secs(2)),
    ))
}

#[tokio::test]
async fn captured_payload_is_visible_after_wait() {
    let mut bridge = EventBridge::new(LoopbackTarget::spawn(), waiter());
    let slot = bridge.capture(EVENT_MESSAGE);
    assert!(slot.captured().is_err());

    bridge.dispatch(Event::message(json!("ping"))).unwrap();
    // Delivery happens on the target's task, never inside dispatch.
    assert!(!slot.is_set());

    let event = bridge.await_event(&slot).await.unwrap();
    assert_eq!(event.as_str(), Some("ping"));
    assert_eq!(slot.name(), "loopback:message");
}

#[tokio::test]
async fn poll_mode_observes_the_same_event() {
    let mut bridge = EventBridge::new(LoopbackTarget::spawn(), waiter());
    let slot = bridge.capture(EVENT_MESSAGE);
    bridge.dispatch(Event::message(json!({ "n": 7 }))).unwrap();
    let event = bridge.poll_event(&slot).await.unwrap();
    assert_eq!(event.payload, json!({ "n": 7 }));
}

#[tokio::test]
async fn independent_flags_are_awaited_sequentially() {
    let mut bridge = EventBridge::new(LoopbackTarget::spawn(), waiter());
    let message = bridge.capture(EVENT_MESSAGE);
    let exit = bridge.capture(EVENT_EXIT);

    bridge.dispatch(Event::message(json!("last words"))).unwrap();
    bridge.await_event(&message).await.unwrap();
    assert!(!exit.is_set());

    bridge.terminate().unwrap();
    bridge.terminate().unwrap();
    let exit_event = bridge.await_event(&exit).await.unwrap();
    assert_eq!(exit_event.exit_code(), Some(0));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(exit.flag().count(), 1);
}

#[tokio::test]
async fn counter_sees_every_queued_dispatch() {
    let mut bridge = EventBridge::new(LoopbackTarget::spawn(), waiter());
    let counter = bridge.counter("tick");
    for _ in 0..10 {
        bridge.dispatch(Event::new("tick", json!(null))).unwrap();
    }
    bridge.waiter().wait_flag(&counter).await.unwrap();
    assert_eq!(counter.count(), 10);
}

#[tokio::test]
async fn capture_once_ignores_later_events() {
    let mut bridge = EventBridge::new(LoopbackTarget::spawn(), waiter());
    let first = bridge.capture_once(EVENT_MESSAGE);
    let all = bridge.counter(EVENT_MESSAGE);
    bridge.dispatch(Event::message(json!(1))).unwrap();
    bridge.dispatch(Event::message(json!(2))).unwrap();
    bridge.await_count(&all, 2).await.unwrap();
    assert_eq!(first.flag().count(), 1);
    assert_eq!(first.captured().unwrap().payload, json!(1));
}

#[tokio::test]
async fn missing_event_times_out_instead_of_hanging() {
    let target = LoopbackTarget::spawn();
    let mut bridge = EventBridge::new(
        target,
        FlagWaiter::new(WaitPolicy::new(
            Duration::from_millis(5),
            Some(Duration::from_millis(60)),
        )),
    );
    let slot = bridge.capture(EVENT_MESSAGE);
    let err = bridge.await_event(&slot).await.unwrap_err();
    assert!(matches!(err, BridgeError::WaitTimeout { ref label, .. } if label == "loopback:message"));
}

#[tokio::test]
async fn dropping_the_bridge_detaches_listeners() {
    let target = LoopbackTarget::spawn();
    let hits = Arc::new(AtomicUsize::new(0));
    {
        let mut bridge = EventBridge::new(target.clone(), waiter());
        bridge.capture(EVENT_MESSAGE);
        let hits = hits.clone();
        bridge.on(EVENT_MESSAGE, move |_event| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(target.registry.listener_count(EVENT_MESSAGE), 2);
    }
    assert_eq!(target.registry.listener_count(EVENT_MESSAGE), 0);
    target.dispatch(Event::message(json!("nobody"))).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dispatch_after_terminate_is_rejected() {
    let mut bridge = EventBridge::new(LoopbackTarget::spawn(), waiter());
    let message = bridge.counter(EVENT_MESSAGE);
    bridge.terminate().unwrap();
    assert!(bridge.target().is_terminated());
    let err = bridge.dispatch(Event::message(json!("late"))).unwrap_err();
    assert!(matches!(err, BridgeError::TargetClosed("loopback")));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(message.count(), 0);
}
