//! ---
//! acts_section: "04-reference-fixtures"
//! acts_subsection: "tests"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Worker and sensor fixtures driven through the event bridge."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::time::Duration;

use acts_bridge::{
    BridgeError, ErrorEvent, Event, EventBridge, EventTarget, FlagWaiter, WaitPolicy,
    EVENT_CHANGE, EVENT_ERROR, EVENT_EXIT, EVENT_MESSAGE,
};
use acts_fixtures::{
    EchoWorker, SensorKind, SensorOptions, SensorReading, SimulatedSensor, WorkerOptions,
};
use serde_json::json;

fn waiter() -> FlagWaiter {
    FlagWaiter::new(WaitPolicy::new(
        Duration::from_millis(10),
        Some(Duration::from_secs(5)),
    ))
}

#[tokio::test]
async fn worker_echoes_with_suffix() {
    let worker = EchoWorker::spawn(WorkerOptions::default());
    let mut bridge = EventBridge::new(worker.clone(), waiter());
    let reply = bridge.capture(EVENT_MESSAGE);

    worker.post_message(json!("hello world")).unwrap();
    let event = bridge.await_event(&reply).await.unwrap();
    assert_eq!(event.as_str(), Some("hello world worker"));
}

#[tokio::test]
async fn worker_reports_unsupported_payloads() {
    let worker = EchoWorker::spawn(WorkerOptions::default());
    let mut bridge = EventBridge::new(worker.clone(), waiter());
    let reply = bridge.counter(EVENT_MESSAGE);
    let error = bridge.capture(EVENT_ERROR);

    worker.post_message(json!({ "not": "text" })).unwrap();
    let event = bridge.await_event(&error).await.unwrap();
    let details: ErrorEvent = event.decode().unwrap();
    assert!(details.message.contains("object"));
    assert_eq!(reply.count(), 0);
}

#[tokio::test]
async fn worker_drains_queue_before_exit() {
    let worker = EchoWorker::spawn(WorkerOptions::default());
    let mut bridge = EventBridge::new(worker.clone(), waiter());
    let replies = bridge.counter(EVENT_MESSAGE);
    let exit = bridge.capture(EVENT_EXIT);

    for n in 0..3 {
        worker.post_message(json!(format!("m{n}"))).unwrap();
    }
    worker.terminate().unwrap();
    worker.terminate().unwrap();

    let event = bridge.await_event(&exit).await.unwrap();
    assert_eq!(event.exit_code(), Some(0));
    assert_eq!(replies.count(), 3);

    worker.join().await;
    assert_eq!(exit.flag().count(), 1);
    assert!(matches!(
        worker.post_message(json!("late")),
        Err(BridgeError::TargetClosed("worker"))
    ));
}

#[tokio::test]
async fn worker_delivers_dispatched_events_in_order() {
    let worker = EchoWorker::spawn(WorkerOptions::default());
    let mut bridge = EventBridge::new(worker.clone(), waiter());
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = seen.clone();
    bridge.on("custom", move |event: &Event| {
        sink.lock().push(event.payload.clone());
    });
    let count = bridge.counter("custom");

    for n in 0..5 {
        bridge.dispatch(Event::new("custom", json!(n))).unwrap();
    }
    bridge.await_count(&count, 5).await.unwrap();
    assert_eq!(*seen.lock(), vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
}

#[tokio::test(start_paused = true)]
async fn sensor_emits_readings_until_stopped() {
    let sensor = SimulatedSensor::spawn(SensorOptions::default());
    let mut bridge = EventBridge::new(sensor.clone(), waiter());
    let latest = bridge.capture(EVENT_CHANGE);
    let changes = bridge.counter(EVENT_CHANGE);

    sensor.start(Duration::from_millis(50)).unwrap();
    bridge.await_count(&changes, 3).await.unwrap();
    let reading: SensorReading = latest.decode().unwrap();
    assert!((reading.z - 9.81).abs() < 0.5);

    sensor.stop().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let after_stop = changes.count();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(changes.count(), after_stop);
}

#[tokio::test]
async fn sensor_rejects_short_intervals() {
    let sensor = SimulatedSensor::spawn(SensorOptions::default());
    let err = sensor.start(Duration::from_millis(1)).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

#[tokio::test]
async fn zero_interval_is_rejected_and_sensor_still_exits() {
    let options = SensorOptions {
        min_interval: Duration::ZERO,
        ..SensorOptions::default()
    };
    let sensor = SimulatedSensor::spawn(options);
    let mut bridge = EventBridge::new(sensor.clone(), waiter());
    let exit = bridge.capture(EVENT_EXIT);

    let err = sensor.start(Duration::ZERO).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
    bridge.terminate().unwrap();
    bridge.await_event(&exit).await.unwrap();
    assert_eq!(exit.flag().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn once_listener_sees_a_single_reading() {
    let sensor = SimulatedSensor::spawn(SensorOptions::default().with_kind(SensorKind::Gyroscope));
    let mut bridge = EventBridge::new(sensor.clone(), waiter());
    let first = bridge.capture_once(EVENT_CHANGE);
    let all = bridge.counter(EVENT_CHANGE);

    sensor.start(Duration::from_millis(20)).unwrap();
    bridge.await_count(&all, 4).await.unwrap();
    assert_eq!(first.flag().count(), 1);
    assert_eq!(sensor.remove_all_listeners(EVENT_CHANGE), 1);
}

#[tokio::test]
async fn seeded_sensors_agree() {
    let options = SensorOptions::default();
    let left = SimulatedSensor::spawn(options.clone());
    let right = SimulatedSensor::spawn(options);
    let mut left_bridge = EventBridge::new(left.clone(), waiter());
    let mut right_bridge = EventBridge::new(right.clone(), waiter());
    let left_slot = left_bridge.capture(EVENT_CHANGE);
    let right_slot = right_bridge.capture(EVENT_CHANGE);

    left.request_reading().unwrap();
    right.request_reading().unwrap();
    left_bridge.await_event(&left_slot).await.unwrap();
    right_bridge.await_event(&right_slot).await.unwrap();

    let a: SensorReading = left_slot.decode().unwrap();
    let b: SensorReading = right_slot.decode().unwrap();
    assert_eq!((a.x, a.y, a.z), (b.x, b.y, b.z));
}

#[tokio::test]
async fn sensor_terminate_emits_one_exit() {
    let sensor = SimulatedSensor::spawn(SensorOptions::default());
    let mut bridge = EventBridge::new(sensor.clone(), waiter());
    let exit = bridge.capture(EVENT_EXIT);

    sensor.start(Duration::from_millis(20)).unwrap();
    bridge.terminate().unwrap();
    bridge.terminate().unwrap();
    bridge.await_event(&exit).await.unwrap();
    sensor.join().await;
    assert_eq!(exit.flag().count(), 1);
    assert!(matches!(
        sensor.start(Duration::from_millis(20)),
        Err(BridgeError::TargetClosed("sensor"))
    ));
}
