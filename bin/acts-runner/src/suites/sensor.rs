//! ---
//! acts_section: "07-runner-cli"
//! acts_subsection: "binary"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Sensor subscription cases driven through the event bridge."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::time::Duration;

use acts_bridge::{BridgeError, EventTarget, EVENT_CHANGE, EVENT_EXIT};
use acts_fixtures::{SensorReading, SimulatedSensor};
use acts_testharness::{expect, Suite};

use super::{with_context, SuiteContext};

const READINGS: u64 = 3;

pub fn suite(context: &SuiteContext) -> Suite {
    Suite::new("SensorTest")
        .it(
            "readings arrive while subscribed",
            None,
            with_context(context, readings_arrive),
        )
        .it(
            "interval below minimum is rejected",
            None,
            with_context(context, short_interval_rejected),
        )
        .it(
            "once listener receives a single reading",
            None,
            with_context(context, once_listener),
        )
        .it(
            "stop pauses emission",
            None,
            with_context(context, stop_pauses),
        )
        .it(
            "terminate emits exactly one exit",
            None,
            with_context(context, terminate_once),
        )
}

fn interval(context: &SuiteContext) -> Duration {
    context.config().fixtures.sensor_interval
}

async fn readings_arrive(context: SuiteContext) -> anyhow::Result<()> {
    let sensor = SimulatedSensor::spawn(context.sensor_options());
    let mut bridge = context.bridge(sensor.clone());
    let latest = bridge.capture(EVENT_CHANGE);
    let changes = bridge.counter(EVENT_CHANGE);

    sensor.start(interval(&context))?;
    let observed = bridge.await_count(&changes, READINGS).await?;
    expect(observed).assert_larger(READINGS - 1)?;

    let reading: SensorReading = latest.decode()?;
    expect(reading.timestamp).assert_larger(0)?;
    expect(reading.z).assert_close(9.81, 0.5)?;
    sensor.terminate()?;
    Ok(())
}

async fn short_interval_rejected(context: SuiteContext) -> anyhow::Result<()> {
    let options = context.sensor_options();
    let too_short = options
        .min_interval
        .checked_sub(Duration::from_millis(1))
        .unwrap_or_default();
    let sensor = SimulatedSensor::spawn(options);
    for interval in [Duration::ZERO, too_short] {
        let result = sensor.start(interval);
        expect(matches!(result, Err(BridgeError::InvalidArgument(_)))).assert_true()?;
    }
    sensor.terminate()?;
    Ok(())
}

async fn once_listener(context: SuiteContext) -> anyhow::Result<()> {
    let sensor = SimulatedSensor::spawn(context.sensor_options());
    let mut bridge = context.bridge(sensor.clone());
    let first = bridge.capture_once(EVENT_CHANGE);
    let all = bridge.counter(EVENT_CHANGE);

    sensor.start(interval(&context))?;
    bridge.await_count(&all, READINGS).await?;
    expect(first.flag().count()).assert_equal(1)?;
    sensor.terminate()?;
    Ok(())
}

async fn stop_pauses(context: SuiteContext) -> anyhow::Result<()> {
    let period = interval(&context);
    let sensor = SimulatedSensor::spawn(context.sensor_options());
    let mut bridge = context.bridge(sensor.clone());
    let changes = bridge.counter(EVENT_CHANGE);

    sensor.start(period)?;
    bridge.await_count(&changes, 1).await?;
    sensor.stop()?;
    tokio::time::sleep(period / 4).await;
    let paused_at = changes.count();
    tokio::time::sleep(period * 3).await;
    expect(changes.count()).assert_equal(paused_at)?;
    sensor.terminate()?;
    Ok(())
}

async fn terminate_once(context: SuiteContext) -> anyhow::Result<()> {
    let sensor = SimulatedSensor::spawn(context.sensor_options());
    let mut bridge = context.bridge(sensor.clone());
    let exit = bridge.capture(EVENT_EXIT);

    sensor.start(interval(&context))?;
    bridge.terminate()?;
    bridge.terminate()?;
    bridge.await_event(&exit).await?;
    sensor.join().await;
    expect(exit.flag().count()).assert_equal(1)?;
    expect(sensor.is_terminated()).assert_true()?;
    Ok(())
}
