//! ---
//! acts_section: "07-runner-cli"
//! acts_subsection: "binary"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Worker conformance cases driven through the event bridge."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use acts_bridge::{BridgeError, ErrorEvent, Event, EventTarget, EVENT_ERROR, EVENT_EXIT, EVENT_MESSAGE};
use acts_fixtures::EchoWorker;
use acts_testharness::{expect, Suite};
use serde_json::json;
use tracing::debug;

use super::{with_context, SuiteContext};

const TICK_EVENT: &str = "tick";
const TICK_DISPATCHES: u64 = 10;

pub fn suite(context: &SuiteContext) -> Suite {
    Suite::new("WorkerTest")
        .it(
            "terminate emits exactly one exit",
            None,
            with_context(context, terminate_once),
        )
        .it(
            "posted message is echoed with suffix",
            None,
            with_context(context, echo_reply),
        )
        .it(
            "queued dispatches are counted before the wait resolves",
            None,
            with_context(context, queued_dispatches),
        )
        .it(
            "messages after terminate are dropped",
            None,
            with_context(context, post_after_terminate),
        )
        .it(
            "non-string payload raises an error event",
            None,
            with_context(context, error_event),
        )
        .it(
            "poll mode observes the reply",
            None,
            with_context(context, poll_reply),
        )
}

async fn terminate_once(context: SuiteContext) -> anyhow::Result<()> {
    let worker = EchoWorker::spawn(context.worker_options());
    let mut bridge = context.bridge(worker.clone());
    let exit = bridge.capture(EVENT_EXIT);

    bridge.terminate()?;
    let event = bridge.await_event(&exit).await?;
    expect(event.exit_code()).assert_equal(Some(0))?;

    bridge.terminate()?;
    worker.join().await;
    expect(exit.flag().count()).assert_equal(1)?;
    Ok(())
}

async fn echo_reply(context: SuiteContext) -> anyhow::Result<()> {
    let options = context.worker_options();
    let expected = format!("hello world{}", options.suffix);
    let worker = EchoWorker::spawn(options);
    let mut bridge = context.bridge(worker.clone());
    let reply = bridge.capture(EVENT_MESSAGE);

    worker.post_message(json!("hello world"))?;
    let event = bridge.await_event(&reply).await?;
    expect(event.as_str().map(str::to_owned)).assert_equal(Some(expected))?;
    bridge.terminate()?;
    Ok(())
}

async fn queued_dispatches(context: SuiteContext) -> anyhow::Result<()> {
    let worker = EchoWorker::spawn(context.worker_options());
    let mut bridge = context.bridge(worker);
    let ticks = bridge.counter(TICK_EVENT);

    for n in 0..TICK_DISPATCHES {
        bridge.dispatch(Event::new(TICK_EVENT, json!(n)))?;
    }
    bridge.waiter().wait_flag(&ticks).await?;
    expect(ticks.count()).assert_equal(TICK_DISPATCHES)?;
    bridge.terminate()?;
    Ok(())
}

async fn post_after_terminate(context: SuiteContext) -> anyhow::Result<()> {
    let worker = EchoWorker::spawn(context.worker_options());
    let mut bridge = context.bridge(worker.clone());
    let replies = bridge.counter(EVENT_MESSAGE);
    let exit = bridge.capture(EVENT_EXIT);

    bridge.terminate()?;
    bridge.await_event(&exit).await?;
    let late = worker.post_message(json!("too late"));
    debug!(target: "acts::runner", result = ?late, "post after terminate");
    expect(matches!(late, Err(BridgeError::TargetClosed(_)))).assert_true()?;

    tokio::time::sleep(context.config().bridge.poll_interval).await;
    expect(replies.count()).assert_equal(0)?;
    Ok(())
}

async fn error_event(context: SuiteContext) -> anyhow::Result<()> {
    let worker = EchoWorker::spawn(context.worker_options());
    let mut bridge = context.bridge(worker.clone());
    let error = bridge.capture(EVENT_ERROR);

    worker.post_message(json!(42))?;
    let details: ErrorEvent = bridge.await_event(&error).await?.decode()?;
    expect(details.message).assert_contain("number")?;
    expect(details.filename).assert_equal(Some(worker.options().script.clone()))?;
    worker.terminate()?;
    Ok(())
}

async fn poll_reply(context: SuiteContext) -> anyhow::Result<()> {
    let worker = EchoWorker::spawn(context.worker_options());
    let mut bridge = context.bridge(worker.clone());
    let reply = bridge.capture(EVENT_MESSAGE);

    worker.post_message(json!("ping"))?;
    let event = bridge.poll_event(&reply).await?;
    expect(event.as_str().unwrap_or_default().to_owned()).assert_contain("ping")?;
    expect(worker.is_terminated()).assert_false()?;
    worker.terminate()?;
    Ok(())
}
