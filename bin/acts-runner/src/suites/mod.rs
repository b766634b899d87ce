//! ---
//! acts_section: "07-runner-cli"
//! acts_subsection: "binary"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Built-in conformance suites and their shared context."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::future::Future;
use std::sync::Arc;

use acts_bridge::{BridgeMetrics, EventBridge, EventTarget, FlagWaiter, WaitPolicy};
use acts_common::HarnessConfig;
use acts_fixtures::{SensorOptions, WorkerOptions};
use acts_testharness::Suite;

pub mod sensor;
pub mod worker;

/// Which built-in suites to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Worker,
    Sensor,
    All,
}

/// Configuration and metrics handed to every case.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    config: Arc<HarnessConfig>,
    metrics: Option<BridgeMetrics>,
}

impl SuiteContext {
    pub fn new(config: HarnessConfig, metrics: Option<BridgeMetrics>) -> Self {
        Self {
            config: Arc::new(config),
            metrics,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn worker_options(&self) -> WorkerOptions {
        WorkerOptions::from(&self.config.fixtures)
    }

    pub fn sensor_options(&self) -> SensorOptions {
        SensorOptions::from(&self.config.fixtures)
    }

    pub fn waiter(&self) -> FlagWaiter {
        let waiter = FlagWaiter::new(WaitPolicy::from(&self.config.bridge));
        match &self.metrics {
            Some(metrics) => waiter.with_metrics(metrics.clone()),
            None => waiter,
        }
    }

    pub fn bridge<T: EventTarget + ?Sized>(&self, target: Arc<T>) -> EventBridge<T> {
        EventBridge::new(target, self.waiter())
    }
}

/// Adapt an `async fn(SuiteContext)` into a case body.
pub(crate) fn with_context<F, Fut>(
    context: &SuiteContext,
    body: F,
) -> impl Fn() -> Fut + Send + Sync + 'static
where
    F: Fn(SuiteContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let context = context.clone();
    move || body(context.clone())
}

pub fn build(selection: Selection, context: &SuiteContext) -> Vec<Suite> {
    match selection {
        Selection::Worker => vec![worker::suite(context)],
        Selection::Sensor => vec![sensor::suite(context)],
        Selection::All => vec![worker::suite(context), sensor::suite(context)],
    }
}
