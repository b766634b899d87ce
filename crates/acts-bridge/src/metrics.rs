//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Prometheus metrics for captured events and waits."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::time::Duration;

use acts_metrics::SharedRegistry;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Metrics published by the event bridge.
#[derive(Clone)]
pub struct BridgeMetrics {
    registry: SharedRegistry,
    events_captured_total: IntCounterVec,
    waits_total: IntCounterVec,
    wait_seconds: HistogramVec,
    wait_ticks: HistogramVec,
}

impl BridgeMetrics {
    /// Register the bridge metric family against the provided registry.
    pub fn new(registry: SharedRegistry) -> prometheus::Result<Self> {
        let events_captured_total = IntCounterVec::new(
            Opts::new(
                "acts_bridge_events_captured_total",
                "Events recorded by bridge callbacks",
            ),
            &["target", "event"],
        )?;
        registry.register(Box::new(events_captured_total.clone()))?;

        let waits_total = IntCounterVec::new(
            Opts::new(
                "acts_bridge_waits_total",
                "Completed flag waits by mode and outcome",
            ),
            &["mode", "outcome"],
        )?;
        registry.register(Box::new(waits_total.clone()))?;

        let histogram_opts = HistogramOpts::new(
            "acts_bridge_wait_seconds",
            "Time spent suspended in flag waits",
        )
        .buckets(prometheus::exponential_buckets(0.001, 2.0, 16)?);
        let wait_seconds = HistogramVec::new(histogram_opts, &["mode"])?;
        registry.register(Box::new(wait_seconds.clone()))?;

        let wait_ticks = HistogramVec::new(
            HistogramOpts::new("acts_bridge_wait_ticks", "Poll ticks consumed per wait")
                .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
            &["mode"],
        )?;
        registry.register(Box::new(wait_ticks.clone()))?;

        Ok(Self {
            registry,
            events_captured_total,
            waits_total,
            wait_seconds,
            wait_ticks,
        })
    }

    /// Expose the underlying shared registry for convenience.
    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// Count one event recorded by a bridge callback.
    pub fn inc_captured(&self, target: &str, event: &str) {
        self.events_captured_total
            .with_label_values(&[target, event])
            .inc();
    }

    /// Record a finished wait. `mode` is `poll` or `event`.
    pub fn observe_wait(&self, mode: &str, timed_out: bool, elapsed: Duration, ticks: u64) {
        let outcome = if timed_out { "timeout" } else { "signalled" };
        self.waits_total.with_label_values(&[mode, outcome]).inc();
        self.wait_seconds
            .with_label_values(&[mode])
            .observe(elapsed.as_secs_f64());
        self.wait_ticks
            .with_label_values(&[mode])
            .observe(ticks as f64);
    }
}

impl std::fmt::Debug for BridgeMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeMetrics").finish_non_exhaustive()
    }
}
