//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Prometheus counters for suite and case outcomes."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
use std::time::Duration;

use acts_metrics::SharedRegistry;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Metrics published by the suite runner.
#[derive(Clone)]
pub struct HarnessMetrics {
    cases_total: IntCounterVec,
    case_seconds: HistogramVec,
    hook_failures_total: IntCounterVec,
}

impl HarnessMetrics {
    pub fn new(registry: &SharedRegistry) -> prometheus::Result<Self> {
        let cases_total = IntCounterVec::new(
            Opts::new("acts_cases_total", "Finished cases by suite and outcome"),
            &["suite", "outcome"],
        )?;
        registry.register(Box::new(cases_total.clone()))?;

        let case_seconds = HistogramVec::new(
            HistogramOpts::new("acts_case_duration_seconds", "Wall time spent per case")
                .buckets(prometheus::exponential_buckets(0.005, 2.0, 14)?),
            &["suite"],
        )?;
        registry.register(Box::new(case_seconds.clone()))?;

        let hook_failures_total = IntCounterVec::new(
            Opts::new("acts_hook_failures_total", "Failed lifecycle hooks by kind"),
            &["suite", "hook"],
        )?;
        registry.register(Box::new(hook_failures_total.clone()))?;

        Ok(Self {
            cases_total,
            case_seconds,
            hook_failures_total,
        })
    }

    pub fn record_case(&self, suite: &str, outcome: &str, elapsed: Duration) {
        self.cases_total.with_label_values(&[suite, outcome]).inc();
        self.case_seconds
            .with_label_values(&[suite])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_hook_failure(&self, suite: &str, hook: &str) {
        self.hook_failures_total
            .with_label_values(&[suite, hook])
            .inc();
    }
}

impl std::fmt::Debug for HarnessMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessMetrics").finish_non_exhaustive()
    }
}
