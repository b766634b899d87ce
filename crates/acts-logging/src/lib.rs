//! ---
//! acts_section: "03-logging-metrics"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Structured logging context and convenience macros."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for tests and development.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer().with_test_writer())
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Suite (describe block) the event belongs to.
    pub suite: Option<&'a str>,
    /// Case (it block) the event belongs to.
    pub case: Option<&'a str>,
    /// Kind of external object involved, e.g. `worker` or `sensor`.
    pub target: Option<&'a str>,
    /// Poll tick or occurrence counter.
    pub tick: Option<u64>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a suite name.
    pub fn with_suite(mut self, suite: &'a str) -> Self {
        self.suite = Some(suite);
        self
    }

    /// Attach a case name.
    pub fn with_case(mut self, case: &'a str) -> Self {
        self.case = Some(case);
        self
    }

    /// Attach the external object kind.
    pub fn with_target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach a tick value.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }
}

/// Outcome used when emitting case lifecycle log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseEventOutcome {
    /// The case or hook completed successfully.
    Pass,
    /// The case failed an assertion or returned an error.
    Fail,
    /// The case exceeded its deadline.
    Timeout,
}

impl CaseEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            CaseEventOutcome::Pass => "pass",
            CaseEventOutcome::Fail => "fail",
            CaseEventOutcome::Timeout => "timeout",
        }
    }

    fn is_failure(&self) -> bool {
        !matches!(self, CaseEventOutcome::Pass)
    }
}

/// Emit a standardized case lifecycle event.
pub fn log_case_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: CaseEventOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    let suite = ctx.suite.unwrap_or("");
    let case = ctx.case.unwrap_or("");
    let target = ctx.target.unwrap_or("");
    let tick = ctx.tick.unwrap_or_default();
    let outcome_str = outcome.as_str();
    // `tracing::event!` needs a constant level, so dispatch per level.
    if outcome.is_failure() {
        tracing::error!(event, outcome = outcome_str, suite, case, object = target, tick, message = %message);
    } else {
        tracing::info!(event, outcome = outcome_str, suite, case, object = target, tick, message = %message);
    }
}
