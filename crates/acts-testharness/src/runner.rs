//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Suite execution with per-case deadlines and failure isolation."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
use std::any::Any;
use std::time::Duration;

use acts_common::time::duration_to_millis;
use acts_common::RunnerConfig;
use acts_logging::{acts_info, acts_warn, log_case_event, CaseEventOutcome, LogContext};
use chrono::Utc;
use tokio::time::Instant;

use crate::metrics::HarnessMetrics;
use crate::report::{CaseOutcome, CaseReport, RunReport, SuiteReport};
use crate::suite::{Case, CaseFuture, HookKind, Suite};

const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs applied to every suite the runner executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Deadline for cases without their own timeout, and for hooks.
    pub case_timeout: Duration,
    /// Skip the remaining cases after the first failure.
    pub fail_fast: bool,
    /// Only run cases whose name contains this substring.
    pub filter: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            case_timeout: DEFAULT_CASE_TIMEOUT,
            fail_fast: false,
            filter: None,
        }
    }
}

impl From<&RunnerConfig> for RunOptions {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            case_timeout: config.case_timeout,
            fail_fast: config.fail_fast,
            filter: config.filter.clone(),
        }
    }
}

/// Executes suites and collects their reports.
///
/// Every hook and case body runs on its own tokio task, so a panic or an
/// error in one case is recorded against that case only.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    options: RunOptions,
    metrics: Option<HarnessMetrics>,
}

impl SuiteRunner {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: HarnessMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run `suites` in order. With fail-fast, suites after the first
    /// failing one are not started.
    pub async fn run_all(&self, suites: &[Suite]) -> RunReport {
        let mut report = RunReport::default();
        for suite in suites {
            let suite_report = self.run(suite).await;
            let failed = !suite_report.is_success();
            report.suites.push(suite_report);
            if failed && self.options.fail_fast {
                break;
            }
        }
        report
    }

    pub async fn run(&self, suite: &Suite) -> SuiteReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let context = LogContext::new().with_suite(suite.name());
        acts_info!(context = context, "suite started with {} cases", suite.cases().len());

        let mut hook_failures = Vec::new();
        let mut cases = Vec::with_capacity(suite.cases().len());
        match self.run_hooks(suite, HookKind::BeforeAll).await {
            Err(message) => {
                for case in suite.cases() {
                    let report = if self.selects(case.name()) {
                        CaseReport {
                            name: case.name().to_owned(),
                            outcome: CaseOutcome::Failed {
                                message: message.clone(),
                            },
                            duration: Duration::ZERO,
                        }
                    } else {
                        skipped(case, "filtered out")
                    };
                    self.record(suite.name(), &report);
                    cases.push(report);
                }
                hook_failures.push(message);
            }
            Ok(()) => {
                let mut halted = false;
                for case in suite.cases() {
                    let report = if !self.selects(case.name()) {
                        skipped(case, "filtered out")
                    } else if halted {
                        skipped(case, "fail-fast after an earlier failure")
                    } else {
                        self.run_case(suite, case).await
                    };
                    if report.outcome.is_failure() && self.options.fail_fast {
                        halted = true;
                    }
                    self.record(suite.name(), &report);
                    cases.push(report);
                }
            }
        }
        if let Err(message) = self.run_hooks(suite, HookKind::AfterAll).await {
            hook_failures.push(message);
        }

        let report = SuiteReport {
            suite: suite.name().to_owned(),
            started_at,
            duration: start.elapsed(),
            cases,
            hook_failures,
        };
        acts_info!(
            context = context,
            "suite finished: {} passed, {} failed, {} skipped",
            report.passed(),
            report.failed(),
            report.skipped()
        );
        report
    }

    fn selects(&self, name: &str) -> bool {
        match &self.options.filter {
            Some(filter) => name.contains(filter.as_str()),
            None => true,
        }
    }

    async fn run_case(&self, suite: &Suite, case: &Case) -> CaseReport {
        let start = Instant::now();
        let deadline = case.timeout().unwrap_or(self.options.case_timeout);
        let mut outcome = match self.run_hooks(suite, HookKind::BeforeEach).await {
            Err(message) => CaseOutcome::Failed { message },
            Ok(()) => execute(case.start(), deadline).await,
        };
        if let Err(message) = self.run_hooks(suite, HookKind::AfterEach).await {
            if !outcome.is_failure() {
                outcome = CaseOutcome::Failed { message };
            }
        }

        let context = LogContext::new()
            .with_suite(suite.name())
            .with_case(case.name());
        let (event_outcome, message) = match &outcome {
            CaseOutcome::Passed => (CaseEventOutcome::Pass, String::from("passed")),
            CaseOutcome::Failed { message } => (CaseEventOutcome::Fail, message.clone()),
            CaseOutcome::TimedOut { timeout_ms } => (
                CaseEventOutcome::Timeout,
                format!("no completion within {timeout_ms}ms"),
            ),
            CaseOutcome::Skipped { reason } => (CaseEventOutcome::Pass, reason.clone()),
        };
        log_case_event(Some(&context), "case.finished", &message, event_outcome);

        CaseReport {
            name: case.name().to_owned(),
            outcome,
            duration: start.elapsed(),
        }
    }

    async fn run_hooks(&self, suite: &Suite, kind: HookKind) -> Result<(), String> {
        for hook in suite.hooks(kind) {
            let failure = match execute(hook(), self.options.case_timeout).await {
                CaseOutcome::Passed | CaseOutcome::Skipped { .. } => continue,
                CaseOutcome::Failed { message } => format!("{} hook failed: {message}", kind.as_str()),
                CaseOutcome::TimedOut { timeout_ms } => {
                    format!("{} hook timed out after {timeout_ms}ms", kind.as_str())
                }
            };
            acts_warn!(
                context = LogContext::new().with_suite(suite.name()),
                "{failure}"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_hook_failure(suite.name(), kind.as_str());
            }
            return Err(failure);
        }
        Ok(())
    }

    fn record(&self, suite: &str, report: &CaseReport) {
        if let Some(metrics) = &self.metrics {
            metrics.record_case(suite, report.outcome.label(), report.duration);
        }
    }
}

fn skipped(case: &Case, reason: &str) -> CaseReport {
    CaseReport {
        name: case.name().to_owned(),
        outcome: CaseOutcome::Skipped {
            reason: reason.to_owned(),
        },
        duration: Duration::ZERO,
    }
}

/// Drive one body on its own task under `deadline`.
async fn execute(body: CaseFuture, deadline: Duration) -> CaseOutcome {
    let mut handle = tokio::spawn(body);
    match tokio::time::timeout(deadline, &mut handle).await {
        Ok(Ok(Ok(()))) => CaseOutcome::Passed,
        Ok(Ok(Err(err))) => CaseOutcome::Failed {
            message: format!("{err:#}"),
        },
        Ok(Err(join)) if join.is_panic() => CaseOutcome::Failed {
            message: format!("panicked: {}", panic_message(join.into_panic())),
        },
        Ok(Err(join)) => CaseOutcome::Failed {
            message: join.to_string(),
        },
        Err(_) => {
            handle.abort();
            CaseOutcome::TimedOut {
                timeout_ms: duration_to_millis(deadline),
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
