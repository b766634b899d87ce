//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Serialisable suite reports and their renderings."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
use std::fmt::Write as _;
use std::time::Duration;

use acts_common::time::human_duration;
use acts_common::ReportFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

/// How a case ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed { message: String },
    TimedOut { timeout_ms: u64 },
    Skipped { reason: String },
}

impl CaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Failed { .. } | CaseOutcome::TimedOut { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "passed",
            CaseOutcome::Failed { .. } => "failed",
            CaseOutcome::TimedOut { .. } => "timed_out",
            CaseOutcome::Skipped { .. } => "skipped",
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
    #[serde(rename = "duration_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub duration: Duration,
}

/// Result of running one suite.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "duration_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub duration: Duration,
    pub cases: Vec<CaseReport>,
    /// `before_all`/`after_all` failures, which belong to no single case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hook_failures: Vec<String>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(CaseOutcome::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Skipped { .. }))
    }

    /// No failed case and no failed suite-level hook.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.hook_failures.is_empty()
    }

    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.name == name)
    }

    fn count(&self, predicate: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|case| predicate(&case.outcome)).count()
    }

    fn write_pretty(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "suite {}: {} passed, {} failed, {} skipped in {}",
            self.suite,
            self.passed(),
            self.failed(),
            self.skipped(),
            human_duration(self.duration)
        );
        for case in &self.cases {
            let mark = match &case.outcome {
                CaseOutcome::Passed => "PASS",
                CaseOutcome::Failed { .. } => "FAIL",
                CaseOutcome::TimedOut { .. } => "TIME",
                CaseOutcome::Skipped { .. } => "SKIP",
            };
            let _ = write!(out, "  {mark} {} ({})", case.name, human_duration(case.duration));
            match &case.outcome {
                CaseOutcome::Failed { message } => {
                    let _ = write!(out, ": {message}");
                }
                CaseOutcome::TimedOut { timeout_ms } => {
                    let _ = write!(out, ": no completion within {timeout_ms}ms");
                }
                CaseOutcome::Skipped { reason } => {
                    let _ = write!(out, ": {reason}");
                }
                CaseOutcome::Passed => {}
            }
            out.push('\n');
        }
        for failure in &self.hook_failures {
            let _ = writeln!(out, "  HOOK {failure}");
        }
    }
}

/// Reports of every suite in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.suites.iter().all(SuiteReport::is_success)
    }

    pub fn failed(&self) -> usize {
        self.suites.iter().map(SuiteReport::failed).sum()
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).context("failed to encode report as JSON")
            }
            ReportFormat::Yaml => {
                serde_yaml::to_string(self).context("failed to encode report as YAML")
            }
            ReportFormat::Pretty => {
                let mut out = String::new();
                for suite in &self.suites {
                    suite.write_pretty(&mut out);
                }
                let total: usize = self.suites.iter().map(|suite| suite.cases.len()).sum();
                let _ = writeln!(
                    out,
                    "{} suites, {} cases, {} failed",
                    self.suites.len(),
                    total,
                    self.failed()
                );
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SuiteReport {
        SuiteReport {
            suite: "WorkerTest".into(),
            started_at: Utc::now(),
            duration: Duration::from_millis(1250),
            cases: vec![
                CaseReport {
                    name: "post".into(),
                    outcome: CaseOutcome::Passed,
                    duration: Duration::from_millis(12),
                },
                CaseReport {
                    name: "exit".into(),
                    outcome: CaseOutcome::TimedOut { timeout_ms: 500 },
                    duration: Duration::from_millis(500),
                },
                CaseReport {
                    name: "error".into(),
                    outcome: CaseOutcome::Skipped {
                        reason: "filtered".into(),
                    },
                    duration: Duration::ZERO,
                },
            ],
            hook_failures: Vec::new(),
        }
    }

    #[test]
    fn counts() {
        let report = sample();
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn json_flattens_outcome() {
        let run = RunReport {
            suites: vec![sample()],
        };
        let text = run.render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let case = &value["suites"][0]["cases"][1];
        assert_eq!(case["status"], "timed_out");
        assert_eq!(case["timeout_ms"], 500);
        assert_eq!(case["duration_ms"], 500);
    }

    #[test]
    fn yaml_parses_back() {
        let run = RunReport {
            suites: vec![sample()],
        };
        let text = run.render(ReportFormat::Yaml).unwrap();
        let parsed: RunReport = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.suites[0].cases, run.suites[0].cases);
    }

    #[test]
    fn pretty_lists_every_case() {
        let run = RunReport {
            suites: vec![sample()],
        };
        let text = run.render(ReportFormat::Pretty).unwrap();
        assert!(text.starts_with("suite WorkerTest: 1 passed, 1 failed, 1 skipped in 1.250s"));
        assert!(text.contains("  TIME exit (500ms): no completion within 500ms"));
        assert!(text.contains("1 suites, 3 cases, 1 failed"));
    }
}
