//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Conformance runner surface and shared exports."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
//! Consumer side of the bridge: `describe`/`it` style suites with
//! lifecycle hooks, `expect` matchers and serialisable reports.
//!
//! ```no_run
//! use acts_testharness::{expect, Suite, SuiteRunner};
//!
//! # async fn demo() {
//! let suite = Suite::new("MathTest").it("adds", None, || async {
//!     expect(1 + 1).assert_equal(2)?;
//!     Ok(())
//! });
//! let report = SuiteRunner::default().run(&suite).await;
//! assert!(report.is_success());
//! # }
//! ```

pub mod assert;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod suite;

pub use assert::{expect, AssertResult, AssertionError, Expectation, Haystack, Numeric};
pub use metrics::HarnessMetrics;
pub use report::{CaseOutcome, CaseReport, RunReport, SuiteReport};
pub use runner::{RunOptions, SuiteRunner};
pub use suite::{Case, CaseBody, CaseFuture, HookKind, Suite};
