//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "tests"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Suite runner lifecycle, isolation and reporting."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Duration;

use acts_testharness::{expect, CaseOutcome, HarnessMetrics, RunOptions, Suite, SuiteRunner};
use parking_lot::Mutex;

type Trace = Arc<Mutex<Vec<String>>>;

fn recorder(
    trace: &Trace,
    entry: &'static str,
) -> impl Fn() -> Ready<anyhow::Result<()>> + Send + Sync + 'static {
    let trace = trace.clone();
    move || {
        trace.lock().push(entry.to_owned());
        ready(Ok(()))
    }
}

#[tokio::test]
async fn hooks_wrap_every_selected_case() {
    acts_logging::init();
    let trace: Trace = Arc::default();
    let suite = Suite::new("Lifecycle")
        .before_all(recorder(&trace, "before_all"))
        .before_each(recorder(&trace, "before_each"))
        .after_each(recorder(&trace, "after_each"))
        .after_all(recorder(&trace, "after_all"))
        .it("one", None, recorder(&trace, "one"))
        .it("two", None, recorder(&trace, "two"));

    let report = SuiteRunner::default().run(&suite).await;
    assert!(report.is_success());
    assert_eq!(
        *trace.lock(),
        vec![
            "before_all",
            "before_each",
            "one",
            "after_each",
            "before_each",
            "two",
            "after_each",
            "after_all",
        ]
    );
}

#[tokio::test]
async fn failures_stay_with_their_case() {
    let suite = Suite::new("Isolation")
        .it("asserts", None, || async {
            expect("hello".to_owned()).assert_contain("world")?;
            Ok(())
        })
        .it("panics", None, || async {
            let values: Vec<u8> = Vec::new();
            expect(values[3]).assert_equal(0)?;
            Ok(())
        })
        .it("passes", None, || async {
            expect(2 + 2).assert_equal(4)?;
            Ok(())
        });

    let report = SuiteRunner::default().run(&suite).await;
    assert_eq!(report.failed(), 2);
    assert_eq!(report.passed(), 1);
    match &report.case("asserts").unwrap().outcome {
        CaseOutcome::Failed { message } => assert!(message.starts_with("assert_contain")),
        other => panic!("unexpected outcome {other:?}"),
    }
    match &report.case("panics").unwrap().outcome {
        CaseOutcome::Failed { message } => assert!(message.starts_with("panicked")),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn hung_cases_time_out() {
    let suite = Suite::new("Liveness")
        .it("never signalled", Some(Duration::from_millis(250)), || async {
            std::future::pending::<()>().await;
            Ok(())
        })
        .it("default deadline", None, || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

    let runner = SuiteRunner::new(RunOptions {
        case_timeout: Duration::from_secs(1),
        ..RunOptions::default()
    });
    let report = runner.run(&suite).await;
    assert_eq!(
        report.case("never signalled").unwrap().outcome,
        CaseOutcome::TimedOut { timeout_ms: 250 }
    );
    assert_eq!(
        report.case("default deadline").unwrap().outcome,
        CaseOutcome::TimedOut { timeout_ms: 1000 }
    );
}

#[tokio::test]
async fn filter_and_fail_fast_skip_cases() {
    let suite = || {
        Suite::new("Selection")
            .it("worker fails", None, || async { anyhow::bail!("no reply") })
            .it("worker passes", None, || async { Ok(()) })
            .it("sensor passes", None, || async { Ok(()) })
    };

    let filtered = SuiteRunner::new(RunOptions {
        filter: Some("sensor".into()),
        ..RunOptions::default()
    })
    .run(&suite())
    .await;
    assert_eq!(filtered.passed(), 1);
    assert_eq!(filtered.skipped(), 2);
    assert!(filtered.is_success());

    let fast = SuiteRunner::new(RunOptions {
        fail_fast: true,
        ..RunOptions::default()
    })
    .run(&suite())
    .await;
    assert_eq!(fast.failed(), 1);
    assert_eq!(fast.skipped(), 2);
}

#[tokio::test]
async fn failed_before_all_fails_every_case() {
    let ran: Trace = Arc::default();
    let suite = Suite::new("Setup")
        .before_all(|| async { anyhow::bail!("device unavailable") })
        .it("a", None, recorder(&ran, "a"))
        .it("b", None, recorder(&ran, "b"));

    let report = SuiteRunner::default().run(&suite).await;
    assert!(ran.lock().is_empty());
    assert_eq!(report.failed(), 2);
    assert_eq!(report.hook_failures.len(), 1);
    assert!(report.hook_failures[0].contains("device unavailable"));
}

#[tokio::test]
async fn failed_before_all_leaves_filtered_cases_skipped() {
    let suite = Suite::new("Setup")
        .before_all(|| async { anyhow::bail!("device unavailable") })
        .it("sensor reading", None, || async { Ok(()) })
        .it("worker echo", None, || async { Ok(()) });

    let report = SuiteRunner::new(RunOptions {
        filter: Some("sensor".into()),
        ..RunOptions::default()
    })
    .run(&suite)
    .await;
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(
        report.case("worker echo").map(|case| case.outcome.clone()),
        Some(CaseOutcome::Skipped {
            reason: "filtered out".into()
        })
    );
}

#[tokio::test]
async fn after_each_failure_marks_passing_case() {
    let suite = Suite::new("Teardown")
        .after_each(|| async { anyhow::bail!("listener leak") })
        .it("clean", None, || async { Ok(()) });
    let report = SuiteRunner::default().run(&suite).await;
    match &report.case("clean").unwrap().outcome {
        CaseOutcome::Failed { message } => {
            assert_eq!(message, "after_each hook failed: listener leak")
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn metrics_count_outcomes() {
    let registry = acts_metrics::new_registry();
    let metrics = HarnessMetrics::new(&registry).unwrap();
    let suite = Suite::new("Counted")
        .it("ok", None, || async { Ok(()) })
        .it("bad", None, || async { anyhow::bail!("nope") });
    SuiteRunner::default()
        .with_metrics(metrics)
        .run(&suite)
        .await;

    let text = acts_metrics::render(&registry).unwrap();
    assert!(text.contains("acts_cases_total{outcome=\"passed\",suite=\"Counted\"} 1"));
    assert!(text.contains("acts_cases_total{outcome=\"failed\",suite=\"Counted\"} 1"));
}
