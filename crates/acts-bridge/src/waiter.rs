//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Flag-gated waiter with poll and event-driven modes."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::time::Duration;

use acts_common::BridgeConfig;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

use crate::flag::SignalFlag;
use crate::metrics::BridgeMetrics;
use crate::poll::{Poller, DEFAULT_POLL_INTERVAL};
use crate::{BridgeError, Result};

const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Tick length and deadline applied to every wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between predicate checks in poll mode.
    pub poll_interval: Duration,
    /// Deadline for the whole wait; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl WaitPolicy {
    /// Policy with an explicit interval and deadline.
    pub fn new(poll_interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Policy without a deadline. A missing event suspends the caller forever.
    pub fn unbounded(poll_interval: Duration) -> Self {
        Self::new(poll_interval, None)
    }

    /// Replace the deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, Some(DEFAULT_WAIT_TIMEOUT))
    }
}

impl From<&BridgeConfig> for WaitPolicy {
    fn from(config: &BridgeConfig) -> Self {
        Self::new(config.poll_interval, config.wait_deadline())
    }
}

/// Summary of a completed wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitReport {
    /// Poll ticks consumed; always zero for event-driven waits.
    pub ticks: u64,
    /// Time spent suspended.
    pub elapsed: Duration,
}

/// Suspends a test procedure until a flag or predicate is satisfied.
#[derive(Debug, Clone, Default)]
pub struct FlagWaiter {
    policy: WaitPolicy,
    metrics: Option<BridgeMetrics>,
}

impl FlagWaiter {
    /// Create a waiter with the provided policy.
    pub fn new(policy: WaitPolicy) -> Self {
        Self {
            policy,
            metrics: None,
        }
    }

    /// Record wait outcomes into the provided metrics handle.
    pub fn with_metrics(mut self, metrics: BridgeMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Active policy.
    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Metrics handle, if one was attached.
    pub fn metrics(&self) -> Option<&BridgeMetrics> {
        self.metrics.as_ref()
    }

    /// Check `predicate`, awaiting one poll tick between checks until it holds.
    ///
    /// Every unsuccessful check is followed by a suspension, so the loop
    /// never spins. Fails with [`BridgeError::WaitTimeout`] once the policy
    /// deadline expires.
    pub async fn wait_until<F>(&self, label: &str, mut predicate: F) -> Result<WaitReport>
    where
        F: FnMut() -> bool,
    {
        let start = Instant::now();
        let mut poller = Poller::new(self.policy.poll_interval);
        let polling = async {
            while !predicate() {
                poller.tick().await;
            }
        };
        let signalled = match self.policy.timeout {
            Some(deadline) => timeout(deadline, polling).await.is_ok(),
            None => {
                polling.await;
                true
            }
        };
        let report = WaitReport {
            ticks: poller.ticks(),
            elapsed: start.elapsed(),
        };
        self.finish("poll", label, signalled, report)
    }

    /// Poll until the flag has been raised at least once.
    pub async fn poll_flag(&self, flag: &SignalFlag) -> Result<WaitReport> {
        self.wait_until(flag.name(), || flag.is_set()).await
    }

    /// Resume as soon as the flag is raised, without polling.
    pub async fn wait_flag(&self, flag: &SignalFlag) -> Result<WaitReport> {
        self.wait_count(flag, 1).await
    }

    /// Resume once the flag has been raised at least `min` times.
    pub async fn wait_count(&self, flag: &SignalFlag, min: u64) -> Result<WaitReport> {
        let start = Instant::now();
        let signalled = match self.policy.timeout {
            Some(deadline) => timeout(deadline, flag.reached(min)).await.is_ok(),
            None => {
                flag.reached(min).await;
                true
            }
        };
        let report = WaitReport {
            ticks: 0,
            elapsed: start.elapsed(),
        };
        self.finish("event", flag.name(), signalled, report)
    }

    fn finish(
        &self,
        mode: &str,
        label: &str,
        signalled: bool,
        report: WaitReport,
    ) -> Result<WaitReport> {
        if let Some(metrics) = &self.metrics {
            metrics.observe_wait(mode, !signalled, report.elapsed, report.ticks);
        }
        if signalled {
            debug!(
                target: "acts::bridge::waiter",
                label,
                mode,
                ticks = report.ticks,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "wait satisfied",
            );
            return Ok(report);
        }
        let waited = self.policy.timeout.unwrap_or(report.elapsed);
        warn!(
            target: "acts::bridge::waiter",
            label,
            mode,
            ticks = report.ticks,
            waited_ms = waited.as_millis() as u64,
            "wait timed out",
        );
        Err(BridgeError::WaitTimeout {
            label: label.to_owned(),
            waited,
            ticks: report.ticks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn poll_wait_returns_only_after_flag_is_raised() {
        let waiter = FlagWaiter::new(WaitPolicy::default());
        let flag = SignalFlag::new("message");
        let raiser = flag.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            raiser.raise();
        });

        let report = waiter.poll_flag(&flag).await.unwrap();
        assert!(flag.is_set());
        assert_eq!(report.ticks, 3);
        assert!(report.elapsed >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn every_failed_check_suspends() {
        let waiter = FlagWaiter::new(WaitPolicy::new(Duration::from_millis(10), None));
        let checks = AtomicUsize::new(0);
        let report = waiter
            .wait_until("counter", || checks.fetch_add(1, Ordering::SeqCst) >= 4)
            .await
            .unwrap();
        assert_eq!(checks.load(Ordering::SeqCst), 5);
        assert_eq!(report.ticks, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_wait_times_out() {
        let waiter = FlagWaiter::new(
            WaitPolicy::default().with_timeout(Duration::from_millis(350)),
        );
        let never = AtomicBool::new(false);
        let err = waiter
            .wait_until("never", || never.load(Ordering::SeqCst))
            .await
            .unwrap_err();
        match err {
            BridgeError::WaitTimeout {
                label,
                waited,
                ticks,
            } => {
                assert_eq!(label, "never");
                assert_eq!(waited, Duration::from_millis(350));
                assert_eq!(ticks, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn event_wait_counts_occurrences() {
        let waiter = FlagWaiter::new(WaitPolicy::default());
        let flag = SignalFlag::new("change");
        let raiser = flag.clone();
        tokio::spawn(async move {
            for _ in 0..4 {
                tokio::time::sleep(Duration::from_millis(30)).await;
                raiser.raise();
            }
        });
        let report = waiter.wait_count(&flag, 4).await.unwrap();
        assert_eq!(report.ticks, 0);
        assert_eq!(flag.count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn event_wait_times_out_and_records_metrics() {
        let registry = acts_metrics::new_registry();
        let metrics = BridgeMetrics::new(registry.clone()).unwrap();
        let waiter = FlagWaiter::new(
            WaitPolicy::default().with_timeout(Duration::from_millis(200)),
        )
        .with_metrics(metrics);
        let flag = SignalFlag::new("exit");
        let err = waiter.wait_flag(&flag).await.unwrap_err();
        assert!(matches!(err, BridgeError::WaitTimeout { ticks: 0, .. }));

        let text = acts_metrics::render(&registry).unwrap();
        assert!(text.contains("acts_bridge_waits_total{mode=\"event\",outcome=\"timeout\"} 1"));
    }

    #[test]
    fn policy_from_config() {
        let config = BridgeConfig {
            poll_interval: Duration::from_millis(20),
            wait_timeout: Duration::ZERO,
        };
        let policy = WaitPolicy::from(&config);
        assert_eq!(policy, WaitPolicy::unbounded(Duration::from_millis(20)));
    }
}
