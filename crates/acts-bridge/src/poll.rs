//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Deferred poll primitive used as a cooperative yield point."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::time::{sleep, Sleep};

/// Tick length used when no configuration is supplied.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One poll tick. Resolves with `()` once the interval has elapsed.
#[derive(Debug)]
#[must_use = "a poll token does nothing unless awaited"]
pub struct PollToken {
    sleep: Pin<Box<Sleep>>,
}

impl Future for PollToken {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.sleep.as_mut().poll(cx)
    }
}

/// Create a fresh poll token for a single wait iteration.
pub fn poll_tick(interval: Duration) -> PollToken {
    PollToken {
        sleep: Box::pin(sleep(interval)),
    }
}

/// Issues poll tokens at a fixed interval and counts completed ticks.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    ticks: u64,
}

impl Poller {
    /// Create a poller with the provided tick length.
    pub fn new(interval: Duration) -> Self {
        Self { interval, ticks: 0 }
    }

    /// Configured tick length.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Await one tick.
    pub async fn tick(&mut self) {
        poll_tick(self.interval).await;
        self.ticks += 1;
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
