//! ---
//! acts_section: "04-reference-fixtures"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Simulated sensor emitting seeded readings on a tokio interval."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use acts_bridge::{
    BridgeError, Event, EventHandler, EventTarget, HandlerRegistry, ListenerId, Result,
    EVENT_CHANGE,
};
use acts_common::FixtureConfig;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

const KIND: &str = "sensor";

/// Physical quantity the simulated sensor reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorKind {
    /// Linear acceleration including gravity, m/s².
    Accelerometer,
    /// Angular velocity, rad/s.
    Gyroscope,
    /// Ambient magnetic field, µT.
    MagneticField,
}

impl SensorKind {
    /// Resting value the noise is added to.
    fn baseline(self) -> [f64; 3] {
        match self {
            SensorKind::Accelerometer => [0.0, 0.0, 9.81],
            SensorKind::Gyroscope => [0.0, 0.0, 0.0],
            SensorKind::MagneticField => [22.0, -5.0, -42.0],
        }
    }

    fn noise(self) -> f64 {
        match self {
            SensorKind::Accelerometer => 0.5,
            SensorKind::Gyroscope => 0.05,
            SensorKind::MagneticField => 2.0,
        }
    }
}

/// Payload of a `change` event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// X axis component.
    pub x: f64,
    /// Y axis component.
    pub y: f64,
    /// Z axis component.
    pub z: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Settings for a [`SimulatedSensor`].
#[derive(Debug, Clone, PartialEq)]
pub struct SensorOptions {
    /// Quantity to simulate.
    pub kind: SensorKind,
    /// RNG seed; equal seeds produce equal reading sequences.
    pub seed: u64,
    /// Smallest interval accepted by [`SimulatedSensor::start`].
    pub min_interval: Duration,
}

impl Default for SensorOptions {
    fn default() -> Self {
        let config = FixtureConfig::default();
        Self::from(&config)
    }
}

impl From<&FixtureConfig> for SensorOptions {
    fn from(config: &FixtureConfig) -> Self {
        Self {
            kind: SensorKind::Accelerometer,
            seed: config.sensor_seed,
            min_interval: config.sensor_min_interval,
        }
    }
}

impl SensorOptions {
    /// Replace the simulated quantity.
    pub fn with_kind(mut self, kind: SensorKind) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Debug)]
enum Command {
    Start(Duration),
    Stop,
    Sample,
    Dispatch(Event),
}

/// Sensor that emits `change` events while started.
pub struct SimulatedSensor {
    options: SensorOptions,
    registry: Arc<HandlerRegistry>,
    commands: Mutex<Option<mpsc::UnboundedSender<Command>>>,
    terminated: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedSensor {
    /// Spawn the sensor task on the current runtime. Nothing is emitted
    /// until [`SimulatedSensor::start`] or [`SimulatedSensor::request_reading`].
    pub fn spawn(options: SensorOptions) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = Arc::new(HandlerRegistry::new());
        let task = tokio::spawn(run_sensor(options.clone(), registry.clone(), rx));
        debug!(target: "acts::fixtures::sensor", kind = %options.kind, seed = options.seed, "sensor spawned");
        Arc::new(Self {
            options,
            registry,
            commands: Mutex::new(Some(tx)),
            terminated: AtomicBool::new(false),
            task: Mutex::new(Some(task)),
        })
    }

    /// Options the sensor was spawned with.
    pub fn options(&self) -> &SensorOptions {
        &self.options
    }

    /// Begin emitting a reading every `interval`. Restarting replaces the
    /// previous interval.
    pub fn start(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(BridgeError::InvalidArgument(
                "sensor interval must be greater than zero".to_owned(),
            ));
        }
        if interval < self.options.min_interval {
            return Err(BridgeError::InvalidArgument(format!(
                "sensor interval {}ms is below the minimum of {}ms",
                interval.as_millis(),
                self.options.min_interval.as_millis()
            )));
        }
        self.send(Command::Start(interval))
    }

    /// Pause emission. Listeners stay registered.
    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    /// Emit a single reading regardless of whether the sensor is started.
    pub fn request_reading(&self) -> Result<()> {
        self.send(Command::Sample)
    }

    /// Wait for the sensor task to finish.
    pub async fn join(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        let guard = self.commands.lock();
        let tx = guard.as_ref().ok_or(BridgeError::TargetClosed(KIND))?;
        tx.send(command).map_err(|_| BridgeError::TargetClosed(KIND))
    }
}

impl EventTarget for SimulatedSensor {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn add_listener(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.registry.add(event, handler)
    }

    fn add_listener_once(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.registry.add_once(event, handler)
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        self.registry.remove(event, id)
    }

    fn remove_all_listeners(&self, event: &str) -> usize {
        self.registry.remove_all(event)
    }

    fn dispatch(&self, event: Event) -> Result<()> {
        self.send(Command::Dispatch(event))
    }

    fn terminate(&self) -> Result<()> {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.commands.lock().take();
        info!(target: "acts::fixtures::sensor", kind = %self.options.kind, "sensor terminating");
        Ok(())
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for SimulatedSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSensor")
            .field("options", &self.options)
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}

async fn run_sensor(
    options: SensorOptions,
    registry: Arc<HandlerRegistry>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut ticker: Option<Interval> = None;
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Start(period)) => {
                    debug!(target: "acts::fixtures::sensor", period_ms = period.as_millis() as u64, "sensor started");
                    ticker = Some(reading_interval(period));
                }
                Some(Command::Stop) => {
                    debug!(target: "acts::fixtures::sensor", "sensor stopped");
                    ticker = None;
                }
                Some(Command::Sample) => emit_reading(&registry, options.kind, &mut rng),
                Some(Command::Dispatch(event)) => {
                    registry.emit(&event);
                }
                None => break,
            },
            _ = next_tick(&mut ticker) => emit_reading(&registry, options.kind, &mut rng),
        }
    }
    registry.emit(&Event::exit(0));
    info!(target: "acts::fixtures::sensor", kind = %options.kind, "sensor exited");
}

fn reading_interval(period: Duration) -> Interval {
    // First reading one full period after start.
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn sample(kind: SensorKind, rng: &mut StdRng) -> SensorReading {
    let [x, y, z] = kind.baseline();
    let noise = kind.noise();
    SensorReading {
        x: x + rng.gen_range(-noise..noise),
        y: y + rng.gen_range(-noise..noise),
        z: z + rng.gen_range(-noise..noise),
        timestamp: Utc::now().timestamp_millis(),
    }
}

fn emit_reading(registry: &HandlerRegistry, kind: SensorKind, rng: &mut StdRng) {
    let reading = sample(kind, rng);
    match serde_json::to_value(reading) {
        Ok(payload) => {
            registry.emit(&Event::new(EVENT_CHANGE, payload));
        }
        Err(err) => {
            debug!(target: "acts::fixtures::sensor", error = %err, "reading not serialisable");
        }
    }
}
