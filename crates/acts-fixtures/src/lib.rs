//! ---
//! acts_section: "04-reference-fixtures"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Reference external objects for bridge conformance suites."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
//! Deterministic stand-ins for the platform objects conformance suites
//! drive: an echo worker and a simulated sensor. Both deliver callbacks
//! from their own tokio task and implement [`acts_bridge::EventTarget`].
#![warn(missing_docs)]

pub mod sensor;
pub mod worker;

pub use sensor::{SensorKind, SensorOptions, SensorReading, SimulatedSensor};
pub use worker::{EchoWorker, WorkerOptions};
