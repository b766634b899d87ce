//! ---
//! acts_section: "01-core-functionality"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Shared primitives and utilities for the bridge workspace."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
//! Core shared primitives for the ACTS bridge workspace.
//! This crate exposes configuration loading, tracing setup, and duration
//! helpers consumed across the workspace.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{
    BridgeConfig, FixtureConfig, HarnessConfig, LoadedHarnessConfig, LoggingConfig, ReportFormat,
    RunnerConfig,
};
pub use logging::{init_tracing, LogFormat};
