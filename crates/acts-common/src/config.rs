//! ---
//! acts_section: "01-core-functionality"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Harness configuration loading and validation."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_poll_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_wait_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_case_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_worker_suffix() -> String {
    " worker".to_owned()
}

fn default_sensor_seed() -> u64 {
    0x5E_750Bu64
}

fn default_sensor_min_interval() -> Duration {
    Duration::from_millis(5)
}

fn default_sensor_interval() -> Duration {
    Duration::from_millis(200)
}

/// Primary configuration object for bridge waits, the suite runner, and fixtures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// Metadata describing where a [`HarnessConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedHarnessConfig {
    pub config: HarnessConfig,
    /// `None` when no file was found and defaults are in effect.
    pub source: Option<PathBuf>,
}

impl HarnessConfig {
    pub const ENV_CONFIG_PATH: &str = "ACTS_CONFIG";

    /// Load configuration from disk, respecting the `ACTS_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        let loaded = Self::load_with_source(candidates)?;
        if loaded.source.is_none() {
            return Err(anyhow!(
                "no configuration files found. inspected: {}",
                candidates
                    .iter()
                    .map(|p| p.as_ref().display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        Ok(loaded.config)
    }

    /// Load configuration from the first existing source, falling back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedHarnessConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedHarnessConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedHarnessConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!("no configuration file found; using defaults");
        Ok(LoadedHarnessConfig {
            config: Self::default(),
            source: None,
        })
    }

    /// Read and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<HarnessConfig>()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.bridge.validate()?;
        self.runner.validate()?;
        self.fixtures.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for HarnessConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: HarnessConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Timing used by the flag-gated waiter.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(rename = "poll_interval_ms", default = "default_poll_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub poll_interval: Duration,
    /// Zero disables the deadline entirely.
    #[serde(rename = "wait_timeout_ms", default = "default_wait_timeout")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub wait_timeout: Duration,
}

impl BridgeConfig {
    /// Deadline applied to waits, `None` when waits are unbounded.
    pub fn wait_deadline(&self) -> Option<Duration> {
        if self.wait_timeout.is_zero() {
            None
        } else {
            Some(self.wait_timeout)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(anyhow!("bridge.poll_interval_ms must be greater than zero"));
        }
        if let Some(deadline) = self.wait_deadline() {
            if deadline < self.poll_interval {
                return Err(anyhow!(
                    "bridge.wait_timeout_ms ({} ms) is shorter than the poll interval ({} ms)",
                    deadline.as_millis(),
                    self.poll_interval.as_millis()
                ));
            }
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            wait_timeout: default_wait_timeout(),
        }
    }
}

/// Output format for suite reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pretty,
    Json,
    Yaml,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(ReportFormat::Pretty),
            "json" => Ok(ReportFormat::Json),
            "yaml" => Ok(ReportFormat::Yaml),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(rename = "case_timeout_ms", default = "default_case_timeout")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub case_timeout: Duration,
    #[serde(default)]
    pub fail_fast: bool,
    /// Substring a case name must contain to be executed.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub report_format: ReportFormat,
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.case_timeout.is_zero() {
            return Err(anyhow!("runner.case_timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            case_timeout: default_case_timeout(),
            fail_fast: false,
            filter: None,
            report_format: ReportFormat::default(),
        }
    }
}

/// Log output and filtering.
///
/// `level` and `targets` form the default filter, e.g.
/// `targets = { "acts::bridge" = "debug" }` yields `info,acts::bridge=debug`.
/// `ACTS_LOG` and `RUST_LOG` still take precedence when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
    /// Write the rolling JSON file next to stdout output.
    #[serde(default = "default_true")]
    pub file_output: bool,
}

impl LoggingConfig {
    /// Filter directive assembled from `level` and the per-target overrides.
    pub fn directives(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn validate(&self) -> Result<()> {
        tracing_subscriber::EnvFilter::try_new(self.directives()).map_err(|err| {
            anyhow!(
                "logging.level/targets produce an invalid filter '{}': {}",
                self.directives(),
                err
            )
        })?;
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            level: default_log_level(),
            targets: BTreeMap::new(),
            file_output: true,
        }
    }
}

/// Parameters for the reference worker and sensor fixtures.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureConfig {
    #[serde(default = "default_worker_suffix")]
    pub worker_suffix: String,
    #[serde(default = "default_sensor_seed")]
    pub sensor_seed: u64,
    #[serde(rename = "sensor_min_interval_ms", default = "default_sensor_min_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub sensor_min_interval: Duration,
    #[serde(rename = "sensor_interval_ms", default = "default_sensor_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub sensor_interval: Duration,
}

impl FixtureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sensor_min_interval.is_zero() {
            return Err(anyhow!(
                "fixtures.sensor_min_interval_ms must be greater than zero"
            ));
        }
        if self.sensor_interval < self.sensor_min_interval {
            return Err(anyhow!(
                "fixtures.sensor_interval_ms must not be below sensor_min_interval_ms"
            ));
        }
        Ok(())
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            worker_suffix: default_worker_suffix(),
            sensor_seed: default_sensor_seed(),
            sensor_min_interval: default_sensor_min_interval(),
            sensor_interval: default_sensor_interval(),
        }
    }
}
