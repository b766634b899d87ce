//! ---
//! acts_section: "01-core-functionality"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Tracing subscriber installation for runner binaries."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "ACTS_LOG";

static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
static STDOUT_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Available log formats for the runner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    StructuredJson,
    #[default]
    Pretty,
}

/// Initialize the tracing subscriber based on configuration and environment variables.
///
/// * `ACTS_LOG` overrides the log filter (e.g. `info`, `debug,acts::bridge=trace`).
///   When unset the standard `RUST_LOG` variable is honoured, finally falling back to
///   `logging.level` plus the `logging.targets` overrides.
/// * Stdout receives either pretty or JSON output. Unless `logging.file_output` is off,
///   a rolling daily JSON file is written under the configured directory.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    let file_writer = if config.file_output {
        std::fs::create_dir_all(&config.directory)?;
        let prefix = config
            .file_prefix
            .clone()
            .unwrap_or_else(|| service_name.to_owned());
        let file_appender = daily(&config.directory, format!("{}.log", prefix));
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = FILE_GUARD.set(guard);
        Some(writer)
    } else {
        None
    };
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let _ = STDOUT_GUARD.set(stdout_guard);

    let directives = filter_directives(
        config,
        std::env::var(LOG_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!(
            "invalid log filter '{}' ({}); falling back to configured level",
            directives, err
        );
        EnvFilter::new(config.directives())
    });

    let fmt_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .with_writer(stdout_writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(stdout_writer)
            .boxed(),
    };

    let file_layer = file_writer.map(|file_writer| {
        fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .with_writer(file_writer)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .ok();

    info!(
        service = %service_name,
        log_dir = %config.directory.display(),
        format = ?config.format,
        filter = %directives,
        "tracing initialised"
    );
    Ok(())
}

/// `ACTS_LOG` wins over `RUST_LOG`, which wins over `logging.level`/`logging.targets`.
fn filter_directives(
    config: &LoggingConfig,
    acts_log: Option<String>,
    rust_log: Option<String>,
) -> String {
    let usable = |directive: &String| !directive.trim().is_empty();
    acts_log
        .filter(usable)
        .or_else(|| rust_log.filter(usable))
        .unwrap_or_else(|| config.directives())
}
