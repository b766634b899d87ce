//! ---
//! acts_section: "07-runner-cli"
//! acts_subsection: "binary"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Binary entrypoint for the ACTS conformance runner."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use acts_bridge::BridgeMetrics;
use acts_common::{init_tracing, HarnessConfig, ReportFormat};
use acts_metrics::new_registry;
use acts_style::{entries, lookup_by_name, StyleTable};
use acts_testharness::{HarnessMetrics, RunOptions, SuiteRunner};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use strum::IntoEnumIterator;
use tracing::info;

mod suites;

use suites::{Selection, SuiteContext};

const DEFAULT_CONFIG_CANDIDATES: &[&str] = &["configs/acts.toml", "acts.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "ACTS event bridge conformance runner",
    long_about = None
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "ACTS_CONFIG",
        help = "Path to configuration file"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run conformance suites and print a report")]
    Run(RunArgs),
    #[command(about = "List suites and their cases")]
    List,
    #[command(about = "Print a style table or a single value from it")]
    Style(StyleArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Suite to run.
    #[arg(long, value_enum, default_value_t = SuiteArg::All)]
    suite: SuiteArg,

    /// Only run cases whose name contains this text.
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,

    /// Report format; defaults to `runner.report_format`.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Stop after the first failing case.
    #[arg(long)]
    fail_fast: bool,

    /// Append Prometheus metrics to the report.
    #[arg(long)]
    metrics: bool,
}

#[derive(Debug, Args)]
struct StyleArgs {
    /// Table name, e.g. `Color` or `GradientDirection`.
    table: String,
    /// Constant inside the table; omit to print the whole table.
    name: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SuiteArg {
    Worker,
    Sensor,
    All,
}

impl From<SuiteArg> for Selection {
    fn from(value: SuiteArg) -> Self {
        match value {
            SuiteArg::Worker => Selection::Worker,
            SuiteArg::Sensor => Selection::Sensor,
            SuiteArg::All => Selection::All,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Pretty,
    Json,
    Yaml,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pretty => ReportFormat::Pretty,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Yaml => ReportFormat::Yaml,
        }
    }
}

// Fixtures, handlers and waiters share one thread: a waiter resumes only
// after the target has drained every queued dispatch.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let load_started = Instant::now();
    let config = match &cli.config {
        Some(path) => HarnessConfig::from_path(path)?,
        None => HarnessConfig::load_or_default(DEFAULT_CONFIG_CANDIDATES)?,
    };
    init_tracing("acts-runner", &config.logging)?;
    info!(
        target: "acts::runner",
        config = ?cli.config,
        load_ms = load_started.elapsed().as_millis() as u64,
        "configuration loaded"
    );

    match cli.command {
        Commands::Run(args) => run(config, args).await,
        Commands::List => {
            list(config);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Style(args) => {
            style(&args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run(mut config: HarnessConfig, args: RunArgs) -> Result<ExitCode> {
    if args.filter.is_some() {
        config.runner.filter = args.filter;
    }
    config.runner.fail_fast |= args.fail_fast;
    let format = args
        .format
        .map(ReportFormat::from)
        .unwrap_or(config.runner.report_format);

    let registry = new_registry();
    let bridge_metrics = BridgeMetrics::new(registry.clone())?;
    let harness_metrics = HarnessMetrics::new(&registry)?;
    let runner = SuiteRunner::new(RunOptions::from(&config.runner)).with_metrics(harness_metrics);
    let context = SuiteContext::new(config, Some(bridge_metrics));
    let suites = suites::build(args.suite.into(), &context);

    let report = runner.run_all(&suites).await;
    println!("{}", report.render(format)?);
    if args.metrics {
        println!("{}", acts_metrics::render(&registry)?);
    }
    info!(
        target: "acts::runner",
        suites = report.suites.len(),
        failed = report.failed(),
        "run complete"
    );
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list(config: HarnessConfig) {
    let context = SuiteContext::new(config, None);
    for suite in suites::build(Selection::All, &context) {
        println!("{}", suite.name());
        for case in suite.case_names() {
            println!("  {case}");
        }
    }
}

fn style(args: &StyleArgs) -> Result<()> {
    if let Some(name) = &args.name {
        let value = lookup_by_name(&args.table, name)?;
        println!("{value}");
        return Ok(());
    }
    let table: StyleTable = args.table.parse().with_context(|| {
        let known: Vec<&'static str> = StyleTable::iter().map(Into::into).collect();
        format!(
            "unknown style table '{}' (expected one of: {})",
            args.table,
            known.join(", ")
        )
    })?;
    let rendered = serde_json::to_string_pretty(&entries(table))?;
    println!("{rendered}");
    Ok(())
}
