//! ---
//! acts_section: "01-core-functionality"
//! acts_subsection: "tests"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Configuration loading integration tests."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::fs;
use std::time::Duration;

use acts_common::{HarnessConfig, LogFormat, ReportFormat};

#[test]
fn loads_first_existing_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let present = dir.path().join("acts.toml");
    fs::write(
        &present,
        r#"
        [bridge]
        poll_interval_ms = 20
        wait_timeout_ms = 1000

        [runner]
        case_timeout_ms = 2500
        fail_fast = true
        report_format = "yaml"

        [logging]
        format = "structured-json"

        [fixtures]
        worker_suffix = " echo"
        sensor_interval_ms = 50
        "#,
    )
    .unwrap();

    let loaded = HarnessConfig::load_with_source(&[missing, present.clone()]).unwrap();
    assert_eq!(loaded.source.as_deref(), Some(present.as_path()));
    let config = loaded.config;
    assert_eq!(config.bridge.poll_interval, Duration::from_millis(20));
    assert_eq!(config.bridge.wait_deadline(), Some(Duration::from_secs(1)));
    assert_eq!(config.runner.case_timeout, Duration::from_millis(2500));
    assert!(config.runner.fail_fast);
    assert_eq!(config.runner.report_format, ReportFormat::Yaml);
    assert_eq!(config.logging.format, LogFormat::StructuredJson);
    assert_eq!(config.fixtures.worker_suffix, " echo");
    assert_eq!(config.fixtures.sensor_interval, Duration::from_millis(50));
}

#[test]
fn falls_back_to_defaults_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let candidates = [dir.path().join("nope.toml")];
    let loaded = HarnessConfig::load_with_source(&candidates).unwrap();
    assert!(loaded.source.is_none());
    assert!(HarnessConfig::load(&candidates).is_err());
    let config = HarnessConfig::load_or_default(&candidates).unwrap();
    assert_eq!(config.runner.case_timeout, Duration::from_secs(30));
}

#[test]
fn invalid_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[fixtures]\nsensor_interval_ms = 1\nsensor_min_interval_ms = 10\n").unwrap();
    let err = HarnessConfig::load(&[path.clone()]).unwrap_err();
    assert!(format!("{err:#}").contains("bad.toml"));
}
