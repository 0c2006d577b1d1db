//! Integration tests for reports.
//!
//! These tests use the sample fixtures from `ids-event` to verify that events
//! aggregate into a report and classify against file-loaded thresholds.

use ids_event::{fixtures, Event, Filter, Scalar};
use ids_report::{ConfigError, Report, ReportConfig, Severity, Thresholds};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

/// Test the report built from every sample event.
#[test]
fn test_sample_report() {
    let report: Report = fixtures::sample_events().into_iter().collect();

    assert_eq!(report.len(), 4);
    assert_eq!(report.impact(), 32);
    assert_eq!(
        report.tags(),
        ["xss", "csrf", "sqli", "id", "rfe", "dt", "lfi"]
    );
    assert!(report.has_event("file"));
    assert!(report.has_event(7));
    assert!(!report.has_event("7"));
}

/// Test that events keep their own aggregates inside a report.
#[test]
fn test_event_aggregates_inside_report() {
    let report = Report::from_events(fixtures::sample_events());

    let file = report.get_event("file").unwrap();
    assert_eq!(file.impact(), 12);
    assert_eq!(file.tags(), ["dt", "id", "lfi"]);
    assert_eq!(file.len(), 3);
    assert_eq!(file.filters()[0].id, file.filters()[2].id);

    let empty = report.get_event(7).unwrap();
    assert_eq!(empty.value(), &Scalar::Bool(true));
    assert_eq!(empty.impact(), 0);
}

/// Test iterating a report and its events.
#[test]
fn test_nested_iteration() {
    let report = Report::from_events(fixtures::sample_events());

    let mut filter_count = 0;
    for event in &report {
        for filter in event {
            assert!(filter.impact > 0);
            filter_count += 1;
        }
    }
    assert_eq!(filter_count, 7);

    let names: Vec<String> = report.iter().map(|e| e.name().to_string()).collect();
    assert_eq!(names, ["comment", "id", "file", "7"]);
}

/// Test building a report from untyped request input.
#[test]
fn test_report_from_untyped_input() {
    let filters: Vec<serde_json::Value> = vec![
        json!({"id": "42", "tags": {"tag": ["sqli", "id"]}, "impact": "7"}),
        json!({"id": "16", "tags": {"tag": ["xss", "csrf", "id", "rfe"]}, "impact": "5"}),
    ];
    let event = Event::from_json(json!("id"), json!("1 union select 1"), filters).unwrap();

    let mut report = Report::new();
    report.add_event(event);

    assert_eq!(report.impact(), 12);
    assert_eq!(report.severity(&Thresholds::default()), Severity::Mail);
}

/// Test thresholds loaded from a config file.
#[test]
fn test_severity_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ids.toml");
    fs::write(
        &path,
        "[thresholds]\nlog = 5\nmail = 10\nwarn = 20\nkill = 30\n",
    )
    .unwrap();

    let config = ReportConfig::from_file(&path).unwrap();
    let report = Report::from_events(fixtures::sample_events());

    assert_eq!(report.severity(&config.thresholds), Severity::Kill);

    let comment_only: Report = fixtures::sample_events()
        .into_iter()
        .filter(|e| e.name().as_str() == Some("comment"))
        .collect();
    assert_eq!(comment_only.severity(&config.thresholds), Severity::Log);
}

/// Test that a missing config file surfaces an IO error.
#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let err = ReportConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

/// Test that the default config written to disk loads back unchanged.
#[test]
fn test_default_config_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.toml");
    fs::write(&path, ReportConfig::default().to_toml().unwrap()).unwrap();

    let loaded = ReportConfig::from_file(&path).unwrap();
    assert_eq!(loaded.thresholds, Thresholds::default());
}

/// Test reports over borrowed filters.
#[test]
fn test_report_over_borrowed_filters() {
    let filters = fixtures::sample_filters();
    let xss: Vec<&Filter> = filters.iter().filter(|f| f.has_tag("xss")).collect();
    let dt: Vec<&Filter> = filters.iter().filter(|f| f.has_tag("dt")).collect();

    let report = Report::from_events([
        Event::new("a", "v", xss).unwrap(),
        Event::new("b", "v", dt).unwrap(),
    ]);

    assert_eq!(report.impact(), 4 + 4 + 5 + 5 + 2);
    assert_eq!(report.tags(), ["xss", "csrf", "id", "rfe", "dt", "lfi"]);
}
