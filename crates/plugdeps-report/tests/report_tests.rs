use std::fs;
use std::path::PathBuf;

use plugdeps_core::{AggregateState, DependencyFact, ExtractionFailure};
use plugdeps_report::{Report, ReportEntry, ReportFormat, Reporter};
use tempfile::TempDir;

fn scenario_state() -> AggregateState {
    vec![
        DependencyFact::new("foo", "a.ma"),
        DependencyFact::new("bar", "a.ma"),
        DependencyFact::new("bar", "a.ma"),
        DependencyFact::new("foo", "b.ma"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_scenario_layout() {
    let report = Report::from_state(&scenario_state());

    assert_eq!(
        report.entries,
        vec![
            ReportEntry {
                name: "bar".into(),
                count: 2,
                files: vec![PathBuf::from("a.ma"), PathBuf::from("a.ma")],
            },
            ReportEntry {
                name: "foo".into(),
                count: 2,
                files: vec![PathBuf::from("a.ma"), PathBuf::from("b.ma")],
            },
        ]
    );
}

#[test]
fn test_count_matches_file_list() {
    let report = Report::from_state(&scenario_state());
    assert!(report.entries.iter().all(|e| e.count == e.files.len()));
    assert_eq!(report.total_references(), 4);
}

#[test]
fn test_text_report_to_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("deps.csv");

    let report = Report::from_state(&scenario_state());
    Reporter::new(ReportFormat::Text)
        .write(&report, fs::File::create(&out).unwrap())
        .unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines, vec!["bar, 2,", ",,a.ma", ",,a.ma", "foo, 2,", ",,a.ma", ",,b.ma"]);
}

#[test]
fn test_text_ignores_failures() {
    let report = Report::from_state(&scenario_state())
        .with_failures(vec![ExtractionFailure::new("c.ma", "malformed scene")]);
    assert!(!report.to_text().contains("c.ma"));
}

#[test]
fn test_default_reporter_is_text() {
    let reporter = Reporter::default();
    assert_eq!(reporter.format(), ReportFormat::Text);
}
