use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

use issue_insights::aggregator::{IssueFilter, ScoringConfig};
use issue_insights::commands::{execute_analysis, execute_analysis_with, AnalysisMode, AnalyzeArgs};
use issue_insights::output::read_report;
use issue_insights::parser::{IssueSource, LoadedIssues};
use issue_insights::utils::config::SCHEMA_VERSION;
use issue_insights::utils::LoadError;

const EXPORT: &str = r#"{
  "issues": [
    {
      "number": 1,
      "title": "Crash on start",
      "user": "ana",
      "state": "closed",
      "created_at": "2024-01-01T00:00:00Z",
      "updated_at": "2024-02-27T00:00:00Z",
      "labels": ["bug", "status/triage"],
      "assignees": ["bob"],
      "events": [
        {"event": "closed", "created_at": "2024-01-05T00:00:00Z"},
        {"event": "labeled", "created_at": "2024-01-01T00:00:00Z", "actor": "ana", "label": "Status/Triage"},
        {"event": "reopened", "created_at": "2024-01-06T00:00:00Z"},
        {"event": "commented", "created_at": "2024-01-07T00:00:00Z", "actor": "bob"},
        {"event": "closed", "created_at": "2024-01-11T00:00:00Z"}
      ]
    },
    {
      "number": 2,
      "title": "Docs",
      "creator": "bob",
      "state": "open",
      "created_date": "2024-02-01",
      "labels": ["area/docs"],
      "events": []
    },
    {
      "number": 3,
      "title": "Broken",
      "creator": "ana",
      "state": "open",
      "created_date": "yesterday"
    }
  ]
}"#;

fn write_export() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();
    file
}

#[test]
fn test_labels_report_written_and_read_back() {
    let input = write_export();
    let dir = tempdir().unwrap();
    let output = dir.path().join("reports/labels.json");

    let args = AnalyzeArgs {
        input: input.path().to_path_buf(),
        output: Some(output.clone()),
        ..Default::default()
    };
    let report = execute_analysis(args).unwrap();

    assert_eq!(report.issue_count, 2);
    assert_eq!(report.skipped.malformed_timestamp, 1);

    let loaded = read_report(&output).unwrap();
    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.analysis, "labels");
    assert_eq!(loaded.result["counts"]["bug"], 1);
    assert_eq!(loaded.result["counts"]["area/docs"], 1);
}

#[test]
fn test_reopened_report() {
    let input = write_export();
    let args = AnalyzeArgs {
        input: input.path().to_path_buf(),
        mode: AnalysisMode::Reopened,
        ..Default::default()
    };

    let report = execute_analysis(args).unwrap();
    assert_eq!(report.result["reopened_count"], 1);
    assert_eq!(report.result["report"]["reopened"][0]["number"], 1);
}

#[test]
fn test_time_to_close_merges_skip_tallies() {
    let input = write_export();
    let args = AnalyzeArgs {
        input: input.path().to_path_buf(),
        mode: AnalysisMode::TimeToClose {
            filter: IssueFilter::All,
        },
        ..Default::default()
    };

    let report = execute_analysis(args).unwrap();
    assert_eq!(report.result["stats"]["count"], 1);
    assert_eq!(report.result["stats"]["max_days"], 10);
    assert_eq!(report.skipped.malformed_timestamp, 1);
}

#[test]
fn test_labels_filtered_by_label_and_reopened() {
    let input = write_export();
    let args = AnalyzeArgs {
        input: input.path().to_path_buf(),
        mode: AnalysisMode::Labels {
            filter: IssueFilter::combine(vec![
                IssueFilter::HasLabel("BUG".to_string()),
                IssueFilter::Reopened,
            ]),
        },
        ..Default::default()
    };

    let report = execute_analysis(args).unwrap();
    assert_eq!(report.result["counts"]["bug"], 1);
    assert_eq!(report.result["counts"]["status/triage"], 1);
    assert!(report.result["counts"].get("area/docs").is_none());
}

#[test]
fn test_priority_with_fixed_now() {
    let input = write_export();
    let args = AnalyzeArgs {
        input: input.path().to_path_buf(),
        mode: AnalysisMode::Priority {
            config: ScoringConfig::default(),
        },
        now: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    };

    let report = execute_analysis(args).unwrap();

    // bug 5 + status/triage 2 + one comment 1 + assignee 2 + recent 3
    assert_eq!(report.result["scores"][0]["number"], 1);
    assert_eq!(report.result["scores"][0]["score"], 13);
    // issue 2 has no updated date
    assert_eq!(report.skipped.missing_field, 1);
}

#[test]
fn test_missing_input_fails() {
    let args = AnalyzeArgs {
        input: "/nonexistent/issues.json".into(),
        ..Default::default()
    };
    assert!(execute_analysis(args).is_err());
}

#[test]
fn test_all_records_skipped_still_reports() {
    let mut input = NamedTempFile::new().unwrap();
    input
        .write_all(br#"[{"number": 1, "created_date": "later"}, {"title": "no number"}]"#)
        .unwrap();
    let args = AnalyzeArgs {
        input: input.path().to_path_buf(),
        ..Default::default()
    };

    let report = execute_analysis(args).unwrap();
    assert_eq!(report.issue_count, 0);
    assert_eq!(report.skipped.malformed_timestamp, 1);
    assert_eq!(report.skipped.missing_field, 1);
}

struct FailingSource;

impl IssueSource for FailingSource {
    fn load_issues(&self) -> Result<LoadedIssues, LoadError> {
        Err(LoadError::InvalidFormat("unavailable".to_string()))
    }
}

#[test]
fn test_source_error_propagates() {
    let err = execute_analysis_with(&FailingSource, &AnalyzeArgs::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("unavailable"));
}
