//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads issues from the source
//! 2. Runs the selected analysis
//! 3. Wraps the result in a report
//! 4. Writes the report and/or prints a summary

use super::models::{AnalysisMode, AnalyzeArgs};
use crate::aggregator::{
    analyze_reopened, collect_durations, count_label_events, count_labels, dense_series,
    filter_by_prefix, monthly_label_trend, rank_by_priority, state_mismatches, top_labels_by_total,
    top_n, top_n_with_ties, user_activity, DurationMetric, IssueFilter, LabelCounts,
};
use crate::model::Issue;
use crate::output::{format_ranked, format_skipped, write_report, Report};
use crate::parser::{IssueSource, JsonFileSource};
use crate::utils::error::Skipped;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::json;
use std::time::Instant;

/// Upper bound for `top`
const MAX_TOP: usize = 1000;

/// How many of the longest durations a report lists
const LONGEST_DURATIONS: usize = 10;

/// Result of one analysis before it is wrapped in a report
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: serde_json::Value,
    pub skipped: Skipped,
    pub summary: String,
}

/// Execute the analyze command against the JSON file in `args.input`
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Issue file cannot be read or has the wrong shape
/// * Analysis parameters are invalid (e.g. blank prefix)
/// * Report cannot be written
pub fn execute_analysis(args: AnalyzeArgs) -> Result<Report> {
    let source = JsonFileSource::new(&args.input);
    execute_analysis_with(&source, &args)
}

/// Execute the analyze command against any issue source
///
/// **Public** - lets callers plug in their own loader
pub fn execute_analysis_with(source: &dyn IssueSource, args: &AnalyzeArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Starting {} analysis", args.mode.name());

    info!("Step 1/3: Loading issues...");
    let loaded = source.load_issues().context("Failed to load issues")?;
    debug!(
        "Loaded {} issues, skipped {}",
        loaded.issues.len(),
        loaded.skipped.total()
    );

    info!("Step 2/3: Running analysis...");
    let now = args.now.unwrap_or_else(Utc::now);
    let outcome = run_analysis(&loaded.issues, &args.mode, args.top, now)
        .with_context(|| format!("Failed to run {} analysis", args.mode.name()))?;

    info!("Step 3/3: Writing output...");
    let mut skipped = loaded.skipped;
    skipped.merge(outcome.skipped);

    let report = Report::new(args.mode.name(), loaded.issues.len(), skipped, outcome.result);

    if let Some(path) = &args.output {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("{} SUMMARY", args.mode.name().to_uppercase());
        println!("{}", "=".repeat(80));
        println!("Issues: {}", report.issue_count);
        println!("{}", format_skipped(&report.skipped));
        println!("\n{}", outcome.summary);
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Run one analysis over an in-memory collection
///
/// **Public** - pure counterpart of execute_analysis (no I/O)
///
/// # Arguments
/// * `issues` - Loaded issues
/// * `mode` - Analysis and its parameters
/// * `top` - Entries kept in ranked outputs
/// * `now` - Reference instant for recency scoring
pub fn run_analysis(
    issues: &[Issue],
    mode: &AnalysisMode,
    top: usize,
    now: DateTime<Utc>,
) -> Result<AnalysisOutcome> {
    let outcome = match mode {
        AnalysisMode::Labels { filter } => {
            let counts = count_labels(issues, filter);
            let ranked = top_n(&counts, top);

            AnalysisOutcome {
                summary: format_ranked("LABEL FREQUENCY", &ranked, counts.total()),
                result: json!({
                    "filter": filter,
                    "counts": counts,
                    "top": ranked,
                }),
                skipped: Skipped::default(),
            }
        }

        AnalysisMode::LabelEvents { prefix } => {
            let events = count_label_events(issues, &IssueFilter::All);
            let filtered = filter_by_prefix(&events, prefix)?;
            let ranked = top_n(&filtered, filtered.len());
            let ordered: LabelCounts = ranked.iter().cloned().collect();

            AnalysisOutcome {
                summary: format_ranked(
                    &format!("LABEL EVENTS UNDER '{}'", prefix),
                    &ranked,
                    filtered.total(),
                ),
                result: json!({
                    "prefix": prefix,
                    "counts": ordered,
                }),
                skipped: Skipped::default(),
            }
        }

        AnalysisMode::Reopened => {
            let report = analyze_reopened(issues);
            let highlighted = top_n_with_ties(&report.label_counts, top);
            let mismatches = state_mismatches(issues);

            let summary = format!(
                "Reopened after closing: {} of {} ({:.1}%)\nState/event mismatches: {}\n\n{}",
                report.reopened_count(),
                report.total_issues,
                report.reopened_percentage(),
                mismatches.len(),
                format_ranked(
                    "LABELS ON REOPENED ISSUES",
                    &highlighted,
                    report.label_counts.total()
                )
            );

            AnalysisOutcome {
                summary,
                result: json!({
                    "reopened_count": report.reopened_count(),
                    "reopened_percentage": report.reopened_percentage(),
                    "top_labels": highlighted,
                    "state_mismatches": mismatches,
                    "report": report,
                }),
                skipped: Skipped::default(),
            }
        }

        AnalysisMode::TimeToClose { filter } | AnalysisMode::TimeToAssign { filter } => {
            let metric = if matches!(mode, AnalysisMode::TimeToClose { .. }) {
                DurationMetric::TimeToClose
            } else {
                DurationMetric::TimeToAssign
            };

            let set = collect_durations(issues, metric, filter);
            let stats = set.stats();
            let by_creator: Vec<(String, usize)> = set.by_creator().into_iter().take(top).collect();
            let creator_rows: Vec<(String, u64)> = by_creator
                .iter()
                .map(|(creator, count)| (creator.clone(), *count as u64))
                .collect();

            AnalysisOutcome {
                summary: format!(
                    "{}\n\n{}",
                    stats.summary(),
                    format_ranked("SAMPLES BY CREATOR", &creator_rows, stats.count as u64)
                ),
                result: json!({
                    "metric": metric,
                    "filter": filter,
                    "stats": stats,
                    "longest": set.longest(LONGEST_DURATIONS),
                    "by_creator": by_creator,
                    "samples": set.samples,
                }),
                skipped: set.skipped,
            }
        }

        AnalysisMode::Trend => {
            let table = monthly_label_trend(issues);
            let top_labels = top_labels_by_total(&table.trend, top);
            let names: Vec<String> = top_labels.iter().map(|(label, _)| label.clone()).collect();
            let dense = dense_series(&table.trend, &names);
            let grand_total: u64 = top_labels.iter().map(|(_, total)| total).sum();

            AnalysisOutcome {
                summary: format!(
                    "Months covered: {}\n\n{}",
                    dense.months.len(),
                    format_ranked("TOP LABELS OVER TIME", &top_labels, grand_total)
                ),
                result: json!({
                    "top_labels": top_labels,
                    "dense": dense,
                    "trend": table.trend,
                }),
                skipped: table.skipped,
            }
        }

        AnalysisMode::Priority { config } => {
            let report = rank_by_priority(issues, config, now);
            let summary = report
                .top(top)
                .iter()
                .enumerate()
                .map(|(i, s)| format!("  {}. #{} [{}] {}", i + 1, s.number, s.score, s.title))
                .collect::<Vec<_>>()
                .join("\n");

            AnalysisOutcome {
                summary: format!("HIGHEST PRIORITY\n{}", summary),
                result: json!({
                    "top": report.top(top),
                    "scores": report.scores,
                }),
                skipped: report.skipped,
            }
        }

        AnalysisMode::User { user } => {
            let activity = user_activity(issues, user)?;
            let ranked = top_n(&activity.label_interactions, top);

            AnalysisOutcome {
                summary: format!(
                    "Insights for user: {}\nIssues created: {}\nComments made: {}\nIssues labeled: {}\nIssues closed: {}\n\n{}",
                    activity.user,
                    activity.issues_created,
                    activity.comments,
                    activity.labeled,
                    activity.closed,
                    format_ranked("LABEL INTERACTIONS", &ranked, activity.label_interactions.total())
                ),
                result: serde_json::to_value(&activity)?,
                skipped: Skipped::default(),
            }
        }
    };

    Ok(outcome)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analysis for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top > MAX_TOP {
        anyhow::bail!("top is too large (max {})", MAX_TOP);
    }

    match &args.mode {
        AnalysisMode::Labels { filter }
        | AnalysisMode::TimeToClose { filter }
        | AnalysisMode::TimeToAssign { filter } => {
            validate_filter(filter)?;
        }
        AnalysisMode::LabelEvents { prefix } if prefix.trim().is_empty() => {
            anyhow::bail!("Label prefix cannot be empty");
        }
        AnalysisMode::User { user } if user.trim().is_empty() => {
            anyhow::bail!("User cannot be empty");
        }
        AnalysisMode::Priority { config } => {
            config.validate()?;
        }
        _ => {}
    }

    Ok(())
}

/// Reject filters that name a blank user or label
///
/// **Private** - internal helper for validate_args
fn validate_filter(filter: &IssueFilter) -> Result<()> {
    match filter {
        IssueFilter::Creator(user) if user.trim().is_empty() => {
            anyhow::bail!("User filter cannot be empty")
        }
        IssueFilter::HasLabel(label) if label.trim().is_empty() => {
            anyhow::bail!("Label filter cannot be empty")
        }
        IssueFilter::AllOf(filters) => filters.iter().try_for_each(validate_filter),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ScoringConfig;
    use crate::model::{Event, EventType, IssueState};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn sample_issues() -> Vec<Issue> {
        let day = |n: i64| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n);
        vec![
            Issue::new(1, "Crash", "ana", IssueState::Closed)
                .with_created_date(Some(day(0)))
                .with_updated_date(Some(day(40)))
                .with_labels(["bug", "status/triage"])
                .with_events(vec![
                    Event::new(EventType::Labeled, day(0), Some("ana".to_string()), Some("Status/Triage".to_string())),
                    Event::new(EventType::Assigned, day(2), None, None),
                    Event::new(EventType::Closed, day(5), None, None),
                    Event::new(EventType::Reopened, day(6), None, None),
                    Event::new(EventType::Closed, day(10), None, None),
                ]),
            Issue::new(2, "Docs typo", "bob", IssueState::Open)
                .with_created_date(Some(day(35)))
                .with_labels(["area/docs"]),
        ]
    }

    #[test]
    fn test_run_labels() {
        let outcome = run_analysis(&sample_issues(), &AnalysisMode::Labels { filter: IssueFilter::All }, 5, now()).unwrap();
        assert_eq!(outcome.result["counts"]["bug"], 1);
        assert_eq!(outcome.result["top"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_run_labels_state_filter() {
        let mode = AnalysisMode::Labels {
            filter: IssueFilter::State(IssueState::Open),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["counts"]["area/docs"], 1);
        assert!(outcome.result["counts"].get("bug").is_none());
    }

    #[test]
    fn test_run_labels_reopened_filter() {
        let mode = AnalysisMode::Labels {
            filter: IssueFilter::Reopened,
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["counts"]["bug"], 1);
        assert_eq!(outcome.result["counts"]["status/triage"], 1);
        assert!(outcome.result["counts"].get("area/docs").is_none());
    }

    #[test]
    fn test_run_labels_has_label_filter() {
        let mode = AnalysisMode::Labels {
            filter: IssueFilter::HasLabel("Area/Docs".to_string()),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["top"].as_array().unwrap().len(), 1);
        assert_eq!(outcome.result["counts"]["area/docs"], 1);
    }

    #[test]
    fn test_run_time_to_assign_label_filter_excludes_unassigned() {
        let mode = AnalysisMode::TimeToAssign {
            filter: IssueFilter::HasLabel("BUG".to_string()),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["stats"]["count"], 1);
        assert_eq!(outcome.result["stats"]["max_days"], 2);
        assert_eq!(outcome.skipped.total(), 0);
    }

    #[test]
    fn test_run_time_to_close_combined_filter() {
        let matching = AnalysisMode::TimeToClose {
            filter: IssueFilter::combine(vec![
                IssueFilter::Creator("ana".to_string()),
                IssueFilter::HasLabel("bug".to_string()),
                IssueFilter::Reopened,
            ]),
        };
        let outcome = run_analysis(&sample_issues(), &matching, 5, now()).unwrap();
        assert_eq!(outcome.result["stats"]["count"], 1);

        let disjoint = AnalysisMode::TimeToClose {
            filter: IssueFilter::combine(vec![
                IssueFilter::Creator("ana".to_string()),
                IssueFilter::HasLabel("area/docs".to_string()),
            ]),
        };
        let outcome = run_analysis(&sample_issues(), &disjoint, 5, now()).unwrap();
        assert_eq!(outcome.result["stats"]["count"], 0);
    }

    #[test]
    fn test_run_label_events() {
        let mode = AnalysisMode::LabelEvents {
            prefix: "status".to_string(),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["counts"]["triage"], 1);
    }

    #[test]
    fn test_run_label_events_blank_prefix_fails() {
        let mode = AnalysisMode::LabelEvents {
            prefix: " ".to_string(),
        };
        assert!(run_analysis(&sample_issues(), &mode, 5, now()).is_err());
    }

    #[test]
    fn test_run_reopened() {
        let outcome = run_analysis(&sample_issues(), &AnalysisMode::Reopened, 5, now()).unwrap();
        assert_eq!(outcome.result["reopened_count"], 1);
        assert_eq!(outcome.result["reopened_percentage"], 50.0);
    }

    #[test]
    fn test_run_time_to_assign_counts_skips() {
        let mode = AnalysisMode::TimeToAssign {
            filter: IssueFilter::All,
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["stats"]["count"], 1);
        assert_eq!(outcome.skipped.missing_field, 1);
    }

    #[test]
    fn test_run_time_to_close() {
        let mode = AnalysisMode::TimeToClose {
            filter: IssueFilter::Creator("ana".to_string()),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["stats"]["max_days"], 10);
    }

    #[test]
    fn test_run_trend() {
        let outcome = run_analysis(&sample_issues(), &AnalysisMode::Trend, 5, now()).unwrap();
        assert_eq!(outcome.result["trend"]["area/docs"]["2024-02"], 1);
        assert_eq!(outcome.result["dense"]["months"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_run_priority_skips_missing_update() {
        let mode = AnalysisMode::Priority {
            config: ScoringConfig::default(),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["scores"].as_array().unwrap().len(), 1);
        assert_eq!(outcome.skipped.missing_field, 1);
    }

    #[test]
    fn test_run_user() {
        let mode = AnalysisMode::User {
            user: "ana".to_string(),
        };
        let outcome = run_analysis(&sample_issues(), &mode, 5, now()).unwrap();
        assert_eq!(outcome.result["issues_created"], 1);
        assert_eq!(outcome.result["labeled"], 1);
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&AnalyzeArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_top_zero() {
        let args = AnalyzeArgs {
            top: 0,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_too_large() {
        let args = AnalyzeArgs {
            top: 2000,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_blank_user() {
        let args = AnalyzeArgs {
            mode: AnalysisMode::User {
                user: String::new(),
            },
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_blank_label_filter() {
        let args = AnalyzeArgs {
            mode: AnalysisMode::TimeToClose {
                filter: IssueFilter::combine(vec![
                    IssueFilter::Creator("ana".to_string()),
                    IssueFilter::HasLabel("  ".to_string()),
                ]),
            },
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_scoring_config() {
        let config = ScoringConfig {
            recency_threshold_days: -3,
            ..Default::default()
        };
        let args = AnalyzeArgs {
            mode: AnalysisMode::Priority { config },
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }
}
