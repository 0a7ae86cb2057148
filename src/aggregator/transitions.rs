//! Detect closed → reopened cycles and assignment/closure timestamps.
//!
//! One forward scan over an issue's (already sorted) events produces a
//! [`TransitionSummary`]. Everything else in the crate that needs to know
//! "when was this closed / assigned" goes through here.

use super::labels::LabelCounts;
use crate::model::{EventType, Issue, IssueState};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// State transitions found in one issue's history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSummary {
    /// A reopened event followed a closure
    pub was_reopened: bool,

    /// First closure of the issue
    pub closed_at: Option<DateTime<Utc>>,

    /// First reopen that followed a closure
    pub reopened_at: Option<DateTime<Utc>>,

    /// First assignment (later assignments do not move it)
    pub assigned_at: Option<DateTime<Utc>>,

    /// Most recent closure
    pub last_closed_at: Option<DateTime<Utc>>,

    /// Number of reopen events that followed a closure
    pub reopen_count: u32,

    /// State implied by the last close/reopen event
    pub final_state: Option<IssueState>,
}

/// Scan an issue's events for transitions
///
/// **Public** - main entry point for transition detection
///
/// # Algorithm
/// 1. `closed` sets `closed_at` once and always moves `last_closed_at`
/// 2. `reopened` only counts while the scan sees the issue as closed
/// 3. `assigned` sets `assigned_at` once
///
/// An issue without events yields the default summary.
pub fn detect_transitions(issue: &Issue) -> TransitionSummary {
    let mut summary = TransitionSummary::default();
    let mut is_closed = false;

    for event in issue.events() {
        let at = event.event_date();
        match event.event_type() {
            EventType::Closed => {
                summary.closed_at.get_or_insert(at);
                summary.last_closed_at = Some(at);
                summary.final_state = Some(IssueState::Closed);
                is_closed = true;
            }
            EventType::Reopened => {
                if is_closed {
                    if !summary.was_reopened {
                        summary.was_reopened = true;
                        summary.reopened_at = Some(at);
                    }
                    summary.reopen_count += 1;
                    is_closed = false;
                }
                summary.final_state = Some(IssueState::Open);
            }
            EventType::Assigned => {
                summary.assigned_at.get_or_insert(at);
            }
            _ => {}
        }
    }

    summary
}

/// An issue that was closed and later reopened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReopenedIssue {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
    pub reopened_at: Option<DateTime<Utc>>,
    pub reopen_count: u32,
}

/// Reopen statistics over a collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReopenReport {
    pub total_issues: usize,
    pub reopened: Vec<ReopenedIssue>,

    /// Label frequency over reopened issues only
    pub label_counts: LabelCounts,
}

impl ReopenReport {
    pub fn reopened_count(&self) -> usize {
        self.reopened.len()
    }

    /// Share of issues that were reopened, in percent
    pub fn reopened_percentage(&self) -> f64 {
        if self.total_issues == 0 {
            0.0
        } else {
            (self.reopened.len() as f64 / self.total_issues as f64) * 100.0
        }
    }
}

/// Collect reopened issues and the labels they carry
///
/// **Public** - answers "which labels recur on reopened issues"
pub fn analyze_reopened(issues: &[Issue]) -> ReopenReport {
    let mut report = ReopenReport {
        total_issues: issues.len(),
        ..Default::default()
    };

    for issue in issues {
        let summary = detect_transitions(issue);
        if !summary.was_reopened {
            continue;
        }

        for label in issue.labels() {
            report.label_counts.increment(label);
        }

        report.reopened.push(ReopenedIssue {
            number: issue.number(),
            title: issue.title().to_string(),
            labels: issue.labels().to_vec(),
            reopened_at: summary.reopened_at,
            reopen_count: summary.reopen_count,
        });
    }

    debug!(
        "{} of {} issues were reopened",
        report.reopened.len(),
        report.total_issues
    );
    report
}

/// Issue numbers whose recorded state disagrees with their event history
///
/// **Public** - surfaces exports where `state` and the last
/// close/reopen event drifted apart. Issues with unknown state or no
/// close/reopen events are never reported.
pub fn state_mismatches(issues: &[Issue]) -> Vec<u64> {
    issues
        .iter()
        .filter(|issue| issue.state() != IssueState::Unknown)
        .filter(|issue| {
            detect_transitions(issue)
                .final_state
                .is_some_and(|derived| derived != issue.state())
        })
        .map(Issue::number)
        .collect()
}
