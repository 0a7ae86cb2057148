//! Elapsed-time metrics derived from transition timestamps.
//!
//! Months are a flat 30 days. They are good enough to compare issues
//! with each other, not to line up with calendar months.

use super::filter::IssueFilter;
use super::transitions::detect_transitions;
use crate::model::{Issue, IssueState};
use crate::utils::config::{DAYS_PER_MONTH, SECONDS_PER_DAY};
use crate::utils::error::{AnalysisError, Skipped};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time between two instants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elapsed {
    pub seconds: i64,

    /// Whole days, rounded down
    pub days: i64,

    /// Fractional 30-day months
    pub months: f64,
}

impl Elapsed {
    /// Months rounded to the nearest whole number
    pub fn whole_months(&self) -> i64 {
        self.months.round() as i64
    }
}

/// Compute the time from `start` to `end`
///
/// **Public** - the single place durations are derived
///
/// # Errors
/// * `AnalysisError::InvalidInterval` - `end` precedes `start`
pub fn elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Elapsed, AnalysisError> {
    if end < start {
        return Err(AnalysisError::InvalidInterval { start, end });
    }

    let seconds = (end - start).num_seconds();
    Ok(Elapsed {
        seconds,
        days: seconds / SECONDS_PER_DAY,
        months: seconds as f64 / (SECONDS_PER_DAY * DAYS_PER_MONTH) as f64,
    })
}

/// Which interval a duration sample measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationMetric {
    /// Creation → first assignment
    TimeToAssign,
    /// Creation → final closure, closed issues only
    TimeToClose,
}

/// One issue's contribution to a duration sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSample {
    pub number: u64,
    pub creator: String,
    pub labels: Vec<String>,
    pub elapsed: Elapsed,
}

/// Summary statistics over a duration sample, in days
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub mean_days: f64,
    pub median_days: i64,
    pub max_days: i64,
}

impl DurationStats {
    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Samples: {} | Mean: {:.1} days | Median: {} days | Max: {} days",
            self.count, self.mean_days, self.median_days, self.max_days
        )
    }
}

/// Duration samples plus the issues that could not contribute
#[derive(Debug, Clone, Serialize)]
pub struct DurationSet {
    pub metric: DurationMetric,
    pub samples: Vec<DurationSample>,
    pub skipped: Skipped,
}

impl DurationSet {
    pub fn stats(&self) -> DurationStats {
        if self.samples.is_empty() {
            return DurationStats::default();
        }

        let mut days: Vec<i64> = self.samples.iter().map(|s| s.elapsed.days).collect();
        days.sort_unstable();

        let total: i64 = days.iter().sum();
        DurationStats {
            count: days.len(),
            mean_days: total as f64 / days.len() as f64,
            median_days: days[days.len() / 2],
            max_days: days[days.len() - 1],
        }
    }

    /// The `n` longest samples, longest first
    pub fn longest(&self, n: usize) -> Vec<&DurationSample> {
        let mut sorted: Vec<&DurationSample> = self.samples.iter().collect();
        sorted.sort_by(|a, b| b.elapsed.seconds.cmp(&a.elapsed.seconds));
        sorted.truncate(n);
        sorted
    }

    /// Sample count per creator, most first, ties by name
    pub fn by_creator(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for sample in &self.samples {
            *counts.entry(sample.creator.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(creator, count)| (creator.to_string(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

/// Collect duration samples for `metric`
///
/// **Public** - main entry point for duration analysis
///
/// # Arguments
/// * `issues` - Issues to measure
/// * `metric` - Which interval to measure
/// * `filter` - Narrows the issues considered (e.g. one creator)
///
/// # Returns
/// One sample per measurable issue. Issues missing an endpoint or whose
/// endpoints are out of order are excluded and counted in `skipped`.
pub fn collect_durations(issues: &[Issue], metric: DurationMetric, filter: &IssueFilter) -> DurationSet {
    let mut set = DurationSet {
        metric,
        samples: Vec::new(),
        skipped: Skipped::default(),
    };

    for issue in filter.apply(issues) {
        if metric == DurationMetric::TimeToClose && issue.state() != IssueState::Closed {
            continue;
        }

        match measure(issue, metric) {
            Ok(elapsed) => set.samples.push(DurationSample {
                number: issue.number(),
                creator: issue.creator().to_string(),
                labels: issue.labels().to_vec(),
                elapsed,
            }),
            Err(e) => {
                debug!("Issue #{} excluded from {:?}: {}", issue.number(), metric, e);
                set.skipped.record(&e);
            }
        }
    }

    set
}

/// Creation → first assignment for every selected issue
pub fn time_to_assign(issues: &[Issue], filter: &IssueFilter) -> DurationSet {
    collect_durations(issues, DurationMetric::TimeToAssign, filter)
}

/// Creation → final closure for every selected closed issue
pub fn time_to_close(issues: &[Issue], filter: &IssueFilter) -> DurationSet {
    collect_durations(issues, DurationMetric::TimeToClose, filter)
}

/// Measure one issue
///
/// **Private** - internal helper for collect_durations
fn measure(issue: &Issue, metric: DurationMetric) -> Result<Elapsed, AnalysisError> {
    let created = issue
        .created_date()
        .ok_or(AnalysisError::MissingField("created_date"))?;
    let transitions = detect_transitions(issue);

    let end = match metric {
        DurationMetric::TimeToAssign => transitions
            .assigned_at
            .ok_or(AnalysisError::MissingField("assigned_at"))?,
        DurationMetric::TimeToClose => transitions
            .last_closed_at
            .ok_or(AnalysisError::MissingField("closed_at"))?,
    };

    elapsed(created, end)
}
