//! Aggregation of issue histories into counts, durations and series.
//!
//! This module transforms loaded issues into:
//! - Label frequencies and rankings
//! - Reopen cycles and assignment/closure timestamps
//! - Time-to-assign / time-to-close samples
//! - Monthly label trends
//! - Priority scores and per-user activity
//!
//! Every operation only reads its input, so independent analyses over
//! the same collection can run side by side.

pub mod activity;
pub mod durations;
pub mod filter;
pub mod labels;
pub mod priority;
pub mod transitions;
pub mod trend;

// Re-export main types and functions
pub use activity::{user_activity, UserActivity};
pub use durations::{
    collect_durations, elapsed, time_to_assign, time_to_close, DurationMetric, DurationSample,
    DurationSet, DurationStats, Elapsed,
};
pub use filter::IssueFilter;
pub use labels::{
    count_label_events, count_labels, filter_by_prefix, top_n, top_n_with_ties, LabelCounts,
};
pub use priority::{
    load_scoring_config, rank_by_priority, score, score_breakdown, IssueScore, PriorityReport,
    ScoreBreakdown, ScoringConfig,
};
pub use transitions::{
    analyze_reopened, detect_transitions, state_mismatches, ReopenReport, ReopenedIssue,
    TransitionSummary,
};
pub use trend::{
    dense_series, monthly_label_trend, top_labels_by_total, DenseTrend, LabelTrend, TrendSeries,
    TrendTable,
};
