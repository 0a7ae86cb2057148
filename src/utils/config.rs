//! Configuration and constants for the analyses.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Duration arithmetic. Months are a flat 30 days, not calendar months.
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const DAYS_PER_MONTH: i64 = 30;

/// Bucket key format for trend tables ("2024-01")
pub const MONTH_BUCKET_FORMAT: &str = "%Y-%m";

/// Separator between a label category and its value ("status/triage")
pub const LABEL_PREFIX_SEPARATOR: char = '/';

/// How many entries ranked outputs keep unless told otherwise
pub const DEFAULT_TOP_N: usize = 5;

// Priority scoring defaults
pub const DEFAULT_LABEL_WEIGHTS: &[(&str, i64)] = &[
    ("bug", 5),
    ("urgent", 10),
    ("feature-request", 3),
    ("status/triage", 2),
    ("area/docs", 1),
];
pub const DEFAULT_COMMENT_WEIGHT: i64 = 1;
pub const DEFAULT_ASSIGNEE_BONUS: i64 = 2;
pub const DEFAULT_RECENCY_BONUS: i64 = 3;
pub const DEFAULT_RECENCY_THRESHOLD_DAYS: i64 = 7;

/// Naive timestamp layouts accepted besides RFC 3339, read as UTC
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";
