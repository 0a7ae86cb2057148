use crate::aggregator::{IssueFilter, ScoringConfig};
use crate::utils::config::DEFAULT_TOP_N;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Which analysis a run performs, with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisMode {
    /// Label frequency over the issues the filter keeps
    Labels { filter: IssueFilter },

    /// Labeled-event counts under a category prefix ("status", "area")
    LabelEvents { prefix: String },

    /// Reopened issues and their labels
    Reopened,

    /// Creation → closure over the issues the filter keeps
    TimeToClose { filter: IssueFilter },

    /// Creation → first assignment over the issues the filter keeps
    TimeToAssign { filter: IssueFilter },

    /// Monthly label trend
    Trend,

    /// Priority ranking
    Priority { config: ScoringConfig },

    /// One user's interactions
    User { user: String },
}

impl AnalysisMode {
    /// Name recorded in the report envelope
    pub fn name(&self) -> &'static str {
        match self {
            Self::Labels { .. } => "labels",
            Self::LabelEvents { .. } => "label_events",
            Self::Reopened => "reopened",
            Self::TimeToClose { .. } => "time_to_close",
            Self::TimeToAssign { .. } => "time_to_assign",
            Self::Trend => "trend",
            Self::Priority { .. } => "priority",
            Self::User { .. } => "user",
        }
    }
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the JSON issues export
    pub input: PathBuf,

    /// Analysis to run
    pub mode: AnalysisMode,

    /// Output path for the JSON report (optional)
    pub output: Option<PathBuf>,

    /// Number of entries kept in ranked outputs
    pub top: usize,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Reference instant for recency (None = now)
    pub now: Option<DateTime<Utc>>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("issues.json"),
            mode: AnalysisMode::Labels {
                filter: IssueFilter::All,
            },
            output: None,
            top: DEFAULT_TOP_N,
            print_summary: false,
            now: None,
        }
    }
}
