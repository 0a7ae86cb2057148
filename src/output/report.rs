//! Report envelope written for every analysis run.
//!
//! The `result` payload differs per analysis; the envelope around it is
//! versioned so consumers can reject files they do not understand.

use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::Skipped;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Which analysis produced the result ("labels", "trend", ...)
    pub analysis: String,

    /// Number of issues the analysis ran over
    pub issue_count: usize,

    /// Records dropped while loading plus issues excluded by the analysis
    pub skipped: Skipped,

    /// Analysis-specific payload
    pub result: serde_json::Value,

    /// Timestamp when report was generated
    pub generated_at: String,
}

impl Report {
    /// Wrap an analysis result in a current-version envelope
    pub fn new(
        analysis: impl Into<String>,
        issue_count: usize,
        skipped: Skipped,
        result: serde_json::Value,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            analysis: analysis.into(),
            issue_count,
            skipped,
            result,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}
