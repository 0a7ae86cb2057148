//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while building entities or computing aggregates
///
/// None of these abort a run: aggregators catch them per issue,
/// count them in a [`Skipped`] tally and move on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Malformed timestamp in '{field}': {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    #[error("Invalid interval: end {end} precedes start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Label prefix cannot be empty")]
    EmptyPrefix,
}

/// Errors that can occur while loading issue records
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read issues file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid issues format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while loading scoring configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Per-kind count of issues excluded from a computation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Skipped {
    pub malformed_timestamp: u64,
    pub invalid_interval: u64,
    pub missing_field: u64,
}

impl Skipped {
    /// Count one exclusion caused by `err`
    ///
    /// An empty prefix only arises from absent input, so it is tallied
    /// as a missing field.
    pub fn record(&mut self, err: &AnalysisError) {
        match err {
            AnalysisError::MalformedTimestamp { .. } => self.malformed_timestamp += 1,
            AnalysisError::InvalidInterval { .. } => self.invalid_interval += 1,
            AnalysisError::MissingField(_) | AnalysisError::EmptyPrefix => {
                self.missing_field += 1
            }
        }
    }

    /// Total number of excluded issues
    pub fn total(&self) -> u64 {
        self.malformed_timestamp + self.invalid_interval + self.missing_field
    }

    /// Combine two tallies
    pub fn merge(&mut self, other: Skipped) {
        self.malformed_timestamp += other.malformed_timestamp;
        self.invalid_interval += other.invalid_interval;
        self.missing_field += other.missing_field;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_record_by_kind() {
        let mut skipped = Skipped::default();
        skipped.record(&AnalysisError::MissingField("created_date"));
        skipped.record(&AnalysisError::MissingField("assigned_at"));
        skipped.record(&AnalysisError::MalformedTimestamp {
            field: "updated_date",
            value: "yesterday".to_string(),
        });

        assert_eq!(skipped.missing_field, 2);
        assert_eq!(skipped.malformed_timestamp, 1);
        assert_eq!(skipped.invalid_interval, 0);
        assert_eq!(skipped.total(), 3);
    }

    #[test]
    fn test_skipped_merge() {
        let mut a = Skipped {
            malformed_timestamp: 1,
            invalid_interval: 2,
            missing_field: 3,
        };
        a.merge(Skipped {
            malformed_timestamp: 1,
            invalid_interval: 0,
            missing_field: 1,
        });
        assert_eq!(a.total(), 8);
    }
}
