//! Utility modules for configuration, error handling, and timestamps.

pub mod config;
pub mod error;
pub mod time;

// Re-export commonly used error types for convenience
pub use error::{AnalysisError, ConfigError, LoadError, OutputError, Skipped};
pub use time::{month_bucket, parse_timestamp};
