//! Issue export parsing and record definitions.
//!
//! This module handles:
//! - Reading raw JSON exports of issues and events
//! - Converting records into entities
//! - Counting records that had to be skipped

pub mod loader;
pub mod schema;

// Re-export main types
pub use loader::{parse_issues, to_issue, IssueSource, JsonFileSource, LoadedIssues};
pub use schema::{EventRecord, IssueRecord};
