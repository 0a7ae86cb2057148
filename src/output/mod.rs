//! Output writers for analysis reports.
//!
//! This module handles:
//! - The versioned report envelope
//! - JSON reports (write, read back, render to string)
//! - Plain-text summaries

pub mod json;
pub mod report;
pub mod text;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use report::Report;
pub use text::{format_ranked, format_skipped};
