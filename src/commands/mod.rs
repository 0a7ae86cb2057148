//! CLI command implementations.
//!
//! Every analysis runs through `analyze`; the mode picks the aggregator.
//! Commands orchestrate the library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analysis, execute_analysis_with, run_analysis, validate_args, AnalysisOutcome};
pub use models::{AnalysisMode, AnalyzeArgs};
pub use utils::{display_version, validate_issues_file};
