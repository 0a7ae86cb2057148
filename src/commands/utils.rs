use crate::parser::{IssueSource, JsonFileSource};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::Skipped;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Load an issues file and report what would be analyzed
///
/// # Returns
/// Number of usable issues and the skip tally
pub fn validate_issues_file(file_path: PathBuf) -> Result<(usize, Skipped)> {
    println!("Validating issues: {}", file_path.display());

    let loaded = JsonFileSource::new(&file_path)
        .load_issues()
        .with_context(|| format!("Failed to load {}", file_path.display()))?;

    let events: usize = loaded.issues.iter().map(|i| i.events().len()).sum();
    let labeled = loaded.issues.iter().filter(|i| !i.labels().is_empty()).count();

    println!("✓ Valid issues JSON");
    println!("  Issues: {}", loaded.issues.len());
    println!("  Events: {}", events);
    println!("  Labeled issues: {}", labeled);
    println!("  Skipped records: {}", loaded.skipped.total());

    Ok((loaded.issues.len(), loaded.skipped))
}

/// Display version information
pub fn display_version() {
    println!("Issue Insights v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Label, transition, duration and trend analysis for issue-tracker histories.");
}
