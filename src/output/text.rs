//! Plain-text summaries for terminal output.

use crate::utils::error::Skipped;

/// Widest label shown before truncation
const MAX_LABEL_WIDTH: usize = 40;

/// Render ranked (name, value) rows as a boxed table
///
/// **Public** - shared by every command's `--summary` output
///
/// # Arguments
/// * `title` - Heading printed above the table
/// * `rows` - Ranked rows, already sorted
/// * `total` - Denominator for the percentage column (0 prints 0.0%)
pub fn format_ranked(title: &str, rows: &[(String, u64)], total: u64) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  {}", title));
    lines.push(format!("  ┏{}┳{}┳{}┓", "━".repeat(MAX_LABEL_WIDTH + 2), "━".repeat(10), "━".repeat(9)));
    lines.push(format!("  ┃ {:<w$} ┃ {:^8} ┃ {:^7} ┃", "LABEL", "COUNT", "%", w = MAX_LABEL_WIDTH));
    lines.push(format!("  ┣{}╋{}╋{}┫", "━".repeat(MAX_LABEL_WIDTH + 2), "━".repeat(10), "━".repeat(9)));

    for (name, value) in rows {
        let percentage = if total > 0 {
            (*value as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        lines.push(format!(
            "  ┃ {:<w$} ┃ {:>8} ┃ {:>6.1}% ┃",
            truncate(name),
            value,
            percentage,
            w = MAX_LABEL_WIDTH
        ));
    }

    lines.push(format!("  ┗{}┻{}┻{}┛", "━".repeat(MAX_LABEL_WIDTH + 2), "━".repeat(10), "━".repeat(9)));
    lines.join("\n")
}

/// One-line description of a skip tally
pub fn format_skipped(skipped: &Skipped) -> String {
    format!(
        "Skipped: {} (malformed timestamp: {}, invalid interval: {}, missing field: {})",
        skipped.total(),
        skipped.malformed_timestamp,
        skipped.invalid_interval,
        skipped.missing_field
    )
}

/// Shorten a name to fit the label column, keeping its tail
///
/// **Private** - internal helper for format_ranked
fn truncate(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= MAX_LABEL_WIDTH {
        return name.to_string();
    }
    let tail: String = chars[chars.len() - (MAX_LABEL_WIDTH - 3)..].iter().collect();
    format!("...{}", tail)
}
