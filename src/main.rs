//! Issue Insights CLI
//!
//! Label, reopen, duration, trend and priority analysis over
//! issue-tracker exports. Writes JSON reports and text summaries.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use issue_insights::aggregator::{load_scoring_config, IssueFilter, ScoringConfig};
use issue_insights::commands::{
    display_version, execute_analysis, validate_args, validate_issues_file, AnalysisMode,
    AnalyzeArgs,
};
use issue_insights::model::IssueState;
use issue_insights::utils::parse_timestamp;

/// Issue Insights - aggregate issue-tracker histories
#[derive(Parser, Debug)]
#[command(name = "issue-insights")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Flags shared by every analysis
#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the JSON issues export
    #[arg(short, long, env = "ISSUE_INSIGHTS_INPUT", default_value = "issues.json")]
    input: PathBuf,

    /// Output path for the JSON report (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of entries kept in ranked outputs
    #[arg(long, default_value = "5")]
    top: usize,

    /// Print text summary to stdout
    #[arg(long)]
    summary: bool,
}

/// Issue selection for labels and duration commands
#[derive(Args, Debug)]
struct FilterArgs {
    /// Only issues in this state (open, closed)
    #[arg(long, value_parser = parse_state)]
    state: Option<IssueState>,

    /// Only issues created by this user
    #[arg(short, long)]
    user: Option<String>,

    /// Only issues carrying this label (case-insensitive)
    #[arg(short, long)]
    label: Option<String>,

    /// Only issues closed and later reopened
    #[arg(long)]
    reopened: bool,
}

impl FilterArgs {
    /// Combine every given flag into one filter
    fn into_filter(self) -> IssueFilter {
        let mut filters = Vec::new();
        if let Some(state) = self.state {
            filters.push(IssueFilter::State(state));
        }
        if let Some(user) = self.user {
            filters.push(IssueFilter::Creator(user));
        }
        if let Some(label) = self.label {
            filters.push(IssueFilter::HasLabel(label));
        }
        if self.reopened {
            filters.push(IssueFilter::Reopened);
        }
        IssueFilter::combine(filters)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Count current labels
    Labels {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Count labeled events under a category prefix
    LabelEvents {
        #[command(flatten)]
        common: CommonArgs,

        /// Label category, e.g. "status" or "area"
        #[arg(short, long)]
        prefix: String,
    },

    /// Find issues reopened after closing
    Reopened {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Time from creation to final closure
    TimeToClose {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Time from creation to first assignment
    TimeToAssign {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Monthly label trend
    Trend {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Rank issues by priority score
    Priority {
        #[command(flatten)]
        common: CommonArgs,

        /// TOML file with scoring weights (defaults used if omitted)
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Reference time for recency (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Summarize one user's activity
    User {
        #[command(flatten)]
        common: CommonArgs,

        /// User to report on
        #[arg(short, long)]
        user: String,
    },

    /// Validate an issues JSON file
    Validate {
        /// Path to issues JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    let (common, mode, now) = match cli.command {
        Commands::Labels { common, filter } => (
            common,
            AnalysisMode::Labels {
                filter: filter.into_filter(),
            },
            None,
        ),
        Commands::LabelEvents { common, prefix } => {
            (common, AnalysisMode::LabelEvents { prefix }, None)
        }
        Commands::Reopened { common } => (common, AnalysisMode::Reopened, None),
        Commands::TimeToClose { common, filter } => (
            common,
            AnalysisMode::TimeToClose {
                filter: filter.into_filter(),
            },
            None,
        ),
        Commands::TimeToAssign { common, filter } => (
            common,
            AnalysisMode::TimeToAssign {
                filter: filter.into_filter(),
            },
            None,
        ),
        Commands::Trend { common } => (common, AnalysisMode::Trend, None),
        Commands::Priority {
            common,
            weights,
            now,
        } => {
            let config = match weights {
                Some(path) => load_scoring_config(&path)
                    .with_context(|| format!("Failed to load weights from {}", path.display()))?,
                None => ScoringConfig::default(),
            };
            let now = now.as_deref().map(parse_now).transpose()?;
            (common, AnalysisMode::Priority { config }, now)
        }
        Commands::User { common, user } => (common, AnalysisMode::User { user }, None),
        Commands::Validate { file } => {
            validate_issues_file(file)?;
            return Ok(());
        }
        Commands::Version => {
            display_version();
            return Ok(());
        }
    };

    let args = AnalyzeArgs {
        input: common.input,
        mode,
        output: common.output,
        top: common.top,
        print_summary: common.summary,
        now,
    };

    // Validate args first
    validate_args(&args)?;

    // Execute analysis
    execute_analysis(args)?;

    Ok(())
}

/// Parse the `--state` flag, rejecting values the model would read as unknown
///
/// **Private** - clap value parser
fn parse_state(value: &str) -> Result<IssueState, String> {
    match value.parse::<IssueState>().ok() {
        Some(IssueState::Unknown) | None => Err(format!(
            "unknown state '{}' (expected 'open' or 'closed')",
            value
        )),
        Some(state) => Ok(state),
    }
}

/// Parse the `--now` flag
///
/// **Private** - internal helper for the priority command
fn parse_now(value: &str) -> Result<DateTime<Utc>> {
    parse_timestamp("now", value).with_context(|| format!("Invalid --now value: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state() {
        assert_eq!(parse_state("closed"), Ok(IssueState::Closed));
        assert_eq!(parse_state("Open"), Ok(IssueState::Open));
        assert!(parse_state("closd").is_err());
        assert!(parse_state("").is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_state() {
        let parsed = Cli::try_parse_from(["issue-insights", "labels", "--state", "closd"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_filter_flags_combine() {
        let cli = Cli::try_parse_from([
            "issue-insights",
            "time-to-close",
            "--user",
            "ana",
            "--label",
            "bug",
            "--reopened",
        ])
        .unwrap();

        let Commands::TimeToClose { filter, .. } = cli.command else {
            panic!("expected time-to-close");
        };
        assert_eq!(
            filter.into_filter(),
            IssueFilter::AllOf(vec![
                IssueFilter::Creator("ana".to_string()),
                IssueFilter::HasLabel("bug".to_string()),
                IssueFilter::Reopened,
            ])
        );
    }

    #[test]
    fn test_cli_no_filter_flags() {
        let cli = Cli::try_parse_from(["issue-insights", "labels"]).unwrap();
        let Commands::Labels { filter, .. } = cli.command else {
            panic!("expected labels");
        };
        assert_eq!(filter.into_filter(), IssueFilter::All);
    }
}
