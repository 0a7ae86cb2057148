//! Heuristic priority scoring.
//!
//! score = label weights + comments × comment weight
//!       + assignee bonus (if assigned) + recency bonus (if recently updated)

use crate::model::{EventType, Issue};
use crate::utils::config::{
    DEFAULT_ASSIGNEE_BONUS, DEFAULT_COMMENT_WEIGHT, DEFAULT_LABEL_WEIGHTS, DEFAULT_RECENCY_BONUS,
    DEFAULT_RECENCY_THRESHOLD_DAYS,
};
use crate::utils::error::{AnalysisError, ConfigError, Skipped};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Weights and bonuses used by [`score`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-label weight, keyed by lower-cased label
    pub label_weights: HashMap<String, i64>,

    /// Added once per commented event
    pub comment_weight: i64,

    /// Added when the issue has at least one assignee
    pub assignee_bonus: i64,

    /// Added when the issue was updated within the threshold
    pub recency_bonus: i64,

    pub recency_threshold_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            label_weights: DEFAULT_LABEL_WEIGHTS
                .iter()
                .map(|&(label, weight)| (label.to_string(), weight))
                .collect(),
            comment_weight: DEFAULT_COMMENT_WEIGHT,
            assignee_bonus: DEFAULT_ASSIGNEE_BONUS,
            recency_bonus: DEFAULT_RECENCY_BONUS,
            recency_threshold_days: DEFAULT_RECENCY_THRESHOLD_DAYS,
        }
    }
}

impl ScoringConfig {
    /// Weight for `label`; unknown labels weigh 0
    pub fn label_weight(&self, label: &str) -> i64 {
        self.label_weights
            .get(&label.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Lower-case every label key so lookups are case-insensitive
    ///
    /// Keys that collide after lower-casing keep the larger weight.
    pub fn normalized(mut self) -> Self {
        let mut weights: HashMap<String, i64> = HashMap::with_capacity(self.label_weights.len());
        for (label, weight) in self.label_weights.drain() {
            weights
                .entry(label.to_lowercase())
                .and_modify(|w| *w = (*w).max(weight))
                .or_insert(weight);
        }
        self.label_weights = weights;
        self
    }

    /// Check that the configuration can be applied
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - negative recency threshold, or one too
    ///   large to express as a duration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recency_threshold_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "recency_threshold_days must not be negative (got {})",
                self.recency_threshold_days
            )));
        }
        if self.recency_window().is_none() {
            return Err(ConfigError::Invalid(format!(
                "recency_threshold_days is out of range (got {})",
                self.recency_threshold_days
            )));
        }
        Ok(())
    }

    /// Recency threshold as a duration, `None` when out of range
    fn recency_window(&self) -> Option<Duration> {
        Duration::try_days(self.recency_threshold_days)
    }
}

/// Load scoring weights from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Returns
/// Parsed, validated and normalized configuration. Keys left out of the
/// file keep their defaults.
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are out of range
///
/// # Example
/// ```ignore
/// let config = load_scoring_config("weights.toml")?;
/// ```
pub fn load_scoring_config(path: impl AsRef<Path>) -> Result<ScoringConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading scoring weights from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: ScoringConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config.normalized())
}

/// Per-component contributions to a priority score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub labels: i64,
    pub comments: i64,
    pub assignment: i64,
    pub recency: i64,
}

impl ScoreBreakdown {
    /// Sum of the components, saturating at the `i64` bounds
    pub fn total(&self) -> i64 {
        self.labels
            .saturating_add(self.comments)
            .saturating_add(self.assignment)
            .saturating_add(self.recency)
    }
}

/// Score one issue component by component
///
/// **Public** - same contract as [`score`]
///
/// Weighted terms saturate instead of overflowing. A threshold too large
/// to express as a duration grants the recency bonus to every issue.
///
/// # Errors
/// * `AnalysisError::MissingField` - issue has no `updated_date`
pub fn score_breakdown(
    issue: &Issue,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<ScoreBreakdown, AnalysisError> {
    let updated = issue
        .updated_date()
        .ok_or(AnalysisError::MissingField("updated_date"))?;

    let labels = issue
        .labels()
        .iter()
        .fold(0i64, |sum, l| sum.saturating_add(config.label_weight(l)));
    let comment_count = i64::try_from(issue.count_events(EventType::Commented)).unwrap_or(i64::MAX);
    let comments = comment_count.saturating_mul(config.comment_weight);
    let assignment = if issue.is_assigned() {
        config.assignee_bonus
    } else {
        0
    };
    let recent = match config.recency_window() {
        Some(window) => now - updated <= window,
        None => true,
    };
    let recency = if recent { config.recency_bonus } else { 0 };

    Ok(ScoreBreakdown {
        labels,
        comments,
        assignment,
        recency,
    })
}

/// Priority score of one issue
///
/// **Public** - main entry point for scoring
///
/// # Arguments
/// * `issue` - Issue to score
/// * `config` - Weights and bonuses
/// * `now` - Reference instant for the recency bonus
///
/// # Errors
/// * `AnalysisError::MissingField` - issue has no `updated_date`
///
/// A malformed `updated_date` never reaches this point: it is rejected
/// with `MalformedTimestamp` when the record is converted.
pub fn score(issue: &Issue, config: &ScoringConfig, now: DateTime<Utc>) -> Result<i64, AnalysisError> {
    score_breakdown(issue, config, now).map(|b| b.total())
}

/// One ranked issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueScore {
    pub number: u64,
    pub title: String,
    pub score: i64,
    pub breakdown: ScoreBreakdown,
}

/// Scores for a collection, highest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriorityReport {
    pub scores: Vec<IssueScore>,
    pub skipped: Skipped,
}

impl PriorityReport {
    pub fn top(&self, n: usize) -> &[IssueScore] {
        &self.scores[..n.min(self.scores.len())]
    }
}

/// Score and rank every issue
///
/// **Public** - ties are broken by issue number, lowest first
pub fn rank_by_priority(issues: &[Issue], config: &ScoringConfig, now: DateTime<Utc>) -> PriorityReport {
    let mut report = PriorityReport::default();

    for issue in issues {
        match score_breakdown(issue, config, now) {
            Ok(breakdown) => report.scores.push(IssueScore {
                number: issue.number(),
                title: issue.title().to_string(),
                score: breakdown.total(),
                breakdown,
            }),
            Err(e) => {
                debug!("Issue #{} not scored: {}", issue.number(), e);
                report.skipped.record(&e);
            }
        }
    }

    report
        .scores
        .sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.number.cmp(&b.number)));
    report
}
