//! Issue loading: the collaborator that feeds the aggregators.
//!
//! Parses raw JSON exports into [`Issue`] entities. A record that fails
//! conversion is logged, counted and skipped; it never aborts the load.

use super::schema::{EventRecord, IssueRecord};
use crate::model::{Event, EventType, Issue, IssueState};
use crate::utils::error::{AnalysisError, LoadError, Skipped};
use crate::utils::time::{parse_optional_timestamp, parse_timestamp};
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Field holding the issue array when the export is an object
const ISSUES_FIELD: &str = "issues";

/// Issues produced by one load, with the records that were dropped
#[derive(Debug, Clone, Default)]
pub struct LoadedIssues {
    pub issues: Vec<Issue>,
    pub skipped: Skipped,
}

/// Anything able to supply the issue collection for an analysis run
pub trait IssueSource {
    fn load_issues(&self) -> Result<LoadedIssues, LoadError>;
}

/// Reads issues from a JSON export on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IssueSource for JsonFileSource {
    fn load_issues(&self) -> Result<LoadedIssues, LoadError> {
        info!("Loading issues from: {}", self.path.display());

        let file = File::open(&self.path)?;
        let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

        parse_issues(&raw)
    }
}

/// Parse a raw JSON export into issues
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `raw` - Either an array of issue records or an object with an
///   `issues` array
///
/// # Returns
/// Converted issues plus a tally of skipped records. When every record
/// fails, the collection is empty and the tally accounts for all of them.
///
/// # Errors
/// * `LoadError::InvalidFormat` - Top-level shape is wrong
pub fn parse_issues(raw: &serde_json::Value) -> Result<LoadedIssues, LoadError> {
    let records = match raw {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(obj) => obj
            .get(ISSUES_FIELD)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                LoadError::InvalidFormat(format!("Object export must contain an '{}' array", ISSUES_FIELD))
            })?,
        _ => {
            return Err(LoadError::InvalidFormat(
                "Issues export must be a JSON array or object".to_string(),
            ))
        }
    };

    let mut loaded = LoadedIssues {
        issues: Vec::with_capacity(records.len()),
        skipped: Skipped::default(),
    };

    for (index, value) in records.iter().enumerate() {
        let record = match serde_json::from_value::<IssueRecord>(value.clone()) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to parse issue record {}: {}", index, e);
                loaded.skipped.missing_field += 1;
                continue;
            }
        };

        match to_issue(record) {
            Ok(issue) => loaded.issues.push(issue),
            Err(e) => {
                warn!("Skipping issue record {}: {}", index, e);
                loaded.skipped.record(&e);
            }
        }
    }

    if loaded.issues.is_empty() && !records.is_empty() {
        warn!("All {} issue records were skipped", records.len());
    }

    debug!(
        "Loaded {} issues ({} skipped)",
        loaded.issues.len(),
        loaded.skipped.total()
    );

    Ok(loaded)
}

/// Convert a raw record into an issue
///
/// **Public** - used by sources and tests
///
/// # Errors
/// * `AnalysisError::MissingField` - No issue number, or an event without a date
/// * `AnalysisError::MalformedTimestamp` - Any date field that does not parse
pub fn to_issue(record: IssueRecord) -> Result<Issue, AnalysisError> {
    let number = record.number.ok_or(AnalysisError::MissingField("number"))?;
    let created = parse_optional_timestamp("created_date", record.created_date.as_deref())?;
    let updated = parse_optional_timestamp("updated_date", record.updated_date.as_deref())?;

    let events = record
        .events
        .into_iter()
        .map(to_event)
        .collect::<Result<Vec<_>, _>>()?;

    let state = record
        .state
        .as_deref()
        .map(|s| s.parse::<IssueState>().unwrap_or(IssueState::Unknown))
        .unwrap_or(IssueState::Unknown);

    let assignees = record.assignees.into_iter().chain(record.assignee);

    Ok(Issue::new(number, record.title, record.creator.unwrap_or_default(), state)
        .with_created_date(created)
        .with_updated_date(updated)
        .with_labels(record.labels)
        .with_assignees(assignees)
        .with_events(events))
}

/// Convert a raw event record
///
/// **Private** - internal helper for to_issue
fn to_event(record: EventRecord) -> Result<Event, AnalysisError> {
    let date = record
        .event_date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or(AnalysisError::MissingField("event_date"))?;
    let event_date = parse_timestamp("event_date", date)?;

    let event_type = record
        .event_type
        .as_deref()
        .map(|t| t.parse::<EventType>().unwrap_or(EventType::Other))
        .unwrap_or(EventType::Other);

    Ok(Event::new(event_type, event_date, record.author, record.label))
}
