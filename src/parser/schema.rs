//! Raw record definitions for issue exports.
//!
//! These mirror what exporters write to disk. Everything is optional or
//! stringly typed here; conversion into entities happens in the loader,
//! which is where malformed values are rejected.

use serde::{Deserialize, Serialize};

/// One issue as found in an export file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Issue number (unique within the export)
    #[serde(default)]
    pub number: Option<u64>,

    #[serde(default)]
    pub title: String,

    /// Login of the user who opened the issue
    #[serde(default, alias = "user", alias = "author")]
    pub creator: Option<String>,

    /// "open", "closed" or anything else (read as unknown)
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default, alias = "created_at", alias = "createdAt")]
    pub created_date: Option<String>,

    #[serde(default, alias = "updated_at", alias = "updatedAt")]
    pub updated_date: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub assignees: Vec<String>,

    /// Single-assignee exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// One event as found in an export file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, alias = "event")]
    pub event_type: Option<String>,

    #[serde(default, alias = "created_at", alias = "createdAt")]
    pub event_date: Option<String>,

    #[serde(default, alias = "actor")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
