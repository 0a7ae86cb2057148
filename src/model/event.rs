//! Issue events: the chronological history attached to each issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of occurrence recorded on an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    Labeled,
    Unlabeled,
    Assigned,
    Unassigned,
    Closed,
    Reopened,
    Commented,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Labeled => "labeled",
            Self::Unlabeled => "unlabeled",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Commented => "commented",
            Self::Other => "other",
        }
    }

    /// Whether events of this kind carry a label
    pub fn carries_label(&self) -> bool {
        matches!(self, Self::Labeled | Self::Unlabeled)
    }
}

impl std::str::FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "created" => Self::Created,
            "labeled" | "labelled" => Self::Labeled,
            "unlabeled" | "unlabelled" => Self::Unlabeled,
            "assigned" => Self::Assigned,
            "unassigned" => Self::Unassigned,
            "closed" => Self::Closed,
            "reopened" => Self::Reopened,
            "commented" => Self::Commented,
            _ => Self::Other,
        })
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single occurrence on an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: EventType,
    event_date: DateTime<Utc>,
    author: Option<String>,
    label: Option<String>,
}

impl Event {
    /// Create an event
    ///
    /// `label` is only kept for labeled/unlabeled events.
    pub fn new(
        event_type: EventType,
        event_date: DateTime<Utc>,
        author: Option<String>,
        label: Option<String>,
    ) -> Self {
        let label = if event_type.carries_label() {
            label.filter(|l| !l.trim().is_empty())
        } else {
            None
        };

        Self {
            event_type,
            event_date,
            author,
            label,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn event_date(&self) -> DateTime<Utc> {
        self.event_date
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is(&self, kind: EventType) -> bool {
        self.event_type == kind
    }

    /// Whether `user` authored this event
    pub fn authored_by(&self, user: &str) -> bool {
        self.author.as_deref() == Some(user)
    }
}
