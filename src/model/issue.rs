//! Issue entity.
//!
//! Issues are built once by the loader and only read afterwards.
//! Events are kept sorted by date so every detector can scan them
//! front to back.

use super::event::{Event, EventType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state recorded on an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
    Unknown,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for IssueState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked unit of work and its event history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    number: u64,
    title: String,
    creator: String,
    state: IssueState,
    created_date: Option<DateTime<Utc>>,
    updated_date: Option<DateTime<Utc>>,
    labels: Vec<String>,
    assignees: Vec<String>,
    events: Vec<Event>,
}

impl Issue {
    /// Create an issue with no dates, labels, assignees or events
    pub fn new(
        number: u64,
        title: impl Into<String>,
        creator: impl Into<String>,
        state: IssueState,
    ) -> Self {
        Self {
            number,
            title: title.into(),
            creator: creator.into(),
            state,
            created_date: None,
            updated_date: None,
            labels: Vec::new(),
            assignees: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_created_date(mut self, created: Option<DateTime<Utc>>) -> Self {
        self.created_date = created;
        self
    }

    pub fn with_updated_date(mut self, updated: Option<DateTime<Utc>>) -> Self {
        self.updated_date = updated;
        self
    }

    /// Set labels; duplicates differing only by case keep the first spelling
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.clear();
        for label in labels {
            let label = label.into();
            if !label.trim().is_empty() && !self.has_label(&label) {
                self.labels.push(label);
            }
        }
        self
    }

    /// Set assignees; exact duplicates are dropped
    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees.clear();
        for assignee in assignees {
            let assignee = assignee.into();
            if !self.assignees.contains(&assignee) {
                self.assignees.push(assignee);
            }
        }
        self
    }

    /// Set events, sorted by date
    ///
    /// The sort is stable so same-instant events keep their recorded order.
    pub fn with_events(mut self, mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.event_date());
        self.events = events;
        self
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn state(&self) -> IssueState {
        self.state
    }

    pub fn created_date(&self) -> Option<DateTime<Utc>> {
        self.created_date
    }

    pub fn updated_date(&self) -> Option<DateTime<Utc>> {
        self.updated_date
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    /// Events in ascending date order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Case-insensitive label membership
    pub fn has_label(&self, label: &str) -> bool {
        let wanted = label.to_lowercase();
        self.labels.iter().any(|l| l.to_lowercase() == wanted)
    }

    pub fn is_assigned(&self) -> bool {
        !self.assignees.is_empty()
    }

    pub fn events_of(&self, kind: EventType) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.is(kind))
    }

    pub fn count_events(&self, kind: EventType) -> usize {
        self.events_of(kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_has_label_case_insensitive() {
        let issue = Issue::new(1, "t", "ana", IssueState::Open).with_labels(["Bug", "area/Docs"]);
        assert!(issue.has_label("bug"));
        assert!(issue.has_label("AREA/DOCS"));
        assert!(!issue.has_label("urgent"));
    }

    #[test]
    fn test_labels_dedup_keeps_first_spelling() {
        let issue = Issue::new(1, "t", "ana", IssueState::Open).with_labels(["Bug", "bug", "docs", ""]);
        assert_eq!(issue.labels(), &["Bug".to_string(), "docs".to_string()]);
    }

    #[test]
    fn test_events_sorted_stably() {
        let events = vec![
            Event::new(EventType::Closed, at(5), None, None),
            Event::new(EventType::Created, at(1), None, None),
            Event::new(EventType::Commented, at(3), Some("a".to_string()), None),
            Event::new(EventType::Labeled, at(3), None, Some("bug".to_string())),
        ];
        let issue = Issue::new(1, "t", "ana", IssueState::Closed).with_events(events);

        let kinds: Vec<EventType> = issue.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            kinds,
            vec![
                EventType::Created,
                EventType::Commented,
                EventType::Labeled,
                EventType::Closed
            ]
        );
    }

    #[test]
    fn test_assignment_and_counts() {
        let issue = Issue::new(7, "t", "ana", IssueState::Open)
            .with_assignees(["bob", "bob"])
            .with_events(vec![
                Event::new(EventType::Commented, at(1), None, None),
                Event::new(EventType::Commented, at(2), None, None),
            ]);
        assert!(issue.is_assigned());
        assert_eq!(issue.assignees().len(), 1);
        assert_eq!(issue.count_events(EventType::Commented), 2);
        assert_eq!(issue.count_events(EventType::Closed), 0);

        let unassigned = Issue::new(8, "t", "ana", IssueState::Open);
        assert!(!unassigned.is_assigned());
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!("OPEN".parse::<IssueState>().unwrap(), IssueState::Open);
        assert_eq!("closed".parse::<IssueState>().unwrap(), IssueState::Closed);
        assert_eq!("merged".parse::<IssueState>().unwrap(), IssueState::Unknown);
    }
}
