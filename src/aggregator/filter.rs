//! Issue selection shared by the aggregators.

use super::transitions::detect_transitions;
use crate::model::{Issue, IssueState};
use serde::{Deserialize, Serialize};

/// Which issues an aggregation should consider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueFilter {
    /// Every issue
    #[default]
    All,
    /// Issues whose recorded state matches
    State(IssueState),
    /// Issues closed and later reopened
    Reopened,
    /// Issues opened by this user
    Creator(String),
    /// Issues carrying this label (case-insensitive)
    HasLabel(String),
    /// Issues matching every inner filter
    AllOf(Vec<IssueFilter>),
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            Self::All => true,
            Self::State(state) => issue.state() == *state,
            Self::Reopened => detect_transitions(issue).was_reopened,
            Self::Creator(user) => issue.creator() == user,
            Self::HasLabel(label) => issue.has_label(label),
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(issue)),
        }
    }

    /// Conjunction of `filters`, collapsed to `All` or the single filter
    /// when possible
    pub fn combine(filters: Vec<IssueFilter>) -> Self {
        let mut filters: Vec<IssueFilter> = filters
            .into_iter()
            .filter(|f| *f != Self::All)
            .collect();
        match filters.len() {
            0 => Self::All,
            1 => filters.remove(0),
            _ => Self::AllOf(filters),
        }
    }

    /// Iterate over the issues this filter keeps
    pub fn apply<'a>(&'a self, issues: &'a [Issue]) -> impl Iterator<Item = &'a Issue> + 'a {
        issues.iter().filter(move |issue| self.matches(issue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, EventType};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_filter_variants() {
        let t = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let reopened = Issue::new(1, "a", "ana", IssueState::Open)
            .with_labels(["Bug"])
            .with_events(vec![
                Event::new(EventType::Closed, t(2), None, None),
                Event::new(EventType::Reopened, t(3), None, None),
            ]);
        let closed = Issue::new(2, "b", "bob", IssueState::Closed);
        let issues = vec![reopened, closed];

        assert_eq!(IssueFilter::All.apply(&issues).count(), 2);
        assert_eq!(IssueFilter::State(IssueState::Closed).apply(&issues).count(), 1);
        assert_eq!(IssueFilter::Reopened.apply(&issues).next().map(|i| i.number()), Some(1));
        assert_eq!(IssueFilter::Creator("bob".to_string()).apply(&issues).count(), 1);
        assert_eq!(IssueFilter::HasLabel("bug".to_string()).apply(&issues).count(), 1);
    }

    #[test]
    fn test_combine() {
        assert_eq!(IssueFilter::combine(vec![]), IssueFilter::All);
        assert_eq!(
            IssueFilter::combine(vec![IssueFilter::All, IssueFilter::Reopened]),
            IssueFilter::Reopened
        );

        let issues = vec![
            Issue::new(1, "a", "ana", IssueState::Open).with_labels(["bug"]),
            Issue::new(2, "b", "ana", IssueState::Open).with_labels(["docs"]),
            Issue::new(3, "c", "bob", IssueState::Open).with_labels(["bug"]),
        ];
        let both = IssueFilter::combine(vec![
            IssueFilter::Creator("ana".to_string()),
            IssueFilter::HasLabel("BUG".to_string()),
        ]);
        let kept: Vec<u64> = both.apply(&issues).map(|i| i.number()).collect();
        assert_eq!(kept, vec![1]);
    }
}
