//! Per-user interaction counts.

use super::labels::LabelCounts;
use crate::model::{EventType, Issue};
use crate::utils::error::AnalysisError;
use serde::Serialize;

/// What one user did across the collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserActivity {
    pub user: String,
    pub issues_created: u64,
    pub comments: u64,
    pub labeled: u64,
    pub closed: u64,

    /// Labels on events this user authored (labeled and unlabeled)
    pub label_interactions: LabelCounts,
}

/// Count a user's interactions
///
/// # Errors
/// * `AnalysisError::MissingField` - `user` is blank
pub fn user_activity(issues: &[Issue], user: &str) -> Result<UserActivity, AnalysisError> {
    let user = user.trim();
    if user.is_empty() {
        return Err(AnalysisError::MissingField("user"));
    }

    let mut activity = UserActivity {
        user: user.to_string(),
        ..Default::default()
    };

    for issue in issues {
        if issue.creator() == user {
            activity.issues_created += 1;
        }

        for event in issue.events().iter().filter(|e| e.authored_by(user)) {
            match event.event_type() {
                EventType::Commented => activity.comments += 1,
                EventType::Labeled => activity.labeled += 1,
                EventType::Closed => activity.closed += 1,
                _ => {}
            }
            if let Some(label) = event.label() {
                activity.label_interactions.increment(label);
            }
        }
    }

    Ok(activity)
}
