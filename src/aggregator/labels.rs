//! Label frequency counting and ranking.
//!
//! Counts remember the order in which labels were first seen so ranking
//! can break ties deterministically without a secondary key. Labels are
//! matched case-insensitively; the first spelling seen is the one reported.

use super::filter::IssueFilter;
use crate::model::{EventType, Issue};
use crate::utils::config::LABEL_PREFIX_SEPARATOR;
use crate::utils::error::AnalysisError;
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Label → count mapping in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts {
    entries: Vec<(String, u64)>,

    /// Lower-cased label → position in `entries`
    index: HashMap<String, usize>,
}

impl LabelCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` occurrences of `label`
    ///
    /// "Bug" and "bug" share one entry, spelled as first added.
    pub fn add(&mut self, label: &str, n: u64) {
        let key = label.to_lowercase();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += n,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((label.to_string(), n));
            }
        }
    }

    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    /// Count for `label`, any casing
    pub fn get(&self, label: &str) -> u64 {
        self.index
            .get(&label.to_lowercase())
            .map_or(0, |&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for LabelCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = Self::new();
        for (label, count) in iter {
            counts.add(&label, count);
        }
        counts
    }
}

impl Serialize for LabelCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Count labels over the issues selected by `filter`
///
/// **Public** - main entry point for label frequency
///
/// Each (issue, label) pair contributes exactly one.
pub fn count_labels(issues: &[Issue], filter: &IssueFilter) -> LabelCounts {
    let mut counts = LabelCounts::new();
    let mut considered = 0usize;

    for issue in filter.apply(issues) {
        considered += 1;
        for label in issue.labels() {
            counts.increment(label);
        }
    }

    debug!(
        "Counted {} distinct labels across {} issues",
        counts.len(),
        considered
    );
    counts
}

/// Count `labeled` events by label over the issues selected by `filter`
///
/// **Public** - label activity rather than current labels
///
/// A label applied, removed and applied again counts twice.
pub fn count_label_events(issues: &[Issue], filter: &IssueFilter) -> LabelCounts {
    let mut counts = LabelCounts::new();

    for issue in filter.apply(issues) {
        for label in issue.events_of(EventType::Labeled).filter_map(|e| e.label()) {
            counts.increment(label);
        }
    }

    counts
}

/// Rank labels by count
///
/// **Public** - used by every ranked output
///
/// # Returns
/// At most `n` entries, count descending; equal counts keep first-seen order
pub fn top_n(counts: &LabelCounts, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts
        .iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Rank labels by count, keeping everything tied with the n-th entry
///
/// **Public** - highlights "top n" without arbitrarily cutting a tie
pub fn top_n_with_ties(counts: &LabelCounts, n: usize) -> Vec<(String, u64)> {
    let mut ranked = top_n(counts, counts.len());
    if n == 0 || ranked.is_empty() {
        return Vec::new();
    }

    let threshold = ranked[n.min(ranked.len()) - 1].1;
    ranked.retain(|(_, count)| *count >= threshold);
    ranked
}

/// Keep labels under a category prefix
///
/// **Public** - e.g. `status` selects `status/triage`, `Status/Blocked`
///
/// The prefix is lower-cased and given a trailing separator if it lacks
/// one. Label keys are lower-cased before matching, so case variants
/// merge into one entry. Matching keys are returned without the prefix.
///
/// # Errors
/// * `AnalysisError::EmptyPrefix` - prefix is blank
pub fn filter_by_prefix(counts: &LabelCounts, prefix: &str) -> Result<LabelCounts, AnalysisError> {
    let prefix = normalize_prefix(prefix)?;
    let mut filtered = LabelCounts::new();

    for (label, count) in counts.iter() {
        let lowered = label.to_lowercase();
        if let Some(rest) = lowered.strip_prefix(&prefix) {
            if !rest.is_empty() {
                filtered.add(rest, count);
            }
        }
    }

    debug!(
        "Prefix '{}' kept {} of {} labels",
        prefix,
        filtered.len(),
        counts.len()
    );
    Ok(filtered)
}

/// Lower-case a prefix and make sure it ends with the separator
///
/// **Private** - internal helper for filter_by_prefix
fn normalize_prefix(prefix: &str) -> Result<String, AnalysisError> {
    let trimmed = prefix.trim().trim_end_matches(LABEL_PREFIX_SEPARATOR);
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyPrefix);
    }

    let mut normalized = trimmed.to_lowercase();
    normalized.push(LABEL_PREFIX_SEPARATOR);
    Ok(normalized)
}
