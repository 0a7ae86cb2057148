//! Label usage bucketed by calendar month.
//!
//! Both levels of the trend mapping are `BTreeMap`s, so labels and
//! months iterate in lexical order ("2023-12" before "2024-01").

use crate::model::Issue;
use crate::utils::error::{AnalysisError, Skipped};
use crate::utils::time::month_bucket;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// label → "YYYY-MM" → count
pub type LabelTrend = BTreeMap<String, BTreeMap<String, u64>>;

/// Monthly label trend plus the issues left out of it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendTable {
    pub trend: LabelTrend,
    pub skipped: Skipped,
}

/// Bucket every issue's labels by its creation month
///
/// **Public** - main entry point for trend analysis
///
/// Buckets are issue-level: an issue created in 2024-01 contributes its
/// current labels to 2024-01 regardless of when they were applied.
/// Issues without a creation date are counted as skipped. Labels differing
/// only in case share one key, spelled as on the first issue carrying it.
pub fn monthly_label_trend(issues: &[Issue]) -> TrendTable {
    let mut table = TrendTable::default();
    let mut spellings: HashMap<String, String> = HashMap::new();

    for issue in issues {
        let Some(created) = issue.created_date() else {
            table.skipped.record(&AnalysisError::MissingField("created_date"));
            continue;
        };
        let month = month_bucket(&created);

        for label in issue.labels() {
            let key = spellings
                .entry(label.to_lowercase())
                .or_insert_with(|| label.clone())
                .clone();
            *table
                .trend
                .entry(key)
                .or_default()
                .entry(month.clone())
                .or_insert(0) += 1;
        }
    }

    debug!(
        "Trend covers {} labels ({} issues skipped)",
        table.trend.len(),
        table.skipped.total()
    );
    table
}

/// Rank labels by their total across all months
///
/// **Public** - picks the series worth charting
///
/// # Returns
/// At most `n` (label, total) pairs, total descending, ties by label
pub fn top_labels_by_total(trend: &LabelTrend, n: usize) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = trend
        .iter()
        .map(|(label, months)| (label.clone(), months.values().sum()))
        .collect();

    // BTreeMap iteration is already lexical, so a stable sort keeps ties ordered
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
}

/// One zero-filled series of a dense trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub counts: Vec<u64>,
}

/// Month axis plus one aligned series per label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DenseTrend {
    pub months: Vec<String>,
    pub series: Vec<TrendSeries>,
}

/// Align the given labels on a shared month axis
///
/// **Public** - shape consumed by chart renderers
///
/// The axis is the sorted union of months in which any of `labels`
/// occurs; months a label is absent from are filled with zero. Labels
/// missing from the trend produce an all-zero series.
pub fn dense_series(trend: &LabelTrend, labels: &[String]) -> DenseTrend {
    let months: Vec<String> = labels
        .iter()
        .filter_map(|label| trend.get(label))
        .flat_map(|by_month| by_month.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = labels
        .iter()
        .map(|label| {
            let by_month = trend.get(label);
            let counts = months
                .iter()
                .map(|month| by_month.and_then(|m| m.get(month)).copied().unwrap_or(0))
                .collect();
            TrendSeries {
                label: label.clone(),
                counts,
            }
        })
        .collect();

    DenseTrend { months, series }
}
