//! Timestamp parsing shared by the loader and the entity model.

use super::config::{DATE_ONLY_FORMAT, MONTH_BUCKET_FORMAT, NAIVE_TIMESTAMP_FORMATS};
use super::error::AnalysisError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a timestamp field into UTC
///
/// **Public** - used when converting raw records into entities
///
/// Accepts RFC 3339 (any offset), naive `YYYY-MM-DDTHH:MM:SS` /
/// `YYYY-MM-DD HH:MM:SS` read as UTC, and bare dates at midnight UTC.
///
/// # Errors
/// * `AnalysisError::MalformedTimestamp` - none of the layouts match
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, AnalysisError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for layout in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(naive) = NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(AnalysisError::MalformedTimestamp {
        field,
        value: value.to_string(),
    })
}

/// Parse an optional timestamp field; absent or blank stays `None`
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AnalysisError> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_timestamp(field, v).map(Some),
        _ => Ok(None),
    }
}

/// Calendar month key used by trend tables ("2024-01")
pub fn month_bucket(ts: &DateTime<Utc>) -> String {
    ts.format(MONTH_BUCKET_FORMAT).to_string()
}
