//! Timestamp parsing and formatting.
//!
//! Timestamps travel as strings through task logs and persisted state.
//! Parsing is total: a malformed timestamp yields `None` and the signal it
//! belongs to degrades to "counted but excluded from freshness comparisons".

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Parse an RFC 3339 timestamp, tolerating a trailing `Z` and naive
/// (offset-less) values, which are assumed to be UTC.
pub fn parse_ts(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp the way it is persisted: RFC 3339, second precision, `Z`.
pub fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
