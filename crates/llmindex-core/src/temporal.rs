//! # Timestamps
//!
//! Every timestamp llmindex writes is UTC, seconds precision, `Z` suffix:
//! `YYYY-MM-DDTHH:MM:SSZ`. Timestamps it reads are accepted leniently,
//! because manifests are frequently hand-authored:
//!
//! - full RFC 3339 with any offset (`+05:30`, `-04:00`, `Z`),
//! - a naive date-time with no offset, which is taken as UTC,
//! - a bare calendar date, taken as midnight UTC.
//!
//! Anything else yields `None`. Callers decide whether that is an error;
//! the feed freshness rule deliberately treats it as "nothing to report".

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO 8601 / RFC 3339 timestamp into UTC.
pub fn parse_timestamp_lenient(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Render a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The current instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn now_rfc3339() -> String {
    format_rfc3339(&Utc::now())
}
