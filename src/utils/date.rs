//! ISO 8601 rendering of post dates.
//!
//! Hosts store dates either as RFC 3339 strings or as naive
//! `YYYY-MM-DD HH:MM:SS` values in site-local time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};

/// Naive formats accepted for site-local dates.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Convert a stored date to ISO 8601 with offset.
///
/// Returns `None` for blank, zero (`0000-00-00 ...`) or unparseable input.
pub fn to_iso8601(raw: &str, offset: FixedOffset) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("0000-00-00") {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc3339_opts(SecondsFormat::Secs, false));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
}
