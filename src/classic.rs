//! Classic-car reclassification rule.

use chrono::{DateTime, Datelike, Utc};

/// Cars built more than this many years before the current year are classics.
pub const CLASSIC_AGE_YEARS: i32 = 20;

/// Threshold year for a reclassification run happening at `now`.
pub fn threshold_year(now: DateTime<Utc>) -> i32 {
    now.year() - CLASSIC_AGE_YEARS
}

/// Interpret a stored `year` column as an integer.
///
/// Accepts optional surrounding whitespace, an optional sign and one to nine
/// ASCII digits. Anything else is not a year and never matches. Whitespace is
/// the POSIX `[[:space:]]` set, the same one the Postgres store matches on.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_matches(is_posix_space);
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i32>().ok()
}

fn is_posix_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Whether a row should be flipped to classic by a run with `threshold`.
pub fn qualifies(year: &str, is_classic: bool, threshold: i32) -> bool {
    !is_classic && parse_year(year).is_some_and(|y| y < threshold)
}

/// Render a completion time in round-trip ISO-8601 form, e.g.
/// `2025-01-02T03:04:05.1234567Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    // Seven fractional digits (100ns ticks); leap-second nanos are clamped.
    let ticks = (at.timestamp_subsec_nanos() / 100).min(9_999_999);
    format!("{}.{:07}Z", at.format("%Y-%m-%dT%H:%M:%S"), ticks)
}
