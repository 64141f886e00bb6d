//! Due-date strings: validation, normalization, and resolution into a zone.
//!
//! Three shapes are accepted, all trimmed first:
//! - RFC 3339 with an offset (`2026-10-18T14:30:00Z`), an absolute instant
//! - naive date-time (`2026-10-18T14:30`, `2026-10-18 14:30:15.5`), wall-clock
//!   time in whatever zone the caller evaluates it in
//! - date only (`2026-10-18`), midnight of that day

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike,
};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A due date before it is placed in a time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDue {
    Absolute(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

/// Parse a due-date string into one of the accepted shapes.
pub fn parse(raw: &str) -> Option<ParsedDue> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedDue::Absolute(dt));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(ParsedDue::Naive(naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(ParsedDue::Date)
}

/// Canonical stored form of a due-date string, or `None` if it does not parse.
pub fn normalize(raw: &str) -> Option<String> {
    match parse(raw)? {
        ParsedDue::Absolute(_) => Some(raw.trim().to_string()),
        ParsedDue::Naive(naive) => {
            let naive = naive.with_nanosecond(0).unwrap_or(naive);
            let fmt = if naive.second() == 0 {
                "%Y-%m-%dT%H:%M"
            } else {
                "%Y-%m-%dT%H:%M:%S"
            };
            Some(naive.format(fmt).to_string())
        }
        ParsedDue::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
    }
}

/// Resolve a due-date string to an instant in `tz`.
///
/// Naive values are read as wall-clock time in `tz`. A time that falls in a
/// DST gap moves forward one hour; an ambiguous one takes the earlier instant.
pub fn resolve<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let naive = match parse(raw)? {
        ParsedDue::Absolute(dt) => return Some(dt.with_timezone(tz)),
        ParsedDue::Naive(naive) => naive,
        ParsedDue::Date(date) => date.and_hms_opt(0, 0, 0)?,
    };
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}
