//! Parsing of loosely formatted dates and datetimes.
//!
//! Accepted inputs, tried in order:
//! - RFC 3339 (`2024-05-01T10:00:00Z`, `2024-05-01T10:00:00-04:00`)
//! - naive datetime (`2024-05-01T10:00:00`, `2024-05-01 10:00`), read in the civil timezone
//! - calendar date (`2024-05-01`), resolved to the start or end of that civil day
//!
//! Every accepted instant falls in UTC years 0000 through 9999, the range the
//! fixed-width storage format can represent.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Which end of a calendar day a date-only value resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    /// `00:00:00.000000`
    Start,
    /// `23:59:59.999999`
    End,
}

/// Parse a date or datetime string into an instant in `offset`.
///
/// Returns `None` for anything that is not a valid calendar date or datetime,
/// or that lies outside the storable year range.
pub fn parse_instant(
    raw: &str,
    offset: FixedOffset,
    bound: DayBound,
) -> Option<DateTime<FixedOffset>> {
    parse_unbounded(raw, offset, bound).filter(is_storable)
}

/// Interpret a JSON number as Unix epoch milliseconds.
pub fn from_epoch_millis(millis: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&offset))
        .filter(is_storable)
}

/// Whether the UTC rendering of `dt` has a four-digit, unsigned year.
pub fn is_storable(dt: &DateTime<FixedOffset>) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&dt.with_timezone(&Utc).year())
}

fn parse_unbounded(
    raw: &str,
    offset: FixedOffset,
    bound: DayBound,
) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return offset.from_local_datetime(&naive).single();
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = match bound {
        DayBound::Start => NaiveTime::from_hms_opt(0, 0, 0)?,
        DayBound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?,
    };
    offset.from_local_datetime(&date.and_time(time)).single()
}
