// Timestamp parsing and calendar bucketing
//
// Accepted inputs:
// - RFC 3339 with offset ("2024-01-01T22:00:00Z", "2024-01-01T22:00:00+02:00")
// - naive local date-time as sent by a datetime-local input ("2024-01-01T22:00",
//   "2024-01-01T22:00:00", "2024-01-01T22:00:00.123"), read in the given zone
// - bare date ("2024-01-01"), meaning local midnight
//
// Calendar dates are naive local-time arithmetic: the date portion of the
// timestamp as seen in the configured zone, nothing more.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{EventError, Result};
use crate::event::EventRange;

const NAIVE_MINUTE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Years a stored timestamp may fall in (four-digit calendar years)
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse a client-supplied timestamp into UTC.
///
/// Naive inputs are interpreted in `tz`. During a DST fall-back the earlier
/// of the two instants is used; local times skipped by a spring-forward are
/// rejected.
pub fn parse_timestamp<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(EventError::MissingTimestamp);
    }

    let parsed = match DateTime::parse_from_rfc3339(input) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => parse_naive(input)
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
            .map(|dt| dt.with_timezone(&Utc)),
    };

    parsed
        .filter(|dt| SUPPORTED_YEARS.contains(&dt.year()))
        .ok_or_else(|| EventError::invalid_timestamp(input))
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    if let Ok(naive) = input.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    if let Some(naive) = NAIVE_MINUTE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Some(naive);
    }
    input
        .parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse optional `start`/`end` query bounds. Blank bounds are unbounded.
pub fn parse_range<Tz: TimeZone>(
    start: Option<&str>,
    end: Option<&str>,
    tz: &Tz,
) -> Result<EventRange> {
    let parse_bound = |bound: Option<&str>| -> Result<Option<DateTime<Utc>>> {
        match bound.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => parse_timestamp(s, tz).map(Some),
            None => Ok(None),
        }
    };

    Ok(EventRange::new(parse_bound(start)?, parse_bound(end)?))
}

/// Calendar date of an instant in the given zone
pub fn local_date<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Wall-clock time of an instant in the given zone
pub fn local_datetime<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    ts.with_timezone(tz).naive_local()
}
