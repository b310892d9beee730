// Sleep aggregation
//
// Derives per-night sleep duration from paired sleep_start/sleep_end events.
//
// Bucketing rules:
// 1. Events are partitioned by the local calendar date of their timestamp.
// 2. Per date, the earliest sleep_start is the night's start and the earliest
//    sleep_end is the night's end. Later duplicates on the same date are ignored.
// 3. A date qualifies when it has both; duration is end - start. A session
//    whose wake time falls on the next calendar date therefore never pairs up,
//    and a morning wake paired with that evening's bedtime yields a negative
//    duration.
// 4. The most recent `limit` qualifying nights are kept, oldest first.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::event::{Event, SLEEP_END, SLEEP_START};
use crate::time::local_date;

/// Number of nights shown by default (one week)
pub const DEFAULT_NIGHT_LIMIT: usize = 7;

/// One qualifying night.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SleepNight {
    /// Calendar date the night is attributed to.
    pub date: NaiveDate,
    /// Short display label, e.g. "Jan 1".
    #[cfg_attr(feature = "openapi", schema(example = "Jan 1"))]
    pub label: String,
    /// Bedtime.
    pub start: DateTime<Utc>,
    /// Wake time.
    pub end: DateTime<Utc>,
    /// Whole minutes between start and end.
    pub duration_minutes: i64,
    /// Duration in hours, rounded to one decimal.
    pub hours: f64,
}

/// Sleep duration series plus its average.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    /// Qualifying nights in ascending date order.
    pub nights: Vec<SleepNight>,
    /// Mean of `nights[].hours`, rounded to one decimal. 0 when empty.
    pub average_hours: f64,
}

impl SleepSummary {
    pub fn empty() -> Self {
        Self {
            nights: Vec::new(),
            average_hours: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct NightBounds {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

fn keep_earliest(slot: &mut Option<DateTime<Utc>>, ts: DateTime<Utc>) {
    match slot {
        Some(existing) if *existing <= ts => {}
        _ => *slot = Some(ts),
    }
}

/// Round to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean of the nights' hours, rounded to one decimal; 0 when empty
pub fn average_hours(nights: &[SleepNight]) -> f64 {
    if nights.is_empty() {
        return 0.0;
    }
    let total: f64 = nights.iter().map(|n| n.hours).sum();
    round_one_decimal(total / nights.len() as f64)
}

/// Compute the sleep summary for an event sequence (any order).
pub fn summarize_sleep<Tz: TimeZone>(events: &[Event], tz: &Tz, limit: usize) -> SleepSummary {
    let mut buckets: BTreeMap<NaiveDate, NightBounds> = BTreeMap::new();

    for event in events {
        let is_start = match event.event_type.as_str() {
            SLEEP_START => true,
            SLEEP_END => false,
            _ => continue,
        };
        let bounds = buckets
            .entry(local_date(&event.timestamp, tz))
            .or_default();
        let slot = if is_start {
            &mut bounds.start
        } else {
            &mut bounds.end
        };
        keep_earliest(slot, event.timestamp);
    }

    let mut nights: Vec<SleepNight> = buckets
        .into_iter()
        .rev()
        .filter_map(|(date, bounds)| match (bounds.start, bounds.end) {
            (Some(start), Some(end)) => Some(night(date, start, end)),
            _ => None,
        })
        .take(limit)
        .collect();
    nights.reverse();

    tracing::debug!(
        events = events.len(),
        nights = nights.len(),
        "Summarized sleep sessions"
    );

    let average = average_hours(&nights);
    SleepSummary {
        nights,
        average_hours: average,
    }
}

fn night(date: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>) -> SleepNight {
    let duration_minutes = (end - start).num_minutes();
    SleepNight {
        date,
        label: date.format("%b %-d").to_string(),
        start,
        end,
        duration_minutes,
        hours: round_one_decimal(duration_minutes as f64 / 60.0),
    }
}
