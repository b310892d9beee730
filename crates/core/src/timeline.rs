// Timeline presentation
//
// Groups events by local calendar date (newest date first) and sorts each
// day's events newest first. Read-side formatting only.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::event::{sort_newest_first, Event, SLEEP_END};
use crate::time::{local_date, local_datetime};

/// All events that happened on one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TimelineDay {
    /// Calendar date in the display timezone.
    pub date: NaiveDate,
    /// Heading label, e.g. "Monday, January 1".
    #[cfg_attr(feature = "openapi", schema(example = "Monday, January 1"))]
    pub label: String,
    /// Events of the day, newest first.
    pub events: Vec<TimelineEntry>,
}

/// One event on the timeline with its display strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub event: Event,
    /// Local wall-clock time, e.g. "10:00 PM".
    #[cfg_attr(feature = "openapi", schema(example = "10:00 PM"))]
    pub time_label: String,
    /// Formatted value, e.g. "400 mg" or "Duration: 7 hours 30 minutes".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Format an event's value for display. None when the event has no value.
///
/// Wake events carry a sleep duration in minutes and render as whole hours
/// plus remaining minutes; everything else renders as "value unit".
pub fn describe_value(event: &Event) -> Option<String> {
    let value = event.value?;

    if event.is_type(SLEEP_END) {
        let total_minutes = value.round() as i64;
        let hours = total_minutes.div_euclid(60);
        let minutes = total_minutes.rem_euclid(60);
        return Some(format!("Duration: {hours} hours {minutes} minutes"));
    }

    Some(match event.unit.as_deref() {
        Some(unit) => format!("{value} {unit}"),
        None => value.to_string(),
    })
}

/// Group events into timeline days.
pub fn build_timeline<Tz: TimeZone>(events: &[Event], tz: &Tz) -> Vec<TimelineDay> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events {
        by_date
            .entry(local_date(&event.timestamp, tz))
            .or_default()
            .push(event.clone());
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, mut day_events)| {
            sort_newest_first(&mut day_events);
            TimelineDay {
                date,
                label: date.format("%A, %B %-d").to_string(),
                events: day_events
                    .into_iter()
                    .map(|event| TimelineEntry {
                        time_label: local_datetime(&event.timestamp, tz)
                            .format("%-I:%M %p")
                            .to_string(),
                        detail: describe_value(&event),
                        event,
                    })
                    .collect(),
            }
        })
        .collect()
}
