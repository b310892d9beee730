// NightCtrl core
//
// DB-agnostic domain logic for the sleep tracker:
// - Event entity and the static type -> (category, name) mapping
// - Timestamp parsing and calendar bucketing in a caller-chosen timezone
// - Sleep aggregation (nightly durations, weekly average)
// - Timeline presentation (events grouped by day)
//
// Everything here is synchronous and side-effect free except telemetry setup.

pub mod error;
pub mod event;
pub mod sleep;
pub mod telemetry;
pub mod time;
pub mod timeline;

// Re-exports for convenience
pub use error::{EventError, Result};
pub use event::{
    event_type_info, known_event_types, sort_newest_first, Event, EventCategory, EventRange,
    EventTypeInfo, NewEvent, SLEEP_END, SLEEP_START, SUPPLEMENT, UNIT_MILLIGRAMS, UNIT_MINUTES,
};
pub use sleep::{summarize_sleep, SleepNight, SleepSummary, DEFAULT_NIGHT_LIMIT};
pub use time::{local_date, parse_range, parse_timestamp};
pub use timeline::{build_timeline, describe_value, TimelineDay, TimelineEntry};
