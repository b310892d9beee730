// Event domain types
//
// An Event is an immutable, timestamped record of something that happened:
// a sleep boundary or an intervention. Events are never updated or deleted.
// The `type` field is an open string tag; `category` and `name` are derived
// from it once, at creation time, through the static type mapping below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{EventError, Result};

/// Bedtime event type tag
pub const SLEEP_START: &str = "sleep_start";
/// Wake time event type tag
pub const SLEEP_END: &str = "sleep_end";
/// Supplement intake event type tag
pub const SUPPLEMENT: &str = "supplement";

/// Unit used for supplement dosages
pub const UNIT_MILLIGRAMS: &str = "mg";
/// Unit used for sleep durations carried on `sleep_end` events
pub const UNIT_MINUTES: &str = "minutes";

/// Grouping tag derived from the event type.
/// - `sleep`: bedtime and wake time
/// - `intervention`: anything taken or done to influence sleep
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Sleep boundary events.
    Sleep,
    /// Supplements and other interventions.
    Intervention,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Sleep => "sleep",
            EventCategory::Intervention => "intervention",
        }
    }

    /// Parse a stored category tag. Returns None for unknown tags.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sleep" => Some(EventCategory::Sleep),
            "intervention" => Some(EventCategory::Intervention),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the type mapping knows about one event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTypeInfo {
    pub category: EventCategory,
    /// Human-readable label stored as the event name
    pub name: &'static str,
    /// Unit assumed when a value arrives without one
    pub default_unit: Option<&'static str>,
}

static EVENT_TYPES: LazyLock<HashMap<&'static str, EventTypeInfo>> = LazyLock::new(|| {
    HashMap::from([
        (
            SLEEP_START,
            EventTypeInfo {
                category: EventCategory::Sleep,
                name: "Bedtime",
                default_unit: None,
            },
        ),
        (
            SLEEP_END,
            EventTypeInfo {
                category: EventCategory::Sleep,
                name: "Wake Time",
                default_unit: Some(UNIT_MINUTES),
            },
        ),
        (
            SUPPLEMENT,
            EventTypeInfo {
                category: EventCategory::Intervention,
                name: "Supplement",
                default_unit: Some(UNIT_MILLIGRAMS),
            },
        ),
    ])
});

/// Look up a type tag in the static mapping
pub fn event_type_info(event_type: &str) -> Option<&'static EventTypeInfo> {
    EVENT_TYPES.get(event_type)
}

/// All type tags the write path accepts, sorted
pub fn known_event_types() -> Vec<&'static str> {
    let mut types: Vec<_> = EVENT_TYPES.keys().copied().collect();
    types.sort_unstable();
    types
}

/// Event - an immutable timestamped record owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier, generated at creation.
    pub id: Uuid,
    /// Owner of the event.
    #[cfg_attr(feature = "openapi", schema(example = "demo-user-id"))]
    pub user_id: String,
    /// When the event happened (not when it was recorded).
    pub timestamp: DateTime<Utc>,
    /// Event type tag, e.g. `sleep_start`, `sleep_end`, `supplement`.
    #[serde(rename = "type")]
    #[cfg_attr(feature = "openapi", schema(example = "sleep_start"))]
    pub event_type: String,
    /// Grouping derived from the type.
    pub category: EventCategory,
    /// Display label derived from the type.
    #[cfg_attr(feature = "openapi", schema(example = "Bedtime"))]
    pub name: String,
    /// Dosage for supplements, duration in minutes for wake events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Unit for `value`. Present exactly when `value` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Event {
    pub fn is_type(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}

/// A validated event ready to be persisted. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub category: EventCategory,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl NewEvent {
    /// Build a new event, deriving category and name from the type mapping.
    ///
    /// A value without a unit picks up the type's default unit; a unit without
    /// a value is rejected so the pair is always present together or absent.
    pub fn new(
        user_id: impl Into<String>,
        event_type: &str,
        timestamp: DateTime<Utc>,
        value: Option<f64>,
        unit: Option<String>,
    ) -> Result<Self> {
        let event_type = event_type.trim();
        if event_type.is_empty() {
            return Err(EventError::MissingEventType);
        }
        let info = event_type_info(event_type)
            .ok_or_else(|| EventError::UnknownEventType(event_type.to_string()))?;

        let unit = unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let (value, unit) = match (value, unit) {
            (None, None) => (None, None),
            (None, Some(_)) => return Err(EventError::UnitWithoutValue),
            (Some(v), _) if !v.is_finite() => return Err(EventError::InvalidValue),
            (Some(v), Some(u)) => (Some(v), Some(u)),
            (Some(v), None) => match info.default_unit {
                Some(u) => (Some(v), Some(u.to_string())),
                None => return Err(EventError::ValueWithoutUnit(event_type.to_string())),
            },
        };

        Ok(Self {
            user_id: user_id.into(),
            timestamp,
            event_type: event_type.to_string(),
            category: info.category,
            name: info.name.to_string(),
            value,
            unit,
        })
    }

    /// Attach a computed sleep duration (whole minutes) to a wake event
    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.value = Some(minutes as f64);
        self.unit = Some(UNIT_MINUTES.to_string());
        self
    }

    /// Materialize the stored record once the store has assigned an id
    pub fn into_event(self, id: Uuid) -> Event {
        Event {
            id,
            user_id: self.user_id,
            timestamp: self.timestamp,
            event_type: self.event_type,
            category: self.category,
            name: self.name,
            value: self.value,
            unit: self.unit,
        }
    }
}

/// Inclusive time window for reads. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl EventRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// No bounds on either side
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *ts >= start) && self.end.map_or(true, |end| *ts <= end)
    }
}

/// Sort events newest first; ties broken by id (v7 ids are creation-ordered)
pub fn sort_newest_first(events: &mut [Event]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_type_mapping() {
        let start = event_type_info(SLEEP_START).unwrap();
        assert_eq!(start.category, EventCategory::Sleep);
        assert_eq!(start.name, "Bedtime");

        let end = event_type_info(SLEEP_END).unwrap();
        assert_eq!(end.category, EventCategory::Sleep);
        assert_eq!(end.name, "Wake Time");

        let supplement = event_type_info(SUPPLEMENT).unwrap();
        assert_eq!(supplement.category, EventCategory::Intervention);
        assert_eq!(supplement.name, "Supplement");

        assert!(event_type_info("nap").is_none());
        assert_eq!(
            known_event_types(),
            vec![SLEEP_END, SLEEP_START, SUPPLEMENT]
        );
    }

    #[test]
    fn test_new_event_derives_category_and_name() {
        for event_type in known_event_types() {
            let info = event_type_info(event_type).unwrap();
            let event = NewEvent::new("demo-user-id", event_type, ts(22, 0), None, None).unwrap();
            assert_eq!(event.category, info.category);
            assert_eq!(event.name, info.name);
            assert_eq!(event.value, None);
            assert_eq!(event.unit, None);
        }
    }

    #[test]
    fn test_new_event_rejects_unknown_type() {
        let err = NewEvent::new("u", "nap", ts(13, 0), None, None).unwrap_err();
        assert_eq!(err, EventError::UnknownEventType("nap".to_string()));

        let err = NewEvent::new("u", "  ", ts(13, 0), None, None).unwrap_err();
        assert_eq!(err, EventError::MissingEventType);
    }

    #[test]
    fn test_value_and_unit_travel_together() {
        let event = NewEvent::new("u", SUPPLEMENT, ts(21, 0), Some(400.0), None).unwrap();
        assert_eq!(event.value, Some(400.0));
        assert_eq!(event.unit.as_deref(), Some("mg"));

        let event =
            NewEvent::new("u", SUPPLEMENT, ts(21, 0), Some(3.0), Some("g".to_string())).unwrap();
        assert_eq!(event.unit.as_deref(), Some("g"));

        let err =
            NewEvent::new("u", SUPPLEMENT, ts(21, 0), None, Some("mg".to_string())).unwrap_err();
        assert_eq!(err, EventError::UnitWithoutValue);

        let err = NewEvent::new("u", SLEEP_START, ts(22, 0), Some(1.0), None).unwrap_err();
        assert_eq!(err, EventError::ValueWithoutUnit(SLEEP_START.to_string()));

        let err = NewEvent::new("u", SUPPLEMENT, ts(21, 0), Some(f64::NAN), None).unwrap_err();
        assert_eq!(err, EventError::InvalidValue);
    }

    #[test]
    fn test_blank_unit_counts_as_missing() {
        let event =
            NewEvent::new("u", SUPPLEMENT, ts(21, 0), Some(200.0), Some(" ".to_string())).unwrap();
        assert_eq!(event.unit.as_deref(), Some("mg"));
    }

    #[test]
    fn test_event_serialization() {
        let event = NewEvent::new("demo-user-id", SUPPLEMENT, ts(21, 0), Some(400.0), None)
            .unwrap()
            .into_event(Uuid::now_v7());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "supplement");
        assert_eq!(json["category"], "intervention");
        assert_eq!(json["name"], "Supplement");
        assert_eq!(json["userId"], "demo-user-id");
        assert_eq!(json["value"], 400.0);
        assert_eq!(json["unit"], "mg");
        assert_eq!(json["timestamp"], "2024-01-01T21:00:00Z");
    }

    #[test]
    fn test_event_serialization_omits_missing_value() {
        let event = NewEvent::new("u", SLEEP_START, ts(22, 0), None, None)
            .unwrap()
            .into_event(Uuid::now_v7());

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("value").is_none());
        assert!(json.get("unit").is_none());
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = EventRange::new(Some(ts(1, 0)), Some(ts(2, 0)));
        assert!(range.contains(&ts(1, 0)));
        assert!(range.contains(&ts(1, 30)));
        assert!(range.contains(&ts(2, 0)));
        assert!(!range.contains(&ts(0, 59)));
        assert!(!range.contains(&ts(2, 1)));

        assert!(EventRange::all().contains(&ts(5, 0)));
        assert!(EventRange::new(None, Some(ts(2, 0))).contains(&ts(0, 0)));
        assert!(!EventRange::new(Some(ts(2, 0)), None).contains(&ts(0, 0)));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut events: Vec<Event> = [ts(1, 0), ts(3, 0), ts(2, 0)]
            .into_iter()
            .map(|t| {
                NewEvent::new("u", SLEEP_START, t, None, None)
                    .unwrap()
                    .into_event(Uuid::now_v7())
            })
            .collect();

        sort_newest_first(&mut events);
        let hours: Vec<_> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(hours, vec![ts(3, 0), ts(2, 0), ts(1, 0)]);
    }
}
