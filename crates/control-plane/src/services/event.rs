// Event service for business logic
//
// Central entry point for event ingestion and reads, used by the HTTP API and
// the seed generator. Validates payloads, applies the type mapping, enriches
// wake events with the preceding night's duration, and converts storage rows
// into core::Event.

use crate::storage::{CreateEventRow, EventRow, ListEventsFilter, StorageBackend};
use anyhow::anyhow;
use chrono::Duration;
use chrono_tz::Tz;
use nightctrl_core::{
    parse_range, parse_timestamp, sort_newest_first, Event, EventCategory, EventError,
    EventRange, NewEvent, SLEEP_END, SLEEP_START,
};
use std::sync::Arc;
use thiserror::Error;

/// How far back a wake event looks for its bedtime
pub const BEDTIME_LOOKBACK_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum EventServiceError {
    /// Client sent something unusable; nothing was written
    #[error(transparent)]
    Validation(#[from] EventError),

    /// Storage could not be reached or returned an error
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EventServiceError>;

/// Raw write payload before validation
#[derive(Debug, Clone, Default)]
pub struct CreateEventInput {
    pub timestamp: Option<String>,
    pub event_type: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

pub struct EventService {
    db: Arc<StorageBackend>,
    timezone: Tz,
}

impl EventService {
    pub fn new(db: Arc<StorageBackend>, timezone: Tz) -> Self {
        Self { db, timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Parse optional range bounds in the service's timezone
    pub fn parse_range(&self, start: Option<&str>, end: Option<&str>) -> Result<EventRange> {
        Ok(parse_range(start, end, &self.timezone)?)
    }

    /// Validate and store one event for `user_id`.
    pub async fn create(&self, user_id: &str, input: CreateEventInput) -> Result<Event> {
        let timestamp = input
            .timestamp
            .as_deref()
            .ok_or(EventError::MissingTimestamp)
            .and_then(|raw| parse_timestamp(raw, &self.timezone))?;
        let event_type = input.event_type.ok_or(EventError::MissingEventType)?;

        let mut new_event = NewEvent::new(user_id, &event_type, timestamp, input.value, input.unit)?;

        if new_event.event_type == SLEEP_END && new_event.value.is_none() {
            if let Some(minutes) = self.minutes_since_bedtime(user_id, &new_event).await? {
                new_event = new_event.with_duration_minutes(minutes);
            }
        }

        let row = self
            .db
            .create_event(CreateEventRow {
                user_id: new_event.user_id,
                occurred_at: new_event.timestamp,
                event_type: new_event.event_type,
                category: new_event.category.to_string(),
                name: new_event.name,
                value: new_event.value,
                unit: new_event.unit,
            })
            .await
            .map_err(EventServiceError::StorageUnavailable)?;

        tracing::info!(
            event_id = %row.id,
            event_type = %row.event_type,
            timestamp = %row.occurred_at,
            "Event recorded"
        );

        Self::row_to_event(row)
    }

    /// All events of `user_id` inside `range`, newest first.
    pub async fn list(&self, user_id: &str, range: EventRange) -> Result<Vec<Event>> {
        let filter = ListEventsFilter {
            start: range.start,
            end: range.end,
        };
        let rows = self
            .db
            .list_events(user_id, filter)
            .await
            .map_err(EventServiceError::StorageUnavailable)?;

        let mut events = rows
            .into_iter()
            .map(Self::row_to_event)
            .collect::<Result<Vec<_>>>()?;
        sort_newest_first(&mut events);

        tracing::debug!(user_id = %user_id, count = events.len(), "Listed events");
        Ok(events)
    }

    /// Whole minutes between the latest bedtime in the lookback window and the wake event
    async fn minutes_since_bedtime(&self, user_id: &str, wake: &NewEvent) -> Result<Option<i64>> {
        let Some(window_start) = wake
            .timestamp
            .checked_sub_signed(Duration::hours(BEDTIME_LOOKBACK_HOURS))
        else {
            return Ok(None);
        };
        let window = EventRange::new(Some(window_start), Some(wake.timestamp));
        let bedtime = self
            .list(user_id, window)
            .await?
            .into_iter()
            .filter(|e| e.is_type(SLEEP_START) && e.timestamp < wake.timestamp)
            .map(|e| e.timestamp)
            .max();

        Ok(bedtime.map(|start| (wake.timestamp - start).num_minutes()))
    }

    fn row_to_event(row: EventRow) -> Result<Event> {
        let category = EventCategory::parse(&row.category).ok_or_else(|| {
            EventServiceError::StorageUnavailable(anyhow!(
                "event {} has unknown category {:?}",
                row.id,
                row.category
            ))
        })?;

        Ok(Event {
            id: row.id,
            user_id: row.user_id,
            timestamp: row.occurred_at,
            event_type: row.event_type,
            category,
            name: row.name,
            value: row.value,
            unit: row.unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::{DateTime, Utc};
    use nightctrl_core::{event_type_info, known_event_types, SUPPLEMENT};

    const OWNER: &str = "demo-user-id";

    fn service() -> EventService {
        EventService::new(Arc::new(StorageBackend::in_memory()), Tz::UTC)
    }

    fn input(event_type: &str, timestamp: &str) -> CreateEventInput {
        CreateEventInput {
            timestamp: Some(timestamp.to_string()),
            event_type: Some(event_type.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_applies_type_mapping() {
        let service = service();
        for event_type in known_event_types() {
            let mut payload = input(event_type, "2024-01-01T22:00");
            if event_type == SUPPLEMENT {
                payload.value = Some(400.0);
            }
            let event = service.create(OWNER, payload).await.unwrap();
            let info = event_type_info(event_type).unwrap();
            assert_eq!(event.category, info.category);
            assert_eq!(event.name, info.name);
            assert_eq!(event.user_id, OWNER);
        }
    }

    #[tokio::test]
    async fn test_create_requires_timestamp() {
        let service = service();
        let err = service
            .create(
                OWNER,
                CreateEventInput {
                    event_type: Some(SLEEP_START.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EventServiceError::Validation(EventError::MissingTimestamp)
        ));

        let err = service
            .create(OWNER, input(SLEEP_START, "not a date"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EventServiceError::Validation(EventError::InvalidTimestamp(_))
        ));

        let events = service.list(OWNER, EventRange::all()).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_wake_event_gets_duration_from_bedtime() {
        let service = service();
        service
            .create(OWNER, input(SLEEP_START, "2024-01-01T23:00"))
            .await
            .unwrap();
        // A later bedtime is the one that counts
        service
            .create(OWNER, input(SLEEP_START, "2024-01-01T23:15"))
            .await
            .unwrap();

        let wake = service
            .create(OWNER, input(SLEEP_END, "2024-01-02T06:45"))
            .await
            .unwrap();

        assert_eq!(wake.value, Some(450.0));
        assert_eq!(wake.unit.as_deref(), Some("minutes"));
    }

    #[tokio::test]
    async fn test_wake_event_keeps_explicit_value() {
        let service = service();
        service
            .create(OWNER, input(SLEEP_START, "2024-01-01T23:00"))
            .await
            .unwrap();

        let mut payload = input(SLEEP_END, "2024-01-02T06:00");
        payload.value = Some(400.0);
        let wake = service.create(OWNER, payload).await.unwrap();

        assert_eq!(wake.value, Some(400.0));
    }

    #[tokio::test]
    async fn test_wake_event_without_recent_bedtime() {
        let service = service();
        service
            .create(OWNER, input(SLEEP_START, "2024-01-01T23:00"))
            .await
            .unwrap();

        let wake = service
            .create(OWNER, input(SLEEP_END, "2024-01-03T07:00"))
            .await
            .unwrap();

        assert_eq!(wake.value, None);
        assert_eq!(wake.unit, None);
    }

    #[tokio::test]
    async fn test_wake_event_with_extended_year_is_rejected() {
        let service = service();

        let err = service
            .create(OWNER, input(SLEEP_END, "-262143-01-01T00:00"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EventServiceError::Validation(EventError::InvalidTimestamp(_))
        ));
        let events = service.list(OWNER, EventRange::all()).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_bedtime_lookup_at_earliest_instant() {
        let service = service();
        let wake = NewEvent::new(OWNER, SLEEP_END, DateTime::<Utc>::MIN_UTC, None, None).unwrap();

        let minutes = service.minutes_since_bedtime(OWNER, &wake).await.unwrap();

        assert_eq!(minutes, None);
    }

    #[tokio::test]
    async fn test_list_range_and_order() {
        let service = service();
        for ts in [
            "2024-01-01T20:00",
            "2024-01-01T22:00",
            "2024-01-02T06:00",
            "2024-01-02T23:00",
        ] {
            service.create(OWNER, input(SLEEP_START, ts)).await.unwrap();
        }

        let range = service
            .parse_range(Some("2024-01-01T22:00"), Some("2024-01-02T06:00"))
            .unwrap();
        let events = service.list(OWNER, range).await.unwrap();

        let stamps: Vec<_> = events.iter().map(|e| e.timestamp.to_rfc3339()).collect();
        assert_eq!(
            stamps,
            vec!["2024-01-02T06:00:00+00:00", "2024-01-01T22:00:00+00:00"]
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let db = Database::connect_lazy(
            "postgres://nightctrl@127.0.0.1:1/nightctrl",
            std::time::Duration::from_millis(500),
        )
        .unwrap();
        let service = EventService::new(Arc::new(StorageBackend::Postgres(db)), Tz::UTC);

        let err = service
            .create(OWNER, input(SLEEP_START, "2024-01-01T22:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, EventServiceError::StorageUnavailable(_)));

        let err = service.list(OWNER, EventRange::all()).await.unwrap_err();
        assert!(matches!(err, EventServiceError::StorageUnavailable(_)));
    }
}
