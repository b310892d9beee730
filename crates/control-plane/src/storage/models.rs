// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Events
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
    pub event_type: String,
    pub category: String,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
    pub event_type: String,
    pub category: String,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// Filter for listing one owner's events. Bounds are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEventsFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ListEventsFilter {
    pub fn matches(&self, occurred_at: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *occurred_at >= start)
            && self.end.map_or(true, |end| *occurred_at <= end)
    }
}
