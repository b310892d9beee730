// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// This implementation provides a PostgreSQL-compatible API backed by an
// in-memory HashMap, allowing the control-plane to run without a database for
// development and tests.

use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    events: RwLock<HashMap<Uuid, EventRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events across all owners
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let id = Uuid::now_v7();
        let row = EventRow {
            id,
            user_id: input.user_id,
            occurred_at: input.occurred_at,
            event_type: input.event_type,
            category: input.category,
            name: input.name,
            value: input.value,
            unit: input.unit,
        };
        self.events.write().insert(id, row.clone());
        Ok(row)
    }

    pub async fn list_events(
        &self,
        user_id: &str,
        filter: ListEventsFilter,
    ) -> Result<Vec<EventRow>> {
        let mut result: Vec<_> = self
            .events
            .read()
            .values()
            .filter(|e| e.user_id == user_id && filter.matches(&e.occurred_at))
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(result)
    }
}
