// Insight service: derived read models over the event log
//
// Nothing here writes. Both views are recomputed from the owner's events on
// every call, so they always agree with GET /events for the same range.

use nightctrl_core::{build_timeline, summarize_sleep, EventRange, SleepSummary, TimelineDay};
use std::sync::Arc;

use super::event::{EventService, Result};

/// Largest `limit` accepted for the sleep summary
pub const MAX_NIGHT_LIMIT: usize = 31;

pub struct InsightService {
    events: Arc<EventService>,
}

impl InsightService {
    pub fn new(events: Arc<EventService>) -> Self {
        Self { events }
    }

    pub async fn sleep_summary(
        &self,
        user_id: &str,
        range: EventRange,
        limit: usize,
    ) -> Result<SleepSummary> {
        let limit = limit.clamp(1, MAX_NIGHT_LIMIT);
        let events = self.events.list(user_id, range).await?;
        Ok(summarize_sleep(&events, &self.events.timezone(), limit))
    }

    pub async fn timeline(&self, user_id: &str, range: EventRange) -> Result<Vec<TimelineDay>> {
        let events = self.events.list(user_id, range).await?;
        Ok(build_timeline(&events, &self.events.timezone()))
    }
}
