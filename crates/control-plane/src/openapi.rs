// OpenAPI specification generation
//
// Used by the server (Swagger UI) and the export-openapi binary.

use crate::api;
use nightctrl_core::{Event, EventCategory, SleepNight, SleepSummary, TimelineDay, TimelineEntry};
use utoipa::OpenApi;

/// OpenAPI documentation for the NightCtrl API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::events::create_event,
        api::sleep::sleep_summary,
        api::timeline::timeline,
        api::health::health,
    ),
    components(
        schemas(
            Event, EventCategory,
            SleepNight, SleepSummary,
            TimelineDay, TimelineEntry,
            api::events::CreateEventRequest,
            api::health::HealthResponse,
            api::ErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Sleep and intervention event log"),
        (name = "sleep", description = "Derived sleep duration series"),
        (name = "timeline", description = "Events grouped by calendar day"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "NightCtrl API",
        description = "Record sleep and supplement events and read derived sleep insights",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}
