// Event log HTTP routes
// Events are immutable: only list and create exist

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use nightctrl_core::Event;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::{json_rejection, query_rejection, ApiError, ErrorResponse};
use crate::services::{CreateEventInput, EventService};

/// Inclusive time range shared by the read endpoints.
/// Accepts RFC 3339 or naive local `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Lower bound (inclusive). Blank or missing means unbounded.
    #[param(example = "2024-01-01T00:00")]
    pub start: Option<String>,
    /// Upper bound (inclusive). Blank or missing means unbounded.
    #[param(example = "2024-01-08T00:00")]
    pub end: Option<String>,
}

/// Request to record an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// When the event happened. RFC 3339, or a local date-time in the
    /// server's display timezone.
    #[schema(example = "2024-01-01T22:00")]
    pub timestamp: Option<String>,
    /// Event type tag.
    #[serde(rename = "type")]
    #[schema(example = "sleep_start")]
    pub event_type: Option<String>,
    /// Dosage for supplements, minutes for wake events.
    #[schema(example = 400.0)]
    pub value: Option<f64>,
    /// Unit for `value`. Defaults per type when omitted.
    #[schema(example = "mg")]
    pub unit: Option<String>,
}

impl From<CreateEventRequest> for CreateEventInput {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            timestamp: req.timestamp,
            event_type: req.event_type,
            value: req.value,
            unit: req.unit,
        }
    }
}

// ============================================
// App State and Routes
// ============================================

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
    /// Owner every request acts as
    pub owner_id: Arc<str>,
}

impl AppState {
    pub fn new(service: Arc<EventService>, owner_id: impl Into<Arc<str>>) -> Self {
        Self {
            service,
            owner_id: owner_id.into(),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// GET /events - List the owner's events, newest first
#[utoipa::path(
    get,
    path = "/events",
    params(RangeQuery),
    responses(
        (status = 200, description = "Events in range, newest first", body = Vec<Event>),
        (status = 400, description = "Invalid range bound", body = ErrorResponse),
        (status = 500, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let range = state
        .service
        .parse_range(query.start.as_deref(), query.end.as_deref())?;

    let events = state.service.list(&state.owner_id, range).await?;
    Ok(Json(events))
}

/// POST /events - Record one event
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = Event),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 500, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let Json(req) = body.map_err(json_rejection)?;
    let event = state.service.create(&state.owner_id, req.into()).await?;

    Ok((StatusCode::CREATED, Json(event)))
}
