// Sleep summary HTTP route

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use nightctrl_core::{SleepSummary, DEFAULT_NIGHT_LIMIT};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use super::common::{query_rejection, ApiError, ErrorResponse};
use crate::services::{EventService, InsightService};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SleepSummaryQuery {
    /// Lower bound (inclusive). Blank or missing means unbounded.
    pub start: Option<String>,
    /// Upper bound (inclusive). Blank or missing means unbounded.
    pub end: Option<String>,
    /// Most recent nights to return (default 7, clamped to 1..=31).
    #[param(example = 7)]
    pub limit: Option<usize>,
}

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub insights: Arc<InsightService>,
    pub owner_id: Arc<str>,
}

impl AppState {
    pub fn new(events: Arc<EventService>, owner_id: impl Into<Arc<str>>) -> Self {
        Self {
            insights: Arc::new(InsightService::new(events.clone())),
            events,
            owner_id: owner_id.into(),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/sleep/summary", get(sleep_summary))
        .with_state(state)
}

/// GET /sleep/summary - Nightly durations and their average
#[utoipa::path(
    get,
    path = "/sleep/summary",
    params(SleepSummaryQuery),
    responses(
        (status = 200, description = "Most recent qualifying nights, oldest first", body = SleepSummary),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "sleep"
)]
pub async fn sleep_summary(
    State(state): State<AppState>,
    query: Result<Query<SleepSummaryQuery>, QueryRejection>,
) -> Result<Json<SleepSummary>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let range = state
        .events
        .parse_range(query.start.as_deref(), query.end.as_deref())?;

    let summary = state
        .insights
        .sleep_summary(
            &state.owner_id,
            range,
            query.limit.unwrap_or(DEFAULT_NIGHT_LIMIT),
        )
        .await?;
    Ok(Json(summary))
}
