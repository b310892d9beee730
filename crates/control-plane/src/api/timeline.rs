// Timeline HTTP route

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use nightctrl_core::TimelineDay;

use super::common::{query_rejection, ApiError, ErrorResponse};
use super::events::RangeQuery;
use super::sleep::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/timeline", get(timeline))
        .with_state(state)
}

/// GET /timeline - Events grouped by calendar day, newest day first
#[utoipa::path(
    get,
    path = "/timeline",
    params(RangeQuery),
    responses(
        (status = 200, description = "Timeline days", body = Vec<TimelineDay>),
        (status = 400, description = "Invalid range bound", body = ErrorResponse),
        (status = 500, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "timeline"
)]
pub async fn timeline(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<TimelineDay>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let range = state
        .events
        .parse_range(query.start.as_deref(), query.end.as_deref())?;

    let days = state.insights.timeline(&state.owner_id, range).await?;
    Ok(Json(days))
}
