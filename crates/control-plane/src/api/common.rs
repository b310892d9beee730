// Common DTOs and error mapping for the public API

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::EventServiceError;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    #[schema(example = "timestamp is required")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<EventServiceError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: EventServiceError) -> Self {
        match err {
            EventServiceError::Validation(e) => {
                tracing::warn!(error = %e, "Rejected invalid request");
                ErrorResponse::new(e.to_string()).into_response(StatusCode::BAD_REQUEST)
            }
            EventServiceError::StorageUnavailable(e) => {
                tracing::error!(error = ?e, "Storage request failed");
                ErrorResponse::new(format!("storage unavailable: {e}"))
                    .into_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Extractor rejections are client errors whatever axum's default status is
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::warn!(error = %rejection.body_text(), "Rejected malformed JSON body");
    ErrorResponse::new(rejection.body_text()).into_response(StatusCode::BAD_REQUEST)
}

pub fn query_rejection(rejection: QueryRejection) -> ApiError {
    tracing::warn!(error = %rejection.body_text(), "Rejected malformed query string");
    ErrorResponse::new(rejection.body_text()).into_response(StatusCode::BAD_REQUEST)
}
