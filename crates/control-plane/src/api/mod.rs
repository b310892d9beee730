// HTTP API routes
//
// Each submodule handles one resource with its own state; `build_app` wires
// them together with the health route, Swagger UI, CORS and request tracing.

pub mod common;
pub mod events;
pub mod health;
pub mod sleep;
pub mod timeline;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::services::EventService;
use crate::storage::StorageBackend;

// Re-export common types
pub use common::{ApiError, ErrorResponse};

/// Assemble the full application router.
pub fn build_app(storage: Arc<StorageBackend>, config: &ServerConfig) -> Router {
    let storage_kind = storage.kind();
    let event_service = Arc::new(EventService::new(storage, config.timezone));
    let owner_id: Arc<str> = Arc::from(config.owner_id.as_str());

    let events_state = events::AppState::new(event_service.clone(), owner_id.clone());
    let insights_state = sleep::AppState::new(event_service, owner_id);

    let api_routes = Router::new()
        .merge(events::routes(events_state))
        .merge(sleep::routes(insights_state.clone()))
        .merge(timeline::routes(insights_state));

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    let app = health::routes(health::HealthState {
        storage: storage_kind,
    })
    .merge(build_router_with_prefix(api_routes, &config.api_prefix))
    .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let app = match cors_layer(&config.cors_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

/// CORS is only needed when the UI is served from another origin
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        return None;
    }

    tracing::info!(origins = ?origins, "CORS origins configured");
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
    )
}
