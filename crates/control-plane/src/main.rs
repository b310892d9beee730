// NightCtrl API server
// Decision: Single binary serving the event API, derived sleep views, health and Swagger UI
// Decision: Storage is PostgreSQL when DATABASE_URL is set, in-memory with DEV_MODE=true

use anyhow::{Context, Result};
use chrono::Utc;
use nightctrl_control_plane::api::build_app;
use nightctrl_control_plane::config::ServerConfig;
use nightctrl_control_plane::seed::{seed_demo_data, DEFAULT_SEED_DAYS};
use nightctrl_control_plane::services::EventService;
use nightctrl_core::telemetry::{init_telemetry, TelemetryConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG / LOG_LEVEL override the default filter
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "nightctrl" {
        telemetry_config.service_name = "nightctrl-control-plane".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("nightctrl_control_plane=debug,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(&telemetry_config);

    tracing::info!("nightctrl-control-plane starting...");

    let config = ServerConfig::from_env()?;
    let storage = Arc::new(
        config
            .open_storage()
            .await
            .context("Failed to open storage")?,
    );
    if storage.is_dev_mode() {
        tracing::warn!("Running in DEV MODE with in-memory storage; data is lost on restart");
    } else {
        tracing::info!("Connected to database");
    }
    tracing::info!(
        owner = %config.owner_id,
        timezone = %config.timezone,
        "Serving events"
    );

    if config.seed_on_start {
        let service = EventService::new(storage.clone(), config.timezone);
        let today = Utc::now().with_timezone(&config.timezone).date_naive();
        seed_demo_data(
            &service,
            &config.owner_id,
            today,
            DEFAULT_SEED_DAYS,
            &mut rand::thread_rng(),
        )
        .await
        .context("Failed to seed demo data")?;
    }

    let app = build_app(storage, &config);

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.http_addr))?;
    tracing::info!("HTTP server listening on {}", config.http_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
