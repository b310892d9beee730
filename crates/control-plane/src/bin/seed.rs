// NightCtrl demo data seeder
//
// Usage: cargo run --bin nightctrl-seed -- --days 7 --seed 42
//
// Reads the same environment as the server (DATABASE_URL, DEMO_USER_ID,
// NIGHTCTRL_TIMEZONE). With DEV_MODE the data lands in a throwaway in-memory
// store, which is only useful to preview what would be written.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use nightctrl_control_plane::config::ServerConfig;
use nightctrl_control_plane::seed::{seed_demo_data, DEFAULT_SEED_DAYS};
use nightctrl_control_plane::services::EventService;
use nightctrl_core::telemetry::{init_telemetry, TelemetryConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nightctrl-seed")]
#[command(about = "Generate synthetic sleep data for the demo user")]
#[command(version)]
struct Cli {
    /// Number of days to generate, ending today
    #[arg(long, default_value_t = DEFAULT_SEED_DAYS)]
    days: u32,

    /// RNG seed for reproducible data
    #[arg(long, env = "NIGHTCTRL_SEED")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut telemetry_config = TelemetryConfig::from_env();
    telemetry_config.service_name = "nightctrl-seed".to_string();
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter = Some("nightctrl_control_plane=info".to_string());
    }
    init_telemetry(&telemetry_config);

    let config = ServerConfig::from_env()?;
    let storage = config
        .open_storage()
        .await
        .context("Failed to open storage")?;
    let service = EventService::new(Arc::new(storage), config.timezone);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = Utc::now().with_timezone(&config.timezone).date_naive();

    let report = seed_demo_data(&service, &config.owner_id, today, cli.days, &mut rng).await?;
    println!(
        "Seeded {} nights and {} supplements for {}",
        report.nights, report.supplements, config.owner_id
    );
    Ok(())
}
