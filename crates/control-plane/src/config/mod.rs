// Server configuration loaded from the environment
//
// Environment variables (a `.env` file is honored via dotenvy in the binaries):
// - DATABASE_URL: PostgreSQL connection string
// - DEV_MODE: "true" to use in-memory storage when DATABASE_URL is absent
// - DEMO_USER_ID: owner of all events (default: "demo-user-id")
// - NIGHTCTRL_TIMEZONE: IANA zone used for calendar dates (default: "UTC")
// - HTTP_ADDR: listen address (default: "0.0.0.0:9000")
// - API_PREFIX: optional prefix for API routes, e.g. "/api"
// - CORS_ALLOWED_ORIGINS: comma-separated origins, empty for same-origin only
// - SEED_ON_START: "true" to generate a week of demo data at startup

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;

use crate::storage::StorageBackend;

pub const DEFAULT_OWNER_ID: &str = "demo-user-id";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:9000";

/// Where events are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgres { database_url: String },
    InMemory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    /// Owner every request acts as
    pub owner_id: String,
    /// Zone for parsing naive timestamps and for calendar bucketing
    pub timezone: Tz,
    pub http_addr: String,
    pub api_prefix: String,
    pub cors_origins: Vec<String>,
    pub seed_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::InMemory,
            owner_id: DEFAULT_OWNER_ID.to_string(),
            timezone: Tz::UTC,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
            seed_on_start: false,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let storage = match env_non_empty("DATABASE_URL") {
            Some(database_url) => StorageConfig::Postgres { database_url },
            None if env_flag("DEV_MODE") => StorageConfig::InMemory,
            None => bail!("DATABASE_URL environment variable required (or set DEV_MODE=true)"),
        };

        let timezone = match env_non_empty("NIGHTCTRL_TIMEZONE") {
            Some(name) => parse_timezone(&name)?,
            None => Tz::UTC,
        };

        Ok(Self {
            storage,
            owner_id: env_non_empty("DEMO_USER_ID").unwrap_or_else(|| DEFAULT_OWNER_ID.to_string()),
            timezone,
            http_addr: env_non_empty("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            api_prefix: normalize_prefix(&std::env::var("API_PREFIX").unwrap_or_default()),
            cors_origins: parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            seed_on_start: env_flag("SEED_ON_START"),
        })
    }

    /// Open the configured storage backend
    pub async fn open_storage(&self) -> Result<StorageBackend> {
        match &self.storage {
            StorageConfig::Postgres { database_url } => StorageBackend::postgres(database_url).await,
            StorageConfig::InMemory => Ok(StorageBackend::in_memory()),
        }
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("Invalid NIGHTCTRL_TIMEZONE {:?}: {}", name, e))
}

/// "/api/" and "api" both become "/api"; blank stays blank
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("api/"), "/api");
        assert_eq!(normalize_prefix(" /api/v1/ "), "/api/v1");
    }

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins("").is_empty());
        assert_eq!(
            parse_origins("https://a.example.com, https://b.example.com,"),
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Helsinki").unwrap(), Tz::Europe__Helsinki);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.owner_id, "demo-user-id");
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.storage, StorageConfig::InMemory);
    }
}
