// Repository layer for PostgreSQL
// Decision: Plain sqlx::query_as with runtime-checked SQL (no DATABASE_URL needed at build time)
// Decision: Ids are generated by the application (UUID v7) so both backends behave the same

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use super::models::*;

/// How long a query waits for a pooled connection before failing
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create a pool that connects on first use
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, user_id, occurred_at, event_type, category, name, value, unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, occurred_at, event_type, category, name, value, unit
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.user_id)
        .bind(input.occurred_at)
        .bind(&input.event_type)
        .bind(&input.category)
        .bind(&input.name)
        .bind(input.value)
        .bind(&input.unit)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(
        &self,
        user_id: &str,
        filter: ListEventsFilter,
    ) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, occurred_at, event_type, category, name, value, unit
            FROM events
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR occurred_at >= $2)
              AND ($3::timestamptz IS NULL OR occurred_at <= $3)
            ORDER BY occurred_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
