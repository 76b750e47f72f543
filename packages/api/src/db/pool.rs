//! Database connection pool using OnceCell pattern.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Get or initialize the database connection pool.
///
/// Reads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS` (optional,
/// default 5) from the environment, loading `.env` first.
pub async fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;
        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(v) => v.parse().map_err(|e| {
                sqlx::Error::Configuration(format!("DATABASE_MAX_CONNECTIONS: {e}").into())
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        tracing::info!(max_connections, "Opening profile database pool");
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(&database_url)
            .await
    })
    .await
}
