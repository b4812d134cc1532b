use crate::error::DbError;
use configuration::DbSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, warn};

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is opened with a bounded, fixed-delay retry loop: up to
/// `settings.max_retries` attempts with `settings.retry_delay_secs` seconds
/// between them. This runs once at process startup; no per-operation retry
/// exists anywhere else. Exhausting the budget is fatal to the caller.
pub async fn connect(settings: &DbSettings) -> Result<PgPool, DbError> {
    let url = settings.connection_url();

    for attempt in 1..=settings.max_retries {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&url)
            .await
        {
            Ok(pool) => {
                info!(host = %settings.host, database = %settings.database_name, "connected to PostgreSQL");
                return Ok(pool);
            }
            Err(e) => {
                warn!(attempt, max_retries = settings.max_retries, error = %e, "connection attempt failed");
                if attempt < settings.max_retries {
                    tokio::time::sleep(Duration::from_secs(settings.retry_delay_secs)).await;
                }
            }
        }
    }

    Err(DbError::RetriesExhausted {
        attempts: settings.max_retries,
    })
}
