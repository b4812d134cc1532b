use crate::error::DbError;
use sqlx::PgPool;
use tracing::debug;

const CREATE_POLLS: &str = "\
CREATE TABLE IF NOT EXISTS polls (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    owner_username TEXT NOT NULL
)";

const CREATE_OPTIONS: &str = "\
CREATE TABLE IF NOT EXISTS options (
    id SERIAL PRIMARY KEY,
    option_text TEXT NOT NULL,
    poll_id INTEGER NOT NULL REFERENCES polls (id)
)";

const CREATE_VOTES: &str = "\
CREATE TABLE IF NOT EXISTS votes (
    id SERIAL PRIMARY KEY,
    username TEXT NOT NULL,
    option_id INTEGER NOT NULL REFERENCES options (id)
)";

/// Idempotently creates the poll tables if they are absent.
///
/// Safe to call on every process startup: `IF NOT EXISTS` makes re-running a
/// no-op with no data loss. Statements run in foreign-key dependency order
/// (polls, then options, then votes). There is no drop/alter capability.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbError> {
    for statement in [CREATE_POLLS, CREATE_OPTIONS, CREATE_VOTES] {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("poll schema is in place");
    Ok(())
}
