use crate::error::DbError;
use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPool;
use sqlx::FromRow;

/// SQLSTATE raised by PostgreSQL when a tally divides by a zero vote total.
const SQLSTATE_DIVISION_BY_ZERO: &str = "22012";

/// The `PollRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic;
/// the database itself is the sole source of truth and no state is held
/// between calls.
#[derive(Debug, Clone)]
pub struct PollRepository {
    pool: PgPool,
}

/// Represents a row from the `polls` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Poll {
    pub id: i32,
    pub title: String,
    pub owner_username: String,
}

/// One option of a poll, joined with its parent poll's title. Named fields
/// rather than positional columns so a reordered SELECT cannot silently
/// change which value callers read.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PollOptionDetail {
    pub poll_id: i32,
    pub poll_title: String,
    pub option_id: i32,
    pub option_text: String,
}

/// Per-option vote count and percentage share of the poll's total votes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OptionTally {
    pub option_id: i32,
    pub option_text: String,
    pub vote_count: i64,
    pub vote_percentage: f64,
}

impl PollRepository {
    /// Creates a new `PollRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new poll and one option row per entry in `option_texts`,
    /// all within a single transaction. An empty `option_texts` is permitted
    /// and yields a poll with no options. Returns the new poll's id.
    pub async fn create_poll(
        &self,
        title: &str,
        owner: &str,
        option_texts: &[String],
    ) -> Result<i32, DbError> {
        let mut tx = self.pool.begin().await?;

        let poll_id: i32 =
            sqlx::query_scalar("INSERT INTO polls (title, owner_username) VALUES ($1, $2) RETURNING id")
                .bind(title)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;

        for text in option_texts {
            sqlx::query("INSERT INTO options (option_text, poll_id) VALUES ($1, $2)")
                .bind(text)
                .bind(poll_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(poll_id)
    }

    /// Fetches every poll currently stored. The schema carries no open/closed
    /// flag, so every poll is "open". Row order is the engine's default and
    /// callers must not rely on it.
    pub async fn get_polls(&self) -> Result<Vec<Poll>, DbError> {
        let polls = sqlx::query_as::<_, Poll>("SELECT id, title, owner_username FROM polls")
            .fetch_all(&self.pool)
            .await?;
        Ok(polls)
    }

    /// Fetches one row per option of the given poll, each carrying the poll's
    /// id and title alongside the option's id and text. An unknown poll or a
    /// poll with no options yields an empty vector, never an error.
    pub async fn get_poll_details(&self, poll_id: i32) -> Result<Vec<PollOptionDetail>, DbError> {
        let details = sqlx::query_as::<_, PollOptionDetail>(
            r#"
            SELECT p.id AS poll_id, p.title AS poll_title, o.id AS option_id, o.option_text
            FROM polls AS p
            JOIN options AS o ON o.poll_id = p.id
            WHERE p.id = $1
            ORDER BY o.id ASC
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(details)
    }

    /// Records one vote for `option_id` under the given username. Votes are
    /// append-only and unconstrained: the same user may vote any number of
    /// times. A nonexistent option surfaces as `DbError::ForeignKeyViolation`
    /// straight from the engine's FK enforcement; nothing is pre-validated
    /// here.
    pub async fn add_poll_vote(&self, username: &str, option_id: i32) -> Result<(), DbError> {
        sqlx::query("INSERT INTO votes (username, option_id) VALUES ($1, $2)")
            .bind(username)
            .bind(option_id)
            .execute(&self.pool)
            .await
            .map_err(translate_db_error)?;
        Ok(())
    }

    /// Computes, for every option of the poll, its vote count and its share
    /// of the poll's total votes as a percentage.
    ///
    /// The division is deliberately unguarded: a poll whose total vote count
    /// is zero makes PostgreSQL raise division-by-zero, surfaced as
    /// `DbError::DivisionByZero`. Callers treat that error as the "no votes
    /// yet" signal, so zero-filled rows must never be returned instead.
    pub async fn get_poll_and_vote_results(
        &self,
        poll_id: i32,
    ) -> Result<Vec<OptionTally>, DbError> {
        let tallies = sqlx::query_as::<_, OptionTally>(
            r#"
            SELECT
                o.id AS option_id,
                o.option_text,
                COUNT(v.id) AS vote_count,
                (COUNT(v.id) * 100.0 / SUM(COUNT(v.id)) OVER ())::float8 AS vote_percentage
            FROM options AS o
            LEFT JOIN votes AS v ON v.option_id = o.id
            WHERE o.poll_id = $1
            GROUP BY o.id, o.option_text
            ORDER BY o.id ASC
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(translate_db_error)?;
        Ok(tallies)
    }

    /// Selects one vote uniformly at random among all votes cast for
    /// `option_id` and returns its username. Uniformity is over vote rows,
    /// not distinct usernames: a user who voted twice is twice as likely to
    /// be picked. Returns `Ok(None)` when the option has no votes.
    pub async fn get_random_poll_vote(&self, option_id: i32) -> Result<Option<String>, DbError> {
        let winner = sqlx::query_scalar::<_, String>(
            "SELECT username FROM votes WHERE option_id = $1 ORDER BY RANDOM() LIMIT 1",
        )
        .bind(option_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(winner)
    }
}

/// Maps engine-reported failures onto the crate's error taxonomy. Foreign-key
/// violations and zero-total tallies get their own variants since callers
/// branch on them; everything else propagates untranslated.
fn translate_db_error(e: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), ErrorKind::ForeignKeyViolation) {
            return DbError::ForeignKeyViolation(db.message().to_string());
        }
        if db.code().as_deref() == Some(SQLSTATE_DIVISION_BY_ZERO) {
            return DbError::DivisionByZero;
        }
    }
    DbError::Sqlx(e)
}
