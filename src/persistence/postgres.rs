//! PostgreSQL implementation of the transcript store.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::StoredMessage;
use crate::config::RelayConfig;
use crate::domain::ChatMessage;
use crate::error::RelayError;

/// PostgreSQL-backed transcript store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from `config` and applies the embedded
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &RelayConfig) -> Result<Self, RelayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RelayError::PersistenceError(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Appends a message to the transcript.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] on database failure.
    pub async fn save_message(&self, message: &ChatMessage) -> Result<i64, RelayError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO chat_messages (message_id, content, sender, sent_at_ms) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(message.id.as_str())
        .bind(&message.content)
        .bind(message.sender.as_str())
        .bind(message.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Loads the most recent `limit` messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] on database failure.
    pub async fn recent_messages(&self, limit: u32) -> Result<Vec<StoredMessage>, RelayError> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, i64, DateTime<Utc>)>(
            "SELECT id, message_id, content, sender, sent_at_ms, received_at \
             FROM chat_messages ORDER BY id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, message_id, content, sender, sent_at_ms, received_at)| StoredMessage {
                    id,
                    message_id,
                    content,
                    sender,
                    sent_at_ms,
                    received_at,
                },
            )
            .collect())
    }

    /// Deletes transcript rows older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidRequest`] if `days` reaches before the
    /// earliest representable timestamp, or a
    /// [`RelayError::PersistenceError`] on database failure.
    pub async fn delete_older_than(&self, days: u64) -> Result<u64, RelayError> {
        let cutoff = retention_cutoff(Utc::now(), days)?;

        let result = sqlx::query("DELETE FROM chat_messages WHERE received_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Returns the instant `days` before `now`.
///
/// # Errors
///
/// Returns [`RelayError::InvalidRequest`] when the window does not fit in
/// a [`DateTime<Utc>`].
pub fn retention_cutoff(now: DateTime<Utc>, days: u64) -> Result<DateTime<Utc>, RelayError> {
    i64::try_from(days)
        .ok()
        .and_then(TimeDelta::try_days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| {
            RelayError::InvalidRequest(format!("retention of {days} days is out of range"))
        })
}
