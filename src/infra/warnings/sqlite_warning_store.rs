// SQLite-backed warning store.
//
// Tables:
// - warnings: one row per issued warning, unique per originating interaction

use crate::core::warnings::{WarningError, WarningRecord, WarningStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

pub struct SqliteWarningStore {
    pool: Pool<Sqlite>,
}

impl SqliteWarningStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Create the warnings table and its indexes if they don't exist yet.
    pub async fn migrate(&self) -> Result<(), WarningError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS warnings (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                moderator_id INTEGER NOT NULL,
                reason TEXT NOT NULL,
                interaction_id INTEGER NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_warnings_user ON warnings(user_id);")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_warnings_created ON warnings(created_at);")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> WarningError {
    WarningError::Storage(e.to_string())
}

/// Fixed-width UTC timestamps so string comparison in SQL is chronological.
fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn map_row(row: &SqliteRow) -> Result<WarningRecord, WarningError> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");

    Ok(WarningRecord {
        id: Uuid::parse_str(&id).map_err(|e| WarningError::Storage(e.to_string()))?,
        user_id: row.get::<i64, _>("user_id") as u64,
        moderator_id: row.get::<i64, _>("moderator_id") as u64,
        reason: row.get("reason"),
        interaction_id: row.get::<i64, _>("interaction_id") as u64,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| WarningError::Storage(e.to_string()))?,
    })
}

#[async_trait]
impl WarningStore for SqliteWarningStore {
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, WarningError> {
        let result = sqlx::query("DELETE FROM warnings WHERE created_at < ?")
            .bind(encode_timestamp(cutoff))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }

    async fn find_by_interaction(
        &self,
        interaction_id: u64,
    ) -> Result<Option<WarningRecord>, WarningError> {
        let row = sqlx::query("SELECT * FROM warnings WHERE interaction_id = ? LIMIT 1")
            .bind(interaction_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn insert_or_get(&self, record: WarningRecord) -> Result<WarningRecord, WarningError> {
        // A retried interaction racing the first attempt lands on the conflict clause.
        sqlx::query(
            r#"
            INSERT INTO warnings (id, user_id, moderator_id, reason, interaction_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(interaction_id) DO NOTHING
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id as i64)
        .bind(record.moderator_id as i64)
        .bind(&record.reason)
        .bind(record.interaction_id as i64)
        .bind(encode_timestamp(record.created_at))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        self.find_by_interaction(record.interaction_id)
            .await?
            .ok_or_else(|| {
                WarningError::Storage(format!(
                    "warning for interaction {} vanished after insert",
                    record.interaction_id
                ))
            })
    }

    async fn list_for_user(&self, user_id: u64) -> Result<Vec<WarningRecord>, WarningError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM warnings
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(map_row).collect()
    }

    async fn delete_for_user(&self, user_id: u64) -> Result<u64, WarningError> {
        let result = sqlx::query("DELETE FROM warnings WHERE user_id = ?")
            .bind(user_id as i64)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }
}
