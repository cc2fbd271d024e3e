// Warning service - issues, lists and clears moderator warnings.
//
// This service handles:
// - Idempotent inserts keyed by the originating interaction id
// - Retention sweeps (run before adding and before listing)
// - Clearing a member's history
//
// NO Discord dependencies here - just pure domain logic.

use super::warning_models::WarningRecord;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Retention used when nothing is configured.
pub const DEFAULT_RETENTION_DAYS: u32 = 180;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum WarningError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Warning reason must not be empty")]
    EmptyReason,
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting warning records.
#[async_trait]
pub trait WarningStore: Send + Sync {
    /// Delete every record created before `cutoff`. Returns rows removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, WarningError>;

    /// Find the record created by a given interaction, if any.
    async fn find_by_interaction(
        &self,
        interaction_id: u64,
    ) -> Result<Option<WarningRecord>, WarningError>;

    /// Insert a record unless one with the same interaction id already exists.
    ///
    /// Always returns the record that ends up stored for that interaction.
    async fn insert_or_get(&self, record: WarningRecord) -> Result<WarningRecord, WarningError>;

    /// All records for a user, newest first.
    async fn list_for_user(&self, user_id: u64) -> Result<Vec<WarningRecord>, WarningError>;

    /// Delete all records for a user. Returns rows removed.
    async fn delete_for_user(&self, user_id: u64) -> Result<u64, WarningError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct WarningService<S: WarningStore> {
    store: S,
    retention_days: u32,
}

impl<S: WarningStore> WarningService<S> {
    pub fn new(store: S, retention_days: u32) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Issue a warning.
    ///
    /// If this interaction already produced a warning, the stored record is
    /// returned as-is and `reason` is ignored.
    pub async fn add_warning(
        &self,
        user_id: u64,
        moderator_id: u64,
        reason: &str,
        interaction_id: u64,
    ) -> Result<WarningRecord, WarningError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WarningError::EmptyReason);
        }

        self.enforce_retention().await?;

        if let Some(existing) = self.store.find_by_interaction(interaction_id).await? {
            tracing::debug!(
                interaction_id,
                warning_id = %existing.id,
                "Duplicate warning interaction, returning existing record"
            );
            return Ok(existing);
        }

        let record = WarningRecord::new(user_id, moderator_id, reason.to_string(), interaction_id);
        let stored = self.store.insert_or_get(record).await?;

        tracing::info!(
            user_id,
            moderator_id,
            warning_id = %stored.id,
            "Warning recorded"
        );
        Ok(stored)
    }

    /// List a user's warnings, newest first. Expired warnings are swept first.
    pub async fn get_warnings_for_user(
        &self,
        user_id: u64,
    ) -> Result<Vec<WarningRecord>, WarningError> {
        self.enforce_retention().await?;
        self.store.list_for_user(user_id).await
    }

    /// Remove every warning for a user. No retention sweep here.
    pub async fn clear_warnings_for_user(&self, user_id: u64) -> Result<u64, WarningError> {
        let removed = self.store.delete_for_user(user_id).await?;
        tracing::info!(user_id, removed, "Cleared warnings");
        Ok(removed)
    }

    /// Cutoff for the retention window relative to `now`.
    pub fn retention_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.retention_days))
    }

    async fn enforce_retention(&self) -> Result<(), WarningError> {
        if self.retention_days == 0 {
            return Ok(());
        }

        let cutoff = self.retention_cutoff(Utc::now());
        let removed = self.store.delete_older_than(cutoff).await?;
        if removed > 0 {
            tracing::debug!(removed, %cutoff, "Retention sweep removed expired warnings");
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
