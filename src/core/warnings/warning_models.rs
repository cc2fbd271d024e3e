// Warning domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A formal warning issued by a moderator.
///
/// Records are immutable once stored. `interaction_id` is unique: the same
/// Discord interaction can never produce two records, even if it is retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRecord {
    pub id: Uuid,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub interaction_id: u64,
    pub created_at: DateTime<Utc>,
}

impl WarningRecord {
    /// Build a fresh record with a new id, stamped now.
    pub fn new(user_id: u64, moderator_id: u64, reason: String, interaction_id: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            moderator_id,
            reason,
            interaction_id,
            created_at: Utc::now(),
        }
    }
}
