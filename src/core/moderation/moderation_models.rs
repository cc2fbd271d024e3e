// Moderation domain models - rejection reasons and hierarchy snapshots.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts them into replies and API calls.

use thiserror::Error;

/// Discord's MODERATE_MEMBERS permission bit.
pub const MODERATE_MEMBERS: u64 = 1 << 40;
/// Discord's ADMINISTRATOR permission bit. Implies every other permission.
pub const ADMINISTRATOR: u64 = 1 << 3;

/// Why a moderation target was refused before any action was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Bots are never valid moderation targets
    TargetIsBot,
    /// The caller picked themselves
    SelfTarget,
    /// The bot's role hierarchy doesn't reach the target
    NotManageable,
}

impl RejectionReason {
    /// User-facing message, e.g. "You cannot kick yourself."
    ///
    /// `action` is the verb ("mute", "ban") and `target_tag` the display tag
    /// of the target user.
    pub fn message(&self, action: &str, target_tag: &str) -> String {
        match self {
            RejectionReason::TargetIsBot => format!("You cannot {} a bot.", action),
            RejectionReason::SelfTarget => format!("You cannot {} yourself.", action),
            RejectionReason::NotManageable => {
                format!("I do not have permission to {} {}.", action, target_tag)
            }
        }
    }
}

/// The membership lookup collaborator failed (unknown member, HTTP error...).
#[derive(Debug, Error)]
#[error("Member lookup failed for {user_id}: {message}")]
pub struct LookupError {
    pub user_id: u64,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Target rejected: {0:?}")]
    Rejected(RejectionReason),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Snapshot of the role hierarchy needed to decide manageability.
///
/// Positions are the highest role position each member holds
/// (0 for members with only @everyone).
#[derive(Debug, Clone, Copy)]
pub struct HierarchySnapshot {
    pub guild_owner_id: u64,
    pub bot_id: u64,
    pub bot_top_position: u16,
    pub target_id: u64,
    pub target_top_position: u16,
}
