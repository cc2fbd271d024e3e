// Target validation - checks that a moderation target is eligible before the
// Discord layer touches the platform API.
//
// Membership lookup is a port so this stays testable without Discord.

use super::moderation_models::{HierarchySnapshot, LookupError, RejectionReason, TargetError};
use async_trait::async_trait;

/// Something the lookup resolved that knows whether the bot can act on it.
pub trait ManageableTarget {
    fn is_manageable(&self) -> bool;
}

/// Port: resolve a user id to a current guild member.
#[async_trait]
pub trait MemberLookup: Send + Sync {
    type Member: ManageableTarget + Send;

    async fn lookup_member(&self, user_id: u64) -> Result<Self::Member, LookupError>;
}

/// Cheap identity checks that don't need a member lookup.
///
/// `/warn` only needs these because warnings can target users who already left.
pub fn check_target_identity(
    target_id: u64,
    target_is_bot: bool,
    caller_id: u64,
) -> Result<(), RejectionReason> {
    if target_is_bot {
        return Err(RejectionReason::TargetIsBot);
    }
    if target_id == caller_id {
        return Err(RejectionReason::SelfTarget);
    }
    Ok(())
}

/// Validate a moderation target and return the resolved member.
///
/// Rejects bots and self-targeting first, then looks the member up and
/// rejects it if the bot's role hierarchy can't reach it. Never performs the
/// moderation action itself.
pub async fn validate_target<L: MemberLookup>(
    target_id: u64,
    target_is_bot: bool,
    caller_id: u64,
    lookup: &L,
) -> Result<L::Member, TargetError> {
    check_target_identity(target_id, target_is_bot, caller_id).map_err(TargetError::Rejected)?;

    let member = lookup.lookup_member(target_id).await?;
    if !member.is_manageable() {
        return Err(TargetError::Rejected(RejectionReason::NotManageable));
    }

    Ok(member)
}

/// Discord's "manageable" rule.
///
/// Nobody manages the guild owner. An owning bot manages everyone else.
/// Otherwise the bot's top role must sit strictly above the target's.
pub fn is_manageable(snapshot: &HierarchySnapshot) -> bool {
    if snapshot.target_id == snapshot.guild_owner_id {
        return false;
    }
    if snapshot.bot_id == snapshot.guild_owner_id {
        return true;
    }
    snapshot.bot_top_position > snapshot.target_top_position
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeMember {
        manageable: bool,
    }

    impl ManageableTarget for FakeMember {
        fn is_manageable(&self) -> bool {
            self.manageable
        }
    }

    /// Lookup that resolves every id with a fixed manageable flag and counts calls.
    struct FakeLookup {
        manageable: bool,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(manageable: bool) -> Self {
            Self {
                manageable,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                manageable: true,
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MemberLookup for FakeLookup {
        type Member = FakeMember;

        async fn lookup_member(&self, user_id: u64) -> Result<FakeMember, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LookupError {
                    user_id,
                    message: "Unknown Member".to_string(),
                });
            }
            Ok(FakeMember {
                manageable: self.manageable,
            })
        }
    }

    #[tokio::test]
    async fn rejects_bots_before_lookup() {
        let lookup = FakeLookup::new(true);
        let result = validate_target(2, true, 1, &lookup).await;

        assert!(matches!(
            result,
            Err(TargetError::Rejected(RejectionReason::TargetIsBot))
        ));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_self_target_before_lookup() {
        let lookup = FakeLookup::new(true);
        let result = validate_target(7, false, 7, &lookup).await;

        assert!(matches!(
            result,
            Err(TargetError::Rejected(RejectionReason::SelfTarget))
        ));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_unmanageable_member() {
        let lookup = FakeLookup::new(false);
        let result = validate_target(2, false, 1, &lookup).await;

        assert!(matches!(
            result,
            Err(TargetError::Rejected(RejectionReason::NotManageable))
        ));
    }

    #[tokio::test]
    async fn returns_member_when_eligible() {
        let lookup = FakeLookup::new(true);
        let member = validate_target(2, false, 1, &lookup).await.unwrap();

        assert!(member.is_manageable());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn propagates_lookup_failure() {
        let lookup = FakeLookup::failing();
        let result = validate_target(2, false, 1, &lookup).await;

        match result {
            Err(TargetError::Lookup(err)) => assert_eq!(err.user_id, 2),
            other => panic!("expected lookup failure, got {:?}", other.map(|_| ())),
        }
    }

    fn snapshot(owner: u64, bot_pos: u16, target_pos: u16) -> HierarchySnapshot {
        HierarchySnapshot {
            guild_owner_id: owner,
            bot_id: 100,
            bot_top_position: bot_pos,
            target_id: 200,
            target_top_position: target_pos,
        }
    }

    #[test]
    fn manageable_requires_strictly_higher_role() {
        assert!(is_manageable(&snapshot(1, 5, 4)));
        assert!(!is_manageable(&snapshot(1, 5, 5)));
        assert!(!is_manageable(&snapshot(1, 2, 9)));
    }

    #[test]
    fn guild_owner_is_never_manageable() {
        assert!(!is_manageable(&snapshot(200, 50, 0)));
    }

    #[test]
    fn owning_bot_manages_everyone_else() {
        assert!(is_manageable(&snapshot(100, 0, 30)));
    }

    #[test]
    fn rejection_messages_name_the_action() {
        assert_eq!(
            RejectionReason::TargetIsBot.message("kick", "bot#0001"),
            "You cannot kick a bot."
        );
        assert_eq!(
            RejectionReason::SelfTarget.message("mute", "me"),
            "You cannot mute yourself."
        );
        assert_eq!(
            RejectionReason::NotManageable.message("ban", "someone"),
            "I do not have permission to ban someone."
        );
    }
}
