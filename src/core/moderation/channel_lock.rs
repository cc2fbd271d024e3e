// Channel lock - computes the @everyone permission overwrite for /lock.
//
// Works on raw permission bits so the Discord layer only has to read the
// existing overwrite and write the result back.

/// SEND_MESSAGES | CREATE_PUBLIC_THREADS | CREATE_PRIVATE_THREADS | SEND_MESSAGES_IN_THREADS
pub const LOCKED_PERMISSIONS: u64 = (1 << 11) | (1 << 35) | (1 << 36) | (1 << 38);

/// What to do with the @everyone overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChange {
    /// Write the overwrite with these allow/deny bits
    Set { allow: u64, deny: u64 },
    /// Nothing left in the overwrite, delete it
    Remove,
}

/// Lock or unlock a channel given the current @everyone overwrite bits.
///
/// Locking explicitly denies the send/thread permissions. Unlocking resets
/// them to "inherit" and leaves every other bit alone.
pub fn apply_lock(allow: u64, deny: u64, lock: bool) -> OverwriteChange {
    let allow = allow & !LOCKED_PERMISSIONS;
    let deny = if lock {
        deny | LOCKED_PERMISSIONS
    } else {
        deny & !LOCKED_PERMISSIONS
    };

    if allow == 0 && deny == 0 {
        OverwriteChange::Remove
    } else {
        OverwriteChange::Set { allow, deny }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW_CHANNEL: u64 = 1 << 10;
    const ADD_REACTIONS: u64 = 1 << 6;

    #[test]
    fn lock_denies_send_permissions() {
        assert_eq!(
            apply_lock(0, 0, true),
            OverwriteChange::Set {
                allow: 0,
                deny: LOCKED_PERMISSIONS
            }
        );
    }

    #[test]
    fn lock_strips_explicit_allows() {
        let change = apply_lock(LOCKED_PERMISSIONS | VIEW_CHANNEL, 0, true);
        assert_eq!(
            change,
            OverwriteChange::Set {
                allow: VIEW_CHANNEL,
                deny: LOCKED_PERMISSIONS
            }
        );
    }

    #[test]
    fn unlock_keeps_unrelated_bits() {
        let change = apply_lock(VIEW_CHANNEL, LOCKED_PERMISSIONS | ADD_REACTIONS, false);
        assert_eq!(
            change,
            OverwriteChange::Set {
                allow: VIEW_CHANNEL,
                deny: ADD_REACTIONS
            }
        );
    }

    #[test]
    fn unlock_removes_empty_overwrite() {
        assert_eq!(
            apply_lock(0, LOCKED_PERMISSIONS, false),
            OverwriteChange::Remove
        );
    }
}
