// Access gate - decides who may run moderation commands.

use super::moderation_models::{ADMINISTRATOR, MODERATE_MEMBERS};

/// Check whether a caller may perform a moderation action.
///
/// Discord's own permission bit is the first gate: MODERATE_MEMBERS (or
/// ADMINISTRATOR, which implies it). The configured moderator roles are an
/// optional override; when none are configured the role path never grants.
pub fn is_authorized(
    permission_bits: u64,
    caller_role_ids: &[u64],
    moderator_role_ids: &[u64],
) -> bool {
    let has_permission = permission_bits & (MODERATE_MEMBERS | ADMINISTRATOR) != 0;
    if has_permission {
        return true;
    }

    moderator_role_ids
        .iter()
        .any(|role_id| caller_role_ids.contains(role_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEND_MESSAGES: u64 = 1 << 11;

    #[test]
    fn moderate_members_bit_grants_access() {
        assert!(is_authorized(MODERATE_MEMBERS | SEND_MESSAGES, &[], &[]));
    }

    #[test]
    fn administrator_grants_access() {
        assert!(is_authorized(ADMINISTRATOR, &[], &[]));
    }

    #[test]
    fn configured_role_grants_access_without_permission() {
        assert!(is_authorized(SEND_MESSAGES, &[10, 20], &[30, 20]));
    }

    #[test]
    fn unrelated_roles_do_not_grant_access() {
        assert!(!is_authorized(SEND_MESSAGES, &[10, 20], &[30]));
    }

    #[test]
    fn empty_role_config_never_grants_through_roles() {
        assert!(!is_authorized(0, &[10, 20, 30], &[]));
        assert!(!is_authorized(SEND_MESSAGES, &[1], &[]));
    }
}
