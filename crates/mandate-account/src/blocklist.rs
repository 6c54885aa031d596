//! Fixed administrative blocklist.
//!
//! A session credential can never invoke anything that could change
//! authorization state, whatever its whitelist says. Membership is
//! compile-time constant and target-independent: a blocked selector rejects
//! the whole batch whether it points at the account itself or anywhere else.

use mandate_core::Selector;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Operation names no session credential may ever invoke.
///
/// Covers account upgrade (including the upgrade timelock's protected
/// operations), owner-key rotation, session and spending-policy mutation,
/// identity binding, and the validation/execution entrypoints themselves.
pub const ADMIN_BLOCKED_OPERATIONS: [&str; 11] = [
    "upgrade",
    "schedule_upgrade",
    "cancel_upgrade",
    "rotate_owner_key",
    "upsert_session_key",
    "revoke_session_key",
    "set_spending_policy",
    "remove_spending_policy",
    "bind_identity",
    "validate_batch",
    "execute_batch",
];

static ADMIN_BLOCKLIST: Lazy<BTreeSet<Selector>> = Lazy::new(|| {
    ADMIN_BLOCKED_OPERATIONS
        .iter()
        .map(|name| Selector::from_name(name))
        .collect()
});

/// Whether `selector` names an admin-blocked operation.
pub fn is_admin_blocked(selector: &Selector) -> bool {
    ADMIN_BLOCKLIST.contains(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_operation_is_blocked() {
        for name in ADMIN_BLOCKED_OPERATIONS {
            assert!(is_admin_blocked(&Selector::from_name(name)), "{name}");
        }
    }

    #[test]
    fn ordinary_operations_are_not_blocked() {
        for name in ["transfer", "approve", "swap", "mint"] {
            assert!(!is_admin_blocked(&Selector::from_name(name)), "{name}");
        }
    }

    #[test]
    fn membership_has_no_duplicates() {
        let set: BTreeSet<_> = ADMIN_BLOCKED_OPERATIONS.iter().collect();
        assert_eq!(set.len(), ADMIN_BLOCKED_OPERATIONS.len());
    }
}
