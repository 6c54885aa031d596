//! Session credential lifecycle.
//!
//! Credentials are keyed by their public key. Upsert fully replaces the
//! credential — the whitelist is swapped wholesale and `calls_used` resets to
//! zero, so nothing from a prior registration can leak into the new one.

use crate::errors::StoreError;
use indexmap::IndexSet;
use mandate_core::{Caller, PublicKey, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scoped, time-boxed delegated authorization key.
///
/// The all-zero credential means "not registered"; callers must never treat
/// it as a valid zero-budget session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    /// Identity of the credential.
    pub public_key: PublicKey,
    /// Last second (inclusive) at which the session validates.
    pub valid_until: u64,
    /// Total batches this session may execute.
    pub max_calls: u32,
    /// Batches already executed. Never exceeds `max_calls`.
    pub calls_used: u32,
    /// Entrypoints the session may invoke. Empty means "no self-calls,
    /// external targets unrestricted".
    pub allowed_entrypoints: IndexSet<Selector>,
}

impl SessionCredential {
    /// Whether this credential is registered at all.
    pub fn is_registered(&self) -> bool {
        !self.public_key.is_zero()
    }

    /// Expiry check. Strict: `now == valid_until` still passes.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.valid_until
    }

    /// Whether the call budget is fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.calls_used >= self.max_calls
    }
}

/// Registry of session credentials. Mutation is owner-gated; reads are
/// public.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeyStore {
    sessions: BTreeMap<PublicKey, SessionCredential>,
}

impl SessionKeyStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or fully replace a credential.
    ///
    /// Always resets `calls_used` to zero — refreshing a key with unchanged
    /// parameters still restores its full budget — and replaces the
    /// entrypoint whitelist wholesale.
    pub fn upsert(
        &mut self,
        caller: &Caller,
        key: PublicKey,
        valid_until: u64,
        max_calls: u32,
        allowed_entrypoints: IndexSet<Selector>,
    ) -> Result<(), StoreError> {
        if !caller.is_owner() {
            return Err(StoreError::Unauthorized);
        }
        if key.is_zero() {
            return Err(StoreError::ZeroSessionKey);
        }
        if valid_until == 0 {
            return Err(StoreError::ZeroValidUntil);
        }
        if max_calls == 0 {
            return Err(StoreError::ZeroMaxCalls);
        }

        tracing::debug!(
            session = %key,
            valid_until,
            max_calls,
            entrypoints = allowed_entrypoints.len(),
            "session credential upserted"
        );
        self.sessions.insert(
            key,
            SessionCredential {
                public_key: key,
                valid_until,
                max_calls,
                calls_used: 0,
                allowed_entrypoints,
            },
        );
        Ok(())
    }

    /// Revoke a credential. Takes effect for all subsequent validation
    /// attempts immediately; later `get` calls read back the zero credential.
    pub fn revoke(&mut self, caller: &Caller, key: &PublicKey) -> Result<(), StoreError> {
        if !caller.is_owner() {
            return Err(StoreError::Unauthorized);
        }
        if self.sessions.remove(key).is_none() {
            return Err(StoreError::SessionNotFound);
        }
        tracing::debug!(session = %key, "session credential revoked");
        Ok(())
    }

    /// Look up a credential. Returns the zero credential when the key was
    /// never registered or has been revoked.
    pub fn get(&self, key: &PublicKey) -> SessionCredential {
        self.sessions.get(key).cloned().unwrap_or_default()
    }

    /// Whether the key currently resolves to a registered credential.
    pub fn is_registered(&self, key: &PublicKey) -> bool {
        self.sessions.contains_key(key)
    }

    /// Number of registered credentials.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Registered session keys, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &PublicKey> {
        self.sessions.keys()
    }

    /// Record one consumed call for an executed batch. Returns `false` if the
    /// key is unregistered or already at its budget, in which case nothing is
    /// recorded.
    pub(crate) fn consume_call(&mut self, key: &PublicKey) -> bool {
        match self.sessions.get_mut(key) {
            Some(credential) if credential.calls_used < credential.max_calls => {
                credential.calls_used += 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist(names: &[&str]) -> IndexSet<Selector> {
        names.iter().map(|n| Selector::from_name(n)).collect()
    }

    fn key(seed: u8) -> PublicKey {
        PublicKey([seed; 32])
    }

    #[test]
    fn upsert_then_get_returns_submitted_fields() {
        let mut store = SessionKeyStore::new();
        store
            .upsert(&Caller::Owner, key(1), 9999, 3, whitelist(&["transfer"]))
            .unwrap();

        let credential = store.get(&key(1));
        assert_eq!(credential.public_key, key(1));
        assert_eq!(credential.valid_until, 9999);
        assert_eq!(credential.max_calls, 3);
        assert_eq!(credential.calls_used, 0);
        assert_eq!(credential.allowed_entrypoints, whitelist(&["transfer"]));
        assert!(store.is_registered(&key(1)));
        assert_eq!(store.session_count(), 1);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec![&key(1)]);
    }

    #[test]
    fn upsert_resets_budget_and_replaces_whitelist() {
        let mut store = SessionKeyStore::new();
        store
            .upsert(&Caller::Owner, key(1), 9999, 3, whitelist(&["a", "b", "c"]))
            .unwrap();
        assert!(store.consume_call(&key(1)));
        assert_eq!(store.get(&key(1)).calls_used, 1);

        // Refreshing with a shorter whitelist leaves no stale tail behind.
        store
            .upsert(&Caller::Owner, key(1), 9999, 3, whitelist(&["a"]))
            .unwrap();
        let credential = store.get(&key(1));
        assert_eq!(credential.calls_used, 0);
        assert_eq!(credential.allowed_entrypoints, whitelist(&["a"]));
        assert!(!credential
            .allowed_entrypoints
            .contains(&Selector::from_name("b")));
    }

    #[test]
    fn non_owner_cannot_mutate() {
        let mut store = SessionKeyStore::new();
        let caller = Caller::Session(key(9));
        assert_eq!(
            store.upsert(&caller, key(1), 9999, 3, IndexSet::new()),
            Err(StoreError::Unauthorized)
        );
        assert_eq!(store.revoke(&caller, &key(1)), Err(StoreError::Unauthorized));
    }

    #[test]
    fn zero_inputs_rejected() {
        let mut store = SessionKeyStore::new();
        assert_eq!(
            store.upsert(&Caller::Owner, PublicKey::ZERO, 9999, 3, IndexSet::new()),
            Err(StoreError::ZeroSessionKey)
        );
        assert_eq!(
            store.upsert(&Caller::Owner, key(1), 0, 3, IndexSet::new()),
            Err(StoreError::ZeroValidUntil)
        );
        assert_eq!(
            store.upsert(&Caller::Owner, key(1), 9999, 0, IndexSet::new()),
            Err(StoreError::ZeroMaxCalls)
        );
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn revoke_unknown_key_fails() {
        let mut store = SessionKeyStore::new();
        assert_eq!(
            store.revoke(&Caller::Owner, &key(1)),
            Err(StoreError::SessionNotFound)
        );
    }

    #[test]
    fn revoked_key_reads_as_absent() {
        let mut store = SessionKeyStore::new();
        store
            .upsert(&Caller::Owner, key(1), 9999, 3, IndexSet::new())
            .unwrap();
        store.revoke(&Caller::Owner, &key(1)).unwrap();

        let credential = store.get(&key(1));
        assert!(!credential.is_registered());
        assert_eq!(credential, SessionCredential::default());
        // Double revoke is a lookup failure, not a no-op.
        assert_eq!(
            store.revoke(&Caller::Owner, &key(1)),
            Err(StoreError::SessionNotFound)
        );
    }

    #[test]
    fn consume_call_stops_at_budget() {
        let mut store = SessionKeyStore::new();
        store
            .upsert(&Caller::Owner, key(1), 9999, 2, IndexSet::new())
            .unwrap();
        assert!(store.consume_call(&key(1)));
        assert!(store.consume_call(&key(1)));
        assert!(!store.consume_call(&key(1)));
        assert_eq!(store.get(&key(1)).calls_used, 2);
        assert!(!store.consume_call(&key(7)));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let credential = SessionCredential {
            public_key: key(1),
            valid_until: 100,
            max_calls: 1,
            calls_used: 0,
            allowed_entrypoints: IndexSet::new(),
        };
        assert!(!credential.is_expired(100));
        assert!(credential.is_expired(101));
    }
}
