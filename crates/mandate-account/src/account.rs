//! Account facade tying the stores, validator, and execution gate together.
//!
//! One `Account` owns all mutable engine state for one on-host account.
//! Execution is strictly sequential: a batch is validated, then (if
//! accepted) executed, with no interleaving against the same account state.

use crate::errors::{ExecuteError, StoreError};
use crate::execute::{execute_batch, ActionDispatcher};
use crate::session::{SessionCredential, SessionKeyStore};
use crate::spending::{SpendingPolicy, SpendingPolicyStore};
use crate::validation::{Decision, ValidationContext, ValidationEngine};
use indexmap::IndexSet;
use mandate_core::{AccountAddress, Action, ActionResult, AssetId, Caller, Proof, PublicKey, Selector};
use serde::{Deserialize, Serialize};

/// Static configuration for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// The account's own address; self-call detection compares against this.
    pub address: AccountAddress,
    /// Chain or domain identifier bound into every signed message.
    pub chain_id: u64,
    /// The owner's public key.
    pub owner_key: PublicKey,
}

/// A self-custodied account with delegated session authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    address: AccountAddress,
    chain_id: u64,
    owner_key: PublicKey,
    sessions: SessionKeyStore,
    policies: SpendingPolicyStore,
}

impl Account {
    /// Build an account from its configuration.
    pub fn new(config: AccountConfig) -> Result<Self, StoreError> {
        if config.owner_key.is_zero() {
            return Err(StoreError::ZeroOwnerKey);
        }
        Ok(Self {
            address: config.address,
            chain_id: config.chain_id,
            owner_key: config.owner_key,
            sessions: SessionKeyStore::new(),
            policies: SpendingPolicyStore::new(),
        })
    }

    /// The account's own address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// The chain identifier this account signs under.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The currently registered owner key.
    pub fn owner_key(&self) -> PublicKey {
        self.owner_key
    }

    // --- Owner-gated configuration ---

    /// Create or fully replace a session credential.
    pub fn upsert_session(
        &mut self,
        caller: &Caller,
        key: PublicKey,
        valid_until: u64,
        max_calls: u32,
        allowed_entrypoints: IndexSet<Selector>,
    ) -> Result<(), StoreError> {
        self.sessions
            .upsert(caller, key, valid_until, max_calls, allowed_entrypoints)
    }

    /// Revoke a session credential.
    pub fn revoke_session(&mut self, caller: &Caller, key: &PublicKey) -> Result<(), StoreError> {
        self.sessions.revoke(caller, key)
    }

    /// Create or overwrite a spending policy; its window opens at `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn set_spending_policy(
        &mut self,
        caller: &Caller,
        key: PublicKey,
        asset: AssetId,
        max_per_call: u128,
        max_per_window: u128,
        window_seconds: u64,
        now: u64,
    ) -> Result<(), StoreError> {
        self.policies.set(
            caller,
            key,
            asset,
            max_per_call,
            max_per_window,
            window_seconds,
            now,
        )
    }

    /// Remove a spending policy; the pair becomes unrestricted.
    pub fn remove_spending_policy(
        &mut self,
        caller: &Caller,
        key: &PublicKey,
        asset: &AssetId,
    ) -> Result<(), StoreError> {
        self.policies.remove(caller, key, asset)
    }

    /// Rotate the owner key. Sessions can never reach this operation: its
    /// selector is admin-blocked.
    pub fn rotate_owner_key(
        &mut self,
        caller: &Caller,
        new_key: PublicKey,
    ) -> Result<(), StoreError> {
        if !caller.is_owner() {
            return Err(StoreError::Unauthorized);
        }
        if new_key.is_zero() {
            return Err(StoreError::ZeroOwnerKey);
        }
        tracing::debug!(new_key = %new_key, "owner key rotated");
        self.owner_key = new_key;
        Ok(())
    }

    // --- Unauthenticated reads ---

    /// Look up a session credential; zero credential when absent or revoked.
    pub fn get_session(&self, key: &PublicKey) -> SessionCredential {
        self.sessions.get(key)
    }

    /// Look up a spending policy; zero (unrestricted) policy when absent.
    pub fn get_spending_policy(&self, key: &PublicKey, asset: &AssetId) -> SpendingPolicy {
        self.policies.get(key, asset)
    }

    // --- Authorization ---

    /// Pure authorization predicate. Mutates nothing; repeated calls on the
    /// same inputs yield the same answer.
    pub fn validate(&self, batch: &[Action], nonce: u64, now: u64, proof: &Proof) -> bool {
        self.decide(batch, nonce, now, proof).is_accepted()
    }

    /// Validate and, on acceptance, execute a batch in one transaction
    /// context. Consumes one unit of the session's call budget and charges
    /// spending policies atomically for the whole batch.
    pub fn execute(
        &mut self,
        dispatcher: &mut dyn ActionDispatcher,
        batch: &[Action],
        nonce: u64,
        now: u64,
        proof: &Proof,
    ) -> Result<Vec<ActionResult>, ExecuteError> {
        let mode = match self.decide(batch, nonce, now, proof) {
            Decision::Accept(mode) => mode,
            Decision::Reject => return Err(ExecuteError::NotAuthorized),
        };
        execute_batch(
            &mut self.sessions,
            &mut self.policies,
            dispatcher,
            mode,
            batch,
            now,
        )
    }

    fn decide(&self, batch: &[Action], nonce: u64, now: u64, proof: &Proof) -> Decision {
        let ctx = ValidationContext {
            batch,
            nonce,
            chain_id: self.chain_id,
            account_address: self.address,
            now,
            proof,
        };
        ValidationEngine::new(&self.sessions, &self.owner_key).evaluate(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AccountConfig {
        AccountConfig {
            address: AccountAddress([0xaa; 32]),
            chain_id: 7,
            owner_key: PublicKey([1; 32]),
        }
    }

    #[test]
    fn zero_owner_key_rejected_at_construction() {
        let mut cfg = config();
        cfg.owner_key = PublicKey::ZERO;
        assert!(matches!(Account::new(cfg), Err(StoreError::ZeroOwnerKey)));
    }

    #[test]
    fn reads_are_unauthenticated_and_total() {
        let account = Account::new(config()).unwrap();
        let unknown = PublicKey([9; 32]);
        assert!(!account.get_session(&unknown).is_registered());
        assert!(account
            .get_spending_policy(&unknown, &AccountAddress([2; 32]))
            .is_unrestricted());
    }

    #[test]
    fn owner_rotation_is_gated() {
        let mut account = Account::new(config()).unwrap();
        let new_key = PublicKey([3; 32]);
        assert_eq!(
            account.rotate_owner_key(&Caller::Session(new_key), new_key),
            Err(StoreError::Unauthorized)
        );
        assert_eq!(
            account.rotate_owner_key(&Caller::Owner, PublicKey::ZERO),
            Err(StoreError::ZeroOwnerKey)
        );
        account.rotate_owner_key(&Caller::Owner, new_key).unwrap();
        assert_eq!(account.owner_key(), new_key);
    }
}
