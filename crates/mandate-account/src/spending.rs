//! Per-(session, asset) spending limits with rolling-window enforcement.
//!
//! Absence of a policy (zero `max_per_window`) means "unrestricted". The
//! window rolls forward only through enforcement, never through owner
//! mutation, and the rollover comparison is strictly greater-than: a charge
//! at exactly `window_start + window_seconds` still lands in the old window,
//! so acting at the boundary instant cannot double the limit.

use crate::errors::{SpendingError, StoreError};
use mandate_core::{AssetId, Caller, PublicKey};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map::Entry, BTreeMap};

/// Spending limits for one (session, asset) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingPolicy {
    /// Session the policy applies to.
    pub session_key: PublicKey,
    /// Asset the policy applies to.
    pub asset_id: AssetId,
    /// Largest single transfer allowed.
    pub max_per_call: u128,
    /// Cumulative spend allowed inside one window. Zero means no policy.
    pub max_per_window: u128,
    /// Window length in seconds.
    pub window_seconds: u64,
    /// Spend recorded in the current window. Never exceeds `max_per_window`.
    pub spent_in_window: u128,
    /// Second at which the current window opened.
    pub window_start: u64,
}

impl SpendingPolicy {
    /// Whether this entry imposes no restriction (absent policy).
    pub fn is_unrestricted(&self) -> bool {
        self.max_per_window == 0
    }

    /// Charge `amount` at `now`, rolling the window first when it has lapsed.
    ///
    /// Mutates `self` freely; callers that need all-or-nothing semantics
    /// charge a copy and write it back only on success.
    fn charge(&mut self, amount: u128, now: u64) -> Result<(), SpendingError> {
        if self.is_unrestricted() {
            return Ok(());
        }
        if amount > self.max_per_call {
            return Err(SpendingError::ExceedsPerCall {
                amount,
                max_per_call: self.max_per_call,
            });
        }
        // Strict `>`: equality keeps the old window.
        if now.saturating_sub(self.window_start) > self.window_seconds {
            self.window_start = now;
            self.spent_in_window = 0;
        }
        let new_spent = match self.spent_in_window.checked_add(amount) {
            Some(total) if total <= self.max_per_window => total,
            _ => {
                return Err(SpendingError::ExceedsWindow {
                    amount,
                    spent_in_window: self.spent_in_window,
                    max_per_window: self.max_per_window,
                })
            }
        };
        self.spent_in_window = new_spent;
        Ok(())
    }
}

/// Spending-policy table keyed by (session key, asset). Mutation is
/// owner-gated; enforcement goes through [`SpendingPolicyStore::enforce`]
/// directly or through a staged [`SpendingLedger`] during batch execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingPolicyStore {
    policies: BTreeMap<(PublicKey, AssetId), SpendingPolicy>,
}

impl SpendingPolicyStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a policy. The window opens at `now` with nothing
    /// spent.
    pub fn set(
        &mut self,
        caller: &Caller,
        session_key: PublicKey,
        asset: AssetId,
        max_per_call: u128,
        max_per_window: u128,
        window_seconds: u64,
        now: u64,
    ) -> Result<(), StoreError> {
        if !caller.is_owner() {
            return Err(StoreError::Unauthorized);
        }
        tracing::debug!(
            session = %session_key,
            asset = %asset,
            max_per_call,
            max_per_window,
            window_seconds,
            "spending policy set"
        );
        self.policies.insert(
            (session_key, asset),
            SpendingPolicy {
                session_key,
                asset_id: asset,
                max_per_call,
                max_per_window,
                window_seconds,
                spent_in_window: 0,
                window_start: now,
            },
        );
        Ok(())
    }

    /// Remove a policy; the pair becomes unrestricted. Removing an absent
    /// entry is a no-op.
    pub fn remove(
        &mut self,
        caller: &Caller,
        session_key: &PublicKey,
        asset: &AssetId,
    ) -> Result<(), StoreError> {
        if !caller.is_owner() {
            return Err(StoreError::Unauthorized);
        }
        if self.policies.remove(&(*session_key, *asset)).is_some() {
            tracing::debug!(session = %session_key, asset = %asset, "spending policy removed");
        }
        Ok(())
    }

    /// Look up a policy. Returns the zero (unrestricted) policy when absent.
    pub fn get(&self, session_key: &PublicKey, asset: &AssetId) -> SpendingPolicy {
        self.policies
            .get(&(*session_key, *asset))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the pair has a restricting policy.
    pub fn is_restricted(&self, session_key: &PublicKey, asset: &AssetId) -> bool {
        self.policies
            .get(&(*session_key, *asset))
            .map(|p| !p.is_unrestricted())
            .unwrap_or(false)
    }

    /// Charge a single amount against the live table. All-or-nothing: a
    /// failed charge leaves the stored policy untouched, including its
    /// window bookkeeping.
    pub fn enforce(
        &mut self,
        session_key: &PublicKey,
        asset: &AssetId,
        amount: u128,
        now: u64,
    ) -> Result<(), SpendingError> {
        let Some(policy) = self.policies.get_mut(&(*session_key, *asset)) else {
            return Ok(());
        };
        if policy.is_unrestricted() {
            return Ok(());
        }
        let mut staged = policy.clone();
        staged.charge(amount, now)?;
        *policy = staged;
        Ok(())
    }

    /// Open a staged ledger for one batch.
    pub fn begin_batch(&self) -> SpendingLedger {
        SpendingLedger::default()
    }

    /// Write a ledger's staged policies back into the table.
    pub fn commit(&mut self, ledger: SpendingLedger) {
        for ((session_key, asset), policy) in ledger.staged {
            tracing::debug!(
                session = %session_key,
                asset = %asset,
                spent_in_window = policy.spent_in_window,
                "spending committed"
            );
            self.policies.insert((session_key, asset), policy);
        }
    }
}

/// Staged spending enforcement for one batch.
///
/// Charges accumulate against clones of the touched policies, so multiple
/// actions on the same asset within a batch share one window tally and
/// nothing reaches the store until [`SpendingPolicyStore::commit`]. Dropping
/// the ledger discards every staged charge.
#[derive(Debug, Default)]
pub struct SpendingLedger {
    staged: BTreeMap<(PublicKey, AssetId), SpendingPolicy>,
}

impl SpendingLedger {
    /// Charge against the staged copy of a policy, pulling the live policy
    /// from `store` on first touch. Unrestricted pairs are never staged.
    pub fn charge(
        &mut self,
        store: &SpendingPolicyStore,
        session_key: PublicKey,
        asset: AssetId,
        amount: u128,
        now: u64,
    ) -> Result<(), SpendingError> {
        let entry = match self.staged.entry((session_key, asset)) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let live = store.get(&session_key, &asset);
                if live.is_unrestricted() {
                    return Ok(());
                }
                vacant.insert(live)
            }
        };
        entry.charge(amount, now)
    }
}
