//! Batch execution behind the validation gate.
//!
//! Execution is the point of no return, so it runs in phases: every
//! spending-relevant action is charged against a staged ledger first, then
//! actions dispatch through the host, and only when all of that succeeds are
//! the spend counters and the session call budget committed. A failure at
//! any point aborts the whole batch with nothing applied.

use crate::errors::{ExecuteError, SpendingError};
use crate::session::SessionKeyStore;
use crate::spending::SpendingPolicyStore;
use crate::validation::AuthMode;
use mandate_core::{AccountAddress, Action, ActionResult, Selector, Word};
use once_cell::sync::Lazy;
use thiserror::Error;

/// Value-transfer-style selectors whose amounts count against spending
/// policies. Anything else is never tracked.
static SPENDING_SELECTORS: Lazy<[Selector; 2]> = Lazy::new(|| {
    [
        Selector::from_name("transfer"),
        Selector::from_name("approve"),
    ]
});

/// Failure reported by the host dispatcher for a single action.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DispatchError(pub String);

/// Host seam: performs the underlying action once authorization and spending
/// checks have passed.
pub trait ActionDispatcher {
    /// Perform one action and return its opaque output bytes.
    fn dispatch(&mut self, action: &Action) -> Result<Vec<u8>, DispatchError>;
}

/// Build transfer/approve calldata: recipient word followed by a big-endian
/// amount word.
pub fn transfer_calldata(recipient: &AccountAddress, amount: u128) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(64);
    calldata.extend_from_slice(recipient.as_bytes());
    let mut amount_word: Word = [0u8; 32];
    amount_word[16..].copy_from_slice(&amount.to_be_bytes());
    calldata.extend_from_slice(&amount_word);
    calldata
}

/// Decode the spending amount of an action, if its selector is
/// spending-relevant. Values outside the u128 domain are rejected rather
/// than truncated.
fn spending_amount(action: &Action) -> Result<Option<u128>, SpendingError> {
    if !SPENDING_SELECTORS.contains(&action.selector) {
        return Ok(None);
    }
    if action.calldata.len() != 64 {
        return Err(SpendingError::InvalidAmount);
    }
    let amount_word = &action.calldata[32..64];
    if amount_word[..16].iter().any(|b| *b != 0) {
        return Err(SpendingError::InvalidAmount);
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&amount_word[16..]);
    Ok(Some(u128::from_be_bytes(bytes)))
}

/// Apply an accepted batch.
///
/// Only called with a mode produced by validation in the same transaction
/// context; admin-blocked operations can never reach this point.
pub(crate) fn execute_batch(
    sessions: &mut SessionKeyStore,
    policies: &mut SpendingPolicyStore,
    dispatcher: &mut dyn ActionDispatcher,
    mode: AuthMode,
    batch: &[Action],
    now: u64,
) -> Result<Vec<ActionResult>, ExecuteError> {
    // Phase 1: stage every spending charge. Owner batches carry no session
    // key, so no policy applies to them.
    let mut ledger = policies.begin_batch();
    if let AuthMode::Session(session_key) = mode {
        for action in batch {
            if !policies.is_restricted(&session_key, &action.target) {
                continue;
            }
            let Some(amount) = spending_amount(action)? else {
                continue;
            };
            ledger.charge(policies, session_key, action.target, amount, now)?;
        }
    }

    // Phase 2: dispatch. A failure here aborts with nothing committed.
    let mut results = Vec::with_capacity(batch.len());
    for (index, action) in batch.iter().enumerate() {
        let output = dispatcher
            .dispatch(action)
            .map_err(|err| ExecuteError::Dispatch {
                index,
                reason: err.to_string(),
            })?;
        results.push(ActionResult { index, output });
    }

    // Phase 3: commit spend counters and the call budget.
    policies.commit(ledger);
    if let AuthMode::Session(session_key) = mode {
        if !sessions.consume_call(&session_key) {
            // Validation guaranteed remaining budget in this same context.
            tracing::warn!(session = %session_key, "call budget vanished between validation and execution");
        }
    }
    tracing::debug!(actions = batch.len(), "batch executed");
    Ok(results)
}
