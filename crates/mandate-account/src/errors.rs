//! Error types for configuration, spending enforcement, and execution.
//!
//! Configuration and lookup failures are hard errors with no partial
//! mutation. Validation failures never appear here: they fold into a
//! rejection so repeated attempts cannot map out policy boundaries. Spending
//! failures during execution are hard errors and abort the whole batch; by
//! that point the caller is already authenticated, so the exceeded constraint
//! is reported precisely.

use thiserror::Error;

/// Hard failures from owner-gated configuration operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Caller is not the account owner.
    #[error("caller is not the account owner")]
    Unauthorized,

    /// Session public key is the reserved zero value.
    #[error("session public key must be nonzero")]
    ZeroSessionKey,

    /// Session expiry is zero.
    #[error("session expiry must be nonzero")]
    ZeroValidUntil,

    /// Session call budget is zero.
    #[error("session call budget must be nonzero")]
    ZeroMaxCalls,

    /// Owner key is the reserved zero value.
    #[error("owner key must be nonzero")]
    ZeroOwnerKey,

    /// Revocation target is not registered.
    #[error("session key is not registered")]
    SessionNotFound,
}

/// Hard failures from spending-limit enforcement during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpendingError {
    /// A single transfer exceeds the per-call limit.
    #[error("amount {amount} exceeds per-call limit {max_per_call}")]
    ExceedsPerCall {
        /// Attempted transfer amount.
        amount: u128,
        /// Configured per-call limit.
        max_per_call: u128,
    },

    /// Accumulated window spend would exceed the window limit.
    #[error("amount {amount} on top of {spent_in_window} exceeds window limit {max_per_window}")]
    ExceedsWindow {
        /// Attempted transfer amount.
        amount: u128,
        /// Spend already recorded in the current window.
        spent_in_window: u128,
        /// Configured window limit.
        max_per_window: u128,
    },

    /// Transfer payload carries a value outside the supported numeric domain.
    #[error("transfer amount is outside the supported numeric domain")]
    InvalidAmount,
}

/// Failures surfaced by batch execution.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The batch did not pass validation in this transaction context.
    #[error("batch did not pass validation")]
    NotAuthorized,

    /// A spending limit was exceeded; the whole batch was aborted.
    #[error(transparent)]
    Spending(#[from] SpendingError),

    /// The host dispatcher failed an action; the whole batch was aborted.
    #[error("action {index} failed to dispatch: {reason}")]
    Dispatch {
        /// Position of the failing action in the batch.
        index: usize,
        /// Host-reported failure reason.
        reason: String,
    },
}
