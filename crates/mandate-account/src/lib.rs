//! Mandate Account - delegated authorization for a self-custodied account
//!
//! An owner issues scoped, time-boxed session credentials that third parties
//! use to submit batches of actions on the account's behalf. Guardrails
//! (expiry, call budget, entrypoint whitelist, per-asset spending windows)
//! cannot be escalated even by a compromised session credential, and a fixed
//! administrative blocklist always wins over any whitelist.
//!
//! The flow is two-phase: [`ValidationEngine`] is a pure predicate over the
//! submitted batch and proof; [`Account::execute`] applies an accepted batch,
//! consuming call budget and spending allowance atomically per batch.

/// Account facade tying stores, validation, and execution together
pub mod account;

/// Fixed administrative blocklist
pub mod blocklist;

/// Error types for configuration, spending, and execution
pub mod errors;

/// Batch execution behind the validation gate
pub mod execute;

/// Session credential lifecycle
pub mod session;

/// Per-(session, asset) spending limits
pub mod spending;

/// Batch authorization state machine
pub mod validation;

pub use account::{Account, AccountConfig};
pub use blocklist::{is_admin_blocked, ADMIN_BLOCKED_OPERATIONS};
pub use errors::{ExecuteError, SpendingError, StoreError};
pub use execute::{transfer_calldata, ActionDispatcher, DispatchError};
pub use session::{SessionCredential, SessionKeyStore};
pub use spending::{SpendingLedger, SpendingPolicy, SpendingPolicyStore};
pub use validation::{AuthMode, Decision, ValidationContext, ValidationEngine};
