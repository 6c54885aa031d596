//! Batch authorization: a pure, ordered sequence of checks.
//!
//! The engine is a predicate over immutable store views. It mutates nothing
//! and running it twice on the same inputs yields the same decision; budget
//! consumption happens only at execution time. Rejections are opaque — the
//! failing rule is logged at debug level but never disclosed to the caller,
//! so repeated attempts cannot map out policy boundaries.
//!
//! Session-path checks run in a fixed order that is a security invariant:
//! resolve the claimed key, expiry, call budget, admin blocklist over every
//! action, entrypoint whitelist, and only then the signature.

use crate::blocklist::is_admin_blocked;
use crate::session::SessionKeyStore;
use mandate_core::{AccountAddress, Action, Proof, ProofMode, PublicKey};
use mandate_crypto::{OwnerMessage, OwnerProof, SessionMessage, SessionProof};

/// Which key authenticated an accepted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// The account owner signed the batch.
    Owner,
    /// The given session key signed the batch.
    Session(PublicKey),
}

/// Outcome of one validation attempt. Rejection carries no reason by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Every check passed under the given mode.
    Accept(AuthMode),
    /// At least one check failed.
    Reject,
}

impl Decision {
    /// Whether the batch was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accept(_))
    }
}

/// Everything one validation attempt looks at. Ephemeral; exists only for
/// the duration of the attempt.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    /// The submitted batch.
    pub batch: &'a [Action],
    /// Caller-supplied replay nonce.
    pub nonce: u64,
    /// Chain or domain identifier.
    pub chain_id: u64,
    /// The account's own address; self-call detection compares against this.
    pub account_address: AccountAddress,
    /// Externally supplied current time, seconds.
    pub now: u64,
    /// Submitted proof material.
    pub proof: &'a Proof,
}

/// Read-only batch validator over the session registry and owner key.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'a> {
    sessions: &'a SessionKeyStore,
    owner_key: &'a PublicKey,
}

fn rejected(reason: &'static str) -> Decision {
    tracing::debug!(reason, "batch validation rejected");
    Decision::Reject
}

impl<'a> ValidationEngine<'a> {
    /// Borrow the state one validation attempt needs.
    pub fn new(sessions: &'a SessionKeyStore, owner_key: &'a PublicKey) -> Self {
        Self {
            sessions,
            owner_key,
        }
    }

    /// Run the full state machine for one submission.
    pub fn evaluate(&self, ctx: &ValidationContext<'_>) -> Decision {
        match ctx.proof.mode {
            ProofMode::Owner => self.evaluate_owner(ctx),
            ProofMode::Session => self.evaluate_session(ctx),
        }
    }

    fn evaluate_owner(&self, ctx: &ValidationContext<'_>) -> Decision {
        let Some(proof) = OwnerProof::from_proof(ctx.proof) else {
            return rejected("malformed owner proof");
        };
        let digest = OwnerMessage {
            account_address: ctx.account_address,
            chain_id: ctx.chain_id,
            nonce: ctx.nonce,
            actions: ctx.batch,
        }
        .digest();
        if !proof.verify(self.owner_key, &digest) {
            return rejected("owner signature mismatch");
        }
        Decision::Accept(AuthMode::Owner)
    }

    fn evaluate_session(&self, ctx: &ValidationContext<'_>) -> Decision {
        let Some(proof) = SessionProof::from_proof(ctx.proof) else {
            return rejected("malformed session proof");
        };

        let credential = self.sessions.get(&proof.claimed_key);
        if !credential.is_registered() {
            return rejected("session key not registered");
        }
        if credential.is_expired(ctx.now) {
            return rejected("session expired");
        }
        if credential.is_exhausted() {
            return rejected("session call budget exhausted");
        }

        // Blocklist first, over every action: independent of whitelist
        // content and of whether the target is the account itself.
        for action in ctx.batch {
            if is_admin_blocked(&action.selector) {
                return rejected("admin-blocked operation in batch");
            }
        }

        for action in ctx.batch {
            if credential.allowed_entrypoints.is_empty() {
                if action.target == ctx.account_address {
                    return rejected("self-call with empty whitelist");
                }
            } else if !credential.allowed_entrypoints.contains(&action.selector) {
                return rejected("operation not whitelisted");
            }
        }

        // Signature last, recomputed from the actual submitted batch.
        let message = SessionMessage {
            account_address: ctx.account_address,
            chain_id: ctx.chain_id,
            nonce: ctx.nonce,
            valid_until: proof.valid_until,
            actions: ctx.batch,
        };
        if !proof.verify(&message) {
            return rejected("session signature mismatch");
        }

        Decision::Accept(AuthMode::Session(proof.claimed_key))
    }
}
