//! Mandate Core - shared vocabulary for the delegated-authorization engine
//!
//! This crate holds the identifier newtypes, the action/batch data model, and
//! the raw proof material that the crypto and account crates both consume.
//! It contains no policy logic and no mutable state.

/// Key, address, and operation identifiers
pub mod identifiers;

/// Actions submitted in batches and their execution results
pub mod action;

/// Raw authentication proof material
pub mod proof;

pub use action::{Action, ActionResult};
pub use identifiers::{AccountAddress, AssetId, Caller, PublicKey, Selector, Word};
pub use proof::{u64_from_word, word_from_u64, Proof, ProofMode};
