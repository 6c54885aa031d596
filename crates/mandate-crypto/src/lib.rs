//! Mandate Crypto - signature verification for the authorization engine
//!
//! Provides the Ed25519 wrappers and the deterministic batch message hashing
//! that make session proofs replay-safe: every field of a submission (account
//! address, chain id, nonce, expiry, and each action down to its calldata
//! bytes) is bound into the digest, so changing any one of them changes what
//! was signed.
//!
//! Malformed proof material (wrong word counts, off-curve keys) decodes to a
//! negative result rather than an error, keeping validation a total predicate.

/// Ed25519 signing and verification wrappers
pub mod signature;

/// Batch message hashing and proof decoding
pub mod message;

pub use message::{OwnerMessage, OwnerProof, SessionMessage, SessionProof};
pub use signature::{
    generate_signing_key, public_key_of, sign_digest, signature_from_words, verify_digest,
    verifying_key_from_public, Ed25519Signature, Ed25519SigningKey, Ed25519VerifyingKey,
};
