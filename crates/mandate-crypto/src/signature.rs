//! Digital signature wrappers for Ed25519 operations
//!
//! Thin adapters between the engine's 32-byte word vocabulary and
//! `ed25519-dalek`. Key and signature decoding failures surface as `None` or
//! `false`; callers fold them into negative validation results.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use mandate_core::{PublicKey, Word};
use rand::rngs::OsRng;

/// Ed25519 signing key
pub type Ed25519SigningKey = SigningKey;

/// Ed25519 verifying key (public key)
pub type Ed25519VerifyingKey = VerifyingKey;

/// Ed25519 signature
pub type Ed25519Signature = Signature;

/// Decode a verifying key from stored key bytes.
///
/// Returns `None` for the reserved zero key or for bytes that are not a valid
/// curve point.
pub fn verifying_key_from_public(key: &PublicKey) -> Option<VerifyingKey> {
    if key.is_zero() {
        return None;
    }
    VerifyingKey::from_bytes(key.as_bytes()).ok()
}

/// Assemble a signature from its `r` and `s` words.
pub fn signature_from_words(r: &Word, s: &Word) -> Signature {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(r);
    bytes[32..].copy_from_slice(s);
    Signature::from_bytes(&bytes)
}

/// Verify a detached signature over a 32-byte digest.
pub fn verify_digest(key: &VerifyingKey, digest: &[u8; 32], signature: &Signature) -> bool {
    key.verify(digest, signature).is_ok()
}

/// Sign a 32-byte digest.
pub fn sign_digest(signing_key: &SigningKey, digest: &[u8; 32]) -> Signature {
    signing_key.sign(digest)
}

/// Generate a fresh Ed25519 signing key from the OS RNG.
///
/// Intended for tests and key-provisioning tooling; the engine itself only
/// ever verifies.
pub fn generate_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// The engine-facing public key of a signing key.
pub fn public_key_of(signing_key: &SigningKey) -> PublicKey {
    PublicKey(signing_key.verifying_key().to_bytes())
}
