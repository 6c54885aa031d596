//! Batch message hashing and proof decoding.
//!
//! Digests are sha-256 over a domain tag followed by every submission field,
//! each fixed-width or length-delimited. No two distinct messages share an
//! encoding, so a signature over one batch never validates another batch, a
//! different nonce, a different chain, or a different account.

use mandate_core::{u64_from_word, AccountAddress, Action, Proof, ProofMode, PublicKey, Word};
use sha2::{Digest, Sha256};

use crate::signature::{signature_from_words, verify_digest, verifying_key_from_public};

/// Domain tag for session-mode message digests.
const SESSION_MESSAGE_DOMAIN: &[u8] = b"mandate.session-message.v1";

/// Domain tag for owner-mode message digests. Distinct from the session tag
/// so the two modes can never produce colliding digests over the same batch.
const OWNER_MESSAGE_DOMAIN: &[u8] = b"mandate.owner-message.v1";

fn hash_batch(hasher: &mut Sha256, actions: &[Action]) {
    hasher.update((actions.len() as u64).to_be_bytes());
    for action in actions {
        hasher.update(action.target.as_bytes());
        hasher.update(action.selector.as_bytes());
        hasher.update((action.calldata.len() as u64).to_be_bytes());
        hasher.update(&action.calldata);
    }
}

/// The fields a session key signs when authorizing a batch.
#[derive(Debug, Clone)]
pub struct SessionMessage<'a> {
    /// Account the batch executes against.
    pub account_address: AccountAddress,
    /// Chain or domain identifier.
    pub chain_id: u64,
    /// Caller-supplied replay nonce.
    pub nonce: u64,
    /// Expiry the session holder signed over.
    pub valid_until: u64,
    /// The submitted batch.
    pub actions: &'a [Action],
}

impl SessionMessage<'_> {
    /// Compute the message digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(SESSION_MESSAGE_DOMAIN);
        hasher.update(self.account_address.as_bytes());
        hasher.update(self.chain_id.to_be_bytes());
        hasher.update(self.nonce.to_be_bytes());
        hasher.update(self.valid_until.to_be_bytes());
        hash_batch(&mut hasher, self.actions);
        hasher.finalize().into()
    }
}

/// The fields the owner key signs when authorizing a batch directly.
#[derive(Debug, Clone)]
pub struct OwnerMessage<'a> {
    /// Account the batch executes against.
    pub account_address: AccountAddress,
    /// Chain or domain identifier.
    pub chain_id: u64,
    /// Caller-supplied replay nonce.
    pub nonce: u64,
    /// The submitted batch.
    pub actions: &'a [Action],
}

impl OwnerMessage<'_> {
    /// Compute the message digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(OWNER_MESSAGE_DOMAIN);
        hasher.update(self.account_address.as_bytes());
        hasher.update(self.chain_id.to_be_bytes());
        hasher.update(self.nonce.to_be_bytes());
        hash_batch(&mut hasher, self.actions);
        hasher.finalize().into()
    }
}

/// Decoded owner-mode proof: the signature words `r ‖ s`.
#[derive(Debug, Clone)]
pub struct OwnerProof {
    /// Signature `r` word.
    pub r: Word,
    /// Signature `s` word.
    pub s: Word,
}

impl OwnerProof {
    /// Decode from raw proof material. `None` when the mode or word count is
    /// wrong for owner authentication.
    pub fn from_proof(proof: &Proof) -> Option<Self> {
        if proof.mode != ProofMode::Owner || proof.words.len() != Proof::OWNER_WORDS {
            return None;
        }
        Some(Self {
            r: proof.words[0],
            s: proof.words[1],
        })
    }

    /// Verify against the registered owner key over the given digest.
    pub fn verify(&self, owner_key: &PublicKey, digest: &[u8; 32]) -> bool {
        let Some(key) = verifying_key_from_public(owner_key) else {
            return false;
        };
        verify_digest(&key, digest, &signature_from_words(&self.r, &self.s))
    }
}

/// Decoded session-mode proof: the claimed key, signature words, and the
/// expiry that was signed.
#[derive(Debug, Clone)]
pub struct SessionProof {
    /// Session key the submitter claims produced the signature.
    pub claimed_key: PublicKey,
    /// Signature `r` word.
    pub r: Word,
    /// Signature `s` word.
    pub s: Word,
    /// Expiry bound into the signed message.
    pub valid_until: u64,
}

impl SessionProof {
    /// Decode from raw proof material. `None` when the mode or word count is
    /// wrong for session authentication, or the expiry word overflows u64.
    pub fn from_proof(proof: &Proof) -> Option<Self> {
        if proof.mode != ProofMode::Session || proof.words.len() != Proof::SESSION_WORDS {
            return None;
        }
        Some(Self {
            claimed_key: PublicKey(proof.words[0]),
            r: proof.words[1],
            s: proof.words[2],
            valid_until: u64_from_word(&proof.words[3])?,
        })
    }

    /// Recompute the message digest and verify it against the claimed key.
    ///
    /// A signature produced by any other key fails here, even if that key is
    /// itself registered somewhere.
    pub fn verify(&self, message: &SessionMessage<'_>) -> bool {
        let Some(key) = verifying_key_from_public(&self.claimed_key) else {
            return false;
        };
        verify_digest(
            &key,
            &message.digest(),
            &signature_from_words(&self.r, &self.s),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{generate_signing_key, public_key_of, sign_digest};
    use mandate_core::{word_from_u64, Selector};
    use proptest::prelude::*;

    fn sample_action(seed: u8) -> Action {
        Action::new(
            AccountAddress([seed; 32]),
            Selector::from_name("transfer"),
            vec![seed, seed + 1],
        )
    }

    fn sample_message(actions: &[Action]) -> SessionMessage<'_> {
        SessionMessage {
            account_address: AccountAddress([1u8; 32]),
            chain_id: 5,
            nonce: 9,
            valid_until: 9999,
            actions,
        }
    }

    #[test]
    fn every_field_changes_the_digest() {
        let actions = vec![sample_action(2)];
        let base = sample_message(&actions).digest();

        let mut m = sample_message(&actions);
        m.account_address = AccountAddress([3u8; 32]);
        assert_ne!(m.digest(), base);

        let mut m = sample_message(&actions);
        m.chain_id = 6;
        assert_ne!(m.digest(), base);

        let mut m = sample_message(&actions);
        m.nonce = 10;
        assert_ne!(m.digest(), base);

        let mut m = sample_message(&actions);
        m.valid_until = 10000;
        assert_ne!(m.digest(), base);

        let other_actions = vec![sample_action(4)];
        assert_ne!(sample_message(&other_actions).digest(), base);
    }

    #[test]
    fn calldata_byte_changes_the_digest() {
        let actions = vec![sample_action(2)];
        let mut tweaked = actions.clone();
        tweaked[0].calldata[0] ^= 1;
        assert_ne!(
            sample_message(&actions).digest(),
            sample_message(&tweaked).digest()
        );
    }

    #[test]
    fn calldata_boundaries_do_not_collide() {
        // Moving a byte across an action boundary must change the digest.
        let a = vec![
            Action::new(AccountAddress([1; 32]), Selector::from_name("x"), vec![1, 2]),
            Action::new(AccountAddress([1; 32]), Selector::from_name("x"), vec![3]),
        ];
        let b = vec![
            Action::new(AccountAddress([1; 32]), Selector::from_name("x"), vec![1]),
            Action::new(AccountAddress([1; 32]), Selector::from_name("x"), vec![2, 3]),
        ];
        assert_ne!(sample_message(&a).digest(), sample_message(&b).digest());
    }

    #[test]
    fn owner_and_session_domains_differ() {
        let actions = vec![sample_action(2)];
        let session = sample_message(&actions).digest();
        let owner = OwnerMessage {
            account_address: AccountAddress([1u8; 32]),
            chain_id: 5,
            nonce: 9,
            actions: &actions,
        }
        .digest();
        assert_ne!(session, owner);
    }

    #[test]
    fn session_proof_decodes_and_verifies() {
        let signing_key = generate_signing_key();
        let actions = vec![sample_action(2)];
        let message = sample_message(&actions);

        let signature = sign_digest(&signing_key, &message.digest());
        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        let proof = Proof::session(vec![
            public_key_of(&signing_key).0,
            r,
            s,
            word_from_u64(message.valid_until),
        ]);
        let decoded = SessionProof::from_proof(&proof).unwrap();
        assert!(decoded.verify(&message));

        // A mismatched claimed key fails even though the signature is valid
        // for its real key.
        let other = generate_signing_key();
        let mut forged = decoded.clone();
        forged.claimed_key = public_key_of(&other);
        assert!(!forged.verify(&message));
    }

    #[test]
    fn wrong_word_counts_decode_to_none() {
        assert!(OwnerProof::from_proof(&Proof::owner(vec![[0u8; 32]; 3])).is_none());
        assert!(OwnerProof::from_proof(&Proof::session(vec![[0u8; 32]; 2])).is_none());
        assert!(SessionProof::from_proof(&Proof::session(vec![[0u8; 32]; 5])).is_none());
        assert!(SessionProof::from_proof(&Proof::owner(vec![[0u8; 32]; 4])).is_none());
    }

    proptest! {
        #[test]
        fn distinct_nonces_never_collide(a in any::<u64>(), b in any::<u64>()) {
            prop_assume!(a != b);
            let actions = vec![sample_action(2)];
            let mut left = sample_message(&actions);
            left.nonce = a;
            let mut right = sample_message(&actions);
            right.nonce = b;
            prop_assert_ne!(left.digest(), right.digest());
        }

        #[test]
        fn distinct_calldata_never_collides(a in proptest::collection::vec(any::<u8>(), 0..16),
                                            b in proptest::collection::vec(any::<u8>(), 0..16)) {
            prop_assume!(a != b);
            let left = vec![Action::new(AccountAddress([1; 32]), Selector::from_name("x"), a)];
            let right = vec![Action::new(AccountAddress([1; 32]), Selector::from_name("x"), b)];
            prop_assert_ne!(sample_message(&left).digest(), sample_message(&right).digest());
        }
    }
}
