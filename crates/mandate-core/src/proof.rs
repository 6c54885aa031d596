//! Raw authentication proof material.
//!
//! A proof is a mode tag plus a flat list of 32-byte words, mirroring how
//! signature payloads arrive from a host environment. Decoding a proof whose
//! word count does not match its mode is a negative validation result, never
//! an error, so validation stays a cheap total predicate.

use crate::identifiers::Word;
use serde::{Deserialize, Serialize};

/// Authentication mode claimed by a submitted proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofMode {
    /// Signed by the account's registered owner key.
    Owner,
    /// Signed by a session credential key.
    Session,
}

/// Raw proof material accompanying a batch submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Claimed authentication mode.
    pub mode: ProofMode,
    /// Proof words; layout depends on the mode.
    pub words: Vec<Word>,
}

impl Proof {
    /// Owner mode carries exactly the signature words `r ‖ s`.
    pub const OWNER_WORDS: usize = 2;
    /// Session mode carries `claimed_public_key, r, s, valid_until`.
    pub const SESSION_WORDS: usize = 4;

    /// Build an owner-mode proof.
    pub fn owner(words: Vec<Word>) -> Self {
        Self {
            mode: ProofMode::Owner,
            words,
        }
    }

    /// Build a session-mode proof.
    pub fn session(words: Vec<Word>) -> Self {
        Self {
            mode: ProofMode::Session,
            words,
        }
    }
}

/// Encode a u64 into the low bytes of a big-endian word.
pub fn word_from_u64(value: u64) -> Word {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Decode a u64 from a big-endian word. Returns `None` when the high bytes
/// are nonzero, i.e. the value does not fit the u64 domain.
pub fn u64_from_word(word: &Word) -> Option<u64> {
    if word[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[24..]);
    Some(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_round_trip() {
        for value in [0u64, 1, u64::MAX, 1_700_000_000] {
            assert_eq!(u64_from_word(&word_from_u64(value)), Some(value));
        }
    }

    #[test]
    fn oversized_word_rejected() {
        let mut word = word_from_u64(42);
        word[0] = 1;
        assert_eq!(u64_from_word(&word), None);
    }

    #[test]
    fn proof_constructors_tag_mode() {
        assert_eq!(Proof::owner(vec![]).mode, ProofMode::Owner);
        assert_eq!(Proof::session(vec![]).mode, ProofMode::Session);
    }
}
