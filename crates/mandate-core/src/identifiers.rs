//! Identifier newtypes shared across the mandate workspace.
//!
//! All identifiers are 32-byte values. The all-zero value is reserved to mean
//! "absent" rather than a usable identity, which is what lets revoked
//! credentials read back as unregistered.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte word as carried in proofs and calldata.
pub type Word = [u8; 32];

/// Domain tag mixed into selector derivation.
const SELECTOR_DOMAIN: &[u8] = b"mandate.selector.v1";

/// Ed25519 public-key bytes identifying a session or the account owner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// The reserved "absent" key.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Whether this is the reserved all-zero value.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Address of a contract or account in the host environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AccountAddress(pub [u8; 32]);

impl AccountAddress {
    /// The reserved "absent" address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Whether this is the reserved all-zero value.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Assets are identified by the address of their token contract.
pub type AssetId = AccountAddress;

/// Operation identifier: the sha-256 of the operation name under a fixed
/// domain tag. Derivation is stable, so a selector computed from a name at
/// any point matches every other derivation of the same name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Selector(pub [u8; 32]);

impl Selector {
    /// Derive the selector for an operation name.
    pub fn from_name(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SELECTOR_DOMAIN);
        hasher.update(name.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Raw selector bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Identity of the execution context invoking a configuration operation.
///
/// Only `Owner` may mutate credentials, spending policies, or the owner key.
/// Session and external callers are confined to the transitions the existing
/// configuration authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    /// The account owner, authenticated out of band by the host.
    Owner,
    /// A session credential holder.
    Session(PublicKey),
    /// Any other address.
    External(AccountAddress),
}

impl Caller {
    /// Whether this caller may perform owner-gated mutation.
    pub fn is_owner(&self) -> bool {
        matches!(self, Caller::Owner)
    }
}
