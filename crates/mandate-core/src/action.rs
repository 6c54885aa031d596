//! Actions submitted in batches and their execution results.

use crate::identifiers::{AccountAddress, Selector};
use serde::{Deserialize, Serialize};

/// One action within a submitted batch: an operation on a target contract
/// with opaque calldata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Contract or account the action is addressed to.
    pub target: AccountAddress,
    /// Operation to invoke on the target.
    pub selector: Selector,
    /// Raw argument bytes, interpreted by the target.
    pub calldata: Vec<u8>,
}

impl Action {
    /// Build an action from its parts.
    pub fn new(target: AccountAddress, selector: Selector, calldata: Vec<u8>) -> Self {
        Self {
            target,
            selector,
            calldata,
        }
    }
}

/// Outcome of one dispatched action within an executed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Position of the action in the submitted batch.
    pub index: usize,
    /// Opaque return bytes from the host dispatcher.
    pub output: Vec<u8>,
}
