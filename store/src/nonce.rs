//! Replay-protection nonce storage trait.

use crate::StoreError;
use quorum_types::Address;

pub trait NonceStore {
    /// Next unused nonce for signed requests from `owner` (0 if never used).
    fn nonce(&self, owner: &Address) -> Result<u64, StoreError>;

    fn put_nonce(&mut self, owner: &Address, nonce: u64) -> Result<(), StoreError>;
}
