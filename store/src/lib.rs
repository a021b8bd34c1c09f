//! Storage for the governance-power ledger.
//!
//! Every backend implements the three record traits below; the rest of the
//! codebase depends only on [`LedgerStore`]. Absent keys read as their zero
//! value, so records are created implicitly on first write and never deleted.

pub mod account;
pub mod delegatee;
pub mod error;
pub mod memory;
pub mod nonce;
pub mod write_batch;

pub use account::{AccountRecord, AccountStore};
pub use delegatee::DelegateeStore;
pub use error::StoreError;
pub use memory::{LedgerSnapshot, MemoryStore};
pub use nonce::NonceStore;
pub use write_batch::{ChangeSet, WriteBatch};

/// Everything the delegation engine reads and writes.
pub trait LedgerStore: AccountStore + DelegateeStore + NonceStore {}

impl<T: AccountStore + DelegateeStore + NonceStore> LedgerStore for T {}
