//! Write batching: buffers every write of one operation on top of a
//! read-only view of the base store.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = WriteBatch::new(&store);
//! batch.put_account(&holder, record)?;
//! let changes = batch.into_changes();
//! changes.commit(&mut store)?;
//! ```
//!
//! Reads through the batch see its own pending writes. Dropping the batch (or
//! the [`ChangeSet`]) without committing discards every write.

use crate::account::{AccountRecord, AccountStore};
use crate::delegatee::DelegateeStore;
use crate::nonce::NonceStore;
use crate::{LedgerStore, StoreError};
use quorum_types::{Address, GovernancePowerType};
use std::collections::HashMap;

pub struct WriteBatch<'a, S: LedgerStore> {
    base: &'a S,
    changes: ChangeSet,
}

/// Pending writes detached from the base store.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    accounts: HashMap<Address, AccountRecord>,
    delegatees: HashMap<(Address, GovernancePowerType), Option<Address>>,
    nonces: HashMap<Address, u64>,
}

impl<'a, S: LedgerStore> WriteBatch<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            changes: ChangeSet::default(),
        }
    }

    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.delegatees.is_empty() && self.nonces.is_empty()
    }

    /// Number of distinct records touched.
    pub fn len(&self) -> usize {
        self.accounts.len() + self.delegatees.len() + self.nonces.len()
    }

    /// Apply every pending write to `store`.
    pub fn commit<S: LedgerStore>(self, store: &mut S) -> Result<(), StoreError> {
        for (address, record) in self.accounts {
            store.put_account(&address, record)?;
        }
        for ((delegator, kind), delegatee) in self.delegatees {
            store.put_delegatee(&delegator, kind, delegatee)?;
        }
        for (owner, nonce) in self.nonces {
            store.put_nonce(&owner, nonce)?;
        }
        Ok(())
    }
}

impl<S: LedgerStore> AccountStore for WriteBatch<'_, S> {
    fn account(&self, address: &Address) -> Result<AccountRecord, StoreError> {
        match self.changes.accounts.get(address) {
            Some(record) => Ok(*record),
            None => self.base.account(address),
        }
    }

    fn put_account(&mut self, address: &Address, record: AccountRecord) -> Result<(), StoreError> {
        self.changes.accounts.insert(*address, record);
        Ok(())
    }
}

impl<S: LedgerStore> DelegateeStore for WriteBatch<'_, S> {
    fn delegatee(
        &self,
        delegator: &Address,
        kind: GovernancePowerType,
    ) -> Result<Option<Address>, StoreError> {
        match self.changes.delegatees.get(&(*delegator, kind)) {
            Some(pending) => Ok(*pending),
            None => self.base.delegatee(delegator, kind),
        }
    }

    fn put_delegatee(
        &mut self,
        delegator: &Address,
        kind: GovernancePowerType,
        delegatee: Option<Address>,
    ) -> Result<(), StoreError> {
        self.changes
            .delegatees
            .insert((*delegator, kind), delegatee.and_then(Address::non_zero));
        Ok(())
    }
}

impl<S: LedgerStore> NonceStore for WriteBatch<'_, S> {
    fn nonce(&self, owner: &Address) -> Result<u64, StoreError> {
        match self.changes.nonces.get(owner) {
            Some(nonce) => Ok(*nonce),
            None => self.base.nonce(owner),
        }
    }

    fn put_nonce(&mut self, owner: &Address, nonce: u64) -> Result<(), StoreError> {
        self.changes.nonces.insert(*owner, nonce);
        Ok(())
    }
}
