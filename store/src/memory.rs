//! In-memory ledger store with bincode snapshots.

use crate::account::{AccountRecord, AccountStore};
use crate::delegatee::DelegateeStore;
use crate::nonce::NonceStore;
use crate::StoreError;
use quorum_types::{Address, GovernancePowerType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A `HashMap`-backed ledger. Zero-valued entries are never stored, so two
/// stores holding the same logical state compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    accounts: HashMap<Address, AccountRecord>,
    voting_delegatees: HashMap<Address, Address>,
    proposition_delegatees: HashMap<Address, Address>,
    nonces: HashMap<Address, u64>,
}

/// Serializable image of a [`MemoryStore`]. Ordered maps keep the encoding
/// deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub accounts: BTreeMap<Address, AccountRecord>,
    pub voting_delegatees: BTreeMap<Address, Address>,
    pub proposition_delegatees: BTreeMap<Address, Address>,
    pub nonces: BTreeMap<Address, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every address with a non-default record.
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &AccountRecord)> {
        self.accounts.iter()
    }

    /// Every `(delegator, delegatee)` pair for one dimension.
    pub fn delegations(
        &self,
        kind: GovernancePowerType,
    ) -> impl Iterator<Item = (&Address, &Address)> {
        self.delegatee_map(kind).iter()
    }

    fn delegatee_map(&self, kind: GovernancePowerType) -> &HashMap<Address, Address> {
        match kind {
            GovernancePowerType::Voting => &self.voting_delegatees,
            GovernancePowerType::Proposition => &self.proposition_delegatees,
        }
    }

    fn delegatee_map_mut(&mut self, kind: GovernancePowerType) -> &mut HashMap<Address, Address> {
        match kind {
            GovernancePowerType::Voting => &mut self.voting_delegatees,
            GovernancePowerType::Proposition => &mut self.proposition_delegatees,
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            accounts: self.accounts.iter().map(|(k, v)| (*k, *v)).collect(),
            voting_delegatees: self.voting_delegatees.iter().map(|(k, v)| (*k, *v)).collect(),
            proposition_delegatees: self
                .proposition_delegatees
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            nonces: self.nonces.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            accounts: snapshot.accounts.into_iter().collect(),
            voting_delegatees: snapshot.voting_delegatees.into_iter().collect(),
            proposition_delegatees: snapshot.proposition_delegatees.into_iter().collect(),
            nonces: snapshot.nonces.into_iter().collect(),
        }
    }

    /// Serialize the whole ledger to bytes for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(&self.snapshot())?)
    }

    /// Restore a ledger from [`MemoryStore::save_state`] output.
    pub fn load_state(data: &[u8]) -> Result<Self, StoreError> {
        let snapshot: LedgerSnapshot = bincode::deserialize(data)?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl AccountStore for MemoryStore {
    fn account(&self, address: &Address) -> Result<AccountRecord, StoreError> {
        Ok(self.accounts.get(address).copied().unwrap_or_default())
    }

    fn put_account(&mut self, address: &Address, record: AccountRecord) -> Result<(), StoreError> {
        if record == AccountRecord::default() {
            self.accounts.remove(address);
        } else {
            self.accounts.insert(*address, record);
        }
        Ok(())
    }
}

impl DelegateeStore for MemoryStore {
    fn delegatee(
        &self,
        delegator: &Address,
        kind: GovernancePowerType,
    ) -> Result<Option<Address>, StoreError> {
        Ok(self.delegatee_map(kind).get(delegator).copied())
    }

    fn put_delegatee(
        &mut self,
        delegator: &Address,
        kind: GovernancePowerType,
        delegatee: Option<Address>,
    ) -> Result<(), StoreError> {
        let map = self.delegatee_map_mut(kind);
        match delegatee.and_then(Address::non_zero) {
            Some(to) => {
                map.insert(*delegator, to);
            }
            None => {
                map.remove(delegator);
            }
        }
        Ok(())
    }
}

impl NonceStore for MemoryStore {
    fn nonce(&self, owner: &Address) -> Result<u64, StoreError> {
        Ok(self.nonces.get(owner).copied().unwrap_or(0))
    }

    fn put_nonce(&mut self, owner: &Address, nonce: u64) -> Result<(), StoreError> {
        if nonce == 0 {
            self.nonces.remove(owner);
        } else {
            self.nonces.insert(*owner, nonce);
        }
        Ok(())
    }
}
