//! Account storage trait.

use crate::StoreError;
use quorum_types::{Address, GovernancePowerType};
use serde::{Deserialize, Serialize};

/// Per-address record: the holder's balance plus the power delegated to it.
///
/// Field widths are narrower than the Rust types carrying them. `balance`
/// stays below 2^104 and each delegated-power field below 2^72; the
/// delegation engine enforces both bounds on every write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Raw token balance.
    pub balance: u128,
    /// Σ `floor(balance / SCALE)` of everyone delegating voting power here.
    pub delegated_voting_power: u128,
    /// Σ `floor(balance / SCALE)` of everyone delegating proposition power here.
    pub delegated_proposition_power: u128,
    /// This address has handed its own voting power to a delegatee.
    pub delegating_voting: bool,
    /// This address has handed its own proposition power to a delegatee.
    pub delegating_proposition: bool,
}

impl AccountRecord {
    pub fn delegated_power(&self, kind: GovernancePowerType) -> u128 {
        match kind {
            GovernancePowerType::Voting => self.delegated_voting_power,
            GovernancePowerType::Proposition => self.delegated_proposition_power,
        }
    }

    pub fn set_delegated_power(&mut self, kind: GovernancePowerType, power: u128) {
        match kind {
            GovernancePowerType::Voting => self.delegated_voting_power = power,
            GovernancePowerType::Proposition => self.delegated_proposition_power = power,
        }
    }

    pub fn is_delegating(&self, kind: GovernancePowerType) -> bool {
        match kind {
            GovernancePowerType::Voting => self.delegating_voting,
            GovernancePowerType::Proposition => self.delegating_proposition,
        }
    }

    pub fn set_delegating(&mut self, kind: GovernancePowerType, delegating: bool) {
        match kind {
            GovernancePowerType::Voting => self.delegating_voting = delegating,
            GovernancePowerType::Proposition => self.delegating_proposition = delegating,
        }
    }

    /// Whether either dimension is currently delegated away.
    pub fn is_delegating_any(&self) -> bool {
        self.delegating_voting || self.delegating_proposition
    }
}

/// Trait for account record storage.
pub trait AccountStore {
    /// Read a record. Unknown addresses yield `AccountRecord::default()`.
    fn account(&self, address: &Address) -> Result<AccountRecord, StoreError>;

    /// Replace the whole record for `address`.
    fn put_account(&mut self, address: &Address, record: AccountRecord) -> Result<(), StoreError>;
}
