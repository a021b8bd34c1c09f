//! Delegatee mapping storage trait.

use crate::StoreError;
use quorum_types::{Address, GovernancePowerType};

/// One `delegator -> delegatee` mapping per power dimension.
pub trait DelegateeStore {
    /// Current delegatee, `None` when `delegator` keeps this dimension.
    fn delegatee(
        &self,
        delegator: &Address,
        kind: GovernancePowerType,
    ) -> Result<Option<Address>, StoreError>;

    /// Set (`Some`) or clear (`None`) the delegatee.
    fn put_delegatee(
        &mut self,
        delegator: &Address,
        kind: GovernancePowerType,
        delegatee: Option<Address>,
    ) -> Result<(), StoreError>;
}
