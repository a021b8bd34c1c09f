//! Current governance power of a holder.

use crate::error::GovernanceError;
use quorum_store::AccountStore;
use quorum_types::{Address, GovernancePowerType, POWER_SCALE_FACTOR};

/// Own balance (unless delegated away for `kind`) plus the delegated power
/// field scaled back up.
///
/// Within field ranges the result is at most
/// `(2^72 - 1) * 10^10 + 2^104 - 1 < 2^107`; a record loaded from a damaged
/// snapshot saturates instead of overflowing.
pub fn current_power<S: AccountStore>(
    store: &S,
    holder: &Address,
    kind: GovernancePowerType,
) -> Result<u128, GovernanceError> {
    let record = store.account(holder)?;
    let own = if record.is_delegating(kind) {
        0
    } else {
        record.balance
    };
    let delegated = record.delegated_power(kind).saturating_mul(POWER_SCALE_FACTOR);
    Ok(own.saturating_add(delegated))
}

/// `(voting, proposition)` power.
pub fn current_powers<S: AccountStore>(
    store: &S,
    holder: &Address,
) -> Result<(u128, u128), GovernanceError> {
    Ok((
        current_power(store, holder, GovernancePowerType::Voting)?,
        current_power(store, holder, GovernancePowerType::Proposition)?,
    ))
}
