//! Power accounting: moves scaled balance deltas into a delegatee's record.
//!
//! A holder contributes `floor(balance / POWER_SCALE_FACTOR)` to its delegatee.
//! When the balance moves from `before` to `after`, the delegatee's field moves
//! by the difference of the two scaled values, never by the scaled difference
//! of the balances. Dust below the scale is dropped on every update and never
//! reconciled later.

use crate::error::GovernanceError;
use quorum_store::LedgerStore;
use quorum_types::{scaled_power, Address, GovernancePowerType, MAX_DELEGATED_POWER};
use std::fmt;
use tracing::{debug, error};

/// Which way a delegatee's power field moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerDirection {
    Increase,
    Decrease,
}

impl fmt::Display for PowerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
        }
    }
}

/// The unsigned change in a delegator's contribution when its balance moves
/// from `before` to `after`.
pub fn power_delta(before: u128, after: u128) -> u128 {
    scaled_power(before).abs_diff(scaled_power(after))
}

/// Apply one balance change of a delegator to its `delegatee` for `kind`.
///
/// No-op without a delegatee or when the scaled contribution is unchanged.
/// Falling below zero or above the 72-bit field is an accounting
/// inconsistency and fails the operation.
pub fn apply_delta<S: LedgerStore>(
    store: &mut S,
    delegatee: Option<Address>,
    before: u128,
    after: u128,
    kind: GovernancePowerType,
    direction: PowerDirection,
) -> Result<(), GovernanceError> {
    let Some(delegatee) = delegatee else {
        return Ok(());
    };
    let delta = power_delta(before, after);
    if delta == 0 {
        return Ok(());
    }

    let mut record = store.account(&delegatee)?;
    let current = record.delegated_power(kind);
    let updated = match direction {
        PowerDirection::Increase => current
            .checked_add(delta)
            .filter(|power| *power <= MAX_DELEGATED_POWER),
        PowerDirection::Decrease => current.checked_sub(delta),
    };
    let Some(updated) = updated else {
        error!(%delegatee, %kind, %direction, current, delta, "delegated power out of range");
        return Err(GovernanceError::AccountingInconsistency {
            delegatee,
            kind,
            direction,
            current,
            delta,
        });
    };

    record.set_delegated_power(kind, updated);
    store.put_account(&delegatee, record)?;
    debug!(%delegatee, %kind, %direction, delta, updated, "delegated power updated");
    Ok(())
}
