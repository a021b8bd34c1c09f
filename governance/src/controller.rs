//! Delegation state transitions, one power dimension at a time.
//!
//! Per `(delegator, kind)` the state is either "not delegating" or
//! "delegating to X". Requests naming the zero address or the delegator itself
//! both land in "not delegating"; a request naming the current state changes
//! nothing and emits nothing.

use crate::accountant::{apply_delta, PowerDirection};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use quorum_store::LedgerStore;
use quorum_types::{Address, GovernancePowerType};
use tracing::{debug, info};

/// Normalize a requested delegatee: zero and self both mean "keep it".
pub fn normalize_delegatee(delegator: &Address, requested: Address) -> Option<Address> {
    requested.non_zero().filter(|target| target != delegator)
}

/// Point `delegator`'s `kind` power at `requested`, moving the delegator's
/// full scaled balance from the old delegatee to the new one.
///
/// Returns the event to emit, or `None` when the request was a no-op.
pub fn set_delegate<S: LedgerStore>(
    store: &mut S,
    delegator: &Address,
    requested: Address,
    kind: GovernancePowerType,
) -> Result<Option<GovernanceEvent>, GovernanceError> {
    if delegator.is_zero() {
        return Err(GovernanceError::InvalidOwner);
    }
    let target = normalize_delegatee(delegator, requested);
    let current = store.delegatee(delegator, kind)?;
    if current == target {
        debug!(%delegator, %kind, "delegatee unchanged");
        return Ok(None);
    }

    let balance = store.account(delegator)?.balance;
    let was_delegating = current.is_some();
    let will_delegate = target.is_some();

    if was_delegating {
        apply_delta(store, current, balance, 0, kind, PowerDirection::Decrease)?;
    }
    store.put_delegatee(delegator, kind, target)?;
    if will_delegate {
        apply_delta(store, target, 0, balance, kind, PowerDirection::Increase)?;
    }
    if was_delegating != will_delegate {
        let mut record = store.account(delegator)?;
        record.set_delegating(kind, will_delegate);
        store.put_account(delegator, record)?;
    }

    info!(
        %delegator,
        %kind,
        from = %Address::from(current),
        to = %Address::from(target),
        "delegate changed"
    );
    Ok(Some(GovernanceEvent::DelegateChanged {
        delegator: *delegator,
        delegatee: target,
        kind,
    }))
}

/// [`set_delegate`] for both dimensions; each half may independently be a no-op.
pub fn set_delegate_all<S: LedgerStore>(
    store: &mut S,
    delegator: &Address,
    requested: Address,
) -> Result<Vec<GovernanceEvent>, GovernanceError> {
    let mut events = Vec::with_capacity(GovernancePowerType::ALL.len());
    for kind in GovernancePowerType::ALL {
        if let Some(event) = set_delegate(store, delegator, requested, kind)? {
            events.push(event);
        }
    }
    Ok(events)
}
