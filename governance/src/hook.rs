//! Balance-change hook: keeps delegated power in step with every debit and
//! credit.
//!
//! The sender is debited first and its delegatees updated, then the receiver
//! is read afresh and credited. The receiver may itself be one of the sender's
//! delegatees, so its record must not be read before the debit side is done.

use crate::accountant::{apply_delta, PowerDirection};
use crate::error::GovernanceError;
use quorum_store::{AccountRecord, LedgerStore};
use quorum_types::{Address, GovernancePowerType, MAX_BALANCE};
use tracing::debug;

/// Move `amount` from `from` to `to`. A zero `from` mints, a zero `to` burns,
/// and `from == to` changes nothing at all.
///
/// Writes go straight to `store`; run it inside a write batch so that a
/// failed credit does not leave the debit behind.
pub fn on_balance_change<S: LedgerStore>(
    store: &mut S,
    from: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), GovernanceError> {
    if from == to {
        debug!(%from, amount, "self-transfer ignored");
        return Ok(());
    }

    if let Some(sender) = from.non_zero() {
        let mut record = store.account(&sender)?;
        let before = record.balance;
        let after = before
            .checked_sub(amount)
            .ok_or(GovernanceError::InsufficientBalance {
                holder: sender,
                balance: before,
                amount,
            })?;
        record.balance = after;
        store.put_account(&sender, record)?;
        propagate(store, &sender, &record, before, after, PowerDirection::Decrease)?;
    }

    if let Some(receiver) = to.non_zero() {
        let mut record = store.account(&receiver)?;
        let before = record.balance;
        let after = before
            .checked_add(amount)
            .filter(|balance| *balance <= MAX_BALANCE)
            .ok_or(GovernanceError::BalanceOverflow {
                holder: receiver,
                balance: before,
                amount,
            })?;
        record.balance = after;
        store.put_account(&receiver, record)?;
        propagate(store, &receiver, &record, before, after, PowerDirection::Increase)?;
    }

    Ok(())
}

fn propagate<S: LedgerStore>(
    store: &mut S,
    holder: &Address,
    record: &AccountRecord,
    before: u128,
    after: u128,
    direction: PowerDirection,
) -> Result<(), GovernanceError> {
    for kind in GovernancePowerType::ALL {
        if record.is_delegating(kind) {
            let delegatee = store.delegatee(holder, kind)?;
            apply_delta(store, delegatee, before, after, kind, direction)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::set_delegate;
    use quorum_store::{AccountStore, MemoryStore};
    use quorum_types::POWER_SCALE_FACTOR;

    const SCALE: u128 = POWER_SCALE_FACTOR;
    const VOTING: GovernancePowerType = GovernancePowerType::Voting;
    const PROPOSITION: GovernancePowerType = GovernancePowerType::Proposition;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn balance(store: &MemoryStore, who: u8) -> u128 {
        store.account(&addr(who)).unwrap().balance
    }

    fn power(store: &MemoryStore, who: u8, kind: GovernancePowerType) -> u128 {
        store.account(&addr(who)).unwrap().delegated_power(kind)
    }

    #[test]
    fn mint_and_burn_use_zero_address() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), 7).unwrap();
        assert_eq!(balance(&store, 1), 7);
        on_balance_change(&mut store, &addr(1), &Address::ZERO, 3).unwrap();
        assert_eq!(balance(&store, 1), 4);
        assert_eq!(store.account(&Address::ZERO).unwrap(), AccountRecord::default());
    }

    #[test]
    fn insufficient_balance() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), 5).unwrap();
        let err = on_balance_change(&mut store, &addr(1), &addr(2), 6).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InsufficientBalance {
                balance: 5,
                amount: 6,
                ..
            }
        ));
    }

    #[test]
    fn credit_past_104_bits_overflows() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), MAX_BALANCE).unwrap();
        let err = on_balance_change(&mut store, &Address::ZERO, &addr(1), 1).unwrap_err();
        assert!(matches!(err, GovernanceError::BalanceOverflow { .. }));
    }

    #[test]
    fn self_transfer_changes_nothing() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), 5 * SCALE).unwrap();
        set_delegate(&mut store, &addr(1), addr(2), VOTING).unwrap();
        let before = store.clone();

        on_balance_change(&mut store, &addr(1), &addr(1), 3 * SCALE).unwrap();
        on_balance_change(&mut store, &addr(1), &addr(1), 100 * SCALE).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn transfer_between_delegators_of_same_delegatee() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), 5 * SCALE).unwrap();
        set_delegate(&mut store, &addr(1), addr(2), VOTING).unwrap();
        set_delegate(&mut store, &addr(3), addr(2), VOTING).unwrap();
        assert_eq!(power(&store, 2, VOTING), 5);

        on_balance_change(&mut store, &addr(1), &addr(3), 3 * SCALE).unwrap();
        assert_eq!(balance(&store, 1), 2 * SCALE);
        assert_eq!(balance(&store, 3), 3 * SCALE);
        assert_eq!(power(&store, 2, VOTING), 5);
    }

    #[test]
    fn dimensions_follow_their_own_delegatees() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), 4 * SCALE).unwrap();
        set_delegate(&mut store, &addr(1), addr(2), VOTING).unwrap();
        set_delegate(&mut store, &addr(1), addr(3), PROPOSITION).unwrap();

        on_balance_change(&mut store, &addr(1), &addr(9), SCALE).unwrap();
        assert_eq!(power(&store, 2, VOTING), 3);
        assert_eq!(power(&store, 3, PROPOSITION), 3);
        assert_eq!(power(&store, 2, PROPOSITION), 0);
        assert_eq!(power(&store, 3, VOTING), 0);
    }

    #[test]
    fn transfer_to_own_delegatee_keeps_both_sides() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), 5 * SCALE).unwrap();
        set_delegate(&mut store, &addr(1), addr(2), VOTING).unwrap();

        on_balance_change(&mut store, &addr(1), &addr(2), 2 * SCALE).unwrap();
        let delegatee = store.account(&addr(2)).unwrap();
        assert_eq!(delegatee.balance, 2 * SCALE);
        assert_eq!(delegatee.delegated_voting_power, 3);
    }

    #[test]
    fn debit_crossing_scale_boundary_drops_power() {
        let mut store = MemoryStore::new();
        on_balance_change(&mut store, &Address::ZERO, &addr(1), SCALE).unwrap();
        set_delegate(&mut store, &addr(1), addr(2), VOTING).unwrap();
        assert_eq!(power(&store, 2, VOTING), 1);

        // 1.0 -> 0.99...: the holder's contribution drops to zero.
        on_balance_change(&mut store, &addr(1), &addr(4), 1).unwrap();
        assert_eq!(power(&store, 2, VOTING), 0);
    }
}
