//! Full-scan consistency check of an in-memory ledger.
//!
//! The engine never rescans holders while running; this is for operators and
//! tests. It recomputes every delegatee's power from scratch and reports where
//! the stored fields disagree.

use quorum_store::{AccountStore, MemoryStore, StoreError};
use quorum_types::{scaled_power, Address, GovernancePowerType};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Discrepancy {
    /// Stored delegated power differs from the sum over current delegators.
    PowerMismatch {
        delegatee: Address,
        kind: GovernancePowerType,
        recorded: u128,
        expected: u128,
    },
    /// The delegating flag disagrees with the delegatee mapping.
    FlagMismatch {
        holder: Address,
        kind: GovernancePowerType,
        flagged: bool,
        delegatee: Option<Address>,
    },
    /// An address is recorded as its own delegatee.
    SelfDelegation {
        holder: Address,
        kind: GovernancePowerType,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerMismatch {
                delegatee,
                kind,
                recorded,
                expected,
            } => write!(
                f,
                "{delegatee}: {kind} power recorded {recorded}, delegators sum to {expected}"
            ),
            Self::FlagMismatch {
                holder,
                kind,
                flagged,
                delegatee,
            } => write!(
                f,
                "{holder}: {kind} flag {flagged} but delegatee {}",
                Address::from(*delegatee)
            ),
            Self::SelfDelegation { holder, kind } => {
                write!(f, "{holder}: delegates {kind} to itself")
            }
        }
    }
}

/// Check every delegatee's power and every holder's flags.
pub fn audit(store: &MemoryStore) -> Result<Vec<Discrepancy>, StoreError> {
    let mut found = Vec::new();
    for kind in GovernancePowerType::ALL {
        let mut expected: BTreeMap<Address, u128> = BTreeMap::new();
        let mut mapped: BTreeSet<Address> = BTreeSet::new();

        for (delegator, delegatee) in store.delegations(kind) {
            mapped.insert(*delegator);
            if delegator == delegatee {
                found.push(Discrepancy::SelfDelegation {
                    holder: *delegator,
                    kind,
                });
            }
            let record = store.account(delegator)?;
            let sum = expected.entry(*delegatee).or_default();
            *sum = sum.saturating_add(scaled_power(record.balance));
            if !record.is_delegating(kind) {
                found.push(Discrepancy::FlagMismatch {
                    holder: *delegator,
                    kind,
                    flagged: false,
                    delegatee: Some(*delegatee),
                });
            }
        }

        for (holder, record) in store.accounts() {
            if record.is_delegating(kind) && !mapped.contains(holder) {
                found.push(Discrepancy::FlagMismatch {
                    holder: *holder,
                    kind,
                    flagged: true,
                    delegatee: None,
                });
            }
            if record.delegated_power(kind) > 0 {
                expected.entry(*holder).or_default();
            }
        }

        for (delegatee, expected) in expected {
            let recorded = store.account(&delegatee)?.delegated_power(kind);
            if recorded != expected {
                found.push(Discrepancy::PowerMismatch {
                    delegatee,
                    kind,
                    recorded,
                    expected,
                });
            }
        }
    }
    Ok(found)
}
