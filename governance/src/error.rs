use crate::accountant::PowerDirection;
use quorum_store::StoreError;
use quorum_types::{Address, GovernancePowerType, Timestamp};
use thiserror::Error;

/// Every variant aborts the enclosing operation; none of its writes persist.
#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("insufficient balance for {holder}: have {balance}, need {amount}")]
    InsufficientBalance {
        holder: Address,
        balance: u128,
        amount: u128,
    },

    #[error("balance of {holder} would exceed 104 bits: {balance} + {amount}")]
    BalanceOverflow {
        holder: Address,
        balance: u128,
        amount: u128,
    },

    #[error("the zero address cannot own or authorize a delegation")]
    InvalidOwner,

    #[error("authorization expired: deadline {deadline}, now {now}")]
    ExpiredAuthorization { deadline: Timestamp, now: Timestamp },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("nonce space exhausted for {0}")]
    NonceExhausted(Address),

    #[error(
        "delegated {kind} power of {delegatee} is inconsistent: cannot {direction} {current} by {delta}"
    )]
    AccountingInconsistency {
        delegatee: Address,
        kind: GovernancePowerType,
        direction: PowerDirection,
        current: u128,
        delta: u128,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger lock poisoned by a panicked operation")]
    LockPoisoned,

    #[error(transparent)]
    Store(#[from] StoreError),
}
