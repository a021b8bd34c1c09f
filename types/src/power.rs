//! Governance power dimensions and the fixed-point scale of delegated power.
//!
//! Balances are stored in 104 bits. Delegated power is stored in 72 bits as
//! `floor(balance / POWER_SCALE_FACTOR)`; the digits below the scale ("dust")
//! never reach a delegatee.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Divisor applied to balances before they count as delegated power.
pub const POWER_SCALE_FACTOR: u128 = 10_000_000_000;

/// Largest balance representable in the 104-bit balance field.
pub const MAX_BALANCE: u128 = (1u128 << 104) - 1;

/// Largest value representable in a 72-bit delegated-power field.
pub const MAX_DELEGATED_POWER: u128 = (1u128 << 72) - 1;

/// The contribution of `balance` to a delegatee's power field.
pub fn scaled_power(balance: u128) -> u128 {
    balance / POWER_SCALE_FACTOR
}

/// One of the two independent delegation axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernancePowerType {
    Voting,
    Proposition,
}

impl GovernancePowerType {
    pub const ALL: [Self; 2] = [Self::Voting, Self::Proposition];

    /// Wire encoding used in signed delegation requests.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Voting => 0,
            Self::Proposition => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Voting),
            1 => Some(Self::Proposition),
            _ => None,
        }
    }
}

impl fmt::Display for GovernancePowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voting => write!(f, "voting"),
            Self::Proposition => write!(f, "proposition"),
        }
    }
}

impl FromStr for GovernancePowerType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "voting" | "0" => Ok(Self::Voting),
            "proposition" | "1" => Ok(Self::Proposition),
            _ => Err(TypesError::InvalidPowerType(s.to_string())),
        }
    }
}
