//! Fundamental types for the Quorum governance-power ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, power dimensions and their fixed-point scaling, signatures,
//! private keys, and timestamps.

pub mod address;
pub mod error;
pub mod keys;
pub mod power;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use keys::{PrivateKey, Signature};
pub use power::{
    scaled_power, GovernancePowerType, MAX_BALANCE, MAX_DELEGATED_POWER, POWER_SCALE_FACTOR,
};
pub use time::Timestamp;
