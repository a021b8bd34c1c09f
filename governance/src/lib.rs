//! Governance-power delegation for a token ledger.
//!
//! Every holder has two independent powers, voting and proposition. Each can
//! be kept or handed to one delegatee. A delegatee's power is its own balance
//! (unless it delegates that dimension away) plus the scaled balances of
//! everyone delegating to it, kept current on every transfer without
//! rescanning holders.
//!
//! Delegations are made directly by the holder or submitted by anyone with
//! the holder's typed-data signature over a nonce and deadline.

pub mod accountant;
pub mod audit;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod hook;
pub mod meta;
pub mod power;

pub use accountant::{power_delta, PowerDirection};
pub use audit::Discrepancy;
pub use config::EngineConfig;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use events::{EventBus, GovernanceEvent};
pub use meta::{DelegationRequest, DelegationScope};
