//! Engine configuration with TOML file support.

use quorum_crypto::DomainConfig;
use quorum_types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::GovernanceError;

/// Configuration for a governance engine.
///
/// The four `domain_*`/`chain_id`/`verifying_contract` fields fix the signing
/// domain; wallets producing delegation signatures must use the same values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Human-readable name bound into every signature.
    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    /// Version string bound into every signature.
    #[serde(default = "default_domain_version")]
    pub domain_version: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Address identifying this ledger instance, hex encoded.
    #[serde(default)]
    pub verifying_contract: Address,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_domain_name() -> String {
    "Quorum Governance Token".to_string()
}

fn default_domain_version() -> String {
    "1".to_string()
}

fn default_chain_id() -> u64 {
    1
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// The signing domain described by this configuration.
    pub fn domain(&self) -> DomainConfig {
        DomainConfig {
            name: self.domain_name.clone(),
            version: self.domain_version.clone(),
            chain_id: self.chain_id,
            verifying_contract: self.verifying_contract,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            domain_name: default_domain_name(),
            domain_version: default_domain_version(),
            chain_id: default_chain_id(),
            verifying_contract: Address::ZERO,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
