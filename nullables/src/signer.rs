//! Nullable signer: a wallet with a fixed key for signing delegation
//! requests in tests.

use quorum_crypto::{
    address_of, delegate_by_type_struct_hash, delegate_struct_hash, sign_digest,
    typed_data_digest, CryptoError,
};
use quorum_types::{Address, GovernancePowerType, PrivateKey, Signature, Timestamp};

/// Signs typed delegation requests with a key derived from a one-byte seed.
///
/// Different seeds give different, stable addresses.
pub struct NullSigner {
    key: PrivateKey,
    address: Address,
}

impl NullSigner {
    /// Key bytes are `seed` repeated; seed 0 is not a valid key.
    pub fn from_seed(seed: u8) -> Result<Self, CryptoError> {
        Self::from_key(PrivateKey([seed; 32]))
    }

    pub fn from_key(key: PrivateKey) -> Result<Self, CryptoError> {
        let address = address_of(&key)?;
        Ok(Self { key, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a single-dimension delegation as this signer.
    pub fn sign_delegate_by_type(
        &self,
        domain_separator: &[u8; 32],
        delegatee: &Address,
        kind: GovernancePowerType,
        nonce: u64,
        deadline: Timestamp,
    ) -> Result<Signature, CryptoError> {
        let struct_hash =
            delegate_by_type_struct_hash(&self.address, delegatee, kind, nonce, deadline);
        sign_digest(&typed_data_digest(domain_separator, &struct_hash), &self.key)
    }

    /// Sign a both-dimensions delegation as this signer.
    pub fn sign_delegate(
        &self,
        domain_separator: &[u8; 32],
        delegatee: &Address,
        nonce: u64,
        deadline: Timestamp,
    ) -> Result<Signature, CryptoError> {
        let struct_hash = delegate_struct_hash(&self.address, delegatee, nonce, deadline);
        sign_digest(&typed_data_digest(domain_separator, &struct_hash), &self.key)
    }
}
