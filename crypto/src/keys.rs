//! secp256k1 key handling.

use crate::address::address_from_public_key;
use crate::error::CryptoError;
use quorum_types::{Address, PrivateKey};

pub(crate) fn secret_key(private: &PrivateKey) -> Result<libsecp256k1::SecretKey, CryptoError> {
    libsecp256k1::SecretKey::parse(&private.0).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Derive the uncompressed public key (`0x04 || x || y`) from a private key.
pub fn public_key_bytes(private: &PrivateKey) -> Result<[u8; 65], CryptoError> {
    let secret = secret_key(private)?;
    Ok(libsecp256k1::PublicKey::from_secret_key(&secret).serialize())
}

/// The address controlled by a private key.
pub fn address_of(private: &PrivateKey) -> Result<Address, CryptoError> {
    public_key_bytes(private).map(|pk| address_from_public_key(&pk))
}
