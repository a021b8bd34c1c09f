//! Address derivation from secp256k1 public keys.
//!
//! Address = last 20 bytes of Keccak-256 over the 64-byte uncompressed public
//! key (the `0x04` prefix byte is not hashed).

use crate::hash::keccak256;
use quorum_types::Address;

/// Derive the address owning an uncompressed (`0x04 || x || y`) public key.
pub fn address_from_public_key(uncompressed: &[u8; 65]) -> Address {
    let hash = keccak256(&uncompressed[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::new(bytes)
}
