//! Cryptographic primitives for Quorum.
//!
//! - **secp256k1** recoverable signatures: a signed request names its signer
//!   only implicitly, through the key recovered from the signature
//! - **Keccak-256** for hashing and address derivation
//! - **Typed structured data** digests for signed delegation requests

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;
pub mod typed_data;

pub use address::address_from_public_key;
pub use error::CryptoError;
pub use hash::{keccak256, keccak256_multi};
pub use keys::{address_of, public_key_bytes};
pub use sign::{recover_signer, sign_digest};
pub use typed_data::{
    delegate_by_type_struct_hash, delegate_struct_hash, domain_separator, typed_data_digest,
    DomainConfig, DELEGATE_BY_TYPE_TYPEHASH_INPUT, DELEGATE_TYPEHASH_INPUT,
    EIP712_DOMAIN_TYPEHASH_INPUT,
};
