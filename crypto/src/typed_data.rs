//! Typed structured-data digests for signed delegation requests.
//!
//! The layout matches the EIP-712 scheme, so any wallet able to sign typed
//! data can authorize a delegation:
//!
//! ```text
//! digest = keccak256(0x19 0x01 || domain_separator || struct_hash)
//! ```
//!
//! Every struct field is encoded as one 32-byte big-endian word.

use crate::hash::{keccak256, keccak256_multi};
use quorum_types::{Address, GovernancePowerType, Timestamp};

pub const EIP712_DOMAIN_TYPEHASH_INPUT: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const DELEGATE_BY_TYPE_TYPEHASH_INPUT: &str =
    "DelegateByType(address delegator,address delegatee,uint8 delegationType,uint256 nonce,uint256 deadline)";

pub const DELEGATE_TYPEHASH_INPUT: &str =
    "Delegate(address delegator,address delegatee,uint256 nonce,uint256 deadline)";

/// Identity the signatures are bound to. Signer and verifier must agree on
/// every field, otherwise recovery yields an unrelated address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn u8_word(value: u8) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[31] = value;
    word
}

/// Hash of the signing domain.
pub fn domain_separator(domain: &DomainConfig) -> [u8; 32] {
    keccak256_multi(&[
        &keccak256(EIP712_DOMAIN_TYPEHASH_INPUT.as_bytes()),
        &keccak256(domain.name.as_bytes()),
        &keccak256(domain.version.as_bytes()),
        &u64_word(domain.chain_id),
        &domain.verifying_contract.to_word(),
    ])
}

/// Struct hash of a single-dimension delegation request.
pub fn delegate_by_type_struct_hash(
    delegator: &Address,
    delegatee: &Address,
    kind: GovernancePowerType,
    nonce: u64,
    deadline: Timestamp,
) -> [u8; 32] {
    keccak256_multi(&[
        &keccak256(DELEGATE_BY_TYPE_TYPEHASH_INPUT.as_bytes()),
        &delegator.to_word(),
        &delegatee.to_word(),
        &u8_word(kind.as_u8()),
        &u64_word(nonce),
        &u64_word(deadline.as_secs()),
    ])
}

/// Struct hash of a both-dimensions delegation request.
pub fn delegate_struct_hash(
    delegator: &Address,
    delegatee: &Address,
    nonce: u64,
    deadline: Timestamp,
) -> [u8; 32] {
    keccak256_multi(&[
        &keccak256(DELEGATE_TYPEHASH_INPUT.as_bytes()),
        &delegator.to_word(),
        &delegatee.to_word(),
        &u64_word(nonce),
        &u64_word(deadline.as_secs()),
    ])
}

/// Final digest that is signed and recovered.
pub fn typed_data_digest(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    keccak256_multi(&[&[0x19, 0x01], domain_separator, struct_hash])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> DomainConfig {
        DomainConfig {
            name: "Quorum Governance Token".to_string(),
            version: "1".to_string(),
            chain_id: 1,
            verifying_contract: Address::new([0xAA; 20]),
        }
    }

    #[test]
    fn domain_typehash_matches_known_value() {
        assert_eq!(
            hex::encode(keccak256(EIP712_DOMAIN_TYPEHASH_INPUT.as_bytes())),
            "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f"
        );
    }

    #[test]
    fn separator_binds_every_domain_field() {
        let base = domain_separator(&domain());

        let mut other = domain();
        other.chain_id = 5;
        assert_ne!(domain_separator(&other), base);

        let mut other = domain();
        other.version = "2".to_string();
        assert_ne!(domain_separator(&other), base);

        let mut other = domain();
        other.verifying_contract = Address::ZERO;
        assert_ne!(domain_separator(&other), base);
    }

    #[test]
    fn by_type_hash_depends_on_dimension_and_nonce() {
        let a = Address::new([1; 20]);
        let b = Address::new([2; 20]);
        let deadline = Timestamp::new(1_000);
        let voting = delegate_by_type_struct_hash(&a, &b, GovernancePowerType::Voting, 0, deadline);
        let proposition =
            delegate_by_type_struct_hash(&a, &b, GovernancePowerType::Proposition, 0, deadline);
        let next_nonce =
            delegate_by_type_struct_hash(&a, &b, GovernancePowerType::Voting, 1, deadline);
        assert_ne!(voting, proposition);
        assert_ne!(voting, next_nonce);
    }

    #[test]
    fn combined_and_by_type_tags_differ() {
        let a = Address::new([1; 20]);
        let b = Address::new([2; 20]);
        let deadline = Timestamp::new(1_000);
        assert_ne!(
            delegate_struct_hash(&a, &b, 0, deadline),
            delegate_by_type_struct_hash(&a, &b, GovernancePowerType::Voting, 0, deadline)
        );
    }

    #[test]
    fn digest_is_prefixed_hash() {
        let sep = [3u8; 32];
        let sh = [4u8; 32];
        let mut buf = vec![0x19, 0x01];
        buf.extend_from_slice(&sep);
        buf.extend_from_slice(&sh);
        assert_eq!(typed_data_digest(&sep, &sh), keccak256(&buf));
    }
}
