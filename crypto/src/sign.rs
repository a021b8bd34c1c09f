//! Recoverable secp256k1 signing over 32-byte digests.

use crate::address::address_from_public_key;
use crate::error::CryptoError;
use crate::keys::secret_key;
use quorum_types::{Address, PrivateKey, Signature};

/// Offset added to the raw recovery id in the `v` byte.
const RECOVERY_ID_OFFSET: u8 = 27;

/// Sign a 32-byte digest, returning a `(v, r, s)` signature with `v` in {27, 28}.
pub fn sign_digest(digest: &[u8; 32], private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let secret = secret_key(private_key)?;
    let message = libsecp256k1::Message::parse(digest);
    let (sig, recovery_id) = libsecp256k1::sign(&message, &secret);
    let compact = sig.serialize();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);
    Ok(Signature {
        v: recovery_id.serialize() + RECOVERY_ID_OFFSET,
        r,
        s,
    })
}

/// Recover the address whose key produced `signature` over `digest`.
///
/// A signature that recovers to *some* key always yields an address; callers
/// compare it against the expected signer.
pub fn recover_signer(digest: &[u8; 32], signature: &Signature) -> Result<Address, CryptoError> {
    let raw_id = match signature.v {
        27 | 28 => signature.v - RECOVERY_ID_OFFSET,
        other => return Err(CryptoError::InvalidRecoveryId(other)),
    };
    let recovery_id = libsecp256k1::RecoveryId::parse(raw_id)
        .map_err(|_| CryptoError::InvalidRecoveryId(signature.v))?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&signature.r);
    compact[32..].copy_from_slice(&signature.s);
    let sig = libsecp256k1::Signature::parse_standard(&compact)
        .map_err(|_| CryptoError::MalformedSignature)?;

    let message = libsecp256k1::Message::parse(digest);
    let public = libsecp256k1::recover(&message, &sig, &recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(address_from_public_key(&public.serialize()))
}
