//! Errors raised by signing and recovery.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("private key is zero or not below the curve order")]
    InvalidPrivateKey,

    #[error("recovery id must be 27 or 28, got {0}")]
    InvalidRecoveryId(u8),

    #[error("signature r/s components are out of range")]
    MalformedSignature,

    #[error("no public key recovers from this signature")]
    RecoveryFailed,
}
