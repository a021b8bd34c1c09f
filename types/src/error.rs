//! Parsing errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature encoding: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("unknown governance power type: {0}")]
    InvalidPowerType(String),
}
