// Rabin Error Types
// Every failure the cryptosystem and its number theory engine can surface

use std::string::FromUtf8Error;

use num_bigint::BigUint;

/// Errors that can occur during Rabin operations
#[derive(Debug, thiserror::Error)]
pub enum RabinError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{value} is not a quadratic residue modulo {modulus}")]
    NotAResidue { value: BigUint, modulus: BigUint },

    #[error("Arithmetic error: {0}")]
    ArithmeticError(String),

    #[error("Message too long for Rabin block: chunk of {chunk_len} bytes leaves {padding_len} padding bytes, need at least {min}")]
    MessageTooLong {
        chunk_len: usize,
        padding_len: usize,
        min: usize,
    },

    #[error("No candidate root of block {block} passed hash verification")]
    DecodingFailure { block: usize },

    #[error("Decrypted message is not valid UTF-8: {0}")]
    EncodingError(#[from] FromUtf8Error),

    #[error("No suitable {bits}-bit prime found after {attempts} attempts")]
    PrimeGenerationFailed { bits: u64, attempts: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RabinError {
    fn from(e: serde_json::Error) -> Self {
        RabinError::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for RabinError {
    fn from(e: hex::FromHexError) -> Self {
        RabinError::Serialization(e.to_string())
    }
}

/// Result type for Rabin operations
pub type Result<T> = std::result::Result<T, RabinError>;
