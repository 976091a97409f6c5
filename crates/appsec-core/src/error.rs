//! Error taxonomy shared by every key store and engine.
//!
//! Cryptographic failures (`AuthenticationFailed`, `DecryptionFailed`) carry no
//! detail so callers cannot be turned into a decryption oracle.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which half of the RSA key pair an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Private,
    Public,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Private => f.write_str("private"),
            KeyRole::Public => f.write_str("public"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid AES key length. Expected {expected} bytes, got {got} bytes")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("RSA {0} key is not loaded")]
    KeyNotLoaded(KeyRole),

    #[error("not a parsable RSA key")]
    UnsupportedKeyType,

    #[error("RSA key failed validation")]
    InvalidKeyMaterial,

    #[error("malformed PEM: {0}")]
    MalformedPem(String),

    #[error("input too short: expected at least {expected} bytes, got {got}")]
    InputTooShort { expected: usize, got: usize },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("message too long: at most {max} bytes allowed, got {got}")]
    MessageTooLong { max: usize, got: usize },

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::InvalidEncoding(err.to_string())
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
