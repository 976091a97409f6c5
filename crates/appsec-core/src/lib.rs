//! Application-level cryptography: AES-256-GCM with a process-wide key,
//! RSA-OAEP with PEM key files, HMAC signatures, and checksums.
//! Key generation, rotation and storage are left to the caller.

pub mod asymmetric;
pub mod checksum;
pub mod context;
pub mod error;
pub mod gcm;
pub mod mac;
pub mod oaep;
pub mod symmetric;

pub use asymmetric::AsymmetricKeyStore;
pub use checksum::{
    adler32, checksum, crc32_castagnoli, crc32_ieee, crc32_koopman, crc64_ecma, crc64_iso,
    ChecksumAlgorithm,
};
pub use context::CryptoContext;
pub use error::{CryptoError, CryptoResult, KeyRole};
pub use mac::{
    compute_hmac, compute_hmac256, compute_hmac512, is_matched_hmac, is_matched_hmac256,
    is_matched_hmac512, MacAlgorithm,
};
pub use symmetric::{SymmetricKey, SymmetricKeyStore, KEY_SIZE};
