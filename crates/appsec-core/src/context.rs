//! Owned key state plus the engines that read it.
//!
//! A `CryptoContext` is `Send + Sync`; configure it once at startup, then
//! share it behind an `Arc`. Both stores sit behind reader-writer locks so a
//! late re-initialization never races an in-flight encrypt or decrypt.

use std::path::Path;

use crate::asymmetric::AsymmetricKeyStore;
use crate::error::CryptoResult;
use crate::symmetric::{SymmetricKey, SymmetricKeyStore};
use crate::{gcm, oaep};

#[derive(Debug, Default)]
pub struct CryptoContext {
    symmetric: SymmetricKeyStore,
    asymmetric: AsymmetricKeyStore,
}

impl CryptoContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symmetric(&self) -> &SymmetricKeyStore {
        &self.symmetric
    }

    pub fn asymmetric(&self) -> &AsymmetricKeyStore {
        &self.asymmetric
    }

    /// Set the AES-256 key. Exactly 32 raw bytes.
    pub fn initialize_symmetric_key(&self, key: &[u8]) -> CryptoResult<()> {
        self.symmetric.initialize(key)
    }

    pub fn install_symmetric_key(&self, key: SymmetricKey) {
        self.symmetric.install(key)
    }

    pub fn encrypt_aes_gcm(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        gcm::encrypt(&self.symmetric, plaintext)
    }

    pub fn decrypt_aes_gcm(&self, sealed: &[u8]) -> CryptoResult<Vec<u8>> {
        gcm::decrypt(&self.symmetric, sealed)
    }

    pub fn load_private_key(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        self.asymmetric.load_private_key(path)
    }

    pub fn load_private_key_pem(&self, pem_bytes: &[u8]) -> CryptoResult<()> {
        self.asymmetric.load_private_key_pem(pem_bytes)
    }

    pub fn load_public_key(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        self.asymmetric.load_public_key(path)
    }

    pub fn load_public_key_pem(&self, pem_bytes: &[u8]) -> CryptoResult<()> {
        self.asymmetric.load_public_key_pem(pem_bytes)
    }

    /// RSA-OAEP/SHA-256 encrypt; returns base64.
    pub fn encrypt_oaep(&self, plaintext: &[u8], label: &str) -> CryptoResult<String> {
        oaep::encrypt(&self.asymmetric, plaintext, label)
    }

    pub fn decrypt_oaep(&self, ciphertext: &str, label: &str) -> CryptoResult<Vec<u8>> {
        oaep::decrypt(&self.asymmetric, ciphertext, label)
    }
}
