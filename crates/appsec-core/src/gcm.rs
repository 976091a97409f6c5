//! AES-256-GCM sealing with the store's key.
//!
//! Wire format: `[nonce: 12][ciphertext][tag: 16]`, no associated data.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use crate::error::{CryptoError, CryptoResult};
use crate::symmetric::{SymmetricKey, SymmetricKeyStore};

pub const NONCE_SIZE: usize = 12;
pub const TAG_SIZE: usize = 16;

/// Encrypt `plaintext` under the active key with a fresh random nonce.
///
/// Returns `nonce || ciphertext || tag`.
pub fn encrypt(store: &SymmetricKeyStore, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    store.with_key(|key| {
        let cipher = build_cipher(key)?;
        let nonce = generate_nonce()?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    })
}

/// Authenticate and decrypt a sealed message produced by [`encrypt`].
///
/// Either the whole plaintext comes back or `AuthenticationFailed`; a wrong
/// key and a tampered message are indistinguishable.
pub fn decrypt(store: &SymmetricKeyStore, sealed: &[u8]) -> CryptoResult<Vec<u8>> {
    store.with_key(|key| {
        let cipher = build_cipher(key)?;
        let (nonce, ciphertext) = split_sealed(sealed)?;
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    })
}

/// Split a sealed message into `(nonce, ciphertext || tag)`.
pub fn split_sealed(sealed: &[u8]) -> CryptoResult<(&[u8], &[u8])> {
    if sealed.len() < NONCE_SIZE {
        return Err(CryptoError::InputTooShort {
            expected: NONCE_SIZE,
            got: sealed.len(),
        });
    }
    Ok(sealed.split_at(NONCE_SIZE))
}

fn build_cipher(key: &SymmetricKey) -> CryptoResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::InvalidKeyLength {
        expected: crate::symmetric::KEY_SIZE,
        got: key.as_bytes().len(),
    })
}

fn generate_nonce() -> CryptoResult<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
    Ok(nonce)
}
