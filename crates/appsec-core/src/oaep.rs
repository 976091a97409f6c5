//! RSA-OAEP with SHA-256 (hash and MGF1) over the asymmetric key store.
//!
//! Ciphertexts travel as standard base64. The label is agreed out of band and
//! must match on both sides; a mismatch reports the same `DecryptionFailed`
//! as a corrupt ciphertext.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::asymmetric::AsymmetricKeyStore;
use crate::error::{CryptoError, CryptoResult};

/// SHA-256 digest length.
const HASH_LEN: usize = 32;

/// Largest plaintext OAEP/SHA-256 can carry for a modulus of `modulus_len` bytes.
pub fn max_plaintext_len(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(2 * HASH_LEN + 2)
}

/// Encrypt with the loaded public key; returns base64 ciphertext.
pub fn encrypt(store: &AsymmetricKeyStore, plaintext: &[u8], label: &str) -> CryptoResult<String> {
    store.with_public_key(|key| {
        let ciphertext = encrypt_with(key, plaintext, label)?;
        Ok(STANDARD.encode(ciphertext))
    })
}

/// Decrypt base64 ciphertext with the loaded private key.
pub fn decrypt(store: &AsymmetricKeyStore, ciphertext: &str, label: &str) -> CryptoResult<Vec<u8>> {
    store.with_private_key(|key| {
        let raw = STANDARD.decode(ciphertext)?;
        decrypt_with(key, &raw, label)
    })
}

pub fn encrypt_str(store: &AsymmetricKeyStore, secret: &str, label: &str) -> CryptoResult<String> {
    encrypt(store, secret.as_bytes(), label)
}

/// Like [`decrypt`], but the recovered plaintext must be UTF-8.
pub fn decrypt_to_string(
    store: &AsymmetricKeyStore,
    ciphertext: &str,
    label: &str,
) -> CryptoResult<String> {
    let plaintext = decrypt(store, ciphertext, label)?;
    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::InvalidEncoding("plaintext is not valid UTF-8".to_string()))
}

fn encrypt_with(key: &RsaPublicKey, plaintext: &[u8], label: &str) -> CryptoResult<Vec<u8>> {
    let max = max_plaintext_len(key.size());
    if plaintext.len() > max {
        return Err(CryptoError::MessageTooLong {
            max,
            got: plaintext.len(),
        });
    }

    let padding = Oaep::new_with_label::<Sha256, _>(label);
    key.encrypt(&mut OsRng, padding, plaintext)
        .map_err(|e| match e {
            rsa::Error::MessageTooLong => CryptoError::MessageTooLong {
                max,
                got: plaintext.len(),
            },
            other => CryptoError::EncryptionFailed(other.to_string()),
        })
}

fn decrypt_with(key: &RsaPrivateKey, ciphertext: &[u8], label: &str) -> CryptoResult<Vec<u8>> {
    let padding = Oaep::new_with_label::<Sha256, _>(label);
    key.decrypt_blinded(&mut OsRng, padding, ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}
