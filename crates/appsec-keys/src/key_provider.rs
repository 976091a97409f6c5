use std::sync::Arc;

use appsec_core::{CryptoContext, CryptoError, SymmetricKey, KEY_SIZE};
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Environment variable read by [`EnvKeyProvider::default`].
pub const DEFAULT_KEY_ENV: &str = "APPSEC_AES_KEY";

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key source {0} is not set")]
    Missing(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("cannot locate key file: {0}")]
    Locate(String),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Supplies raw AES key material to a [`CryptoContext`] (environment in
/// production; memory in tests).
pub trait KeyProvider: Send + Sync {
    fn symmetric_key(&self) -> Result<SymmetricKey, KeyError>;
}

/// Fetch the key from `provider` and make it the context's active AES key.
pub fn install(provider: &dyn KeyProvider, context: &CryptoContext) -> Result<(), KeyError> {
    let key = provider.symmetric_key()?;
    context.install_symmetric_key(key);
    Ok(())
}

/// Reads a base64 (standard) or 64-character hex key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvKeyProvider {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_ENV)
    }
}

impl KeyProvider for EnvKeyProvider {
    fn symmetric_key(&self) -> Result<SymmetricKey, KeyError> {
        let encoded = Zeroizing::new(
            std::env::var(&self.var).map_err(|_| KeyError::Missing(self.var.clone()))?,
        );
        debug!(var = %self.var, "reading AES key from environment");
        decode_key(encoded.trim())
    }
}

/// Fixed key held in memory, for tests and embedding.
#[derive(Clone)]
pub struct InMemoryKeyProvider {
    key: Arc<SymmetricKey>,
}

impl InMemoryKeyProvider {
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self {
            key: Arc::new(SymmetricKey::from_array(bytes)),
        }
    }
}

impl KeyProvider for InMemoryKeyProvider {
    fn symmetric_key(&self) -> Result<SymmetricKey, KeyError> {
        Ok(self.key.as_ref().clone())
    }
}

/// Decode a textual key: 64 hex characters, else standard base64.
pub fn decode_key(encoded: &str) -> Result<SymmetricKey, KeyError> {
    let bytes = Zeroizing::new(
        if encoded.len() == KEY_SIZE * 2 && encoded.bytes().all(|b| b.is_ascii_hexdigit()) {
            hex::decode(encoded).map_err(|e| KeyError::Decode(e.to_string()))?
        } else {
            general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| KeyError::Decode(e.to_string()))?
        },
    );

    Ok(SymmetricKey::try_from(bytes.as_slice())?)
}

/// Standard base64 rendering of raw key bytes, as accepted by [`decode_key`].
pub fn encode_key(bytes: &[u8; KEY_SIZE]) -> String {
    general_purpose::STANDARD.encode(bytes)
}
