//! Process-wide AES-256 key holder consumed by the GCM engine.

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// AES-256 key size in bytes.
pub const KEY_SIZE: usize = 32;

/// 256-bit symmetric key. Zeroized on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    pub fn from_array(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl TryFrom<&[u8]> for SymmetricKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            got: bytes.len(),
        })?;
        Ok(Self(array))
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Holds at most one active key. Absence is a distinct state, not a zero key.
#[derive(Debug, Default)]
pub struct SymmetricKeyStore {
    key: RwLock<Option<SymmetricKey>>,
}

impl SymmetricKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `key` as the active key. Anything but 32 bytes is rejected and
    /// leaves the current state untouched. A second call replaces the key.
    pub fn initialize(&self, key: &[u8]) -> CryptoResult<()> {
        let key = SymmetricKey::try_from(key)?;
        self.install(key);
        Ok(())
    }

    /// Install an already validated key.
    pub fn install(&self, key: SymmetricKey) {
        let mut guard = self.key.write();
        if guard.is_some() {
            warn!("replacing active AES key");
        } else {
            debug!("AES key initialized");
        }
        *guard = Some(key);
    }

    pub fn is_initialized(&self) -> bool {
        self.key.read().is_some()
    }

    /// Drop the active key, returning the store to its unset state.
    pub fn clear(&self) {
        self.key.write().take();
    }

    /// Run `f` against the active key under the read lock.
    pub(crate) fn with_key<R>(
        &self,
        f: impl FnOnce(&SymmetricKey) -> CryptoResult<R>,
    ) -> CryptoResult<R> {
        let guard = self.key.read();
        match guard.as_ref() {
            Some(key) => f(key),
            None => Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                got: 0,
            }),
        }
    }
}
