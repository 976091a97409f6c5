//! Default key-file locations: `app.key` and `app.crt` beside the running
//! executable, unless the caller names a path.

use std::path::{Path, PathBuf};

use appsec_core::CryptoContext;
use tracing::debug;

use crate::key_provider::KeyError;

pub const DEFAULT_PRIVATE_KEY_FILE: &str = "app.key";
pub const DEFAULT_CERTIFICATE_FILE: &str = "app.crt";

/// Absolute directory containing the current executable.
pub fn executable_dir() -> Result<PathBuf, KeyError> {
    let exe = std::env::current_exe().map_err(|e| KeyError::Locate(e.to_string()))?;
    let exe = std::path::absolute(&exe).map_err(|e| KeyError::Locate(e.to_string()))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| KeyError::Locate(format!("{} has no parent directory", exe.display())))
}

/// An empty (or blank) `path` means `<executable dir>/<default_name>`;
/// anything else is used verbatim.
pub fn resolve_key_path(path: &str, default_name: &str) -> Result<PathBuf, KeyError> {
    if path.trim().is_empty() {
        return Ok(executable_dir()?.join(default_name));
    }
    Ok(PathBuf::from(path))
}

/// Resolve `path` (default `app.key`) and load the RSA private key into `context`.
pub fn load_private_key(context: &CryptoContext, path: &str) -> Result<PathBuf, KeyError> {
    let resolved = resolve_key_path(path, DEFAULT_PRIVATE_KEY_FILE)?;
    debug!(path = %resolved.display(), "loading private key");
    context.load_private_key(&resolved)?;
    Ok(resolved)
}

/// Resolve `path` (default `app.crt`) and load the certificate's public key.
pub fn load_public_key(context: &CryptoContext, path: &str) -> Result<PathBuf, KeyError> {
    let resolved = resolve_key_path(path, DEFAULT_CERTIFICATE_FILE)?;
    debug!(path = %resolved.display(), "loading certificate");
    context.load_public_key(&resolved)?;
    Ok(resolved)
}
