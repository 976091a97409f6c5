use std::path::Path;

use appsec_core::{
    checksum, compute_hmac, is_matched_hmac, ChecksumAlgorithm, CryptoContext, CryptoError,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

use crate::cli::{AesCommand, HmacCommand, Input, RsaCommand};
use crate::keys::{self, KeySettings};

/// Execute an AES subcommand; returns the line to print.
pub fn handle_aes(cmd: AesCommand, settings: &KeySettings) -> Result<String> {
    let ctx = CryptoContext::new();
    keys::install_aes_key(&ctx, settings)?;

    match cmd {
        AesCommand::Encrypt { input } => {
            let sealed = ctx
                .encrypt_aes_gcm(&read_input(&input)?)
                .map_err(|e| eyre!(e.to_string()))?;
            Ok(STANDARD.encode(sealed))
        }
        AesCommand::Decrypt { sealed, output } => {
            let sealed = STANDARD
                .decode(sealed.trim())
                .map_err(|e| eyre!("sealed message is not base64: {e}"))?;
            let plaintext = ctx
                .decrypt_aes_gcm(&sealed)
                .map_err(|e| eyre!(e.to_string()))?;
            emit_plaintext(plaintext, output.as_deref())
        }
    }
}

/// Execute an RSA subcommand; returns the line to print.
pub fn handle_rsa(cmd: RsaCommand, settings: &KeySettings) -> Result<String> {
    let ctx = CryptoContext::new();

    match cmd {
        RsaCommand::Encrypt { input, label } => {
            keys::load_public_key(&ctx, settings)?;
            ctx.encrypt_oaep(&read_input(&input)?, &label)
                .map_err(|e| eyre!(e.to_string()))
        }
        RsaCommand::Decrypt {
            ciphertext,
            label,
            output,
        } => {
            keys::load_private_key(&ctx, settings)?;
            let plaintext = ctx
                .decrypt_oaep(ciphertext.trim(), &label)
                .map_err(|e| eyre!(e.to_string()))?;
            emit_plaintext(plaintext, output.as_deref())
        }
    }
}

/// Execute an HMAC subcommand. A failed verification is an error.
pub fn handle_hmac(cmd: HmacCommand) -> Result<String> {
    match cmd {
        HmacCommand::Sign {
            message,
            secret,
            algo,
        } => Ok(compute_hmac(algo, &message, &secret)),
        HmacCommand::Verify {
            signature,
            message,
            secret,
            algo,
        } => {
            if is_matched_hmac(algo, &signature, &message, &secret) {
                Ok(format!("{algo}: signature matches"))
            } else {
                color_eyre::eyre::bail!("{algo}: signature does not match")
            }
        }
    }
}

pub fn handle_checksum(input: &Input, algo: ChecksumAlgorithm) -> Result<String> {
    let value = checksum(algo, &read_input(input)?);
    Ok(match algo.width() {
        64 => format!("{algo}: {value:016x}"),
        _ => format!("{algo}: {value:08x}"),
    })
}

fn read_input(input: &Input) -> Result<Vec<u8>> {
    Ok(input.read()?)
}

/// Plaintext goes to `output` byte for byte; printing requires UTF-8.
fn emit_plaintext(plaintext: Vec<u8>, output: Option<&Path>) -> Result<String> {
    match output {
        Some(path) => {
            std::fs::write(path, &plaintext)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            Ok(format!("wrote {} bytes to {}", plaintext.len(), path.display()))
        }
        None => String::from_utf8(plaintext).map_err(|_| {
            eyre!(CryptoError::InvalidEncoding(
                "plaintext is not valid UTF-8; use --output to write raw bytes".to_string()
            ))
        }),
    }
}
