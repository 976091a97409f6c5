use std::path::PathBuf;

use appsec_core::{ChecksumAlgorithm, MacAlgorithm};
use clap::{Args, Parser, Subcommand};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "appsec",
    about = "Application security toolkit: AES-GCM, RSA-OAEP, HMAC and checksums",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Private key PEM (PKCS#8). Defaults to config, then `app.key` beside the binary.
    #[arg(long, global = true)]
    pub private_key: Option<PathBuf>,

    /// Certificate PEM carrying the RSA public key. Defaults to config, then `app.crt`.
    #[arg(long, global = true)]
    pub certificate: Option<PathBuf>,

    /// Environment variable holding the base64 or hex AES-256 key.
    #[arg(long, global = true)]
    pub aes_key_env: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print version and exit.
    Version,
    /// Round-trip every configured key through its engine.
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// AES-256-GCM with the configured key (sealed messages are shown as base64).
    #[command(subcommand)]
    Aes(AesCommand),
    /// RSA-OAEP (SHA-256) with the configured key files.
    #[command(subcommand)]
    Rsa(RsaCommand),
    /// HMAC signatures.
    #[command(subcommand)]
    Hmac(HmacCommand),
    /// Checksum of a file or literal text.
    Checksum {
        #[command(flatten)]
        input: Input,
        /// crc32-ieee, crc32-castagnoli, crc32-koopman, adler32, crc64-iso or crc64-ecma.
        #[arg(long, short, default_value = "crc32-ieee")]
        algo: ChecksumAlgorithm,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AesCommand {
    /// Seal plaintext; prints base64 of nonce || ciphertext || tag.
    Encrypt {
        #[command(flatten)]
        input: Input,
    },
    /// Open a base64 sealed message.
    Decrypt {
        /// Base64 sealed message.
        sealed: String,
        /// Write the raw plaintext to this file instead of printing it.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RsaCommand {
    /// Encrypt with the certificate (or private key) public half; prints base64.
    Encrypt {
        #[command(flatten)]
        input: Input,
        #[arg(long, short, default_value = "")]
        label: String,
    },
    /// Decrypt base64 ciphertext with the private key.
    Decrypt {
        ciphertext: String,
        #[arg(long, short, default_value = "")]
        label: String,
        /// Write the raw plaintext to this file instead of printing it.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HmacCommand {
    /// Print the base64 signature of a message.
    Sign {
        message: String,
        #[arg(long, short)]
        secret: String,
        #[arg(long, short, default_value = "HMAC256")]
        algo: MacAlgorithm,
    },
    /// Exit non-zero unless the signature matches.
    Verify {
        signature: String,
        message: String,
        #[arg(long, short)]
        secret: String,
        #[arg(long, short, default_value = "HMAC256")]
        algo: MacAlgorithm,
    },
}

/// Literal text or a file path; exactly one.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct Input {
    /// Literal text input.
    #[arg(long, short)]
    pub text: Option<String>,
    /// Read input bytes from a file.
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

impl Input {
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone().into_bytes()),
            (None, Some(path)) => std::fs::read(path),
            (None, None) => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_health_subcommand() {
        let cli = Cli::try_parse_from(["appsec", "health"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Health);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["appsec"]).is_err());
    }

    #[test]
    fn parses_config_init_subcommand() {
        let cli = Cli::try_parse_from(["appsec", "config", "init"]).expect("parse should succeed");
        assert_eq!(cli.command, Command::Config(ConfigCommand::Init));
    }

    #[test]
    fn parses_rsa_encrypt_with_label_and_global_key_flags() {
        let cli = Cli::try_parse_from([
            "appsec",
            "rsa",
            "encrypt",
            "--text",
            "secret",
            "--label",
            "orders",
            "--certificate",
            "/etc/appsec/app.crt",
        ])
        .expect("parse should succeed");
        assert_eq!(
            cli.certificate.as_deref(),
            Some(std::path::Path::new("/etc/appsec/app.crt"))
        );
        assert_eq!(
            cli.command,
            Command::Rsa(RsaCommand::Encrypt {
                input: Input {
                    text: Some("secret".into()),
                    file: None,
                },
                label: "orders".into(),
            })
        );
    }

    #[test]
    fn parses_checksum_algorithm() {
        let cli = Cli::try_parse_from(["appsec", "checksum", "-t", "123456789", "-a", "crc64-ecma"])
            .expect("parse should succeed");
        assert!(matches!(
            cli.command,
            Command::Checksum {
                algo: ChecksumAlgorithm::Crc64Ecma,
                ..
            }
        ));
    }

    #[test]
    fn rejects_text_and_file_together() {
        let parsed = Cli::try_parse_from([
            "appsec", "aes", "encrypt", "--text", "a", "--file", "b.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_hmac_verify() {
        let cli = Cli::try_parse_from([
            "appsec", "hmac", "verify", "sig", "msg", "--secret", "k", "--algo", "HMAC512",
        ])
        .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Command::Hmac(HmacCommand::Verify {
                signature: "sig".into(),
                message: "msg".into(),
                secret: "k".into(),
                algo: MacAlgorithm::Hmac512,
            })
        );
    }
}
