use std::path::PathBuf;

use appsec_core::{CryptoContext, CryptoError};
use appsec_keys::{
    key_files,
    key_provider::{self, EnvKeyProvider, KeyError, DEFAULT_KEY_ENV},
};
use color_eyre::Result;
use tracing::{debug, warn};

use crate::{cli::Cli, config::Config};

/// Where key material comes from, after CLI flags override config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySettings {
    pub private_key: Option<PathBuf>,
    pub certificate: Option<PathBuf>,
    pub aes_key_env: String,
}

impl KeySettings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            private_key: cli
                .private_key
                .clone()
                .or_else(|| config.keys.private_key.clone()),
            certificate: cli
                .certificate
                .clone()
                .or_else(|| config.keys.certificate.clone()),
            aes_key_env: cli
                .aes_key_env
                .clone()
                .or_else(|| config.keys.aes_key_env.clone())
                .unwrap_or_else(|| DEFAULT_KEY_ENV.to_string()),
        }
    }
}

/// Install the AES key named by `settings` into `ctx`.
pub fn install_aes_key(ctx: &CryptoContext, settings: &KeySettings) -> Result<()> {
    let provider = EnvKeyProvider::new(&settings.aes_key_env);
    key_provider::install(&provider, ctx).map_err(|e| color_eyre::eyre::eyre!(e.to_string()))
}

pub fn load_private_key(ctx: &CryptoContext, settings: &KeySettings) -> Result<PathBuf> {
    let path = path_arg(&settings.private_key);
    key_files::load_private_key(ctx, &path).map_err(|e| color_eyre::eyre::eyre!(e.to_string()))
}

/// Load the certificate; when it is simply absent, fall back to the public
/// half of the private key.
pub fn load_public_key(ctx: &CryptoContext, settings: &KeySettings) -> Result<PathBuf> {
    let path = path_arg(&settings.certificate);
    match key_files::load_public_key(ctx, &path) {
        Ok(path) => Ok(path),
        Err(KeyError::Crypto(CryptoError::Io { path, .. })) => {
            warn!(path = %path.display(), "certificate unavailable, using private key");
            load_private_key(ctx, settings)
        }
        Err(err) => Err(color_eyre::eyre::eyre!(err.to_string())),
    }
}

fn path_arg(path: &Option<PathBuf>) -> String {
    let arg = path
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(explicit = !arg.is_empty(), "resolving key file");
    arg
}

#[cfg(test)]
pub mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;
    use crate::config::KeysConfig;

    pub fn testdata(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../appsec-core/testdata")
            .join(name)
    }

    pub fn settings_for(private_key: &str, certificate: &str) -> KeySettings {
        KeySettings {
            private_key: Some(testdata(private_key)),
            certificate: Some(testdata(certificate)),
            aes_key_env: "APPSEC_CLI_TEST_KEY_NEVER_SET".into(),
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::try_parse_from(["appsec", "--private-key", "/cli/app.key", "health"])
            .expect("parse");
        let config = Config {
            keys: KeysConfig {
                private_key: Some(PathBuf::from("/cfg/app.key")),
                certificate: Some(PathBuf::from("/cfg/app.crt")),
                aes_key_env: None,
            },
        };

        let settings = KeySettings::resolve(&cli, &config);
        assert_eq!(settings.private_key, Some(PathBuf::from("/cli/app.key")));
        assert_eq!(settings.certificate, Some(PathBuf::from("/cfg/app.crt")));
        assert_eq!(settings.aes_key_env, DEFAULT_KEY_ENV);
    }

    #[test]
    fn missing_certificate_falls_back_to_private_key() {
        let ctx = CryptoContext::new();
        let settings = settings_for("app.key", "missing.crt");
        let loaded = load_public_key(&ctx, &settings).expect("fallback");
        assert!(loaded.ends_with("app.key"));
        assert!(ctx.asymmetric().has_public_key());
    }

    #[test]
    fn unsupported_certificate_does_not_fall_back() {
        let ctx = CryptoContext::new();
        let settings = settings_for("app.key", "ec.crt");
        assert!(load_public_key(&ctx, &settings).is_err());
        assert!(!ctx.asymmetric().has_private_key());
    }

    #[test]
    fn unset_aes_env_is_reported() {
        let ctx = CryptoContext::new();
        let settings = settings_for("app.key", "app.crt");
        let err = install_aes_key(&ctx, &settings).expect_err("unset env");
        assert!(err.to_string().contains("APPSEC_CLI_TEST_KEY_NEVER_SET"));
    }
}
