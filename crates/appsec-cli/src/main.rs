mod cli;
mod commands;
mod config;
mod keys;

use appsec_core::CryptoContext;
use clap::Parser;
use color_eyre::Result;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Command, ConfigCommand};
use crate::keys::KeySettings;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    let settings = KeySettings::resolve(&cli, &config);
    match cli.command {
        Command::Version => print_version(),
        Command::Health => run_health_check(&settings)?,
        Command::Config(ConfigCommand::Init) => init_config(&config)?,
        Command::Aes(cmd) => println!("{}", commands::handle_aes(cmd, &settings)?),
        Command::Rsa(cmd) => println!("{}", commands::handle_rsa(cmd, &settings)?),
        Command::Hmac(cmd) => println!("{}", commands::handle_hmac(cmd)?),
        Command::Checksum { input, algo } => {
            println!("{}", commands::handle_checksum(&input, algo)?)
        }
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info; logs go to stderr so
    // ciphertext on stdout stays pipeable.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("appsec {}", env!("CARGO_PKG_VERSION"));
}

/// Round-trips each configured key through its engine.
fn run_health_check(settings: &KeySettings) -> Result<()> {
    let ctx = CryptoContext::new();

    match keys::install_aes_key(&ctx, settings) {
        Ok(()) => {
            check_aes(&ctx)?;
            println!("AES-GCM: ok");
        }
        Err(err) => {
            warn!("AES key unavailable: {err}");
            println!("AES-GCM: not configured");
        }
    }

    match keys::load_private_key(&ctx, settings) {
        Ok(path) => {
            check_oaep(&ctx)?;
            println!("RSA-OAEP: ok ({})", path.display());
        }
        Err(err) => {
            warn!("RSA private key unavailable: {err}");
            println!("RSA-OAEP: not configured");
        }
    }

    if settings.certificate.is_some() || ctx.asymmetric().has_private_key() {
        keys::load_public_key(&ctx, settings)?;
        check_oaep(&ctx)?;
        println!("Certificate: ok");
    }
    Ok(())
}

fn check_aes(ctx: &CryptoContext) -> Result<()> {
    let payload = b"ok";
    let sealed = ctx
        .encrypt_aes_gcm(payload)
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    let round_trip = ctx
        .decrypt_aes_gcm(&sealed)
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    if round_trip != payload {
        color_eyre::eyre::bail!("AES-GCM round-trip failed");
    }
    Ok(())
}

fn check_oaep(ctx: &CryptoContext) -> Result<()> {
    if !ctx.asymmetric().has_private_key() {
        return Ok(());
    }
    let payload = b"ok";
    let ciphertext = ctx
        .encrypt_oaep(payload, "health")
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    let round_trip = ctx
        .decrypt_oaep(&ciphertext, "health")
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    if round_trip != payload {
        color_eyre::eyre::bail!("RSA-OAEP round-trip failed");
    }
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
