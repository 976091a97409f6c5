//! Boundary layer around `appsec-core`: where key material comes from.
//! AES keys come from a [`key_provider::KeyProvider`]; RSA key files follow
//! the executable-relative default convention in [`key_files`].

pub mod key_files;
pub mod key_provider;

pub use key_provider::{install, EnvKeyProvider, InMemoryKeyProvider, KeyError, KeyProvider};
