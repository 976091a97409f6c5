//! RSA key pair loaded from PEM files.
//!
//! The private key comes from a PKCS#8 `PRIVATE KEY` block, the public key
//! either from that private key or from an X.509 certificate. Loads are
//! all-or-nothing: a failed load leaves the previous pair in place.

use std::fmt;
use std::path::Path;

use parking_lot::RwLock;
use rsa::pkcs1::{RsaPrivateKey as Pkcs1PrivateKey, RsaPublicKey as Pkcs1PublicKey};
use rsa::pkcs8::PrivateKeyInfo;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use tracing::{debug, instrument};
use x509_cert::der::asn1::ObjectIdentifier;
use x509_cert::der::Decode;
use x509_cert::Certificate;

use crate::error::{CryptoError, CryptoResult, KeyRole};

/// rsaEncryption (PKCS #1).
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Largest modulus accepted from a certificate. Private keys are not capped.
pub const MAX_CERTIFICATE_MODULUS_BITS: usize = 16384;

#[derive(Default)]
struct KeyPair {
    private: Option<RsaPrivateKey>,
    public: Option<RsaPublicKey>,
}

#[derive(Default)]
pub struct AsymmetricKeyStore {
    pair: RwLock<KeyPair>,
}

impl AsymmetricKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a PKCS#8 RSA private key from `path`, replacing both halves of the pair.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_private_key(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        let contents = read_file(path.as_ref())?;
        self.load_private_key_pem(&contents)
    }

    /// Load the private key from PEM text already in memory.
    pub fn load_private_key_pem(&self, pem_bytes: &[u8]) -> CryptoResult<()> {
        let private = parse_private_key(pem_bytes)?;
        let public = private.to_public_key();
        debug!(bits = public.n().bits(), "loaded RSA private key");

        let mut pair = self.pair.write();
        pair.private = Some(private);
        pair.public = Some(public);
        Ok(())
    }

    /// Load the RSA public key carried by the X.509 certificate at `path`.
    /// Any private key already loaded is kept as is.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_public_key(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        let contents = read_file(path.as_ref())?;
        self.load_public_key_pem(&contents)
    }

    pub fn load_public_key_pem(&self, pem_bytes: &[u8]) -> CryptoResult<()> {
        let public = parse_certificate_key(pem_bytes)?;
        debug!(bits = public.n().bits(), "loaded RSA public key from certificate");

        self.pair.write().public = Some(public);
        Ok(())
    }

    pub fn has_private_key(&self) -> bool {
        self.pair.read().private.is_some()
    }

    pub fn has_public_key(&self) -> bool {
        self.pair.read().public.is_some()
    }

    /// Modulus size of the loaded public key in bits.
    pub fn modulus_bits(&self) -> Option<usize> {
        self.pair.read().public.as_ref().map(|key| key.n().bits())
    }

    pub(crate) fn with_public_key<R>(
        &self,
        f: impl FnOnce(&RsaPublicKey) -> CryptoResult<R>,
    ) -> CryptoResult<R> {
        let pair = self.pair.read();
        let key = pair
            .public
            .as_ref()
            .ok_or(CryptoError::KeyNotLoaded(KeyRole::Public))?;
        f(key)
    }

    pub(crate) fn with_private_key<R>(
        &self,
        f: impl FnOnce(&RsaPrivateKey) -> CryptoResult<R>,
    ) -> CryptoResult<R> {
        let pair = self.pair.read();
        let key = pair
            .private
            .as_ref()
            .ok_or(CryptoError::KeyNotLoaded(KeyRole::Private))?;
        f(key)
    }
}

impl fmt::Debug for AsymmetricKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pair = self.pair.read();
        f.debug_struct("AsymmetricKeyStore")
            .field("private", &pair.private.is_some())
            .field("public", &pair.public.is_some())
            .finish()
    }
}

fn read_file(path: &Path) -> CryptoResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Contents of the first PEM block in `input`.
fn first_pem_block(input: &[u8]) -> CryptoResult<pem::Pem> {
    pem::parse(input).map_err(|e| CryptoError::MalformedPem(e.to_string()))
}

fn parse_private_key(pem_bytes: &[u8]) -> CryptoResult<RsaPrivateKey> {
    let block = first_pem_block(pem_bytes)?;
    let info = PrivateKeyInfo::from_der(block.contents())
        .map_err(|e| CryptoError::MalformedPem(e.to_string()))?;
    if info.algorithm.oid != RSA_ENCRYPTION_OID {
        return Err(CryptoError::UnsupportedKeyType);
    }

    let pkcs1 = Pkcs1PrivateKey::from_der(info.private_key)
        .map_err(|e| CryptoError::MalformedPem(e.to_string()))?;
    let mut primes = vec![
        BigUint::from_bytes_be(pkcs1.prime1.as_bytes()),
        BigUint::from_bytes_be(pkcs1.prime2.as_bytes()),
    ];
    // Multi-prime keys (PKCS#1 version 1) carry r_3.. here.
    if let Some(others) = &pkcs1.other_prime_infos {
        primes.extend(
            others
                .iter()
                .map(|info| BigUint::from_bytes_be(info.prime.as_bytes())),
        );
    }

    let key = RsaPrivateKey::from_components(
        BigUint::from_bytes_be(pkcs1.modulus.as_bytes()),
        BigUint::from_bytes_be(pkcs1.public_exponent.as_bytes()),
        BigUint::from_bytes_be(pkcs1.private_exponent.as_bytes()),
        primes,
    )
    .map_err(|_| CryptoError::InvalidKeyMaterial)?;

    key.validate().map_err(|_| CryptoError::InvalidKeyMaterial)?;
    Ok(key)
}

fn parse_certificate_key(pem_bytes: &[u8]) -> CryptoResult<RsaPublicKey> {
    let block = first_pem_block(pem_bytes)?;
    let cert = Certificate::from_der(block.contents())
        .map_err(|e| CryptoError::MalformedPem(e.to_string()))?;

    let spki = &cert.tbs_certificate.subject_public_key_info;
    if spki.algorithm.oid != RSA_ENCRYPTION_OID {
        return Err(CryptoError::UnsupportedKeyType);
    }

    let key_bits = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| CryptoError::MalformedPem("public key has unused bits".to_string()))?;
    let pkcs1 = Pkcs1PublicKey::from_der(key_bits)
        .map_err(|e| CryptoError::MalformedPem(e.to_string()))?;
    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(pkcs1.modulus.as_bytes()),
        BigUint::from_bytes_be(pkcs1.public_exponent.as_bytes()),
        MAX_CERTIFICATE_MODULUS_BITS,
    )
    .map_err(|_| CryptoError::InvalidKeyMaterial)
}
