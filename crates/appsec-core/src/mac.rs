//! HMAC-SHA256/512 signatures rendered as standard base64.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacAlgorithm {
    Hmac256,
    Hmac512,
}

impl MacAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacAlgorithm::Hmac256 => "HMAC256",
            MacAlgorithm::Hmac512 => "HMAC512",
        }
    }
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MacAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "HMAC256" | "HMACSHA256" | "256" => Ok(MacAlgorithm::Hmac256),
            "HMAC512" | "HMACSHA512" | "512" => Ok(MacAlgorithm::Hmac512),
            _ => Err(format!("unknown MAC algorithm: {s}")),
        }
    }
}

/// Compute the base64 HMAC of `message` keyed by `secret`.
pub fn compute_hmac(algorithm: MacAlgorithm, message: &str, secret: &str) -> String {
    STANDARD.encode(raw_mac(algorithm, message.as_bytes(), secret.as_bytes()))
}

pub fn compute_hmac256(message: &str, secret: &str) -> String {
    compute_hmac(MacAlgorithm::Hmac256, message, secret)
}

pub fn compute_hmac512(message: &str, secret: &str) -> String {
    compute_hmac(MacAlgorithm::Hmac512, message, secret)
}

/// Check a base64 `signature` against a fresh HMAC of `message`.
///
/// The tag comparison is constant time. A signature that is not valid base64
/// never matches.
pub fn is_matched_hmac(
    algorithm: MacAlgorithm,
    signature: &str,
    message: &str,
    secret: &str,
) -> bool {
    let Ok(tag) = STANDARD.decode(signature) else {
        return false;
    };
    let (message, secret) = (message.as_bytes(), secret.as_bytes());
    match algorithm {
        MacAlgorithm::Hmac256 => keyed::<HmacSha256>(secret, message)
            .verify_slice(&tag)
            .is_ok(),
        MacAlgorithm::Hmac512 => keyed::<HmacSha512>(secret, message)
            .verify_slice(&tag)
            .is_ok(),
    }
}

pub fn is_matched_hmac256(signature: &str, message: &str, secret: &str) -> bool {
    is_matched_hmac(MacAlgorithm::Hmac256, signature, message, secret)
}

pub fn is_matched_hmac512(signature: &str, message: &str, secret: &str) -> bool {
    is_matched_hmac(MacAlgorithm::Hmac512, signature, message, secret)
}

fn raw_mac(algorithm: MacAlgorithm, message: &[u8], secret: &[u8]) -> Vec<u8> {
    match algorithm {
        MacAlgorithm::Hmac256 => keyed::<HmacSha256>(secret, message)
            .finalize()
            .into_bytes()
            .to_vec(),
        MacAlgorithm::Hmac512 => keyed::<HmacSha512>(secret, message)
            .finalize()
            .into_bytes()
            .to_vec(),
    }
}

fn keyed<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> M {
    let mut mac = <M as Mac>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2.
    const KEY: &str = "Jefe";
    const DATA: &str = "what do ya want for nothing?";

    #[test]
    fn matches_rfc4231_vectors() {
        assert_eq!(
            compute_hmac256(DATA, KEY),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM="
        );
        assert_eq!(
            compute_hmac512(DATA, KEY),
            "Fkt6e/z4GeLjlfvnO1bgo4e9ZCIugx/WECcM1+olBVSXWL91wFqZSm0DT2X48Ob9yuqxo01Ka0tjbgcKOLznNw=="
        );
    }

    #[test]
    fn computed_signature_verifies() {
        for (message, secret) in [("", ""), ("payload", "k"), (DATA, KEY)] {
            assert!(is_matched_hmac256(
                &compute_hmac256(message, secret),
                message,
                secret
            ));
            assert!(is_matched_hmac512(
                &compute_hmac512(message, secret),
                message,
                secret
            ));
        }
    }

    #[test]
    fn altered_message_or_secret_does_not_match() {
        let signature = compute_hmac256("amount=10", "secret");
        assert!(!is_matched_hmac256(&signature, "amount=11", "secret"));
        assert!(!is_matched_hmac256(&signature, "amount=10", "secreT"));

        let signature = compute_hmac512("amount=10", "secret");
        assert!(!is_matched_hmac512(&signature, "amount=11", "secret"));
        assert!(!is_matched_hmac512(&signature, "amount=10", "other"));
    }

    #[test]
    fn algorithms_are_not_interchangeable() {
        let signature = compute_hmac256("m", "s");
        assert!(!is_matched_hmac512(&signature, "m", "s"));
    }

    #[test]
    fn undecodable_signature_never_matches() {
        assert!(!is_matched_hmac256("%%%", "m", "s"));
        assert!(!is_matched_hmac512("", "m", "s"));
    }

    #[test]
    fn long_secrets_are_accepted() {
        let secret = "k".repeat(500);
        let signature = compute_hmac512("m", &secret);
        assert!(is_matched_hmac(MacAlgorithm::Hmac512, &signature, "m", &secret));
    }

    #[test]
    fn algorithm_names_round_trip() {
        for algo in [MacAlgorithm::Hmac256, MacAlgorithm::Hmac512] {
            assert_eq!(algo.to_string().parse::<MacAlgorithm>(), Ok(algo));
        }
        assert_eq!(
            "hmac-sha256".parse::<MacAlgorithm>(),
            Ok(MacAlgorithm::Hmac256)
        );
        assert!("md5".parse::<MacAlgorithm>().is_err());
    }
}
