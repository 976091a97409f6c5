//! Non-cryptographic checksums with the same tables as Go's `hash/crc32`,
//! `hash/crc64` and `hash/adler32`.

use std::fmt;
use std::str::FromStr;

use crc::{Algorithm, Crc, CRC_32_ISCSI, CRC_32_ISO_HDLC, CRC_64_GO_ISO, CRC_64_XZ};

/// Koopman polynomial in the reflected IEEE layout (init and xorout `!0`).
const CRC_32_KOOPMAN: Algorithm<u32> = Algorithm {
    width: 32,
    poly: 0x741b_8cd7,
    init: 0xffff_ffff,
    refin: true,
    refout: true,
    xorout: 0xffff_ffff,
    check: 0x2d3d_d0ae,
    residue: 0x0843_323b,
};

const IEEE: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);
const KOOPMAN: Crc<u32> = Crc::<u32>::new(&CRC_32_KOOPMAN);
const ISO: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);
// Go's ECMA table is the reflected ECMA-182 polynomial, i.e. CRC-64/XZ.
const ECMA: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

pub fn crc32_ieee(bytes: &[u8]) -> u32 {
    IEEE.checksum(bytes)
}

pub fn crc32_castagnoli(bytes: &[u8]) -> u32 {
    CASTAGNOLI.checksum(bytes)
}

pub fn crc32_koopman(bytes: &[u8]) -> u32 {
    KOOPMAN.checksum(bytes)
}

pub fn adler32(bytes: &[u8]) -> u32 {
    adler2::adler32_slice(bytes)
}

pub fn crc64_iso(bytes: &[u8]) -> u64 {
    ISO.checksum(bytes)
}

pub fn crc64_ecma(bytes: &[u8]) -> u64 {
    ECMA.checksum(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Crc32Ieee,
    Crc32Castagnoli,
    Crc32Koopman,
    Adler32,
    Crc64Iso,
    Crc64Ecma,
}

impl ChecksumAlgorithm {
    pub const ALL: [ChecksumAlgorithm; 6] = [
        ChecksumAlgorithm::Crc32Ieee,
        ChecksumAlgorithm::Crc32Castagnoli,
        ChecksumAlgorithm::Crc32Koopman,
        ChecksumAlgorithm::Adler32,
        ChecksumAlgorithm::Crc64Iso,
        ChecksumAlgorithm::Crc64Ecma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Crc32Ieee => "crc32-ieee",
            ChecksumAlgorithm::Crc32Castagnoli => "crc32-castagnoli",
            ChecksumAlgorithm::Crc32Koopman => "crc32-koopman",
            ChecksumAlgorithm::Adler32 => "adler32",
            ChecksumAlgorithm::Crc64Iso => "crc64-iso",
            ChecksumAlgorithm::Crc64Ecma => "crc64-ecma",
        }
    }

    /// Output width in bits.
    pub fn width(&self) -> u8 {
        match self {
            ChecksumAlgorithm::Crc64Iso | ChecksumAlgorithm::Crc64Ecma => 64,
            _ => 32,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algo| algo.as_str() == wanted)
            .ok_or_else(|| format!("unknown checksum algorithm: {s}"))
    }
}

/// Compute `algorithm` over `bytes`, widened to `u64`.
pub fn checksum(algorithm: ChecksumAlgorithm, bytes: &[u8]) -> u64 {
    match algorithm {
        ChecksumAlgorithm::Crc32Ieee => crc32_ieee(bytes).into(),
        ChecksumAlgorithm::Crc32Castagnoli => crc32_castagnoli(bytes).into(),
        ChecksumAlgorithm::Crc32Koopman => crc32_koopman(bytes).into(),
        ChecksumAlgorithm::Adler32 => adler32(bytes).into(),
        ChecksumAlgorithm::Crc64Iso => crc64_iso(bytes),
        ChecksumAlgorithm::Crc64Ecma => crc64_ecma(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK: &[u8] = b"123456789";

    #[test]
    fn matches_reference_check_values() {
        assert_eq!(crc32_ieee(CHECK), 0xCBF4_3926);
        assert_eq!(crc32_castagnoli(CHECK), 0xE306_9283);
        assert_eq!(crc32_koopman(CHECK), 0x2D3D_D0AE);
        assert_eq!(adler32(CHECK), 0x091E_01DE);
        assert_eq!(crc64_iso(CHECK), 0xB909_56C7_75A4_1001);
        assert_eq!(crc64_ecma(CHECK), 0x995D_C9BB_DF19_39FA);
    }

    #[test]
    fn empty_input() {
        assert_eq!(crc32_ieee(b""), 0);
        assert_eq!(crc32_koopman(b""), 0);
        assert_eq!(adler32(b""), 1);
        assert_eq!(crc64_ecma(b""), 0);
    }

    #[test]
    fn deterministic_and_input_sensitive() {
        for algo in ChecksumAlgorithm::ALL {
            assert_eq!(checksum(algo, b"abc"), checksum(algo, b"abc"), "{algo}");
            assert_ne!(checksum(algo, b"abc"), checksum(algo, b"abd"), "{algo}");
        }
    }

    #[test]
    fn dispatcher_agrees_with_direct_functions() {
        assert_eq!(
            checksum(ChecksumAlgorithm::Crc32Castagnoli, CHECK),
            u64::from(crc32_castagnoli(CHECK))
        );
        assert_eq!(checksum(ChecksumAlgorithm::Crc64Iso, CHECK), crc64_iso(CHECK));
    }

    #[test]
    fn names_parse_case_insensitively() {
        for algo in ChecksumAlgorithm::ALL {
            assert_eq!(algo.as_str().parse::<ChecksumAlgorithm>(), Ok(algo));
        }
        assert_eq!(
            "CRC64-ECMA".parse::<ChecksumAlgorithm>(),
            Ok(ChecksumAlgorithm::Crc64Ecma)
        );
        assert!("crc16".parse::<ChecksumAlgorithm>().is_err());
        assert_eq!(ChecksumAlgorithm::Adler32.width(), 32);
        assert_eq!(ChecksumAlgorithm::Crc64Iso.width(), 64);
    }
}
