use std::fmt;
use std::str::FromStr;

use crate::RbgError;

/// Hash algorithm identifiers usable by Hash-DRBG and HMAC-DRBG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgId {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgId {
    /// All supported digests, weakest first.
    pub const ALL: [HashAlgId; 5] = [
        HashAlgId::Sha1,
        HashAlgId::Sha224,
        HashAlgId::Sha256,
        HashAlgId::Sha384,
        HashAlgId::Sha512,
    ];

    /// Digest output size in bytes (`outlen / 8`).
    pub fn output_size(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Seed length in bytes (SP 800-90A Table 2): 440 bits for digests of
    /// at most 256 bits, 888 bits otherwise.
    pub fn seed_len(self) -> usize {
        if self.output_size() * 8 <= 256 {
            55
        } else {
            111
        }
    }

    /// Highest supported security strength in bits.
    pub fn security_strength(self) -> usize {
        match self {
            Self::Sha1 => 128,
            Self::Sha224 => 192,
            Self::Sha256 | Self::Sha384 | Self::Sha512 => 256,
        }
    }

    /// Lower-case name as accepted by [`RandAlgId::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgId {
    type Err = RbgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| s.eq_ignore_ascii_case(alg.name()))
            .ok_or_else(|| RbgError::UnknownAlgorithm(s.to_string()))
    }
}

/// Block cipher identifiers usable by CTR-DRBG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgId {
    Aes128,
    Aes192,
    Aes256,
}

impl CipherAlgId {
    pub const ALL: [CipherAlgId; 3] = [CipherAlgId::Aes128, CipherAlgId::Aes192, CipherAlgId::Aes256];

    /// Key length in bytes (`keylen / 8`).
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Block length in bytes (`outlen / 8`).
    pub fn block_len(self) -> usize {
        16
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Aes128 => "aes128",
            Self::Aes192 => "aes192",
            Self::Aes256 => "aes256",
        }
    }
}

impl FromStr for CipherAlgId {
    type Err = RbgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| s.eq_ignore_ascii_case(alg.name()))
            .ok_or_else(|| RbgError::UnknownAlgorithm(s.to_string()))
    }
}

/// DRBG (random number generator) algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RandAlgId {
    /// Hash-DRBG over the given digest.
    Hash(HashAlgId),
    /// HMAC-DRBG over the given digest.
    Hmac(HashAlgId),
    /// CTR-DRBG (no derivation function) over the given cipher.
    Ctr(CipherAlgId),
}

/// Name suffix selecting the HMAC variant, e.g. `sha256hmac`.
const HMAC_SUFFIX: &str = "hmac";

impl FromStr for RandAlgId {
    type Err = RbgError;

    /// Parses `sha256` (Hash-DRBG), `sha256hmac` (HMAC-DRBG) or `aes256`
    /// (CTR-DRBG). Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let unknown = || RbgError::UnknownAlgorithm(s.to_string());

        if let Some(digest) = lower.strip_suffix(HMAC_SUFFIX) {
            return digest.parse().map(Self::Hmac).map_err(|_| unknown());
        }
        if let Ok(digest) = lower.parse() {
            return Ok(Self::Hash(digest));
        }
        lower.parse().map(Self::Ctr).map_err(|_| unknown())
    }
}

impl fmt::Display for RandAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(alg) => f.write_str(alg.name()),
            Self::Hmac(alg) => write!(f, "{}{HMAC_SUFFIX}", alg.name()),
            Self::Ctr(alg) => f.write_str(alg.name()),
        }
    }
}
