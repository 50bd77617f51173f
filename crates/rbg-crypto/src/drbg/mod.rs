//! Deterministic Random Bit Generators (NIST SP 800-90A).
//!
//! Provides three DRBG families sharing one contract:
//! - CTR_DRBG (Section 10.2.1), AES-128/192/256 without a derivation function
//! - Hash_DRBG (Section 10.1.1), SHA-1/224/256/384/512
//! - HMAC_DRBG (Section 10.1.2), HMAC over the same digests
//!
//! The contract (request bounds, input length checks, reseed counter) lives
//! in [`Drbg`]; each family supplies only its state and derivation through
//! the sealed [`Mechanism`] trait. [`new`] builds any of them by name and
//! seeds it from the system entropy source; [`RandomByteStream`] wraps a
//! generator and reseeds it transparently.

mod ctr_drbg;
mod hash_drbg;
mod hmac_drbg;
mod stream;

pub use ctr_drbg::CtrState;
pub use hash_drbg::HashState;
pub use hmac_drbg::HmacState;
pub use stream::RandomByteStream;

use std::fmt;

use log::debug;
use rbg_types::{RandAlgId, RbgError};
use zeroize::Zeroizing;

use crate::entropy::{EntropySource, SystemEntropy};

/// Maximum length in bytes of entropy, nonce, personalization string and
/// additional input (2^21 bytes, well under the SP 800-90A 2^35-bit bound).
pub const MAX_INPUT_LENGTH: usize = 1 << 21;

/// Reference reseed interval: generate calls allowed per (re)seed.
pub const DEFAULT_RESEED_INTERVAL: u64 = 2;

/// Upper bound accepted for a configured reseed interval.
pub const MAX_RESEED_INTERVAL: u64 = 1 << 24;

/// Entropy handed to hash-based generators by the factory, and the nonce
/// length used alongside it.
const FACTORY_SEED_LEN: usize = 128;

/// Generator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrbgConfig {
    /// Number of generate calls permitted between reseeds.
    pub reseed_interval: u64,
}

impl Default for DrbgConfig {
    fn default() -> Self {
        Self {
            reseed_interval: DEFAULT_RESEED_INTERVAL,
        }
    }
}

impl DrbgConfig {
    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<(), RbgError> {
        check_reseed_interval(self.reseed_interval)
    }
}

fn check_reseed_interval(interval: u64) -> Result<(), RbgError> {
    if interval == 0 || interval > MAX_RESEED_INTERVAL {
        return Err(RbgError::InvalidReseedInterval {
            requested: interval,
            max: MAX_RESEED_INTERVAL,
        });
    }
    Ok(())
}

pub(crate) fn check_len(
    input: &'static str,
    len: usize,
    min: usize,
    max: usize,
) -> Result<(), RbgError> {
    if len < min || len > max {
        return Err(RbgError::InvalidInput {
            input,
            len,
            min,
            max,
        });
    }
    Ok(())
}

mod sealed {
    pub trait Sealed {}
}

/// Algorithm-specific state and derivation of one DRBG family.
///
/// Sealed: the only implementors are [`CtrState`], [`HashState`] and
/// [`HmacState`]. Callers never see a mechanism directly; every state
/// transition goes through the validated [`Drbg`] contract.
pub trait Mechanism: sealed::Sealed + Send {
    fn algorithm(&self) -> RandAlgId;

    /// Output block length in bytes.
    fn outlen(&self) -> usize;

    /// Exclusive upper bound on bytes per generate call.
    fn max_request_size(&self) -> usize;

    /// Inclusive bounds on reseed entropy length.
    fn entropy_len_range(&self) -> (usize, usize);

    /// Longest additional input accepted by generate and reseed.
    fn max_additional_input(&self) -> usize;

    /// Entropy length an automatic reseed should supply.
    fn reseed_entropy_len(&self) -> usize;

    /// Fold fresh entropy into the state. Inputs are already validated.
    fn reseed_state(&mut self, entropy: &[u8], additional_input: Option<&[u8]>)
        -> Result<(), RbgError>;

    /// Produce `count` bytes and advance the state. Inputs are already
    /// validated; `reseed_counter` is the value before this call.
    ///
    /// Additional input arrives as given: `Some(&[])` is not folded into
    /// `None`, since Hash_DRBG still mixes an empty input into V.
    fn generate_state(
        &mut self,
        count: usize,
        additional_input: Option<&[u8]>,
        reseed_counter: u64,
    ) -> Result<Vec<u8>, RbgError>;
}

/// The operations shared by every generator.
pub trait RandomBitGenerator: Send {
    /// Return `count` pseudorandom bytes, `0 < count < max_request_size()`.
    ///
    /// Fails with [`RbgError::ReseedRequired`] once the reseed interval is
    /// exhausted; reseed and retry the same request.
    fn generate(&mut self, count: usize, additional_input: Option<&[u8]>)
        -> Result<Vec<u8>, RbgError>;

    /// Mix fresh entropy into the state and reset the reseed counter to 1.
    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<(), RbgError>;

    /// Output block length in bytes (`outlen / 8`).
    fn outlen(&self) -> usize;

    fn max_request_size(&self) -> usize;

    /// Entropy length an automatic reseed should supply.
    fn reseed_entropy_len(&self) -> usize;

    fn reseed_counter(&self) -> u64;

    fn reseed_interval(&self) -> u64;

    fn algorithm(&self) -> RandAlgId;
}

/// A DRBG instance: family state plus the shared reseed bookkeeping.
pub struct Drbg<M: Mechanism> {
    state: M,
    reseed_counter: u64,
    reseed_interval: u64,
}

/// CTR_DRBG over AES without a derivation function.
pub type CtrDrbg = Drbg<CtrState>;
/// Hash_DRBG over SHA-1 or SHA-2.
pub type HashDrbg = Drbg<HashState>;
/// HMAC_DRBG over SHA-1 or SHA-2.
pub type HmacDrbg = Drbg<HmacState>;

impl<M: Mechanism> Drbg<M> {
    fn from_state(state: M) -> Self {
        debug!(
            "instantiated {} drbg (outlen {} bytes)",
            state.algorithm(),
            state.outlen()
        );
        Self {
            state,
            reseed_counter: 1,
            reseed_interval: DEFAULT_RESEED_INTERVAL,
        }
    }

    /// Change the number of generate calls allowed between reseeds.
    pub fn set_reseed_interval(&mut self, interval: u64) -> Result<(), RbgError> {
        check_reseed_interval(interval)?;
        self.reseed_interval = interval;
        Ok(())
    }
}

impl<M: Mechanism> RandomBitGenerator for Drbg<M> {
    fn generate(
        &mut self,
        count: usize,
        additional_input: Option<&[u8]>,
    ) -> Result<Vec<u8>, RbgError> {
        let max = self.state.max_request_size();
        if count == 0 || count >= max {
            return Err(RbgError::InvalidRequest {
                requested: count,
                max,
            });
        }
        if let Some(ad) = additional_input {
            check_len("additional input", ad.len(), 0, self.state.max_additional_input())?;
        }
        if self.reseed_counter > self.reseed_interval {
            return Err(RbgError::ReseedRequired);
        }

        let out = self
            .state
            .generate_state(count, additional_input, self.reseed_counter)?;
        self.reseed_counter += 1;
        Ok(out)
    }

    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<(), RbgError> {
        let (min, max) = self.state.entropy_len_range();
        check_len("entropy", entropy.len(), min, max)?;
        let additional_input = additional_input.filter(|a| !a.is_empty());
        if let Some(ad) = additional_input {
            check_len("additional input", ad.len(), 0, self.state.max_additional_input())?;
        }

        self.state.reseed_state(entropy, additional_input)?;
        self.reseed_counter = 1;
        debug!("{} drbg reseeded", self.state.algorithm());
        Ok(())
    }

    fn outlen(&self) -> usize {
        self.state.outlen()
    }

    fn max_request_size(&self) -> usize {
        self.state.max_request_size()
    }

    fn reseed_entropy_len(&self) -> usize {
        self.state.reseed_entropy_len()
    }

    fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }

    fn reseed_interval(&self) -> u64 {
        self.reseed_interval
    }

    fn algorithm(&self) -> RandAlgId {
        self.state.algorithm()
    }
}

impl<M: Mechanism> fmt::Debug for Drbg<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drbg")
            .field("algorithm", &self.state.algorithm())
            .field("reseed_counter", &self.reseed_counter)
            .field("reseed_interval", &self.reseed_interval)
            .finish_non_exhaustive()
    }
}

/// A generator of any family, as returned by the factory.
#[derive(Debug)]
pub enum AnyDrbg {
    Ctr(CtrDrbg),
    Hash(HashDrbg),
    Hmac(HmacDrbg),
}

macro_rules! dispatch {
    ($self:expr, $drbg:ident => $body:expr) => {
        match $self {
            AnyDrbg::Ctr($drbg) => $body,
            AnyDrbg::Hash($drbg) => $body,
            AnyDrbg::Hmac($drbg) => $body,
        }
    };
}

impl AnyDrbg {
    pub fn set_reseed_interval(&mut self, interval: u64) -> Result<(), RbgError> {
        dispatch!(self, drbg => drbg.set_reseed_interval(interval))
    }
}

impl RandomBitGenerator for AnyDrbg {
    fn generate(
        &mut self,
        count: usize,
        additional_input: Option<&[u8]>,
    ) -> Result<Vec<u8>, RbgError> {
        dispatch!(self, drbg => drbg.generate(count, additional_input))
    }

    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<(), RbgError> {
        dispatch!(self, drbg => drbg.reseed(entropy, additional_input))
    }

    fn outlen(&self) -> usize {
        dispatch!(self, drbg => drbg.outlen())
    }

    fn max_request_size(&self) -> usize {
        dispatch!(self, drbg => drbg.max_request_size())
    }

    fn reseed_entropy_len(&self) -> usize {
        dispatch!(self, drbg => drbg.reseed_entropy_len())
    }

    fn reseed_counter(&self) -> u64 {
        dispatch!(self, drbg => drbg.reseed_counter())
    }

    fn reseed_interval(&self) -> u64 {
        dispatch!(self, drbg => drbg.reseed_interval())
    }

    fn algorithm(&self) -> RandAlgId {
        dispatch!(self, drbg => drbg.algorithm())
    }
}

impl From<CtrDrbg> for AnyDrbg {
    fn from(drbg: CtrDrbg) -> Self {
        Self::Ctr(drbg)
    }
}

impl From<HashDrbg> for AnyDrbg {
    fn from(drbg: HashDrbg) -> Self {
        Self::Hash(drbg)
    }
}

impl From<HmacDrbg> for AnyDrbg {
    fn from(drbg: HmacDrbg) -> Self {
        Self::Hmac(drbg)
    }
}

/// Create a generator by algorithm name, seeded from the system entropy
/// source with the default configuration.
///
/// Names are case-insensitive: `sha1` .. `sha512` select Hash_DRBG, the same
/// names suffixed with `hmac` (e.g. `sha256hmac`) select HMAC_DRBG, and
/// `aes128` / `aes192` / `aes256` select CTR_DRBG.
///
/// ```
/// use rbg_crypto::drbg::{self, RandomBitGenerator};
///
/// let mut rng = drbg::new("sha256hmac", Some(b"my app".as_slice())).unwrap();
/// assert_eq!(rng.generate(16, None).unwrap().len(), 16);
/// ```
pub fn new(name: &str, personalization: Option<&[u8]>) -> Result<AnyDrbg, RbgError> {
    new_with(
        name,
        personalization,
        &mut SystemEntropy,
        &DrbgConfig::default(),
    )
}

/// Create a generator by algorithm name from an explicit entropy source and
/// configuration.
///
/// CTR_DRBG receives exactly `seedlen` bytes of entropy; Hash_DRBG and
/// HMAC_DRBG receive 128 bytes of entropy and a 128-byte nonce.
pub fn new_with(
    name: &str,
    personalization: Option<&[u8]>,
    entropy: &mut dyn EntropySource,
    config: &DrbgConfig,
) -> Result<AnyDrbg, RbgError> {
    config.validate()?;
    let alg: RandAlgId = name.parse()?;

    let mut drbg = match alg {
        RandAlgId::Ctr(cipher) => {
            let mut seed = Zeroizing::new(vec![0u8; cipher.key_len() + cipher.block_len()]);
            entropy.get_entropy(&mut seed)?;
            AnyDrbg::Ctr(CtrDrbg::new(cipher, &seed, personalization)?)
        }
        RandAlgId::Hash(digest) | RandAlgId::Hmac(digest) => {
            let mut seed = Zeroizing::new(vec![0u8; FACTORY_SEED_LEN]);
            let mut nonce = Zeroizing::new(vec![0u8; FACTORY_SEED_LEN]);
            entropy.get_entropy(&mut seed)?;
            entropy.get_entropy(&mut nonce)?;
            if matches!(alg, RandAlgId::Hmac(_)) {
                AnyDrbg::Hmac(HmacDrbg::new(digest, &seed, &nonce, personalization)?)
            } else {
                AnyDrbg::Hash(HashDrbg::new(digest, &seed, &nonce, personalization)?)
            }
        }
    };
    drbg.set_reseed_interval(config.reseed_interval)?;
    debug!("created {alg} drbg from {} entropy", entropy.name());
    Ok(drbg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbg_types::{CipherAlgId, HashAlgId};

    /// Deterministic entropy: an incrementing byte counter.
    struct CountingEntropy(u8);

    impl EntropySource for CountingEntropy {
        fn name(&self) -> &str {
            "counting"
        }

        fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), RbgError> {
            for b in buf.iter_mut() {
                *b = self.0;
                self.0 = self.0.wrapping_add(1);
            }
            Ok(())
        }
    }

    struct FailingEntropy;

    impl EntropySource for FailingEntropy {
        fn name(&self) -> &str {
            "failing"
        }

        fn get_entropy(&mut self, _buf: &mut [u8]) -> Result<(), RbgError> {
            Err(RbgError::EntropyFail)
        }
    }

    #[test]
    fn test_factory_selects_family() {
        let cases = [
            ("sha1", RandAlgId::Hash(HashAlgId::Sha1)),
            ("SHA512", RandAlgId::Hash(HashAlgId::Sha512)),
            ("sha224hmac", RandAlgId::Hmac(HashAlgId::Sha224)),
            ("aes128", RandAlgId::Ctr(CipherAlgId::Aes128)),
            ("aes256", RandAlgId::Ctr(CipherAlgId::Aes256)),
        ];
        for (name, alg) in cases {
            let mut drbg = new(name, None).unwrap();
            assert_eq!(drbg.algorithm(), alg);
            assert_eq!(drbg.reseed_counter(), 1);
            assert_eq!(drbg.generate(drbg.outlen(), None).unwrap().len(), drbg.outlen());
        }
    }

    #[test]
    fn test_factory_variant_matches_name() {
        assert!(matches!(new("aes192", None).unwrap(), AnyDrbg::Ctr(_)));
        assert!(matches!(new("sha384", None).unwrap(), AnyDrbg::Hash(_)));
        assert!(matches!(new("sha384hmac", None).unwrap(), AnyDrbg::Hmac(_)));
    }

    #[test]
    fn test_factory_unknown_name() {
        for name in ["md5", "sha3-256", "hmac", "aes512"] {
            assert!(matches!(new(name, None), Err(RbgError::UnknownAlgorithm(n)) if n == name));
        }
    }

    #[test]
    fn test_factory_deterministic_with_same_entropy() {
        let config = DrbgConfig::default();
        for name in ["sha256", "sha1hmac", "aes256"] {
            let mut a = new_with(name, Some(b"pers".as_slice()), &mut CountingEntropy(7), &config).unwrap();
            let mut b = new_with(name, Some(b"pers".as_slice()), &mut CountingEntropy(7), &config).unwrap();
            assert_eq!(a.generate(40, None).unwrap(), b.generate(40, None).unwrap());

            let mut c = new_with(name, Some(b"other".as_slice()), &mut CountingEntropy(7), &config).unwrap();
            let mut d = new_with(name, Some(b"pers".as_slice()), &mut CountingEntropy(7), &config).unwrap();
            assert_ne!(c.generate(40, None).unwrap(), d.generate(40, None).unwrap());
        }
    }

    #[test]
    fn test_factory_entropy_failure() {
        let config = DrbgConfig::default();
        assert_eq!(
            new_with("sha256", None, &mut FailingEntropy, &config).unwrap_err(),
            RbgError::EntropyFail
        );
    }

    #[test]
    fn test_factory_applies_config() {
        let config = DrbgConfig {
            reseed_interval: 1000,
        };
        let drbg = new_with("aes128", None, &mut CountingEntropy(0), &config).unwrap();
        assert_eq!(drbg.reseed_interval(), 1000);

        let bad = DrbgConfig { reseed_interval: 0 };
        assert!(matches!(
            new_with("aes128", None, &mut CountingEntropy(0), &bad),
            Err(RbgError::InvalidReseedInterval { requested: 0, .. })
        ));
    }

    #[test]
    fn test_ctr_personalization_too_long_via_factory() {
        let long = [0u8; 33];
        assert!(matches!(
            new("aes128", Some(&long[..])),
            Err(RbgError::InvalidInput { input: "personalization", .. })
        ));
    }

    #[test]
    fn test_set_reseed_interval_bounds() {
        let mut drbg = new("sha1", None).unwrap();
        assert!(drbg.set_reseed_interval(0).is_err());
        assert!(drbg.set_reseed_interval(MAX_RESEED_INTERVAL + 1).is_err());
        drbg.set_reseed_interval(MAX_RESEED_INTERVAL).unwrap();
        assert_eq!(drbg.reseed_interval(), MAX_RESEED_INTERVAL);
        assert_eq!(DrbgConfig::default().reseed_interval, DEFAULT_RESEED_INTERVAL);
    }

    #[test]
    fn test_debug_redacts_state() {
        let drbg = new("sha256hmac", None).unwrap();
        let text = format!("{drbg:?}");
        assert!(text.contains("Hmac(Sha256)"));
        assert!(text.contains("reseed_counter: 1"));
        assert!(!text.contains("key"));
    }
}
