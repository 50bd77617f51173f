//! HMAC-DRBG (Deterministic Random Bit Generator) implementation.
//!
//! Provides cryptographic random number generation based on NIST SP 800-90A
//! Section 10.1.2 using HMAC over SHA-1 or SHA-2 as the underlying primitive.

use rbg_types::{HashAlgId, RandAlgId, RbgError};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{check_len, sealed, Drbg, Mechanism, MAX_INPUT_LENGTH};
use crate::provider::MacAlgorithm;

/// Maximum bytes per request (2^16).
const MAX_REQUEST_SIZE: usize = 1 << 16;

/// Entropy supplied by an automatic reseed.
const RESEED_ENTROPY_LEN: usize = 32;

/// HMAC-DRBG working state `(Key, V)`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HmacState {
    #[zeroize(skip)]
    digest: HashAlgId,
    /// HMAC key K (outlen bytes).
    key: Vec<u8>,
    /// HMAC value V (outlen bytes).
    v: Vec<u8>,
}

type KeyAndV = (Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>);

/// HMAC_DRBG_Update (SP 800-90A §10.1.2.2).
///
/// Empty parts of `provided_data` are dropped; the second round only runs
/// when something remains. Returns the new `(Key, V)`.
fn update(
    digest: HashAlgId,
    key: &[u8],
    v: &[u8],
    provided_data: &[&[u8]],
) -> Result<KeyAndV, RbgError> {
    const ZERO: &[u8] = &[0x00];
    const ONE: &[u8] = &[0x01];

    let parts: Vec<&[u8]> = provided_data
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect();

    // K = HMAC(K, V || 0x00 || provided_data); V = HMAC(K, V)
    let mut msg: Vec<&[u8]> = vec![v, ZERO];
    msg.extend_from_slice(&parts);
    let mut key = Zeroizing::new(digest.mac(key, &msg)?);
    let mut v = Zeroizing::new(digest.mac(&key, &[v])?);

    if !parts.is_empty() {
        // K = HMAC(K, V || 0x01 || provided_data); V = HMAC(K, V)
        let mut msg: Vec<&[u8]> = vec![v.as_slice(), ONE];
        msg.extend_from_slice(&parts);
        let next_key = Zeroizing::new(digest.mac(&key, &msg)?);
        key = next_key;
        v = Zeroizing::new(digest.mac(&key, &[v.as_slice()])?);
    }
    Ok((key, v))
}

impl HmacState {
    fn commit(&mut self, (key, v): KeyAndV) {
        self.key.copy_from_slice(&key);
        self.v.copy_from_slice(&v);
    }
}

impl sealed::Sealed for HmacState {}

impl Mechanism for HmacState {
    fn algorithm(&self) -> RandAlgId {
        RandAlgId::Hmac(self.digest)
    }

    fn outlen(&self) -> usize {
        self.digest.output_size()
    }

    fn max_request_size(&self) -> usize {
        MAX_REQUEST_SIZE
    }

    fn entropy_len_range(&self) -> (usize, usize) {
        (self.digest.security_strength() / 8, MAX_INPUT_LENGTH)
    }

    fn max_additional_input(&self) -> usize {
        MAX_INPUT_LENGTH
    }

    fn reseed_entropy_len(&self) -> usize {
        RESEED_ENTROPY_LEN
    }

    /// HMAC_DRBG_Reseed_algorithm (SP 800-90A §10.1.2.4).
    fn reseed_state(
        &mut self,
        entropy: &[u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), RbgError> {
        let ad = additional_input.unwrap_or_default();
        let next = update(self.digest, &self.key, &self.v, &[entropy, ad])?;
        self.commit(next);
        Ok(())
    }

    /// HMAC_DRBG_Generate_algorithm (SP 800-90A §10.1.2.5).
    fn generate_state(
        &mut self,
        count: usize,
        additional_input: Option<&[u8]>,
        _reseed_counter: u64,
    ) -> Result<Vec<u8>, RbgError> {
        let additional_input = additional_input.filter(|a| !a.is_empty());
        let (key, mut v) = match additional_input {
            Some(ad) => update(self.digest, &self.key, &self.v, &[ad])?,
            None => (
                Zeroizing::new(self.key.clone()),
                Zeroizing::new(self.v.clone()),
            ),
        };

        let mut out = Vec::with_capacity(count + self.digest.output_size());
        while out.len() < count {
            v = Zeroizing::new(self.digest.mac(&key, &[v.as_slice()])?);
            out.extend_from_slice(&v);
        }
        out.truncate(count);

        let ad = additional_input.unwrap_or_default();
        let next = update(self.digest, &key, &v, &[ad])?;
        self.commit(next);
        Ok(out)
    }
}

impl Drbg<HmacState> {
    /// Instantiate an HMAC-DRBG (SP 800-90A §10.1.2.3).
    ///
    /// `Key = 0x00..00`, `V = 0x01..01`, then the state is updated with
    /// `entropy || nonce || personalization`.
    pub fn new(
        digest: HashAlgId,
        entropy: &[u8],
        nonce: &[u8],
        personalization: Option<&[u8]>,
    ) -> Result<Self, RbgError> {
        let strength = digest.security_strength() / 8;
        check_len("entropy", entropy.len(), strength, MAX_INPUT_LENGTH)?;
        check_len("nonce", nonce.len(), strength / 2, MAX_INPUT_LENGTH)?;
        let pers = personalization.unwrap_or_default();
        check_len("personalization", pers.len(), 0, MAX_INPUT_LENGTH)?;

        let outlen = digest.output_size();
        let mut state = HmacState {
            digest,
            key: vec![0x00; outlen],
            v: vec![0x01; outlen],
        };
        let next = update(digest, &state.key, &state.v, &[entropy, nonce, pers])?;
        state.commit(next);
        Ok(Self::from_state(state))
    }
}
