//! Hash-DRBG (Hash-based Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.1.1 using SHA-1, SHA-224,
//! SHA-256, SHA-384 or SHA-512 as the underlying hash function.

use rbg_bignum::BigNum;
use rbg_types::{HashAlgId, RandAlgId, RbgError};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{check_len, sealed, Drbg, Mechanism, MAX_INPUT_LENGTH};
use crate::codec::{add_into, increment, int_to_bytes, left_pad};
use crate::provider::HashAlgorithm;

/// Maximum bytes per request (2^16).
const MAX_REQUEST_SIZE: usize = 1 << 16;

/// Entropy supplied by an automatic reseed.
const RESEED_ENTROPY_LEN: usize = 32;

/// Hash-DRBG working state `(V, C)`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HashState {
    #[zeroize(skip)]
    digest: HashAlgId,
    /// State value V (seedlen bytes).
    v: Vec<u8>,
    /// Constant C (seedlen bytes).
    c: Vec<u8>,
}

/// Hash_df: Hash derivation function (SP 800-90A §10.3.1).
///
/// Derives `out_len` bytes from the concatenation of `input`:
/// `Hash(counter || no_of_bits_to_return || input)` for counter = 1, 2, ...
pub(crate) fn hash_df(digest: HashAlgId, input: &[&[u8]], out_len: usize) -> Zeroizing<Vec<u8>> {
    let bits = left_pad(&int_to_bytes(&BigNum::from_u64(out_len as u64 * 8)), 4);
    let rounds = out_len.div_ceil(digest.output_size());

    let mut temp = Zeroizing::new(Vec::with_capacity(rounds * digest.output_size()));
    for i in 1..=rounds {
        let counter = [(i % 255) as u8];
        let mut msg: Vec<&[u8]> = Vec::with_capacity(input.len() + 2);
        msg.push(&counter);
        msg.push(&bits);
        msg.extend_from_slice(input);
        temp.extend_from_slice(&digest.hash(&msg));
    }
    temp.truncate(out_len);
    temp
}

/// `C = Hash_df(0x00 || V, seedlen)`.
fn derive_c(digest: HashAlgId, v: &[u8]) -> Zeroizing<Vec<u8>> {
    const ZERO: &[u8] = &[0x00];
    hash_df(digest, &[ZERO, v], digest.seed_len())
}

impl HashState {
    /// Hashgen (SP 800-90A §10.1.1.4): hash successive values of `V`.
    fn hashgen(&self, v: &[u8], count: usize) -> Vec<u8> {
        let rounds = count.div_ceil(self.digest.output_size());
        let mut data = Zeroizing::new(v.to_vec());
        let mut out = Vec::with_capacity(rounds * self.digest.output_size());
        for _ in 0..rounds {
            out.extend_from_slice(&self.digest.hash(&[data.as_slice()]));
            increment(&mut data);
        }
        out.truncate(count);
        out
    }
}

impl sealed::Sealed for HashState {}

impl Mechanism for HashState {
    fn algorithm(&self) -> RandAlgId {
        RandAlgId::Hash(self.digest)
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

    /// Hash_DRBG_Reseed_algorithm (SP 800-90A §10.1.1.3).
    fn reseed_state(
        &mut self,
        entropy: &[u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), RbgError> {
        const ONE: &[u8] = &[0x01];
        let ad = additional_input.unwrap_or_default();
        let v = hash_df(self.digest, &[ONE, self.v.as_slice(), entropy, ad], self.digest.seed_len());
        let c = derive_c(self.digest, &v);
        self.v.copy_from_slice(&v);
        self.c.copy_from_slice(&c);
        Ok(())
    }

    /// Hash_DRBG_Generate_algorithm (SP 800-90A §10.1.1.4).
    fn generate_state(
        &mut self,
        count: usize,
        additional_input: Option<&[u8]>,
        reseed_counter: u64,
    ) -> Result<Vec<u8>, RbgError> {
        const TWO: &[u8] = &[0x02];
        const THREE: &[u8] = &[0x03];

        let mut v = Zeroizing::new(self.v.clone());
        // A present but empty input still contributes w.
        if let Some(ad) = additional_input {
            let w = Zeroizing::new(self.digest.hash(&[TWO, v.as_slice(), ad]));
            add_into(&mut v, &w);
        }

        let out = self.hashgen(&v, count);

        // V = (V + H + C + reseed_counter) mod 2^seedlen
        let h = Zeroizing::new(self.digest.hash(&[THREE, v.as_slice()]));
        add_into(&mut v, &h);
        add_into(&mut v, &self.c);
        add_into(&mut v, &int_to_bytes(&BigNum::from_u64(reseed_counter)));
        self.v.copy_from_slice(&v);
        Ok(out)
    }
}

impl Drbg<HashState> {
    /// Instantiate a Hash-DRBG (SP 800-90A §10.1.1.2).
    ///
    /// Entropy must carry at least the digest's security strength, the
    /// nonce at least half of it.
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

        // V = Hash_df(entropy || nonce || personalization, seedlen)
        let v = hash_df(digest, &[entropy, nonce, pers], digest.seed_len());
        let c = derive_c(digest, &v);
        Ok(Self::from_state(HashState {
            digest,
            v: v.to_vec(),
            c: c.to_vec(),
        }))
    }
}
