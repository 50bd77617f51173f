//! CTR-DRBG (Counter mode Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.2.1 with AES-128, AES-192 or
//! AES-256 and no derivation function: entropy input must be exactly
//! `seedlen = keylen + blocklen` bytes.

use rbg_types::{CipherAlgId, RandAlgId, RbgError};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{check_len, sealed, Drbg, Mechanism};
use crate::aes::{AesKey, AES_BLOCK_SIZE};
use crate::codec::{increment, left_pad, xor_into};
use crate::provider::BlockCipher;

/// Maximum bytes per request (2^13, SP 800-90A Table 3 with AES).
const MAX_REQUEST_SIZE: usize = 1 << 13;

/// CTR-DRBG working state `(Key, V)`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CtrState {
    #[zeroize(skip)]
    cipher: CipherAlgId,
    /// AES key (keylen bytes).
    key: Vec<u8>,
    /// Counter block V (16 bytes).
    v: Vec<u8>,
}

type KeyAndV = (Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>);

fn seed_len(cipher: CipherAlgId) -> usize {
    cipher.key_len() + AES_BLOCK_SIZE
}

/// Encrypt successive counter values `V + 1, V + 2, ...` under `cipher`,
/// appending whole blocks to `out` until it holds at least `len` bytes.
/// `v` is left at the last counter value used.
fn ctr_blocks(
    cipher: &dyn BlockCipher,
    v: &mut [u8],
    out: &mut Vec<u8>,
    len: usize,
) -> Result<(), RbgError> {
    let mut block = Zeroizing::new(vec![0u8; cipher.block_size()]);
    while out.len() < len {
        increment(v);
        block.copy_from_slice(v);
        cipher.encrypt_block(&mut block)?;
        out.extend_from_slice(&block);
    }
    Ok(())
}

/// CTR_DRBG_Update (SP 800-90A §10.2.1.2).
///
/// `provided_data` is left-padded to `seedlen`. Returns the new `(Key, V)`
/// without touching the inputs.
fn update(
    cipher: &dyn BlockCipher,
    v: &[u8],
    provided_data: &[u8],
) -> Result<KeyAndV, RbgError> {
    let seed_len = cipher.key_size() + cipher.block_size();
    let mut v = Zeroizing::new(v.to_vec());
    let mut temp = Zeroizing::new(Vec::with_capacity(seed_len + cipher.block_size()));
    ctr_blocks(cipher, &mut v, &mut temp, seed_len)?;
    temp.truncate(seed_len);

    xor_into(&mut temp, &left_pad(provided_data, seed_len));

    let (new_key, new_v) = temp.split_at(cipher.key_size());
    Ok((
        Zeroizing::new(new_key.to_vec()),
        Zeroizing::new(new_v.to_vec()),
    ))
}

/// `entropy XOR left_pad(additional_input, seedlen)`.
fn seed_material(entropy: &[u8], additional_input: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
    let mut seed = Zeroizing::new(entropy.to_vec());
    if let Some(ad) = additional_input {
        let padded = Zeroizing::new(left_pad(ad, entropy.len()));
        xor_into(&mut seed, &padded);
    }
    seed
}

impl CtrState {
    fn commit(&mut self, (key, v): KeyAndV) {
        self.key.copy_from_slice(&key);
        self.v.copy_from_slice(&v);
    }
}

impl sealed::Sealed for CtrState {}

impl Mechanism for CtrState {
    fn algorithm(&self) -> RandAlgId {
        RandAlgId::Ctr(self.cipher)
    }

    fn outlen(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn max_request_size(&self) -> usize {
        MAX_REQUEST_SIZE
    }

    fn entropy_len_range(&self) -> (usize, usize) {
        let seed_len = seed_len(self.cipher);
        (seed_len, seed_len)
    }

    fn max_additional_input(&self) -> usize {
        seed_len(self.cipher)
    }

    fn reseed_entropy_len(&self) -> usize {
        seed_len(self.cipher)
    }

    /// CTR_DRBG_Reseed_algorithm (SP 800-90A §10.2.1.4.1).
    fn reseed_state(
        &mut self,
        entropy: &[u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), RbgError> {
        let seed = seed_material(entropy, additional_input);
        let next = update(&AesKey::new(&self.key)?, &self.v, &seed)?;
        self.commit(next);
        Ok(())
    }

    /// CTR_DRBG_Generate_algorithm (SP 800-90A §10.2.1.5.1).
    fn generate_state(
        &mut self,
        count: usize,
        additional_input: Option<&[u8]>,
        _reseed_counter: u64,
    ) -> Result<Vec<u8>, RbgError> {
        let additional_input = additional_input.filter(|a| !a.is_empty());
        let seed_len = seed_len(self.cipher);
        // Additional input is zero-extended on the right up to seedlen.
        let padded = match additional_input {
            Some(ad) => {
                let mut padded = Zeroizing::new(ad.to_vec());
                padded.resize(seed_len, 0);
                padded
            }
            None => Zeroizing::new(vec![0u8; seed_len]),
        };

        let (key, mut v) = match additional_input {
            Some(_) => update(&AesKey::new(&self.key)?, &self.v, &padded)?,
            None => (
                Zeroizing::new(self.key.clone()),
                Zeroizing::new(self.v.clone()),
            ),
        };

        let aes = AesKey::new(&key)?;
        let mut out = Vec::with_capacity(count + AES_BLOCK_SIZE);
        ctr_blocks(&aes, &mut v, &mut out, count)?;
        out.truncate(count);

        let next = update(&aes, &v, &padded)?;
        self.commit(next);
        Ok(out)
    }
}

impl Drbg<CtrState> {
    /// Instantiate a CTR-DRBG (SP 800-90A §10.2.1.3.1).
    ///
    /// `entropy` must be exactly `seedlen` bytes (32, 40 or 48 for
    /// AES-128/192/256). A personalization string of at most `seedlen`
    /// bytes is left-padded and XORed into the entropy.
    pub fn new(
        cipher: CipherAlgId,
        entropy: &[u8],
        personalization: Option<&[u8]>,
    ) -> Result<Self, RbgError> {
        let seed_len = seed_len(cipher);
        check_len("entropy", entropy.len(), seed_len, seed_len)?;
        let personalization = personalization.filter(|p| !p.is_empty());
        if let Some(pers) = personalization {
            check_len("personalization", pers.len(), 0, seed_len)?;
        }

        let seed = seed_material(entropy, personalization);
        let mut state = CtrState {
            cipher,
            key: vec![0u8; cipher.key_len()],
            v: vec![0u8; AES_BLOCK_SIZE],
        };
        let next = update(&AesKey::new(&state.key)?, &state.v, &seed)?;
        state.commit(next);
        Ok(Self::from_state(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drbg::{CtrDrbg, RandomBitGenerator};

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn seq(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    // CAVP CTR_DRBG AES-128 no df, no prediction resistance, COUNT 0.
    #[test]
    fn test_ctr_drbg_aes128_cavp() {
        let entropy = hex("ce50f33da5d4c1d3d4004eb35244b7f2cd7f2e5076fbf6780a7ff634b249a5fc");
        let mut drbg = CtrDrbg::new(CipherAlgId::Aes128, &entropy, None).unwrap();
        drbg.generate(64, None).unwrap();
        let out = drbg.generate(64, None).unwrap();
        assert_eq!(
            out,
            hex("6545c0529d372443b392ceb3ae3a99a30f963eaf313280f1d1a1e87f9db373d3\
                 61e75d18018266499cccd64d9bbb8de0185f213383080faddec46bae1f784e5a")
        );
    }

    #[test]
    fn test_ctr_drbg_seed_lengths() {
        for (cipher, seed_len) in [
            (CipherAlgId::Aes128, 32),
            (CipherAlgId::Aes192, 40),
            (CipherAlgId::Aes256, 48),
        ] {
            let drbg = CtrDrbg::new(cipher, &seq(seed_len), None).unwrap();
            assert_eq!(drbg.reseed_entropy_len(), seed_len);
            assert_eq!(drbg.outlen(), 16);
            assert_eq!(drbg.max_request_size(), 8192);

            for bad in [seed_len - 1, seed_len + 1, 0] {
                assert!(matches!(
                    CtrDrbg::new(cipher, &seq(bad), None),
                    Err(RbgError::InvalidInput { input: "entropy", .. })
                ));
            }
        }
    }

    #[test]
    fn test_ctr_drbg_personalization_bounds() {
        let entropy = seq(32);
        assert!(CtrDrbg::new(CipherAlgId::Aes128, &entropy, Some(&[0xAA; 32][..])).is_ok());
        assert!(matches!(
            CtrDrbg::new(CipherAlgId::Aes128, &entropy, Some(&[0xAA; 33][..])),
            Err(RbgError::InvalidInput { input: "personalization", len: 33, .. })
        ));
    }

    #[test]
    fn test_ctr_drbg_empty_personalization_is_absent() {
        let entropy = seq(40);
        let mut a = CtrDrbg::new(CipherAlgId::Aes192, &entropy, None).unwrap();
        let mut b = CtrDrbg::new(CipherAlgId::Aes192, &entropy, Some(&[][..])).unwrap();
        assert_eq!(a.generate(32, None).unwrap(), b.generate(32, None).unwrap());
    }

    #[test]
    fn test_ctr_drbg_additional_input_too_long() {
        let mut drbg = CtrDrbg::new(CipherAlgId::Aes256, &seq(48), None).unwrap();
        assert!(matches!(
            drbg.generate(16, Some(&[1u8; 49][..])),
            Err(RbgError::InvalidInput { input: "additional input", .. })
        ));
        assert_eq!(drbg.reseed_counter(), 1);
        assert!(drbg.generate(16, Some(&[1u8; 48][..])).is_ok());
    }

    #[test]
    fn test_ctr_drbg_reseed_requires_exact_entropy() {
        let mut drbg = CtrDrbg::new(CipherAlgId::Aes128, &seq(32), None).unwrap();
        assert!(drbg.reseed(&seq(31), None).is_err());
        assert!(drbg.reseed(&seq(33), None).is_err());
        drbg.reseed(&seq(32), Some(b"extra".as_slice())).unwrap();
        assert_eq!(drbg.reseed_counter(), 1);
    }

    #[test]
    fn test_ctr_drbg_max_request() {
        let mut drbg = CtrDrbg::new(CipherAlgId::Aes128, &seq(32), None).unwrap();
        assert_eq!(drbg.generate(8191, None).unwrap().len(), 8191);
        assert!(matches!(
            drbg.generate(8192, None),
            Err(RbgError::InvalidRequest { requested: 8192, max: 8192 })
        ));
    }

    #[test]
    fn test_ctr_drbg_partial_block_output() {
        let mut a = CtrDrbg::new(CipherAlgId::Aes128, &seq(32), None).unwrap();
        let mut b = CtrDrbg::new(CipherAlgId::Aes128, &seq(32), None).unwrap();
        let short = a.generate(5, None).unwrap();
        let long = b.generate(16, None).unwrap();
        assert_eq!(short, long[..5]);
    }
}
