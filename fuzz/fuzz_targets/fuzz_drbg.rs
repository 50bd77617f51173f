#![no_main]
use libfuzzer_sys::fuzz_target;
use rbg_crypto::drbg::{AnyDrbg, CtrDrbg, HashDrbg, HmacDrbg, RandomBitGenerator};
use rbg_crypto::{CipherAlgId, HashAlgId, RbgError};

// Layout: [selector, count_hi, count_lo, split, rest...]. `rest` is cut at
// `split` into entropy and additional input; the nonce reuses the entropy.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let selector = data[0] as usize;
    let count = u16::from_be_bytes([data[1], data[2]]) as usize;
    let rest = &data[4..];
    let split = (data[3] as usize).min(rest.len());
    let (entropy, additional) = rest.split_at(split);

    let digest = HashAlgId::ALL[selector % HashAlgId::ALL.len()];
    let built: Result<AnyDrbg, RbgError> = match selector % 3 {
        0 => HashDrbg::new(digest, entropy, entropy, Some(additional)).map(Into::into),
        1 => HmacDrbg::new(digest, entropy, entropy, Some(additional)).map(Into::into),
        _ => {
            let cipher = CipherAlgId::ALL[selector % CipherAlgId::ALL.len()];
            CtrDrbg::new(cipher, entropy, Some(additional)).map(Into::into)
        }
    };
    let Ok(mut drbg) = built else {
        return;
    };

    match drbg.generate(count, Some(additional)) {
        Ok(out) => assert_eq!(out.len(), count),
        Err(RbgError::InvalidRequest { .. } | RbgError::InvalidInput { .. }) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
    match drbg.reseed(entropy, None) {
        Ok(()) => assert_eq!(drbg.reseed_counter(), 1),
        Err(RbgError::InvalidInput { .. }) => {}
        Err(e) => panic!("unexpected reseed error: {e}"),
    }
});
