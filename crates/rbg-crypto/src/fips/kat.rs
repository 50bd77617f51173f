//! Known Answer Tests for the DRBG families.

use rbg_types::{CipherAlgId, HashAlgId, RbgError, SelfTestError};
use subtle::ConstantTimeEq;

use crate::drbg::{CtrDrbg, HashDrbg, HmacDrbg, RandomBitGenerator};

/// Decode a hex string. KAT vectors are compile-time constants, so a
/// malformed one is reported as a KAT failure.
fn hex(s: &str) -> Result<Vec<u8>, SelfTestError> {
    if s.len() % 2 != 0 {
        return Err(SelfTestError::KatFailure(format!("odd-length hex vector {s:?}")));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| SelfTestError::KatFailure(format!("bad hex vector: {e}")))
        })
        .collect()
}

fn step(name: &'static str, what: &'static str) -> impl FnOnce(RbgError) -> SelfTestError {
    move |e| SelfTestError::KatFailure(format!("{name} {what}: {e}"))
}

fn compare(name: &str, got: &[u8], expected: &[u8]) -> Result<(), SelfTestError> {
    if got.ct_eq(expected).into() {
        Ok(())
    } else {
        Err(SelfTestError::KatFailure(format!("{name} output mismatch")))
    }
}

/// Run all known answer tests, returning the first failure.
pub(crate) fn run_all_kat() -> Result<(), SelfTestError> {
    kat_hmac_drbg()?;
    kat_hash_drbg()?;
    kat_ctr_drbg()?;
    kat_reseed_enforced()?;
    Ok(())
}

/// HMAC-DRBG SHA-256 with personalization, reseed and additional input
/// (CAVP HMAC_DRBG.rsp).
fn kat_hmac_drbg() -> Result<(), SelfTestError> {
    const NAME: &str = "HMAC-DRBG SHA-256";
    let entropy = hex("cdb0d9117cc6dbc9ef9dcb06a97579841d72dc18b2d46a1cb61e314012bdf416")?;
    let nonce = hex("d0c0d01d156016d0eb6b7e9c7c3c8da8")?;
    let pers = hex("6f0fb9eab3f9ea7ab0a719bfa879bf0aaed683307fda0c6d73ce018b6e34faaa")?;

    let entropy_reseed = hex("8ec6f7d5a8e2e88f43986f70b86e050d07c84b931bcf18e601c5a3eee3064c82")?;
    let addin_reseed = hex("1ab4ca9014fa98a55938316de8ba5a68c629b0741bdd058c4d70c91cda5099b3")?;
    let addin1 = hex("16e2d0721b58d839a122852abd3bf2c942a31c84d82fca74211871880d7162ff")?;
    let addin2 = hex("53686f042a7b087d5d2eca0d2a96de131f275ed7151189f7ca52deaa78b79fb2")?;

    let expected = hex(
        "dda04a2ca7b8147af1548f5d086591ca4fd951a345ce52b3cd49d47e84aa31a1\
         83e31fbc42a1ff1d95afec7143c8008c97bc2a9c091df0a763848391f68cb4a3\
         66ad89857ac725a53b303ddea767be8dc5f605b1b95f6d24c9f06be65a973a08\
         9320b3cc42569dcfd4b92b62a993785b0301b3fc452445656fce22664827b88f",
    )?;

    let mut drbg = HmacDrbg::new(HashAlgId::Sha256, &entropy, &nonce, Some(pers.as_slice()))
        .map_err(step(NAME, "instantiate"))?;
    drbg.reseed(&entropy_reseed, Some(addin_reseed.as_slice()))
        .map_err(step(NAME, "reseed"))?;
    // Generate #1 (discard)
    drbg.generate(expected.len(), Some(addin1.as_slice()))
        .map_err(step(NAME, "generate1"))?;
    // Generate #2 (compare)
    let out = drbg
        .generate(expected.len(), Some(addin2.as_slice()))
        .map_err(step(NAME, "generate2"))?;
    compare(NAME, &out, &expected)
}

/// Hash-DRBG SHA-1 with additional input (CAVP Hash_DRBG.rsp).
fn kat_hash_drbg() -> Result<(), SelfTestError> {
    const NAME: &str = "Hash-DRBG SHA-1";
    let entropy = hex("c3ef82ce241f02e4298b118ca4f16225")?;
    let nonce = hex("15e32abbae6b7433")?;
    let addin1 = hex("2b790052f09b364d4a8267a0a7de63b8")?;
    let addin2 = hex("2ee0819a671d07b5085cc46aa0e61b56")?;
    let expected = hex(
        "5825fa1d1dc33c64cdc8690682eff06039e79508c3af48e880f8227d5f9aaa14\
         b3bc76baee477ebbb5c45547134179223257525e8f3afefb78b59da032f1006d\
         74c9831375a677eab3239c94ebe3f7fa",
    )?;

    let mut drbg = HashDrbg::new(HashAlgId::Sha1, &entropy, &nonce, None)
        .map_err(step(NAME, "instantiate"))?;
    drbg.generate(expected.len(), Some(addin1.as_slice()))
        .map_err(step(NAME, "generate1"))?;
    let out = drbg
        .generate(expected.len(), Some(addin2.as_slice()))
        .map_err(step(NAME, "generate2"))?;
    compare(NAME, &out, &expected)
}

/// CTR-DRBG AES-128 without derivation function, with additional input
/// (CAVP CTR_DRBG.rsp).
fn kat_ctr_drbg() -> Result<(), SelfTestError> {
    const NAME: &str = "CTR-DRBG AES-128";
    let entropy = hex("6bd4f2ae649fc99350951ff0c5d460c1a9214154e7384975ee54b34b7cae0704")?;
    let addin1 = hex("ecd4893b979ac92db1894ae3724518a2f78cf2dbe2f6bbc6fda596df87c7a4ae")?;
    let addin2 = hex("b23e9188687c88768b26738862c4791fa52f92502e1f94bf66af017c4228a0dc")?;
    let expected = hex(
        "5b2bf7a5c60d8ab6591110cbd61cd387b02de19784f496d1a109123d8b3562a5\
         de2dd6d5d1aef957a6c4f371cecd93c15799d82e34d6a0dba7e915a27d8e65f3",
    )?;

    let mut drbg = CtrDrbg::new(CipherAlgId::Aes128, &entropy, None)
        .map_err(step(NAME, "instantiate"))?;
    drbg.generate(expected.len(), Some(addin1.as_slice()))
        .map_err(step(NAME, "generate1"))?;
    let out = drbg
        .generate(expected.len(), Some(addin2.as_slice()))
        .map_err(step(NAME, "generate2"))?;
    compare(NAME, &out, &expected)
}

/// A generator past its reseed interval must refuse to generate, and must
/// recover after a reseed.
fn kat_reseed_enforced() -> Result<(), SelfTestError> {
    const NAME: &str = "reseed enforcement";
    let mut drbg = HmacDrbg::new(HashAlgId::Sha256, &[0u8; 32], &[0u8; 16], None)
        .map_err(step(NAME, "instantiate"))?;
    drbg.set_reseed_interval(1).map_err(step(NAME, "configure"))?;
    drbg.generate(16, None).map_err(step(NAME, "generate"))?;
    match drbg.generate(16, None) {
        Err(RbgError::ReseedRequired) => {}
        Ok(_) => {
            return Err(SelfTestError::KatFailure(format!(
                "{NAME}: generate succeeded past the reseed interval"
            )))
        }
        Err(e) => return Err(step(NAME, "generate")(e)),
    }
    drbg.reseed(&[1u8; 32], None).map_err(step(NAME, "reseed"))?;
    drbg.generate(16, None).map_err(step(NAME, "generate after reseed"))?;
    Ok(())
}
