#![forbid(unsafe_code)]
#![doc = "NIST SP 800-90A deterministic random bit generators."]

// Core traits
pub mod provider;

// Primitives
pub mod aes;
pub mod hash;
pub mod hmac;

pub mod codec;
pub mod drbg;
pub mod entropy;

#[cfg(feature = "fips")]
pub mod fips;

pub use drbg::{
    AnyDrbg, CtrDrbg, DrbgConfig, HashDrbg, HmacDrbg, RandomBitGenerator, RandomByteStream,
};
pub use rbg_types::{CipherAlgId, HashAlgId, RandAlgId, RbgError};
