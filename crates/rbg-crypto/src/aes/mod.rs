//! AES block cipher (encrypt direction only).
//!
//! Thin adapter over the RustCrypto `aes` crate exposing the
//! [`BlockCipher`] interface that CTR-DRBG encrypts through. Round keys are
//! zeroized on drop by the underlying implementation.

use ::aes::cipher::generic_array::GenericArray;
use ::aes::cipher::{BlockEncrypt, KeyInit};
use ::aes::{Aes128, Aes192, Aes256};
use rbg_types::RbgError;

use crate::provider::BlockCipher;

/// AES block size in bytes (128 bits).
pub const AES_BLOCK_SIZE: usize = 16;

/// Accepted key lengths in bytes: AES-128, AES-192, AES-256.
pub const AES_KEY_SIZES: &[usize] = &[16, 24, 32];

enum Schedule {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// An AES key with precomputed round keys.
pub struct AesKey {
    schedule: Schedule,
    key_len: usize,
}

impl AesKey {
    /// Create a new AES key from raw bytes.
    ///
    /// Accepts 16, 24, or 32-byte keys for AES-128, AES-192, and AES-256.
    pub fn new(key: &[u8]) -> Result<Self, RbgError> {
        let bad_len = |_| RbgError::InvalidKeyLength {
            got: key.len(),
            accepted: AES_KEY_SIZES,
        };
        let schedule = match key.len() {
            16 => Schedule::Aes128(Aes128::new_from_slice(key).map_err(bad_len)?),
            24 => Schedule::Aes192(Aes192::new_from_slice(key).map_err(bad_len)?),
            32 => Schedule::Aes256(Aes256::new_from_slice(key).map_err(bad_len)?),
            got => {
                return Err(RbgError::InvalidKeyLength {
                    got,
                    accepted: AES_KEY_SIZES,
                })
            }
        };
        Ok(Self {
            schedule,
            key_len: key.len(),
        })
    }

    /// Encrypt a single 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), RbgError> {
        if block.len() != AES_BLOCK_SIZE {
            return Err(RbgError::InvalidInput {
                input: "cipher block",
                len: block.len(),
                min: AES_BLOCK_SIZE,
                max: AES_BLOCK_SIZE,
            });
        }
        let block = GenericArray::from_mut_slice(block);
        match &self.schedule {
            Schedule::Aes128(c) => c.encrypt_block(block),
            Schedule::Aes192(c) => c.encrypt_block(block),
            Schedule::Aes256(c) => c.encrypt_block(block),
        }
        Ok(())
    }
}

impl BlockCipher for AesKey {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn key_size(&self) -> usize {
        self.key_len
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), RbgError> {
        AesKey::encrypt_block(self, block)
    }
}
