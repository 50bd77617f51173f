//! Primitive interfaces consumed by the DRBG mechanisms.
//!
//! The block cipher, hash and keyed-hash functions are treated as opaque
//! collaborators: the DRBGs only see these traits.

use digest::DynDigest;
use rbg_types::RbgError;

/// A block cipher keyed for encryption (e.g., AES).
pub trait BlockCipher: Send + Sync {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Key size in bytes.
    fn key_size(&self) -> usize;

    /// Encrypt a single block in-place.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), RbgError>;
}

/// A hash / message digest algorithm.
pub trait HashAlgorithm: Send + Sync {
    /// Create a new digest context.
    fn new_digest(&self) -> Box<dyn DynDigest>;

    /// One-shot digest over the concatenation of `parts`.
    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut ctx = self.new_digest();
        for part in parts {
            ctx.update(part);
        }
        ctx.finalize().into_vec()
    }
}

/// A keyed-hash message authentication code.
pub trait MacAlgorithm: Send + Sync {
    /// One-shot MAC under `key` over the concatenation of `parts`.
    fn mac(&self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, RbgError>;
}
