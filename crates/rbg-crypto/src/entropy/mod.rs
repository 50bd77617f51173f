//! Entropy input for DRBG instantiation and reseeding.
//!
//! The DRBGs never read entropy themselves: the factory and the
//! auto-reseeding stream pull it from an [`EntropySource`], which defaults
//! to the operating system generator.
//!
//! ```
//! use rbg_crypto::entropy::{EntropySource, SystemEntropy};
//!
//! let mut buf = [0u8; 32];
//! SystemEntropy.get_entropy(&mut buf).expect("entropy acquisition failed");
//! ```

use rbg_types::RbgError;

/// Trait for pluggable entropy sources.
///
/// Implementors must fill the whole buffer with full-entropy bytes or fail;
/// there is no fallback to a weaker source.
pub trait EntropySource: Send {
    /// Human-readable name of the source.
    fn name(&self) -> &str;

    /// Fill `buf` with entropy.
    fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), RbgError>;
}

/// System entropy source wrapping `getrandom`.
///
/// Stateless and safe to use from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn name(&self) -> &str {
        "system"
    }

    fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), RbgError> {
        getrandom::getrandom(buf).map_err(|err| {
            log::error!("system entropy source failed: {err}");
            RbgError::EntropyFail
        })
    }
}
