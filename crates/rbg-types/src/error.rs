/// DRBG operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RbgError {
    /// Entropy, nonce, personalization string or additional input has a
    /// length outside the bounds of the selected algorithm.
    #[error("drbg: invalid {input} length {len}, expected {min}..={max}")]
    InvalidInput {
        input: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },
    /// Generate called with a byte count outside `1..max`.
    #[error("drbg: invalid request of {requested} bytes, expected 1..{max}")]
    InvalidRequest { requested: usize, max: usize },
    /// The reseed interval is exhausted; reseed and retry the same request.
    #[error("drbg: reseed required")]
    ReseedRequired,
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),
    #[error("drbg: failed to obtain entropy")]
    EntropyFail,
    /// Key length not in `accepted`.
    #[error("invalid key length {got}, expected one of {accepted:?}")]
    InvalidKeyLength {
        got: usize,
        accepted: &'static [usize],
    },
    #[error("drbg: invalid reseed interval {requested}, expected 1..={max}")]
    InvalidReseedInterval { requested: u64, max: u64 },
}

impl RbgError {
    /// True for the mandatory-reseed control signal.
    pub fn is_reseed_required(&self) -> bool {
        matches!(self, Self::ReseedRequired)
    }
}

/// Self-test (health test) errors.
#[derive(Debug, thiserror::Error)]
pub enum SelfTestError {
    #[error("self-test: known answer test failed: {0}")]
    KatFailure(String),
    #[error("self-test: module is in error state")]
    InvalidState,
}
