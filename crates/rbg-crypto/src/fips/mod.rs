//! DRBG health testing (NIST SP 800-90A §11.3).
//!
//! Provides a self-test state machine for the generators in this crate:
//! - **State machine**: PreOperational → SelfTesting → Operational / Error
//! - **KAT**: known-answer tests for each DRBG family
//! - **Reseed enforcement**: a generator must refuse to run past its
//!   reseed interval
//!
//! All functionality is gated behind `#[cfg(feature = "fips")]`.

mod kat;

use log::{error, info};
use rbg_types::SelfTestError;

/// Module operational states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FipsState {
    /// Initial state before self-tests have been run.
    PreOperational,
    /// Self-tests are currently executing.
    SelfTesting,
    /// All self-tests passed; generators may be used.
    Operational,
    /// A self-test failed; generators must not be used.
    Error,
}

/// Manages self-test state and execution.
///
/// # Usage
///
/// ```
/// use rbg_crypto::fips::FipsModule;
///
/// let mut module = FipsModule::new();
/// module.run_self_tests().expect("DRBG self-tests failed");
/// assert!(module.is_operational());
/// ```
pub struct FipsModule {
    state: FipsState,
}

impl FipsModule {
    /// Create a new module in `PreOperational` state.
    pub fn new() -> Self {
        FipsModule {
            state: FipsState::PreOperational,
        }
    }

    pub fn state(&self) -> FipsState {
        self.state
    }

    pub fn is_operational(&self) -> bool {
        self.state == FipsState::Operational
    }

    /// Run all DRBG self-tests.
    ///
    /// On success, transitions to `Operational`. On failure, transitions to
    /// `Error` and returns the first failure; the error state is permanent.
    pub fn run_self_tests(&mut self) -> Result<(), SelfTestError> {
        if self.state == FipsState::Error {
            return Err(SelfTestError::InvalidState);
        }

        self.state = FipsState::SelfTesting;
        if let Err(e) = kat::run_all_kat() {
            error!("drbg self-test failed: {e}");
            self.state = FipsState::Error;
            return Err(e);
        }

        self.state = FipsState::Operational;
        info!("drbg self-tests passed");
        Ok(())
    }
}

impl Default for FipsModule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fips_module_initial_state() {
        let module = FipsModule::default();
        assert_eq!(module.state(), FipsState::PreOperational);
        assert!(!module.is_operational());
    }

    #[test]
    fn test_fips_module_self_tests_pass() {
        let mut module = FipsModule::new();
        module.run_self_tests().expect("self-tests should pass");
        assert_eq!(module.state(), FipsState::Operational);

        // Re-running from Operational is allowed.
        module.run_self_tests().unwrap();
        assert!(module.is_operational());
    }

    #[test]
    fn test_fips_module_error_state_is_permanent() {
        let mut module = FipsModule::new();
        module.state = FipsState::Error;
        assert!(matches!(
            module.run_self_tests(),
            Err(SelfTestError::InvalidState)
        ));
        assert_eq!(module.state(), FipsState::Error);
    }
}
