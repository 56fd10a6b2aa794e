//! Error types shared by the ward simulation crates.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WardError {
    /// A precondition on the inputs was violated before integration began.
    #[error("domain error: {0}")]
    Domain(String),

    /// The solver could not produce a trajectory for otherwise valid inputs.
    #[error("computation error: {0}")]
    Computation(String),
}

impl WardError {
    pub fn is_domain(&self) -> bool {
        matches!(self, WardError::Domain(_))
    }

    pub fn is_computation(&self) -> bool {
        matches!(self, WardError::Computation(_))
    }
}

pub type Result<T> = std::result::Result<T, WardError>;
