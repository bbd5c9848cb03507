//! Error handling for quorum

use thiserror::Error;

/// Top-level engine error enum that can cross module boundaries
///
/// Every operation returns its error synchronously to the caller; the
/// engine never retries internally and never mutates state before a
/// precondition check fails.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unauthorized: caller is not an owner")]
    Unauthorized,

    #[error("transaction not found: {0}")]
    NotFound(u64),

    #[error("transaction {0} already executed")]
    AlreadyExecuted(u64),

    #[error("transaction {0} already confirmed by caller")]
    AlreadyConfirmed(u64),

    #[error("transaction {0} not confirmed by caller")]
    NotConfirmed(u64),

    #[error("transaction {0} below quorum: {1} of {2} confirmations")]
    QuorumNotReached(u64, usize, u32),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

/// Trait for errors that map onto stable error codes
pub trait IsModuleError {
    /// Returns the module's unique codespace string (e.g., "multisig")
    fn codespace(&self) -> &'static str;

    /// Returns the numeric error code for the variant
    fn code(&self) -> u32;
}

impl IsModuleError for EngineError {
    fn codespace(&self) -> &'static str {
        "multisig"
    }

    fn code(&self) -> u32 {
        match self {
            EngineError::InvalidConfiguration(_) => 2,
            EngineError::Unauthorized => 3,
            EngineError::NotFound(_) => 4,
            EngineError::AlreadyExecuted(_) => 5,
            EngineError::AlreadyConfirmed(_) => 6,
            EngineError::NotConfirmed(_) => 7,
            EngineError::QuorumNotReached(..) => 8,
            EngineError::ExecutionFailed(_) => 9,
        }
    }
}
