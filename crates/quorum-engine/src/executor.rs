//! Call executor capability boundary.
//!
//! The engine decides *when* an authorized call runs; the executor decides
//! *how*. The hosting environment supplies an implementation and the engine
//! invokes it with the stored destination, value, and opaque payload.

use quorum_types::{AccAddress, DeployConfig};
use thiserror::Error;

/// Executor error types
///
/// Contract: a returned error means the call had no effect. Implementations
/// must not report failure after applying partial state changes, since the
/// engine reopens the transaction for retry on error.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The destination rejected the call
    #[error("call rejected: {0}")]
    Rejected(String),

    /// No callee is registered at the destination
    #[error("unknown destination: {0}")]
    UnknownDestination(AccAddress),

    /// The environment could not complete the call
    #[error("environment error: {0}")]
    Environment(String),
}

/// Capability for performing an authorized outbound call
pub trait CallExecutor {
    /// Perform the call and return its return data
    ///
    /// `deploy` is the environment header the wallet was created with;
    /// the engine forwards it opaquely and the executor decides how to
    /// apply the gas budget and confidentiality flag.
    fn invoke(
        &mut self,
        destination: AccAddress,
        value: u64,
        payload: &[u8],
        deploy: &DeployConfig,
    ) -> Result<Vec<u8>, ExecError>;
}
