//! Counter callee service.
//!
//! A minimal downstream service the multisig wallet calls into: it keeps
//! one integer and only the configured caller (the deployed wallet) may
//! increment it. The payload surface is a serde-tagged message enum so the
//! wallet can forward opaque bytes without knowing the encoding.

use quorum_types::AccAddress;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Counter error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CounterError {
    /// Caller is not the configured wallet
    #[error("only the deployed multisig wallet can make this call")]
    NotAllowed,

    /// Payload did not decode to a known message
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Counter value overflowed
    #[error("counter overflow")]
    Overflow,
}

/// The messages this service can handle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CounterMsg {
    /// Increment the counter by one
    #[serde(rename = "counter/Increment")]
    Increment,

    /// Query the current counter value
    #[serde(rename = "counter/Query")]
    Query,
}

/// Response to a counter call, serialized back to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterResponse {
    pub count: u64,
}

/// Counter service with a single allowed caller
#[derive(Debug, Clone)]
pub struct MultisigCounter {
    count: u64,
    allowed: AccAddress,
}

impl MultisigCounter {
    /// Create a counter that only `allowed` may increment
    pub fn new(allowed: AccAddress) -> Self {
        Self { count: 0, allowed }
    }

    /// Increment the counter by one
    pub fn increment(&mut self, caller: AccAddress) -> Result<(), CounterError> {
        if self.allowed != caller {
            return Err(CounterError::NotAllowed);
        }
        self.count = self.count.checked_add(1).ok_or(CounterError::Overflow)?;
        debug!(count = self.count, "counter incremented");
        Ok(())
    }

    /// Current counter value
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Decode an opaque payload and dispatch it
    ///
    /// This is the entry point a call router forwards wallet payload bytes
    /// to. Returns the serialized [`CounterResponse`].
    pub fn handle_call(
        &mut self,
        caller: AccAddress,
        payload: &[u8],
    ) -> Result<Vec<u8>, CounterError> {
        let msg: CounterMsg = serde_json::from_slice(payload)
            .map_err(|e| CounterError::InvalidPayload(e.to_string()))?;

        match msg {
            CounterMsg::Increment => self.increment(caller)?,
            CounterMsg::Query => {}
        }

        let response = CounterResponse { count: self.count };
        serde_json::to_vec(&response).map_err(|e| CounterError::InvalidPayload(e.to_string()))
    }
}

/// Encode an increment message as payload bytes
pub fn increment_payload() -> Vec<u8> {
    serde_json::to_vec(&CounterMsg::Increment).expect("static message serializes")
}
