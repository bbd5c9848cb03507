//! Address types for quorum

use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Account address - 20 bytes
///
/// Owner identities and call destinations are both plain 20-byte
/// account addresses. The text encoding is lowercase hex with an
/// optional `0x` prefix, which is what deployment tooling passes in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccAddress([u8; 20]);

impl Default for AccAddress {
    fn default() -> Self {
        Self([0u8; 20])
    }
}

impl AccAddress {
    /// Create an address from raw bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an address from a public key using the standard derivation
    /// ripemd160(sha256(pubkey_bytes))
    pub fn from_pubkey(pubkey_bytes: &[u8]) -> Self {
        let sha256_hash = Sha256::digest(pubkey_bytes);
        let ripemd160_hash = Ripemd160::digest(sha256_hash);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&ripemd160_hash);
        Self(bytes)
    }

    /// Parse from a hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let data = hex::decode(stripped).map_err(|e| e.to_string())?;
        if data.len() != 20 {
            return Err("invalid address length".to_string());
        }
        let mut addr_bytes = [0u8; 20];
        addr_bytes.copy_from_slice(&data);
        Ok(Self(addr_bytes))
    }

    /// Convert to a `0x`-prefixed hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for AccAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
