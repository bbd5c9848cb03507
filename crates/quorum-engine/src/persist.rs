//! Durable state snapshots.
//!
//! The engine's entire persisted footprint is the owner set, the quorum
//! threshold, the deployment header, and the transaction ledger. Snapshots
//! are written through the [`KVStore`] abstraction under a `multisig/` key
//! prefix, one entry per ledger transaction so the ledger reloads in id
//! order via prefix iteration.

use std::collections::BTreeSet;

use quorum_store::{KVStore, StoreError};
use quorum_types::{AccAddress, DeployConfig};
use thiserror::Error;
use tracing::debug;

use crate::{Multisig, Transaction};

const KEY_OWNERS: &[u8] = b"multisig/owners";
const KEY_REQUIRED: &[u8] = b"multisig/required";
const KEY_DEPLOY: &[u8] = b"multisig/deploy";
const TX_PREFIX: &str = "multisig/tx/";

/// Persistence error types
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("missing key: {0}")]
    Missing(&'static str),
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, PersistError> {
    serde_json::to_vec(value).map_err(|e| PersistError::Codec(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, PersistError> {
    serde_json::from_slice(bytes).map_err(|e| PersistError::Codec(e.to_string()))
}

fn tx_key(id: u64) -> Vec<u8> {
    // zero-padded so lexicographic key order equals id order
    format!("{TX_PREFIX}{id:020}").into_bytes()
}

/// Write a full snapshot of the engine into the store
pub fn save<S: KVStore>(wallet: &Multisig, store: &mut S) -> Result<(), PersistError> {
    let owners: Vec<AccAddress> = wallet.get_owners();
    store.set(KEY_OWNERS.to_vec(), encode(&owners)?)?;
    store.set(KEY_REQUIRED.to_vec(), encode(&wallet.get_required())?)?;
    store.set(KEY_DEPLOY.to_vec(), encode(wallet.deploy_config())?)?;

    // Drop stale ledger entries from an earlier snapshot before rewriting.
    let stale: Vec<Vec<u8>> = store
        .prefix_iterator(TX_PREFIX.as_bytes())
        .map(|(k, _)| k)
        .collect();
    for key in stale {
        store.delete(&key)?;
    }

    for (id, tx) in wallet.transactions.iter().enumerate() {
        store.set(tx_key(id as u64), encode(tx)?)?;
    }

    debug!(
        transactions = wallet.transaction_count(),
        "wallet snapshot saved"
    );
    Ok(())
}

/// Reload an engine from a snapshot written by [`save`]
pub fn load<S: KVStore>(store: &S) -> Result<Multisig, PersistError> {
    let owners: Vec<AccAddress> = decode(
        &store
            .get(KEY_OWNERS)?
            .ok_or(PersistError::Missing("multisig/owners"))?,
    )?;
    let required: u32 = decode(
        &store
            .get(KEY_REQUIRED)?
            .ok_or(PersistError::Missing("multisig/required"))?,
    )?;
    let deploy: DeployConfig = decode(
        &store
            .get(KEY_DEPLOY)?
            .ok_or(PersistError::Missing("multisig/deploy"))?,
    )?;

    let mut transactions: Vec<Transaction> = Vec::new();
    for (_key, value) in store.prefix_iterator(TX_PREFIX.as_bytes()) {
        transactions.push(decode(&value)?);
    }

    debug!(transactions = transactions.len(), "wallet snapshot loaded");
    Ok(Multisig {
        owners: owners.into_iter().collect::<BTreeSet<AccAddress>>(),
        required,
        transactions,
        deploy,
    })
}
