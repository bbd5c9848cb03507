//! M-of-N multi-signature authorization engine.
//!
//! A `Multisig` instance owns an immutable owner set, a confirmation
//! quorum, and an append-only transaction ledger. Owners submit outbound
//! calls, confirm or revoke them, and once the quorum is reached any owner
//! may trigger execution through a [`CallExecutor`] capability.
//!
//! Every operation is a single atomic state transition: all precondition
//! checks happen before any mutation, and errors are returned synchronously
//! to the caller.

pub mod executor;
pub mod persist;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use quorum_types::{AccAddress, DeployConfig, EngineError};

pub use executor::{CallExecutor, ExecError};

/// Lifecycle of a ledger entry.
///
/// The only transition is `Pending -> Executed`, taken exactly once. The
/// flag flips *before* the call executor runs and rolls back only when the
/// executor reports an atomic failure, so a reentrant call during the
/// executor window observes `Executed` and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Executed,
}

/// One pending or historical authorization request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    destination: AccAddress,
    value: u64,
    data: Vec<u8>,
    status: TxStatus,
    confirmations: BTreeSet<AccAddress>,
}

impl Transaction {
    /// Call target
    pub fn destination(&self) -> AccAddress {
        self.destination
    }

    /// Amount transferred alongside the call
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Opaque call payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the action has successfully run
    pub fn executed(&self) -> bool {
        self.status == TxStatus::Executed
    }

    /// Owners that currently confirm this transaction
    pub fn confirmations(&self) -> &BTreeSet<AccAddress> {
        &self.confirmations
    }
}

/// The authorization engine: owner set, quorum, and transaction ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Multisig {
    owners: BTreeSet<AccAddress>,
    required: u32,
    transactions: Vec<Transaction>,
    deploy: DeployConfig,
}

impl Multisig {
    /// Create an engine with an immutable owner set and quorum threshold
    ///
    /// Fails with `InvalidConfiguration` when the owner list is empty,
    /// contains duplicates, or `required` falls outside `1..=owners.len()`.
    pub fn new(
        owners: Vec<AccAddress>,
        required: u32,
        deploy: DeployConfig,
    ) -> Result<Self, EngineError> {
        if owners.is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "owner list is empty".to_string(),
            ));
        }

        let owner_set: BTreeSet<AccAddress> = owners.iter().copied().collect();
        if owner_set.len() != owners.len() {
            return Err(EngineError::InvalidConfiguration(
                "duplicate owner address".to_string(),
            ));
        }

        if required == 0 || required as usize > owner_set.len() {
            return Err(EngineError::InvalidConfiguration(format!(
                "required must be between 1 and {}, got {}",
                owner_set.len(),
                required
            )));
        }

        info!(
            owners = owner_set.len(),
            required, "multisig wallet created"
        );

        Ok(Self {
            owners: owner_set,
            required,
            transactions: Vec::new(),
            deploy,
        })
    }

    /// Queue an outbound call for confirmation
    ///
    /// Submission does not confirm on behalf of the submitter; confirming
    /// is a separate explicit step. Returns the new transaction id.
    pub fn submit_transaction(
        &mut self,
        caller: AccAddress,
        destination: AccAddress,
        value: u64,
        data: Vec<u8>,
    ) -> Result<u64, EngineError> {
        self.check_owner(caller)?;

        let id = self.transactions.len() as u64;
        self.transactions.push(Transaction {
            destination,
            value,
            data,
            status: TxStatus::Pending,
            confirmations: BTreeSet::new(),
        });

        info!(id, destination = %destination, value, "transaction submitted");
        Ok(id)
    }

    /// Add the caller's confirmation to a pending transaction
    pub fn confirm_transaction(
        &mut self,
        caller: AccAddress,
        id: u64,
    ) -> Result<(), EngineError> {
        self.check_owner(caller)?;

        let tx = transaction_mut(&mut self.transactions, id)?;
        if tx.status == TxStatus::Executed {
            return Err(EngineError::AlreadyExecuted(id));
        }
        // Re-confirming is a caller error, not a no-op; silent success
        // would mask caller bugs.
        if !tx.confirmations.insert(caller) {
            return Err(EngineError::AlreadyConfirmed(id));
        }

        debug!(id, caller = %caller, confirmations = tx.confirmations.len(), "transaction confirmed");
        Ok(())
    }

    /// Remove the caller's confirmation from a pending transaction
    ///
    /// The ledger entry of an executed transaction is immutable history,
    /// so revocation after execution is rejected.
    pub fn revoke_confirmation(
        &mut self,
        caller: AccAddress,
        id: u64,
    ) -> Result<(), EngineError> {
        self.check_owner(caller)?;

        let tx = transaction_mut(&mut self.transactions, id)?;
        if tx.status == TxStatus::Executed {
            return Err(EngineError::AlreadyExecuted(id));
        }
        if !tx.confirmations.remove(&caller) {
            return Err(EngineError::NotConfirmed(id));
        }

        debug!(id, caller = %caller, confirmations = tx.confirmations.len(), "confirmation revoked");
        Ok(())
    }

    /// Whether the transaction has reached the confirmation quorum
    pub fn is_confirmed(&self, id: u64) -> Result<bool, EngineError> {
        let tx = self.get_transaction(id)?;
        Ok(tx.confirmations.len() >= self.required as usize)
    }

    /// Execute a transaction that has reached quorum
    ///
    /// The transaction is marked executed before control leaves the engine;
    /// the executor contract guarantees failures leave no partial effects,
    /// in which case the flag rolls back and the transaction stays
    /// retryable. Returns the executor's return data on success.
    pub fn execute_transaction(
        &mut self,
        caller: AccAddress,
        id: u64,
        executor: &mut dyn CallExecutor,
    ) -> Result<Vec<u8>, EngineError> {
        self.check_owner(caller)?;

        let required = self.required;
        let tx = transaction_mut(&mut self.transactions, id)?;
        if tx.status == TxStatus::Executed {
            return Err(EngineError::AlreadyExecuted(id));
        }
        let confirmations = tx.confirmations.len();
        if confirmations < required as usize {
            return Err(EngineError::QuorumNotReached(id, confirmations, required));
        }

        // Consume the transaction before invoking the executor so nothing
        // can pass the executed guard for this id while the call is out.
        tx.status = TxStatus::Executed;
        let destination = tx.destination;
        let value = tx.value;
        let data = tx.data.clone();

        match executor.invoke(destination, value, &data, &self.deploy) {
            Ok(return_data) => {
                info!(id, destination = %destination, "transaction executed");
                Ok(return_data)
            }
            Err(err) => {
                // ExecError is atomic by contract, so the entry can be
                // reopened for a later retry.
                self.transactions[id as usize].status = TxStatus::Pending;
                warn!(id, error = %err, "execution failed, transaction reopened");
                Err(EngineError::ExecutionFailed(err.to_string()))
            }
        }
    }

    /// Owner set in stable (sorted) order
    pub fn get_owners(&self) -> Vec<AccAddress> {
        self.owners.iter().copied().collect()
    }

    /// Confirmation quorum
    pub fn get_required(&self) -> u32 {
        self.required
    }

    /// Snapshot of one ledger entry
    pub fn get_transaction(&self, id: u64) -> Result<&Transaction, EngineError> {
        self.transactions
            .get(id as usize)
            .ok_or(EngineError::NotFound(id))
    }

    /// Number of ledger entries, executed included
    pub fn transaction_count(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// Deployment header this wallet was created with
    pub fn deploy_config(&self) -> &DeployConfig {
        &self.deploy
    }

    fn check_owner(&self, caller: AccAddress) -> Result<(), EngineError> {
        if !self.owners.contains(&caller) {
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }
}

fn transaction_mut(
    transactions: &mut [Transaction],
    id: u64,
) -> Result<&mut Transaction, EngineError> {
    transactions
        .get_mut(id as usize)
        .ok_or(EngineError::NotFound(id))
}
