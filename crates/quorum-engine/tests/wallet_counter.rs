//! End-to-end wallet scenarios against the counter callee.

use quorum_counter::{increment_payload, CounterResponse, MultisigCounter};
use quorum_engine::{CallExecutor, ExecError, Multisig};
use quorum_types::{AccAddress, DeployConfig, EngineError};

fn addr(seed: &[u8]) -> AccAddress {
    AccAddress::from_pubkey(seed)
}

fn init_logs() {
    // subscriber may already be installed by another test
    let _ = quorum_log::init_tracing_test();
}

fn deploy() -> DeployConfig {
    DeployConfig {
        confidential: false,
        gas_limit: 0xF42400,
    }
}

/// In-process call router: forwards wallet calls to the deployed counter.
struct LocalRouter {
    wallet_identity: AccAddress,
    counter_address: AccAddress,
    counter: MultisigCounter,
}

impl LocalRouter {
    fn new(wallet_identity: AccAddress) -> Self {
        let counter_address = addr(b"counter-service");
        Self {
            wallet_identity,
            counter_address,
            counter: MultisigCounter::new(wallet_identity),
        }
    }
}

impl CallExecutor for LocalRouter {
    fn invoke(
        &mut self,
        destination: AccAddress,
        _value: u64,
        payload: &[u8],
        deploy: &DeployConfig,
    ) -> Result<Vec<u8>, ExecError> {
        if deploy.gas_limit == 0 {
            return Err(ExecError::Environment("empty gas budget".to_string()));
        }
        if destination != self.counter_address {
            return Err(ExecError::UnknownDestination(destination));
        }
        self.counter
            .handle_call(self.wallet_identity, payload)
            .map_err(|e| ExecError::Rejected(e.to_string()))
    }
}

#[test]
fn single_owner_submit_confirm_execute() {
    init_logs();
    let x = addr(b"owner-x");
    let wallet_identity = addr(b"wallet");
    let mut router = LocalRouter::new(wallet_identity);
    let counter_address = router.counter_address;

    let mut wallet = Multisig::new(vec![x], 1, deploy()).unwrap();

    let id = wallet
        .submit_transaction(x, counter_address, 0, increment_payload())
        .unwrap();
    assert_eq!(id, 0);
    assert_eq!(wallet.is_confirmed(0), Ok(false));

    wallet.confirm_transaction(x, 0).unwrap();
    assert_eq!(wallet.is_confirmed(0), Ok(true));

    let ret = wallet.execute_transaction(x, 0, &mut router).unwrap();
    let response: CounterResponse = serde_json::from_slice(&ret).unwrap();
    assert_eq!(response.count, 1);
    assert!(wallet.get_transaction(0).unwrap().executed());
}

#[test]
fn two_owner_quorum_and_revocation() {
    init_logs();
    let x = addr(b"owner-x");
    let y = addr(b"owner-y");
    let mut wallet = Multisig::new(vec![x, y], 2, deploy()).unwrap();
    let dest = addr(b"anywhere");

    wallet.submit_transaction(x, dest, 0, vec![]).unwrap();

    wallet.confirm_transaction(x, 0).unwrap();
    assert_eq!(wallet.is_confirmed(0), Ok(false));
    wallet.confirm_transaction(y, 0).unwrap();
    assert_eq!(wallet.is_confirmed(0), Ok(true));
    wallet.revoke_confirmation(x, 0).unwrap();
    assert_eq!(wallet.is_confirmed(0), Ok(false));
}

#[test]
fn execution_is_exactly_once_against_counter() {
    init_logs();
    let x = addr(b"owner-x");
    let wallet_identity = addr(b"wallet");
    let mut router = LocalRouter::new(wallet_identity);
    let counter_address = router.counter_address;

    let mut wallet = Multisig::new(vec![x], 1, deploy()).unwrap();
    wallet
        .submit_transaction(x, counter_address, 0, increment_payload())
        .unwrap();
    wallet.confirm_transaction(x, 0).unwrap();

    wallet.execute_transaction(x, 0, &mut router).unwrap();
    assert_eq!(router.counter.count(), 1);

    let err = wallet.execute_transaction(x, 0, &mut router).unwrap_err();
    assert_eq!(err, EngineError::AlreadyExecuted(0));
    assert_eq!(router.counter.count(), 1);
}

#[test]
fn rejected_call_surfaces_and_stays_retryable() {
    init_logs();
    let x = addr(b"owner-x");
    let wallet_identity = addr(b"wallet");
    let mut router = LocalRouter::new(wallet_identity);

    let mut wallet = Multisig::new(vec![x], 1, deploy()).unwrap();
    // unknown destination: nothing is registered at this address
    wallet
        .submit_transaction(x, addr(b"nowhere"), 0, increment_payload())
        .unwrap();
    wallet.confirm_transaction(x, 0).unwrap();

    let err = wallet.execute_transaction(x, 0, &mut router).unwrap_err();
    assert!(matches!(err, EngineError::ExecutionFailed(_)));
    assert!(!wallet.get_transaction(0).unwrap().executed());
    assert_eq!(router.counter.count(), 0);
    // still executable once the environment is fixed; here it never is,
    // but the confirmation set is intact
    assert_eq!(wallet.is_confirmed(0), Ok(true));
}
