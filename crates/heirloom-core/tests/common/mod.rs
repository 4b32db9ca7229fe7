//! In-memory doubles for the wallet and indexer collaborators.
//!
//! `MockChain` plays the part of the deployed contract: submissions queue as
//! pending transactions, and finality applies the circuit's effect (or
//! rejects it, the way the real contract enforces its business rules).
//! Both mocks are `Clone` with shared internals so tests keep a handle after
//! moving a clone into the session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use heirloom_abstraction::{
    ContractAddress, EncodedState, IndexerClient, ProvenTransaction, ProviderError, TransactionId,
    UnprovenTransaction, WalletKeys, WalletProvider,
};
use heirloom_core::{encode_state, Address, ContractSession, LedgerState, ServiceConfig};

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        contract_address: "0200feed".to_string(),
        proof_artifact_path: "/zk/inheritance".to_string(),
        ..Default::default()
    }
}

/// Build a connected-ready session plus handles to its doubles.
pub fn test_session() -> (ContractSession<MockWallet, MockIndexer>, MockWallet, MockIndexer, Arc<MockChain>)
{
    let chain = MockChain::new();
    let wallet = MockWallet::new(chain.clone());
    let indexer = MockIndexer::new(chain.clone());
    let session = ContractSession::new(test_config(), wallet.clone(), indexer.clone());
    (session, wallet, indexer, chain)
}

/// The deployed contract and its chain, shared by both mock providers.
pub struct MockChain {
    ledger: Mutex<LedgerState>,
    pending: Mutex<HashMap<String, UnprovenTransaction>>,
    next_tx: AtomicU64,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ledger: Mutex::new(LedgerState::unregistered()),
            pending: Mutex::new(HashMap::new()),
            next_tx: AtomicU64::new(1),
        })
    }

    pub fn ledger(&self) -> LedgerState {
        self.ledger.lock().unwrap().clone()
    }

    pub fn set_ledger(&self, state: LedgerState) {
        *self.ledger.lock().unwrap() = state;
    }

    fn enqueue(&self, tx: UnprovenTransaction) -> TransactionId {
        let id = format!("tx-{:04}", self.next_tx.fetch_add(1, Ordering::Relaxed));
        self.pending.lock().unwrap().insert(id.clone(), tx);
        TransactionId(id)
    }

    /// Apply a pending transaction the way the contract's circuits would.
    fn finalize(&self, tx_id: &TransactionId) -> Result<(), ProviderError> {
        let tx = self
            .pending
            .lock()
            .unwrap()
            .remove(&tx_id.0)
            .ok_or_else(|| ProviderError::SubscriptionError(format!("unknown tx {}", tx_id)))?;

        let mut ledger = self.ledger.lock().unwrap();
        match tx.circuit_id.as_str() {
            "register" => {
                if ledger.is_registered {
                    return Err(ProviderError::Rejected("already registered".into()));
                }
                let parent = Address::from_hex(&tx.args[0])
                    .map_err(|e| ProviderError::Rejected(e.to_string()))?;
                let child = Address::from_hex(&tx.args[1])
                    .map_err(|e| ProviderError::Rejected(e.to_string()))?;
                *ledger = LedgerState { is_registered: true, is_executed: false, parent, child };
                Ok(())
            }
            "execute" => {
                if !ledger.is_registered {
                    return Err(ProviderError::Rejected("not registered".into()));
                }
                if ledger.is_executed {
                    return Err(ProviderError::Rejected("already executed".into()));
                }
                ledger.is_executed = true;
                Ok(())
            }
            other => Err(ProviderError::Rejected(format!("unknown circuit {}", other))),
        }
    }
}

/// Wallet double. Proving wraps the unproven payload in JSON; submission
/// enqueues it on the shared chain.
#[derive(Clone)]
pub struct MockWallet {
    chain: Arc<MockChain>,
    connected: Arc<AtomicBool>,
    fail_prove: Arc<AtomicBool>,
    fail_submit: Arc<AtomicBool>,
    /// When set, `balance_and_prove` parks until a permit is released.
    prove_gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
    pub proved: Arc<Mutex<Vec<UnprovenTransaction>>>,
}

impl MockWallet {
    pub fn new(chain: Arc<MockChain>) -> Self {
        Self {
            chain,
            connected: Arc::new(AtomicBool::new(true)),
            fail_prove: Arc::new(AtomicBool::new(false)),
            fail_submit: Arc::new(AtomicBool::new(false)),
            prove_gate: Arc::new(Mutex::new(None)),
            proved: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub fn fail_next_prove(&self) {
        self.fail_prove.store(true, Ordering::Relaxed);
    }

    pub fn fail_next_submit(&self) {
        self.fail_submit.store(true, Ordering::Relaxed);
    }

    /// Gate proving on a semaphore; returns the handle to release permits.
    pub fn gate_proving(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.prove_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn proved_count(&self) -> usize {
        self.proved.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn connected_keys(&self) -> Result<WalletKeys, ProviderError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(ProviderError::NoActiveSession);
        }
        Ok(WalletKeys {
            coin_public_key: "mock-coin-key".to_string(),
            encryption_public_key: "mock-encryption-key".to_string(),
        })
    }

    async fn balance_and_prove(
        &self,
        tx: UnprovenTransaction,
    ) -> Result<ProvenTransaction, ProviderError> {
        let gate = self.prove_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let permit =
                gate.acquire().await.map_err(|_| ProviderError::Other("prove gate closed".into()))?;
            permit.forget();
        }
        if self.fail_prove.swap(false, Ordering::Relaxed) {
            return Err(ProviderError::Rejected("proof generation failed".into()));
        }
        self.proved.lock().unwrap().push(tx.clone());
        let payload = serde_json::to_value(&tx)
            .map_err(|e| ProviderError::SerializationError(e.to_string()))?;
        Ok(ProvenTransaction(payload))
    }

    async fn submit(&self, tx: ProvenTransaction) -> Result<TransactionId, ProviderError> {
        if self.fail_submit.swap(false, Ordering::Relaxed) {
            return Err(ProviderError::RequestError("node unreachable".into()));
        }
        let unproven: UnprovenTransaction = serde_json::from_value(tx.0)
            .map_err(|e| ProviderError::SerializationError(e.to_string()))?;
        Ok(self.chain.enqueue(unproven))
    }
}

/// Indexer double backed by the same shared chain.
#[derive(Clone)]
pub struct MockIndexer {
    chain: Arc<MockChain>,
    unreachable: Arc<AtomicBool>,
    fail_finality: Arc<AtomicBool>,
    raw_override: Arc<Mutex<Option<EncodedState>>>,
    pub queries: Arc<AtomicU64>,
}

impl MockIndexer {
    pub fn new(chain: Arc<MockChain>) -> Self {
        Self {
            chain,
            unreachable: Arc::new(AtomicBool::new(false)),
            fail_finality: Arc::new(AtomicBool::new(false)),
            raw_override: Arc::new(Mutex::new(None)),
            queries: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::Relaxed);
    }

    pub fn fail_next_finality(&self) {
        self.fail_finality.store(true, Ordering::Relaxed);
    }

    /// Serve a fixed blob instead of the chain's encoded ledger.
    pub fn serve_raw(&self, blob: EncodedState) {
        *self.raw_override.lock().unwrap() = Some(blob);
    }
}

#[async_trait]
impl IndexerClient for MockIndexer {
    async fn query_state(
        &self,
        _address: &ContractAddress,
    ) -> Result<Option<EncodedState>, ProviderError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if self.unreachable.load(Ordering::Relaxed) {
            return Err(ProviderError::RequestError("indexer unreachable".into()));
        }
        if let Some(blob) = self.raw_override.lock().unwrap().clone() {
            return Ok(Some(blob));
        }
        Ok(Some(encode_state(&self.chain.ledger())))
    }

    async fn watch_finality(&self, tx_id: &TransactionId) -> Result<(), ProviderError> {
        if self.fail_finality.swap(false, Ordering::Relaxed) {
            return Err(ProviderError::SubscriptionError("finality watch timed out".into()));
        }
        self.chain.finalize(tx_id)
    }
}
