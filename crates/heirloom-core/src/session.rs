//! Contract session controller.
//!
//! Owns the wallet and indexer handles for one deployed contract and exposes
//! the four orchestration operations: `connect`, `refresh`, `register`,
//! `execute`. Every external call is awaited sequentially. An explicit busy
//! flag rejects overlapping mutations with [`SessionError::OperationInFlight`]
//! instead of relying on the view to disable its controls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use heirloom_abstraction::{
    ContractAddress, IndexerClient, ProviderError, TransactionId, WalletKeys, WalletProvider,
};

use crate::address::Address;
use crate::config::ServiceConfig;
use crate::contract::CircuitCall;
use crate::error::{Result, SessionError};
use crate::ledger::{decode_state, LedgerState};

/// Connection status of a contract session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No session established yet, or the session was reset.
    Disconnected,
    /// `connect()` is running.
    Connecting,
    /// Session established; operations may be issued.
    Connected,
    /// A `register` call is in flight.
    Registering,
    /// An `execute` call is in flight.
    Executing,
    /// The last operation failed; recoverable via a fresh `connect()`.
    Error,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Registering => "registering",
            Self::Executing => "executing",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Mutable session state, replaced as whole values under a short-lived lock
/// so readers never observe a partially updated snapshot.
#[derive(Debug)]
struct SessionState {
    status: SessionStatus,
    ledger: Option<LedgerState>,
    wallet_keys: Option<WalletKeys>,
    last_error: Option<String>,
}

/// Session controller for one deployed inheritance contract.
///
/// Generic over the wallet and indexer so the test suite can substitute
/// in-memory doubles for the remote services. Methods take `&self`; the
/// controller is safe to share behind an `Arc`.
pub struct ContractSession<W, I> {
    config: ServiceConfig,
    contract_address: ContractAddress,
    wallet: W,
    indexer: I,
    state: Mutex<SessionState>,
    busy: AtomicBool,
}

impl<W: WalletProvider, I: IndexerClient> ContractSession<W, I> {
    /// Create a session from an explicit configuration and provider handles.
    ///
    /// The session starts disconnected; call [`Self::connect`] before issuing
    /// operations.
    #[must_use]
    pub fn new(config: ServiceConfig, wallet: W, indexer: I) -> Self {
        let contract_address = ContractAddress(config.contract_address.clone());
        Self {
            config,
            contract_address,
            wallet,
            indexer,
            state: Mutex::new(SessionState {
                status: SessionStatus::Disconnected,
                ledger: None,
                wallet_keys: None,
                last_error: None,
            }),
            busy: AtomicBool::new(false),
        }
    }

    /// Current session status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state().status
    }

    /// The most recent ledger snapshot, if any fetch has succeeded.
    #[must_use]
    pub fn ledger(&self) -> Option<LedgerState> {
        self.state().ledger.clone()
    }

    /// Message of the last failed operation, cleared on the next attempt.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Keys of the wallet session, cached from the last successful check.
    #[must_use]
    pub fn wallet_keys(&self) -> Option<WalletKeys> {
        self.state().wallet_keys.clone()
    }

    /// Address of the contract this session targets.
    #[must_use]
    pub fn contract_address(&self) -> &ContractAddress {
        &self.contract_address
    }

    /// Whether a guarded operation is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Establish the session: verify the indexer with an initial state fetch
    /// and opportunistically cache the wallet keys.
    ///
    /// Idempotent; always re-establishes from scratch. The previous snapshot,
    /// error, and cached keys are discarded before the fetch.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connection`] if the indexer is unreachable,
    /// [`SessionError::Decode`] if it answers with an unrecognized blob, or
    /// [`SessionError::OperationInFlight`] while another guarded call is
    /// active (re-connecting would tear the session down under it).
    pub async fn connect(&self) -> Result<()> {
        self.acquire()?;
        let result = self.do_connect().await;
        self.busy.store(false, Ordering::Release);
        result
    }

    async fn do_connect(&self) -> Result<()> {
        {
            let mut state = self.state();
            state.status = SessionStatus::Connecting;
            state.last_error = None;
            state.ledger = None;
            state.wallet_keys = None;
        }
        info!(contract = %self.contract_address, "Connecting contract session");

        let snapshot =
            match self.query_snapshot(|e| SessionError::Connection(e.to_string())).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    let mut state = self.state();
                    state.status = SessionStatus::Error;
                    state.last_error = Some(err.to_string());
                    warn!(error = %err, "Failed to establish contract session");
                    return Err(err);
                }
            };

        // The wallet is a separate collaborator; its absence does not block
        // a read-only session. register/execute re-check it.
        let keys = match self.wallet.connected_keys().await {
            Ok(keys) => Some(keys),
            Err(err) => {
                debug!(error = %err, "Wallet keys unavailable at connect");
                None
            }
        };

        let mut state = self.state();
        state.ledger = snapshot;
        state.wallet_keys = keys;
        state.status = SessionStatus::Connected;
        info!(contract = %self.contract_address, "Contract session connected");
        Ok(())
    }

    /// Reset the session to its initial disconnected state.
    pub fn disconnect(&self) {
        let mut state = self.state();
        state.status = SessionStatus::Disconnected;
        state.ledger = None;
        state.wallet_keys = None;
        state.last_error = None;
    }

    /// Fetch the current ledger state and replace the local snapshot.
    ///
    /// Best-effort: on failure the previous snapshot and the session status
    /// are left untouched. The failure is logged here; callers may inspect
    /// the returned error but are expected to continue.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Refresh`] if the indexer call fails, or
    /// [`SessionError::Decode`] if the blob does not match the schema.
    pub async fn refresh(&self) -> Result<()> {
        match self.query_snapshot(|e| SessionError::Refresh(e.to_string())).await {
            Ok(Some(snapshot)) => {
                debug!(
                    registered = snapshot.is_registered,
                    executed = snapshot.is_executed,
                    "Ledger snapshot replaced"
                );
                self.state().ledger = Some(snapshot);
                Ok(())
            }
            // Nothing indexed for this address yet; keep whatever we had.
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(error = %err, "Ledger refresh failed; keeping previous snapshot");
                Err(err)
            }
        }
    }

    /// Register an inheritance pair: validate both addresses, build the
    /// `register` call, hand it to the wallet for balancing and proving,
    /// submit, await finality, then refresh.
    ///
    /// Exactly one pending transaction is submitted on success; failures are
    /// never retried automatically.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] on malformed addresses,
    /// [`SessionError::WalletNotConnected`] if the wallet has no active
    /// session (status and snapshot untouched),
    /// [`SessionError::OperationInFlight`] if another guarded call is
    /// active, or [`SessionError::Submission`] on any downstream failure.
    pub async fn register(&self, parent_hex: &str, child_hex: &str) -> Result<TransactionId> {
        let parent = Address::from_hex(parent_hex)?;
        let child = Address::from_hex(child_hex)?;
        self.ensure_wallet_session().await?;
        self.acquire()?;
        self.enter(SessionStatus::Registering);
        let result = self.submit_call(CircuitCall::register(parent, child)).await;
        self.busy.store(false, Ordering::Release);
        self.settle("register", result)
    }

    /// Execute the inheritance: build the `execute` call and run it through
    /// the same prove/submit/finality flow as [`Self::register`].
    ///
    /// Whether execution is currently valid (registered, not yet executed)
    /// is the contract's decision; this client does not pre-validate the
    /// business rule beyond what the view disables.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::register`], minus validation.
    pub async fn execute(&self) -> Result<TransactionId> {
        self.ensure_wallet_session().await?;
        self.acquire()?;
        self.enter(SessionStatus::Executing);
        let result = self.submit_call(CircuitCall::execute()).await;
        self.busy.store(false, Ordering::Release);
        self.settle("execute", result)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }

    /// Claim the busy flag or reject with `OperationInFlight`.
    fn acquire(&self) -> Result<()> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::OperationInFlight)?;
        Ok(())
    }

    fn enter(&self, status: SessionStatus) {
        let mut state = self.state();
        state.last_error = None;
        state.status = status;
    }

    /// Settle the status machine after a mutating operation.
    fn settle(&self, op: &str, result: Result<TransactionId>) -> Result<TransactionId> {
        let mut state = self.state();
        match &result {
            Ok(tx_id) => {
                state.status = SessionStatus::Connected;
                info!(operation = op, tx = %tx_id, "Operation finalized");
            }
            Err(err) => {
                state.status = SessionStatus::Error;
                state.last_error = Some(err.to_string());
                warn!(operation = op, error = %err, "Operation failed");
            }
        }
        result
    }

    /// Query and decode the current state, wrapping indexer errors with the
    /// caller's error constructor. Decode errors pass through as-is.
    async fn query_snapshot<F>(&self, wrap: F) -> Result<Option<LedgerState>>
    where
        F: FnOnce(ProviderError) -> SessionError,
    {
        let encoded = self.indexer.query_state(&self.contract_address).await.map_err(wrap)?;
        match encoded {
            Some(blob) => Ok(Some(decode_state(&blob)?)),
            None => Ok(None),
        }
    }

    /// Confirm the wallet has an active session and cache its keys.
    async fn ensure_wallet_session(&self) -> Result<()> {
        match self.wallet.connected_keys().await {
            Ok(keys) => {
                self.state().wallet_keys = Some(keys);
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "Wallet session check failed");
                Err(SessionError::WalletNotConnected)
            }
        }
    }

    /// Prove, submit, and await finality for one circuit call, then refresh.
    async fn submit_call(&self, call: CircuitCall) -> Result<TransactionId> {
        let circuit = call.circuit();
        let unproven =
            call.into_unproven(&self.contract_address, &self.config.proof_artifact_path);

        debug!(circuit = circuit.id(), "Balancing and proving circuit call");
        let proven = self
            .wallet
            .balance_and_prove(unproven)
            .await
            .map_err(|e| SessionError::Submission(e.to_string()))?;

        let tx_id = self
            .wallet
            .submit(proven)
            .await
            .map_err(|e| SessionError::Submission(e.to_string()))?;

        info!(circuit = circuit.id(), tx = %tx_id, "Transaction submitted, awaiting finality");
        self.indexer
            .watch_finality(&tx_id)
            .await
            .map_err(|e| SessionError::Submission(e.to_string()))?;

        // Best-effort: refresh logs its own failures and keeps the snapshot.
        let _ = self.refresh().await;

        Ok(tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_display() {
        assert_eq!(SessionStatus::Disconnected.to_string(), "disconnected");
        assert_eq!(SessionStatus::Registering.to_string(), "registering");
        assert_eq!(SessionStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_session_status_serde() {
        let json = serde_json::to_string(&SessionStatus::Connected).unwrap();
        assert_eq!(json, "\"connected\"");
        let back: SessionStatus = serde_json::from_str("\"executing\"").unwrap();
        assert_eq!(back, SessionStatus::Executing);
    }
}
