//! Provider abstraction layer for Heirloom.
//!
//! This module defines the trait contracts for the two external collaborators
//! every Heirloom client talks to: the wallet service (balancing, proving,
//! submission) and the chain indexer (ledger queries, finality watching).
//! Both are opaque remote services; implementations live in `heirloom-core`
//! and test doubles live in the test suites.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents an error that can occur when talking to a wallet or indexer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderError {
    /// An error occurred during the request (e.g., network issues, bad endpoint).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// A streaming subscription failed or closed before delivering a verdict.
    #[error("Subscription Error: {0}")]
    SubscriptionError(String),

    /// The remote service understood the request and rejected it
    /// (e.g., the chain refused the transaction, the wallet declined to sign).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The wallet has no active session to operate with.
    #[error("No active wallet session")]
    NoActiveSession,

    /// An error occurred during serialization or deserialization.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// Other unexpected errors.
    #[error("Other Provider Error: {0}")]
    Other(String),
}

/// Opaque on-chain address of the deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractAddress(pub String);

impl ContractAddress {
    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractAddress {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Raw contract storage bytes as returned by the indexer.
///
/// The layout is owned by the contract artifact; clients decode it with the
/// artifact's ledger codec and treat it as opaque otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedState(pub Vec<u8>);

impl EncodedState {
    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Identifier of a submitted transaction, as assigned by the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public keys of the connected wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletKeys {
    /// Public key the wallet spends coins with.
    pub coin_public_key: String,
    /// Public key the wallet receives encrypted payloads with.
    pub encryption_public_key: String,
}

/// An unproven circuit-call transaction, assembled client-side and handed to
/// the wallet for balancing and proof generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprovenTransaction {
    /// Address of the contract the call targets.
    pub contract_address: ContractAddress,
    /// Identifier of the circuit being invoked.
    pub circuit_id: String,
    /// Circuit arguments, each lowercase-hex encoded.
    pub args: Vec<String>,
    /// Base path of the proof artifacts the wallet needs for this circuit.
    pub proof_artifact_path: String,
}

/// A balanced and proven transaction, ready for submission.
///
/// The payload shape is owned by the wallet; clients carry it back to
/// [`WalletProvider::submit`] without inspecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenTransaction(pub serde_json::Value);

/// A trait for interacting with the user's wallet service.
///
/// All providers must be `Send + Sync` to allow concurrent use across threads.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Returns the public keys of the currently connected wallet session.
    ///
    /// # Errors
    /// Returns [`ProviderError::NoActiveSession`] if the wallet has no active
    /// session, or another `ProviderError` if the wallet is unreachable.
    async fn connected_keys(&self) -> Result<WalletKeys, ProviderError>;

    /// Balances and proves an unproven circuit-call transaction.
    ///
    /// # Arguments
    /// * `tx` - The unproven transaction payload
    ///
    /// # Errors
    /// Returns a `ProviderError` if balancing or proving fails.
    async fn balance_and_prove(
        &self,
        tx: UnprovenTransaction,
    ) -> Result<ProvenTransaction, ProviderError>;

    /// Submits a proven transaction to the network.
    ///
    /// # Errors
    /// Returns a `ProviderError` if submission fails.
    async fn submit(&self, tx: ProvenTransaction) -> Result<TransactionId, ProviderError>;
}

/// A trait for interacting with the chain indexer.
#[async_trait]
pub trait IndexerClient: Send + Sync {
    /// Queries the current encoded contract state.
    ///
    /// Returns `None` if the indexer has no state for the address yet
    /// (e.g., the contract deployment has not been indexed).
    ///
    /// # Errors
    /// Returns a `ProviderError` if the indexer is unreachable or answers
    /// with a malformed response.
    async fn query_state(
        &self,
        address: &ContractAddress,
    ) -> Result<Option<EncodedState>, ProviderError>;

    /// Waits until the given transaction is final on-chain.
    ///
    /// Resolves once the indexer reports the transaction as applied.
    ///
    /// # Errors
    /// Returns a `ProviderError` if the transaction failed, the subscription
    /// dropped before a verdict, or the indexer's own timeout policy fired.
    async fn watch_finality(&self, tx_id: &TransactionId) -> Result<(), ProviderError>;
}
