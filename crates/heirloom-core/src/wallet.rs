//! Wallet provider speaking JSON-RPC 2.0 over HTTP.
//!
//! The wallet service owns key material, transaction balancing, and proof
//! generation; this client only carries opaque payloads back and forth.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use heirloom_abstraction::{
    ProvenTransaction, ProviderError, TransactionId, UnprovenTransaction, WalletKeys,
    WalletProvider,
};

use crate::config::ServiceConfig;

/// Error code the wallet service answers with when no session is active.
const NO_SESSION_CODE: i64 = -32001;

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

/// Wallet provider over the wallet service's JSON-RPC endpoint.
#[derive(Debug)]
pub struct RpcWalletProvider {
    http: reqwest::Client,
    uri: String,
    next_id: AtomicU64,
}

impl RpcWalletProvider {
    /// Create a provider for the given RPC endpoint.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), uri: uri.into(), next_id: AtomicU64::new(1) }
    }

    /// Create a provider from a service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.wallet_uri.clone())
    }

    async fn call<P, T>(&self, method: &str, params: P) -> Result<T, ProviderError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, "Wallet RPC call");

        let response = self
            .http
            .post(&self.uri)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestError(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::RequestError(e.to_string()))?;

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))?;

        if let Some(err) = body.error {
            if err.code == NO_SESSION_CODE {
                return Err(ProviderError::NoActiveSession);
            }
            return Err(ProviderError::Rejected(format!("{} (code {})", err.message, err.code)));
        }

        body.result
            .ok_or_else(|| ProviderError::SerializationError("response carried no result".into()))
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn connected_keys(&self) -> Result<WalletKeys, ProviderError> {
        self.call("wallet_connectedKeys", serde_json::Value::Array(Vec::new())).await
    }

    async fn balance_and_prove(
        &self,
        tx: UnprovenTransaction,
    ) -> Result<ProvenTransaction, ProviderError> {
        self.call("wallet_balanceAndProve", (tx,)).await
    }

    async fn submit(&self, tx: ProvenTransaction) -> Result<TransactionId, ProviderError> {
        self.call("wallet_submitTransaction", (tx,)).await
    }
}
