//! Indexer client: HTTP for state queries, WebSocket for finality watching.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use heirloom_abstraction::{
    ContractAddress, EncodedState, IndexerClient, ProviderError, TransactionId,
};

use crate::address::hex_to_bytes;
use crate::config::ServiceConfig;

/// Query request body for the indexer's state endpoint.
#[derive(Debug, Serialize)]
struct StateQuery<'a> {
    address: &'a str,
}

/// Query response from the indexer's state endpoint. The blob is hex so the
/// payload stays plain JSON.
#[derive(Debug, Deserialize)]
struct StateResponse {
    #[serde(default)]
    state: Option<String>,
}

/// Subscription request sent on the finality socket.
#[derive(Debug, Serialize)]
struct WatchRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    transaction_id: &'a str,
}

/// Verdict frames the indexer pushes on the finality socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WatchEvent {
    Applied { transaction_id: String },
    Failed { transaction_id: String, reason: Option<String> },
}

/// Indexer client over the service's public HTTP and WebSocket endpoints.
#[derive(Debug, Clone)]
pub struct HttpIndexerClient {
    http: reqwest::Client,
    query_uri: String,
    watch_uri: String,
}

impl HttpIndexerClient {
    /// Create a client for the given query and watch endpoints.
    #[must_use]
    pub fn new(query_uri: impl Into<String>, watch_uri: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            query_uri: query_uri.into(),
            watch_uri: watch_uri.into(),
        }
    }

    /// Create a client from a service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.indexer_uri.clone(), config.indexer_ws_uri.clone())
    }
}

#[async_trait]
impl IndexerClient for HttpIndexerClient {
    async fn query_state(
        &self,
        address: &ContractAddress,
    ) -> Result<Option<EncodedState>, ProviderError> {
        let response = self
            .http
            .post(&self.query_uri)
            .json(&StateQuery { address: address.as_str() })
            .send()
            .await
            .map_err(|e| ProviderError::RequestError(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::RequestError(e.to_string()))?;

        let body: StateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))?;

        match body.state {
            Some(blob) => {
                let bytes = hex_to_bytes(&blob)
                    .map_err(|e| ProviderError::SerializationError(e.to_string()))?;
                Ok(Some(EncodedState(bytes)))
            }
            None => Ok(None),
        }
    }

    async fn watch_finality(&self, tx_id: &TransactionId) -> Result<(), ProviderError> {
        let (mut socket, _) = connect_async(self.watch_uri.as_str())
            .await
            .map_err(|e| ProviderError::SubscriptionError(e.to_string()))?;

        let request = WatchRequest { kind: "watch", transaction_id: &tx_id.0 };
        let frame = serde_json::to_string(&request)
            .map_err(|e| ProviderError::SerializationError(e.to_string()))?;
        socket
            .send(Message::Text(frame))
            .await
            .map_err(|e| ProviderError::SubscriptionError(e.to_string()))?;

        debug!(tx = %tx_id, "Watching transaction finality");

        while let Some(message) = socket.next().await {
            let message = message.map_err(|e| ProviderError::SubscriptionError(e.to_string()))?;
            match message {
                Message::Text(text) => {
                    // Frames for other transactions or unknown event kinds
                    // are skipped; only our verdict ends the watch.
                    let Ok(event) = serde_json::from_str::<WatchEvent>(&text) else {
                        debug!(frame = %text, "Ignoring unrecognized finality frame");
                        continue;
                    };
                    match event {
                        WatchEvent::Applied { transaction_id } if transaction_id == tx_id.0 => {
                            return Ok(());
                        }
                        WatchEvent::Failed { transaction_id, reason }
                            if transaction_id == tx_id.0 =>
                        {
                            return Err(ProviderError::Rejected(
                                reason.unwrap_or_else(|| "transaction failed".to_string()),
                            ));
                        }
                        _ => {}
                    }
                }
                Message::Ping(payload) => {
                    socket
                        .send(Message::Pong(payload))
                        .await
                        .map_err(|e| ProviderError::SubscriptionError(e.to_string()))?;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(ProviderError::SubscriptionError(format!(
            "finality stream closed before a verdict for {}",
            tx_id
        )))
    }
}
