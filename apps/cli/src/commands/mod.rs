//! CLI command implementations.

pub mod config;
pub mod execute;
pub mod register;
pub mod status;

use heirloom_core::{ContractSession, HttpIndexerClient, RpcWalletProvider, ServiceConfig};

/// Build a session over the real providers for one command invocation.
pub fn build_session(
    config: ServiceConfig,
) -> ContractSession<RpcWalletProvider, HttpIndexerClient> {
    let wallet = RpcWalletProvider::from_config(&config);
    let indexer = HttpIndexerClient::from_config(&config);
    ContractSession::new(config, wallet, indexer)
}
