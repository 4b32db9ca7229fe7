//! Heirloom Core - session orchestration for the inheritance contract.
//!
//! This crate provides the client-side logic for a dead-man-switch
//! inheritance contract, including:
//! - Ledger state codec and address validation
//! - Contract session controller (connect / refresh / register / execute)
//! - One-shot auto-execute countdown
//! - Concrete wallet and indexer providers
//!
//! # Example
//!
//! ```rust,no_run
//! use heirloom_core::{
//!     ContractSession, HttpIndexerClient, RpcWalletProvider, ServiceConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> heirloom_core::Result<()> {
//!     let config = ServiceConfig::load(None).expect("config");
//!     let wallet = RpcWalletProvider::from_config(&config);
//!     let indexer = HttpIndexerClient::from_config(&config);
//!     let mut session = ContractSession::new(config, wallet, indexer);
//!     session.connect().await?;
//!     session.register(&"11".repeat(32), &"22".repeat(32)).await?;
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod config;
pub mod contract;
pub mod countdown;
pub mod error;
pub mod indexer;
pub mod ledger;
pub mod session;
pub mod wallet;

pub use address::{bytes_to_hex, hex_to_bytes, Address, ValidationError, ADDRESS_LEN};
pub use config::{ConfigError, ServiceConfig};
pub use contract::{Circuit, CircuitCall};
pub use countdown::{AutoExecuteCountdown, CountdownPhase, TickOutcome, AUTO_EXECUTE_TICKS};
pub use error::{Result, SessionError};
pub use indexer::HttpIndexerClient;
pub use ledger::{
    decode_state, encode_state, DecodeError, LedgerState, ENCODED_STATE_LEN, LEDGER_VERSION,
};
pub use session::{ContractSession, SessionStatus};
pub use wallet::RpcWalletProvider;
