//! Error types for Heirloom Core.

use thiserror::Error;

use crate::address::ValidationError;
use crate::ledger::DecodeError;

/// Core error type for contract session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Malformed address input. Recoverable; no session state changes.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No wallet session is active. Recoverable by reconnecting the wallet.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// The indexer was unreachable while establishing the session.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A best-effort ledger refresh failed; the previous snapshot is kept.
    #[error("Refresh error: {0}")]
    Refresh(String),

    /// A wallet or indexer failure while submitting a transaction.
    #[error("Submission error: {0}")]
    Submission(String),

    /// A mutating call is already in flight on this session.
    #[error("Another operation is already in flight")]
    OperationInFlight,

    /// The encoded ledger state did not match the expected schema.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
