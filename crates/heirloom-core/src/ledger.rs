//! Ledger state codec for the inheritance contract.
//!
//! The contract artifact stores its public state as a small versioned blob:
//! one version byte, one flags byte, then the parent and child addresses.
//! Decoding is a pure function; anything that does not match the schema
//! (wrong circuit build, wrong version) fails with a [`DecodeError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::{Address, ADDRESS_LEN};
use heirloom_abstraction::EncodedState;

/// Ledger blob version this client understands.
pub const LEDGER_VERSION: u8 = 1;

/// Total length of an encoded ledger blob.
pub const ENCODED_STATE_LEN: usize = 2 + 2 * ADDRESS_LEN;

const FLAG_REGISTERED: u8 = 0b0000_0001;
const FLAG_EXECUTED: u8 = 0b0000_0010;
const KNOWN_FLAGS: u8 = FLAG_REGISTERED | FLAG_EXECUTED;

/// Error produced when an encoded ledger blob does not match the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The blob has the wrong length for this schema version.
    #[error("encoded state is {0} bytes, expected {ENCODED_STATE_LEN}")]
    WrongLength(usize),

    /// The version byte does not match the circuit build this client targets.
    #[error("unsupported ledger version {0}, expected {LEDGER_VERSION}")]
    UnsupportedVersion(u8),

    /// The flags byte carries bits this schema does not define.
    #[error("unknown flag bits in {0:#04x}")]
    UnknownFlags(u8),

    /// The executed flag is set while the registered flag is not.
    #[error("executed flag set without registered flag")]
    ExecutedWithoutRegistered,
}

/// Read-only snapshot of the contract's public ledger.
///
/// Snapshots are immutable; a refresh replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// True once a register transaction has been finalized.
    pub is_registered: bool,
    /// True once an execute transaction has been finalized; terminal.
    pub is_executed: bool,
    /// The parent (depositor) address; zero until registered.
    pub parent: Address,
    /// The child (beneficiary) address; zero until registered.
    pub child: Address,
}

impl LedgerState {
    /// The pre-registration state: both flags clear, both addresses zero.
    #[must_use]
    pub fn unregistered() -> Self {
        Self {
            is_registered: false,
            is_executed: false,
            parent: Address::ZERO,
            child: Address::ZERO,
        }
    }
}

/// Decodes a raw contract storage blob into a [`LedgerState`].
///
/// # Errors
///
/// Returns a [`DecodeError`] if the blob length, version byte, or flags do
/// not match the expected schema, or if the flags violate the
/// executed-implies-registered invariant.
pub fn decode_state(encoded: &EncodedState) -> Result<LedgerState, DecodeError> {
    let bytes = encoded.as_bytes();
    if bytes.len() != ENCODED_STATE_LEN {
        return Err(DecodeError::WrongLength(bytes.len()));
    }
    if bytes[0] != LEDGER_VERSION {
        return Err(DecodeError::UnsupportedVersion(bytes[0]));
    }
    let flags = bytes[1];
    if flags & !KNOWN_FLAGS != 0 {
        return Err(DecodeError::UnknownFlags(flags));
    }
    let is_registered = flags & FLAG_REGISTERED != 0;
    let is_executed = flags & FLAG_EXECUTED != 0;
    if is_executed && !is_registered {
        return Err(DecodeError::ExecutedWithoutRegistered);
    }

    let mut parent = [0u8; ADDRESS_LEN];
    let mut child = [0u8; ADDRESS_LEN];
    parent.copy_from_slice(&bytes[2..2 + ADDRESS_LEN]);
    child.copy_from_slice(&bytes[2 + ADDRESS_LEN..]);

    Ok(LedgerState {
        is_registered,
        is_executed,
        parent: Address::from_bytes(parent),
        child: Address::from_bytes(child),
    })
}

/// Encodes a [`LedgerState`] into the wire blob.
///
/// The live artifact only ever decodes; encoding exists for test doubles
/// that stand in for the chain.
#[must_use]
pub fn encode_state(state: &LedgerState) -> EncodedState {
    let mut bytes = Vec::with_capacity(ENCODED_STATE_LEN);
    bytes.push(LEDGER_VERSION);
    let mut flags = 0u8;
    if state.is_registered {
        flags |= FLAG_REGISTERED;
    }
    if state.is_executed {
        flags |= FLAG_EXECUTED;
    }
    bytes.push(flags);
    bytes.extend_from_slice(state.parent.as_bytes());
    bytes.extend_from_slice(state.child.as_bytes());
    EncodedState(bytes)
}
