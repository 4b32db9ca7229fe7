//! Hex codec for 32-byte wallet addresses.
//!
//! Addresses cross the wire as 64-character lowercase hex strings and live
//! in memory as fixed 32-byte arrays. Both directions are lossless; input is
//! case-normalized before decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes in a wallet address.
pub const ADDRESS_LEN: usize = 32;

/// Error produced when an address string fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Converts bytes to a lowercase hex string.
#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Converts a hex string (either case) to bytes.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the input has odd length or contains
/// non-hex characters.
pub fn hex_to_bytes(input: &str) -> Result<Vec<u8>, ValidationError> {
    hex::decode(input.to_ascii_lowercase())
        .map_err(|e| ValidationError(format!("invalid hex string: {}", e)))
}

/// A 32-byte wallet address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address, used for unset ledger fields.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Construct an address from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse an address from a hex string.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the string is not valid hex or does
    /// not decode to exactly 32 bytes.
    pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
        let bytes = hex_to_bytes(input)?;
        let len = bytes.len();
        let bytes: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            ValidationError(format!(
                "address must be {} hex characters ({} bytes), got {} bytes",
                ADDRESS_LEN * 2,
                ADDRESS_LEN,
                len
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Returns the address as a lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the all-zero (unset) address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_hex()
    }
}
