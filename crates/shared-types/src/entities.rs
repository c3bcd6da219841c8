//! # Identity Entities
//!
//! 20-byte account and token identities plus the 32-byte hash alias used
//! throughout the custody workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 32-byte Keccak-256 output.
pub type Hash = [u8; 32];

/// Error parsing an `Address` or `TokenId` from a hex string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityParseError {
    /// The hex payload does not decode to exactly 20 bytes
    #[error("invalid identity length: expected 20 bytes, got {got}")]
    InvalidLength { got: usize },

    /// The string contains non-hex characters
    #[error("invalid hex encoding")]
    InvalidHex,
}

fn parse_hex_20(s: &str) -> Result<[u8; 20], IdentityParseError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|_| IdentityParseError::InvalidHex)?;
    if bytes.len() != 20 {
        return Err(IdentityParseError::InvalidLength { got: bytes.len() });
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}

// =============================================================================
// ADDRESS
// =============================================================================

/// Ethereum-style account identity (20 bytes).
///
/// Used for depositors, withdrawal recipients, validators, the owner, and the
/// custody account itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address, never a valid participant.
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_20(s).map(Self)
    }
}

// =============================================================================
// TOKEN ID
// =============================================================================

/// Opaque token identity (20 bytes).
///
/// Deliberately a distinct type from [`Address`]: the allow-list and the
/// ledger are keyed by `TokenId`, account balances by `Address`, and the type
/// system keeps the two key spaces apart.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub [u8; 20]);

impl TokenId {
    /// The all-zero token, never allow-listed.
    pub const ZERO: TokenId = TokenId([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self)
    }
}

impl From<[u8; 20]> for TokenId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for TokenId {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_20(s).map(Self)
    }
}
