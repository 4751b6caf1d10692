//! # Actor and Asset Identity Newtypes
//!
//! Newtype wrappers for the identifiers that flow through the stack.
//! These prevent accidental identifier confusion: you cannot pass an
//! `AssetId` where an `ActorId` is expected.
//!
//! ## Security Invariant
//!
//! The zero identity is never a valid actor. A zero address in a role
//! slot would make the role unreachable (or reachable by anyone, depending
//! on how the caller is modelled), so it is rejected at construction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DaxError;

/// Byte length of an actor identity.
pub const ACTOR_ID_LEN: usize = 20;

/// A unique address identifying a researcher, protocol, arbiter, owner,
/// or a deployed component holding its own ledger account.
///
/// Rendered as `0x` followed by 40 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId([u8; ACTOR_ID_LEN]);

impl ActorId {
    /// Create an identity from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DaxError::InvalidIdentifier`] for the all-zero identity.
    pub fn from_bytes(bytes: [u8; ACTOR_ID_LEN]) -> Result<Self, DaxError> {
        if bytes.iter().all(|b| *b == 0) {
            return Err(DaxError::InvalidIdentifier {
                value: encode_hex(&bytes),
                reason: "the zero identity is reserved".to_string(),
            });
        }
        Ok(Self(bytes))
    }

    /// Parse a `0x`-prefixed hex address.
    pub fn parse(s: &str) -> Result<Self, DaxError> {
        let digits = s.strip_prefix("0x").ok_or_else(|| DaxError::InvalidIdentifier {
            value: s.to_string(),
            reason: "missing 0x prefix".to_string(),
        })?;
        if digits.len() != ACTOR_ID_LEN * 2 {
            return Err(DaxError::InvalidIdentifier {
                value: s.to_string(),
                reason: format!("expected {} hex digits, got {}", ACTOR_ID_LEN * 2, digits.len()),
            });
        }
        let mut bytes = [0u8; ACTOR_ID_LEN];
        decode_hex_into(digits, &mut bytes).map_err(|reason| DaxError::InvalidIdentifier {
            value: s.to_string(),
            reason,
        })?;
        Self::from_bytes(bytes)
    }

    /// Derive a deterministic identity for a deployed component.
    ///
    /// SHA-256 over the namespace bytes followed by the big-endian nonce,
    /// truncated to the first 20 bytes.
    pub fn derive(namespace: &[u8], nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(namespace);
        hasher.update(nonce.to_be_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; ACTOR_ID_LEN];
        bytes.copy_from_slice(&digest[..ACTOR_ID_LEN]);
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ACTOR_ID_LEN] {
        &self.0
    }

    /// Render as a `0x`-prefixed lowercase hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", encode_hex(&self.0))
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActorId({})", self.to_hex())
    }
}

impl FromStr for ActorId {
    type Err = DaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ActorId {
    type Error = DaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.to_hex()
    }
}

/// Symbol of the asset a ledger tracks (e.g. `USDC`, `dax-fee`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Create a validated asset symbol.
    ///
    /// Accepts 1 to 32 ASCII alphanumerics, `-`, or `_`.
    pub fn new(symbol: impl Into<String>) -> Result<Self, DaxError> {
        let symbol = symbol.into();
        let valid_chars = symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if symbol.is_empty() || symbol.len() > 32 || !valid_chars {
            return Err(DaxError::InvalidIdentifier {
                value: symbol,
                reason: "asset symbol must be 1-32 characters of [A-Za-z0-9_-]".to_string(),
            });
        }
        Ok(Self(symbol))
    }

    /// Access the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetId {
    type Err = DaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AssetId {
    type Error = DaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

/// Render bytes as lowercase hex.
pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode an even-length hex string into `out`; the lengths must match.
pub(crate) fn decode_hex_into(digits: &str, out: &mut [u8]) -> Result<(), String> {
    if digits.len() != out.len() * 2 {
        return Err(format!(
            "expected {} hex digits, got {}",
            out.len() * 2,
            digits.len()
        ));
    }
    let raw = digits.as_bytes();
    for (i, slot) in out.iter_mut().enumerate() {
        let hi = hex_value(raw[2 * i])?;
        let lo = hex_value(raw[2 * i + 1])?;
        *slot = (hi << 4) | lo;
    }
    Ok(())
}

fn hex_value(c: u8) -> Result<u8, String> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(format!("invalid hex digit {:?}", c as char)),
    }
}
