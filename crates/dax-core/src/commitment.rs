//! # Vulnerability Commitment
//!
//! The fixed-size token a researcher publishes when opening a disclosure.
//! The stack never interprets it: no hashing scheme is assumed and no
//! reveal is verified. It is carried, compared, and displayed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DaxError;
use crate::identity::{decode_hex_into, encode_hex};

/// Byte length of a commitment token.
pub const COMMITMENT_LEN: usize = 32;

/// An opaque, non-zero 32-byte commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commitment([u8; COMMITMENT_LEN]);

impl Commitment {
    /// Create a commitment from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DaxError::InvalidCommitment`] if every byte is zero.
    pub fn new(bytes: [u8; COMMITMENT_LEN]) -> Result<Self, DaxError> {
        if bytes.iter().all(|b| *b == 0) {
            return Err(DaxError::InvalidCommitment(
                "commitment must not be zero".to_string(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Parse 64 hex digits, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, DaxError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; COMMITMENT_LEN];
        decode_hex_into(digits, &mut bytes).map_err(DaxError::InvalidCommitment)?;
        Self::new(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", encode_hex(&self.0))
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Commitment {
    type Err = DaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Commitment {
    type Error = DaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Commitment> for String {
    fn from(c: Commitment) -> Self {
        c.to_hex()
    }
}
