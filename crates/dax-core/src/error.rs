//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Identifier and commitment errors carry the offending input.
//! - Ledger errors carry the account, the requested amount, and what
//!   was actually available.
//! - Every error maps onto one of four [`ErrorCategory`] values so
//!   callers can decide whether a retry makes sense.

use thiserror::Error;

use crate::amount::Amount;
use crate::identity::ActorId;

/// The four failure classes every operation in the stack falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Wrong caller for a role-gated operation.
    Authorization,
    /// Operation invoked outside its required state.
    StatePrecondition,
    /// The value-transfer collaborator reported failure.
    Transfer,
    /// Zero-valued or malformed input, or arithmetic overflow.
    Invariant,
}

impl ErrorCategory {
    /// Whether the same call may succeed later without changing its inputs.
    ///
    /// Transfer failures clear once the balance or allowance is fixed;
    /// state preconditions clear once the predecessor transition happens.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transfer | Self::StatePrecondition)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Authorization => "authorization",
            Self::StatePrecondition => "state-precondition",
            Self::Transfer => "transfer",
            Self::Invariant => "invariant",
        };
        f.write_str(s)
    }
}

/// Top-level error type for foundational operations.
#[derive(Error, Debug)]
pub enum DaxError {
    /// An identifier failed validation.
    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A commitment token failed validation.
    #[error("invalid commitment: {0}")]
    InvalidCommitment(String),

    /// Checked arithmetic on an amount overflowed.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    /// A ledger transfer failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A value could not be parsed or serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DaxError {
    /// The failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Ledger(_) => ErrorCategory::Transfer,
            Self::InvalidIdentifier { .. }
            | Self::InvalidCommitment(_)
            | Self::AmountOverflow(_)
            | Self::Serialization(_) => ErrorCategory::Invariant,
        }
    }
}

/// Failure reported by a [`ValueLedger`](crate::ledger::ValueLedger).
///
/// A failed ledger call must leave every balance and allowance untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The debited account does not hold enough.
    #[error("insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        /// The account being debited.
        account: ActorId,
        /// Amount requested.
        requested: Amount,
        /// Amount actually held.
        available: Amount,
    },

    /// The spender's allowance over the debited account is too small.
    #[error("insufficient allowance for {spender} over {owner}: requested {requested}, approved {approved}")]
    InsufficientAllowance {
        /// The account whose funds are being pulled.
        owner: ActorId,
        /// The account pulling the funds.
        spender: ActorId,
        /// Amount requested.
        requested: Amount,
        /// Amount currently approved.
        approved: Amount,
    },

    /// The ledger refused the transfer for another reason.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}
