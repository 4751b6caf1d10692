//! # Arbitration Errors
//!
//! Every variant maps onto one of the four [`ErrorCategory`] classes.
//! No error is swallowed: each one aborts the whole operation and the
//! engine is left exactly as it was before the call.

use thiserror::Error;

use dax_core::{ActorId, AssetId, DaxError, ErrorCategory, LedgerError, NegotiationStatus};

use crate::case::CaseState;
use crate::fees::FeeKind;

/// The privilege an operation is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// The engine owner.
    Owner,
    /// The owner, or an allow-listed arbiter once multi-arbiter mode is on.
    Arbiter,
}

impl std::fmt::Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Arbiter => f.write_str("arbiter"),
        }
    }
}

/// Errors raised by the arbitration engine.
#[derive(Error, Debug)]
pub enum ArbitrationError {
    /// The caller lacks the privilege the operation requires.
    #[error("unauthorized: {caller} is not {required}")]
    Unauthorized {
        /// Who attempted the call.
        caller: ActorId,
        /// The privilege required.
        required: Privilege,
    },

    /// The case is not in the state the operation requires.
    #[error("case {disclosure} is {actual}, expected {expected}")]
    InvalidState {
        /// The disclosure the case is keyed by.
        disclosure: ActorId,
        /// Required state.
        expected: CaseState,
        /// Actual state.
        actual: CaseState,
    },

    /// The negotiation has not reached final acceptance.
    #[error("disclosure {disclosure} is not signed (status {status})")]
    NotSigned {
        /// The disclosure.
        disclosure: ActorId,
        /// Its current negotiation status.
        status: NegotiationStatus,
    },

    /// Fee collection failed; nothing changed.
    #[error("{kind} fee collection for {disclosure} failed: {source}")]
    Transfer {
        /// The disclosure the fee was for.
        disclosure: ActorId,
        /// Which fee.
        kind: FeeKind,
        /// The ledger's reason.
        #[source]
        source: LedgerError,
    },

    /// The supplied ledger does not track the engine's fee asset.
    #[error("wrong fee asset: expected {expected}, got {actual}")]
    WrongAsset {
        /// The engine's fee asset.
        expected: AssetId,
        /// The supplied ledger's asset.
        actual: AssetId,
    },

    /// A basis-point rate above 100%.
    #[error("fee rate {0} bps exceeds 10000")]
    InvalidFeeRate(u32),

    /// The owner is always an arbiter and cannot be removed.
    #[error("the owner cannot be removed from the arbiter list")]
    OwnerIsPermanentArbiter,

    /// Removal of an identity that is not on the allow-list.
    #[error("{0} is not an approved arbiter")]
    NotAnArbiter(ActorId),

    /// The multi-arbiter switch is one-way and already on.
    #[error("multi-arbiter mode is already enabled")]
    MultiArbiterAlreadyEnabled,

    /// A state-mutating entry point was re-entered while its guard was held.
    #[error("re-entrant call into the arbitration engine")]
    Reentrant,

    /// Queue bookkeeping disagrees with the case records.
    #[error("queue invariant violated: {0}")]
    QueueCorrupted(String),

    /// Fee arithmetic or another foundational invariant failed.
    #[error(transparent)]
    Core(#[from] DaxError),
}

impl ArbitrationError {
    /// The failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Authorization,
            Self::InvalidState { .. }
            | Self::NotSigned { .. }
            | Self::MultiArbiterAlreadyEnabled
            | Self::NotAnArbiter(_)
            | Self::Reentrant => ErrorCategory::StatePrecondition,
            Self::Transfer { .. } => ErrorCategory::Transfer,
            Self::Core(e) => e.category(),
            Self::WrongAsset { .. }
            | Self::InvalidFeeRate(_)
            | Self::OwnerIsPermanentArbiter
            | Self::QueueCorrupted(_) => ErrorCategory::Invariant,
        }
    }
}
