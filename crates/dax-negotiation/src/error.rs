//! Errors raised by the negotiation state machine and its registry.

use thiserror::Error;

use dax_core::{ActorId, AssetId, DaxError, ErrorCategory, LedgerError};

use crate::case::NegotiationState;

/// The role a negotiation operation is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The filer who updates terms and claims funds.
    Owner,
    /// The counterparty who accepts terms.
    Participant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Participant => f.write_str("participant"),
        }
    }
}

/// Errors that can occur while negotiating a disclosure.
#[derive(Error, Debug)]
pub enum NegotiationError {
    /// The caller does not hold the role the operation requires.
    #[error("unauthorized: {caller} is not the {role}")]
    Unauthorized {
        /// Who attempted the call.
        caller: ActorId,
        /// The role the operation requires.
        role: Role,
    },

    /// Terms can only be revised while the negotiation is open.
    #[error("terms can only be updated during negotiation (current state {state})")]
    OnlyDuringNegotiation {
        /// The current state.
        state: NegotiationState,
    },

    /// The operation requires a different state.
    #[error("invalid negotiation state: expected {expected}, got {actual}")]
    InvalidState {
        /// The state the operation requires.
        expected: NegotiationState,
        /// The current state.
        actual: NegotiationState,
    },

    /// A withdrawal found nothing to withdraw.
    #[error("nothing to claim: {disclosure} holds no {asset}")]
    NothingToClaim {
        /// The disclosure account.
        disclosure: ActorId,
        /// The asset that was queried.
        asset: AssetId,
    },

    /// The payment asset can only leave through the reward claim.
    #[error("asset {asset} is the payment asset and cannot be recovered")]
    ProtectedAsset {
        /// The protected asset.
        asset: AssetId,
    },

    /// The ledger passed in does not track the payment asset.
    #[error("wrong asset: expected {expected}, got {actual}")]
    WrongAsset {
        /// The payment asset.
        expected: AssetId,
        /// The asset of the supplied ledger.
        actual: AssetId,
    },

    /// A restored negotiation was offered a notifier it was not bound to.
    #[error("notifier binding mismatch: bound to {expected}, offered {actual}")]
    BindingMismatch {
        /// The binding recorded at deployment.
        expected: ActorId,
        /// The binding of the offered notifier.
        actual: ActorId,
    },

    /// Owner and participant must be distinct.
    #[error("participant must differ from owner ({0})")]
    SameParty(ActorId),

    /// The registry has no record of this disclosure.
    #[error("unknown disclosure {0}")]
    UnknownDisclosure(ActorId),

    /// A ledger transfer failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A foundational invariant failed.
    #[error(transparent)]
    Core(#[from] DaxError),
}

impl NegotiationError {
    /// The failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Authorization,
            Self::OnlyDuringNegotiation { .. }
            | Self::InvalidState { .. }
            | Self::NothingToClaim { .. } => ErrorCategory::StatePrecondition,
            Self::Ledger(_) => ErrorCategory::Transfer,
            Self::Core(e) => e.category(),
            Self::ProtectedAsset { .. }
            | Self::WrongAsset { .. }
            | Self::BindingMismatch { .. }
            | Self::SameParty(_)
            | Self::UnknownDisclosure(_) => ErrorCategory::Invariant,
        }
    }
}
