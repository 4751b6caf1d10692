//! # Disclosure Status Interface
//!
//! The read-only view the arbitration engine takes of a negotiation. The
//! engine never mutates a negotiation; it asks whether the terms are
//! signed and what reward was agreed, at the moment of the call.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::identity::ActorId;

/// Coarse negotiation status as seen from outside the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NegotiationStatus {
    /// Terms are still open (created or initially accepted).
    Created,
    /// Final terms accepted by both sides.
    Signed,
}

impl std::fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::Signed => "SIGNED",
        };
        f.write_str(s)
    }
}

/// Point-in-time queries over a disclosure negotiation.
pub trait DisclosureStatus {
    /// The disclosure's own identity; arbitration cases are keyed by it.
    fn disclosure_id(&self) -> ActorId;

    /// Whether the negotiation has been signed.
    fn status(&self) -> NegotiationStatus;

    /// The reward currently on the table (the final reward once signed).
    fn requested_reward(&self) -> Amount;
}
