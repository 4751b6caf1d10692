//! Append-only log of what the engine did.

use serde::{Deserialize, Serialize};

use dax_core::{ActorId, Amount, Timestamp};

use crate::fees::FeeKind;

/// An observable engine action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArbitrationEvent {
    /// Admitted to arbitration. `fee` is `None` under a waiver.
    CaseEligible {
        disclosure: ActorId,
        payer: ActorId,
        fee: Option<Amount>,
    },
    /// Entered the review queue at `position`.
    CaseSubmitted {
        disclosure: ActorId,
        filer: ActorId,
        position: usize,
        fee: Option<Amount>,
    },
    /// Review decision. `accepted` sends the case to trial.
    CaseReviewed {
        disclosure: ActorId,
        arbiter: ActorId,
        accepted: bool,
    },
    /// Final verdict.
    VerdictRendered {
        disclosure: ActorId,
        arbiter: ActorId,
        accepted: bool,
    },
    MultiArbiterEnabled,
    ArbiterAdded { arbiter: ActorId },
    ArbiterRemoved { arbiter: ActorId },
    FeeWaived { disclosure: ActorId, kind: FeeKind },
    BaseSubmissionFeeChanged { from: Amount, to: Amount },
    EligibilityFeeRateChanged { from: u32, to: u32 },
}

/// An event with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationEventRecord {
    pub at: Timestamp,
    pub event: ArbitrationEvent,
}
