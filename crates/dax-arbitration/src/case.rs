//! # Arbitration Case
//!
//! One record per disclosure, keyed by the disclosure's identity.
//!
//! ```text
//! None ──make_eligible()──▶ Eligible ──submit_case()──▶ PendingReview
//!                                                          │
//!                                     review_case(false) ──┼── review_case(true)
//!                                                          │            │
//!                                                          ▼            ▼
//!                                                      Declined   AwaitingTrial
//!                                                                       │
//!                                             make_verdict(true) ───────┼─────── make_verdict(false)
//!                                                                       │
//!                                                           Accepted ◀──┴──▶ Rejected
//! ```

use serde::{Deserialize, Serialize};

use dax_core::{ActorId, Timestamp};

/// The arbitration state of a disclosure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseState {
    /// Not admitted to arbitration.
    #[default]
    None,
    /// Admitted; may be submitted to the review queue.
    Eligible,
    /// Waiting in the review queue.
    PendingReview,
    /// Accepted for trial; waiting for a verdict.
    AwaitingTrial,
    /// Declined at review (terminal).
    Declined,
    /// Verdict for the filer (terminal).
    Accepted,
    /// Verdict against the filer (terminal).
    Rejected,
}

impl CaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Eligible => "ELIGIBLE",
            Self::PendingReview => "PENDING_REVIEW",
            Self::AwaitingTrial => "AWAITING_TRIAL",
            Self::Declined => "DECLINED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::Accepted | Self::Rejected)
    }

    /// Depth along the transition graph. Every transition strictly
    /// increases it.
    pub fn depth(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Eligible => 1,
            Self::PendingReview => 2,
            Self::AwaitingTrial | Self::Declined => 3,
            Self::Accepted | Self::Rejected => 4,
        }
    }
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full detail of an arbitration case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// The disclosure this case is bound to. Never changes.
    pub disclosure: ActorId,
    pub state: CaseState,
    /// Set when the case enters the review queue.
    pub filing_time: Option<Timestamp>,
    /// Who submitted the case; may differ from the disclosure's owner.
    pub filer: Option<ActorId>,
    /// Review-queue index. `Some` exactly while `state == PendingReview`.
    pub queue_position: Option<usize>,
    /// Eligibility fee was actually collected (false under a waiver).
    pub eligibility_fee_paid: bool,
    /// Submission fee was actually collected (false under a waiver).
    pub submission_fee_paid: bool,
}

impl Case {
    /// The detail reported for a disclosure that never entered arbitration.
    pub fn unadmitted(disclosure: ActorId) -> Self {
        Self {
            disclosure,
            state: CaseState::None,
            filing_time: None,
            filer: None,
            queue_position: None,
            eligibility_fee_paid: false,
            submission_fee_paid: false,
        }
    }
}
