//! # Fee Economics
//!
//! Two fees gate entry into arbitration:
//!
//! - **Eligibility fee**: a basis-point share of the disclosure's final
//!   reward, charged by [`make_eligible`](crate::engine::ArbitrationEngine::make_eligible).
//! - **Submission fee**: congestion-priced. With an empty review queue it
//!   is the base fee; otherwise `base * 2^pending`, where `pending` is the
//!   live review backlog. Fee pressure relaxes as the backlog drains.
//!
//! Either fee can be waived per disclosure by the engine owner. A waiver
//! is permanent and skips collection; it does not refund anything.

use serde::{Deserialize, Serialize};

use dax_core::{Amount, DaxError, BPS_DENOMINATOR};

use crate::error::ArbitrationError;

/// Default eligibility rate: 1% of the final reward.
pub const DEFAULT_ELIGIBILITY_FEE_BPS: u32 = 100;

/// Which of the two fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeKind {
    Eligibility,
    Submission,
}

impl std::fmt::Display for FeeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eligibility => f.write_str("eligibility"),
            Self::Submission => f.write_str("submission"),
        }
    }
}

/// Externally configured fee policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_submission_fee: Amount,
    pub eligibility_fee_bps: u32,
}

impl FeeSchedule {
    /// Reject rates above 100%.
    pub fn validate(&self) -> Result<(), ArbitrationError> {
        validate_bps(self.eligibility_fee_bps)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_submission_fee: Amount::new(100),
            eligibility_fee_bps: DEFAULT_ELIGIBILITY_FEE_BPS,
        }
    }
}

/// Standing exemptions for one disclosure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeWaiver {
    pub eligibility: bool,
    pub submission: bool,
}

impl FeeWaiver {
    pub fn covers(&self, kind: FeeKind) -> bool {
        match kind {
            FeeKind::Eligibility => self.eligibility,
            FeeKind::Submission => self.submission,
        }
    }

    pub(crate) fn grant(&mut self, kind: FeeKind) {
        match kind {
            FeeKind::Eligibility => self.eligibility = true,
            FeeKind::Submission => self.submission = true,
        }
    }
}

/// The submission fee for a review backlog of `pending_review` cases.
pub fn submission_fee(base: Amount, pending_review: usize) -> Result<Amount, DaxError> {
    if pending_review == 0 {
        return Ok(base);
    }
    let exponent = u64::try_from(pending_review).unwrap_or(u64::MAX);
    base.doubled_n_times(exponent)
}

/// The eligibility fee on a final reward at `bps` basis points.
pub fn eligibility_fee(final_reward: Amount, bps: u32) -> Result<Amount, DaxError> {
    final_reward.basis_points(bps)
}

pub(crate) fn validate_bps(bps: u32) -> Result<(), ArbitrationError> {
    if bps > BPS_DENOMINATOR {
        return Err(ArbitrationError::InvalidFeeRate(bps));
    }
    Ok(())
}
