//! # Arbitration Engine
//!
//! Admits signed disclosures into arbitration, queues them for review,
//! moves accepted cases to trial, and records verdicts.
//!
//! ## Atomicity
//!
//! Every entry point validates first, then calls the ledger (if a fee is
//! due), and only then mutates engine state. A ledger failure therefore
//! leaves the engine untouched, and a validation failure never reaches
//! the ledger.
//!
//! ## Authorization
//!
//! Owner-only operations compare against the owner identity. Arbiter
//! operations go through [`ArbitrationEngine::authority`], which selects
//! [`SinglePrincipal`] or [`AllowList`] from the multi-arbiter switch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use dax_core::{
    ActorId, Amount, AssetId, DisclosureStatus, NegotiationStatus, Timestamp, ValueLedger,
};

use crate::authority::{AllowList, ArbiterAuthority, SinglePrincipal};
use crate::case::{Case, CaseState};
use crate::error::{ArbitrationError, Privilege};
use crate::events::{ArbitrationEvent, ArbitrationEventRecord};
use crate::fees::{self, FeeKind, FeeSchedule, FeeWaiver};
use crate::queue::{QueueInfo, ReviewQueue};

/// Construction parameters for an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own ledger identity; fee pulls spend its allowance.
    pub address: ActorId,
    pub owner: ActorId,
    /// Where collected fees go.
    pub treasury: ActorId,
    /// Asset fees are charged in.
    pub fee_asset: AssetId,
    pub fees: FeeSchedule,
}

/// The dispute queue and verdict engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationEngine {
    address: ActorId,
    owner: ActorId,
    treasury: ActorId,
    fee_asset: AssetId,
    eligibility_fee_bps: u32,
    queue: QueueInfo,
    review_queue: ReviewQueue,
    trial_queue: Vec<ActorId>,
    cases: BTreeMap<ActorId, Case>,
    waivers: BTreeMap<ActorId, FeeWaiver>,
    multi_arbiter_enabled: bool,
    arbiters: BTreeSet<ActorId>,
    events: Vec<ArbitrationEventRecord>,
}

impl ArbitrationEngine {
    /// Create an engine with empty queues.
    ///
    /// # Errors
    ///
    /// Returns [`ArbitrationError::InvalidFeeRate`] for an eligibility rate
    /// above 10000 bps.
    pub fn new(config: EngineConfig) -> Result<Self, ArbitrationError> {
        config.fees.validate()?;
        Ok(Self {
            address: config.address,
            owner: config.owner,
            treasury: config.treasury,
            fee_asset: config.fee_asset,
            eligibility_fee_bps: config.fees.eligibility_fee_bps,
            queue: QueueInfo::new(config.fees.base_submission_fee),
            review_queue: ReviewQueue::default(),
            trial_queue: Vec::new(),
            cases: BTreeMap::new(),
            waivers: BTreeMap::new(),
            multi_arbiter_enabled: false,
            arbiters: BTreeSet::new(),
            events: Vec::new(),
        })
    }

    // ── Case lifecycle ───────────────────────────────────────────────

    /// Admit a signed disclosure into arbitration (None → Eligible).
    ///
    /// Unless waived, pulls the eligibility fee (a share of the final
    /// reward) from `caller` into the treasury.
    pub fn make_eligible(
        &mut self,
        caller: &ActorId,
        disclosure: &dyn DisclosureStatus,
        ledger: &mut dyn ValueLedger,
    ) -> Result<(), ArbitrationError> {
        self.require_fee_asset(ledger)?;
        let id = disclosure.disclosure_id();
        let status = disclosure.status();
        if status != NegotiationStatus::Signed {
            return Err(ArbitrationError::NotSigned {
                disclosure: id,
                status,
            });
        }
        self.require_case_state(&id, CaseState::None)?;

        let fee = if self.waiver(&id).covers(FeeKind::Eligibility) {
            None
        } else {
            let amount = fees::eligibility_fee(disclosure.requested_reward(), self.eligibility_fee_bps)?;
            self.collect_fee(caller, &id, FeeKind::Eligibility, amount, ledger)?;
            Some(amount)
        };

        let mut case = Case::unadmitted(id);
        case.state = CaseState::Eligible;
        case.eligibility_fee_paid = fee.is_some();
        self.cases.insert(id, case);

        tracing::info!(disclosure = %id, payer = %caller, fee = ?fee, "case eligible");
        self.push_event(ArbitrationEvent::CaseEligible {
            disclosure: id,
            payer: *caller,
            fee,
        });
        Ok(())
    }

    /// File an eligible case into the review queue (Eligible → PendingReview).
    ///
    /// Unless waived, pulls the current congestion-priced submission fee
    /// from `caller`.
    pub fn submit_case(
        &mut self,
        caller: &ActorId,
        disclosure: &ActorId,
        ledger: &mut dyn ValueLedger,
    ) -> Result<usize, ArbitrationError> {
        self.require_fee_asset(ledger)?;
        self.require_case_state(disclosure, CaseState::Eligible)?;
        let position = self.queue.next_position;
        if position != self.review_queue.len() {
            return Err(ArbitrationError::QueueCorrupted(format!(
                "next position {position} but {} slots occupied",
                self.review_queue.len()
            )));
        }

        let fee = if self.waiver(disclosure).covers(FeeKind::Submission) {
            None
        } else {
            let amount = self.current_submission_fee()?;
            self.collect_fee(caller, disclosure, FeeKind::Submission, amount, ledger)?;
            Some(amount)
        };

        let slot = self.review_queue.push(*disclosure);
        debug_assert_eq!(slot, position);
        self.queue.next_position += 1;
        self.queue.pending_review_count += 1;
        let case = self.case_mut(disclosure)?;
        case.state = CaseState::PendingReview;
        case.queue_position = Some(position);
        case.filing_time = Some(Timestamp::now());
        case.filer = Some(*caller);
        case.submission_fee_paid = fee.is_some();

        tracing::info!(disclosure = %disclosure, filer = %caller, position, fee = ?fee, "case submitted");
        self.push_event(ArbitrationEvent::CaseSubmitted {
            disclosure: *disclosure,
            filer: *caller,
            position,
            fee,
        });
        Ok(position)
    }

    /// Arbiter decision on a queued case: to trial, or declined.
    ///
    /// Either way the case leaves the review queue and the queue is
    /// compacted.
    pub fn review_case(
        &mut self,
        caller: &ActorId,
        disclosure: &ActorId,
        accept_for_trial: bool,
    ) -> Result<(), ArbitrationError> {
        self.require_arbiter(caller)?;
        self.require_case_state(disclosure, CaseState::PendingReview)?;
        let position = self
            .cases
            .get(disclosure)
            .and_then(|c| c.queue_position)
            .ok_or_else(|| {
                ArbitrationError::QueueCorrupted(format!("{disclosure} has no queue position"))
            })?;
        if self.review_queue.get(position) != Some(disclosure) {
            return Err(ArbitrationError::QueueCorrupted(format!(
                "{disclosure} recorded at position {position} but slot holds {:?}",
                self.review_queue.get(position)
            )));
        }

        let moves = self.review_queue.remove_at(position).ok_or_else(|| {
            ArbitrationError::QueueCorrupted(format!("position {position} out of range"))
        })?;
        for slot_move in &moves {
            if let Some(shifted) = self.cases.get_mut(&slot_move.disclosure) {
                shifted.queue_position = Some(slot_move.new_position);
            }
        }
        tracing::debug!(disclosure = %disclosure, position, shifted = moves.len(), "review queue compacted");
        self.queue.next_position = self.queue.next_position.saturating_sub(1);
        self.queue.pending_review_count = self.queue.pending_review_count.saturating_sub(1);

        if accept_for_trial {
            self.trial_queue.push(*disclosure);
            self.queue.awaiting_trial_count += 1;
        }
        let case = self.case_mut(disclosure)?;
        case.queue_position = None;
        case.state = if accept_for_trial {
            CaseState::AwaitingTrial
        } else {
            CaseState::Declined
        };

        tracing::info!(disclosure = %disclosure, arbiter = %caller, accepted = accept_for_trial, "case reviewed");
        self.push_event(ArbitrationEvent::CaseReviewed {
            disclosure: *disclosure,
            arbiter: *caller,
            accepted: accept_for_trial,
        });
        Ok(())
    }

    /// Final verdict on a case awaiting trial.
    pub fn make_verdict(
        &mut self,
        caller: &ActorId,
        disclosure: &ActorId,
        accepted: bool,
    ) -> Result<(), ArbitrationError> {
        self.require_arbiter(caller)?;
        self.require_case_state(disclosure, CaseState::AwaitingTrial)?;
        self.queue.awaiting_trial_count = self.queue.awaiting_trial_count.saturating_sub(1);
        let case = self.case_mut(disclosure)?;
        case.state = if accepted {
            CaseState::Accepted
        } else {
            CaseState::Rejected
        };

        tracing::info!(disclosure = %disclosure, arbiter = %caller, accepted, "verdict rendered");
        self.push_event(ArbitrationEvent::VerdictRendered {
            disclosure: *disclosure,
            arbiter: *caller,
            accepted,
        });
        Ok(())
    }

    // ── Owner administration ─────────────────────────────────────────

    /// Turn on the allow-list. One-way.
    pub fn enable_multi_arbiter(&mut self, caller: &ActorId) -> Result<(), ArbitrationError> {
        self.require_owner(caller)?;
        if self.multi_arbiter_enabled {
            return Err(ArbitrationError::MultiArbiterAlreadyEnabled);
        }
        self.multi_arbiter_enabled = true;
        tracing::info!(arbiters = self.arbiters.len(), "multi-arbiter mode enabled");
        self.push_event(ArbitrationEvent::MultiArbiterEnabled);
        Ok(())
    }

    /// Approve an arbiter. Returns `false` if already approved.
    pub fn add_arbiter(
        &mut self,
        caller: &ActorId,
        arbiter: ActorId,
    ) -> Result<bool, ArbitrationError> {
        self.require_owner(caller)?;
        let added = self.arbiters.insert(arbiter);
        if added {
            tracing::info!(%arbiter, "arbiter added");
            self.push_event(ArbitrationEvent::ArbiterAdded { arbiter });
        }
        Ok(added)
    }

    /// Withdraw an arbiter's approval. The owner cannot be removed.
    pub fn remove_arbiter(
        &mut self,
        caller: &ActorId,
        arbiter: &ActorId,
    ) -> Result<(), ArbitrationError> {
        self.require_owner(caller)?;
        if arbiter == &self.owner {
            return Err(ArbitrationError::OwnerIsPermanentArbiter);
        }
        if !self.arbiters.remove(arbiter) {
            return Err(ArbitrationError::NotAnArbiter(*arbiter));
        }
        tracing::info!(%arbiter, "arbiter removed");
        self.push_event(ArbitrationEvent::ArbiterRemoved { arbiter: *arbiter });
        Ok(())
    }

    /// Grant a standing waiver of one fee for one disclosure. Not revocable.
    pub fn waive_fee(
        &mut self,
        caller: &ActorId,
        disclosure: ActorId,
        kind: FeeKind,
    ) -> Result<(), ArbitrationError> {
        self.require_owner(caller)?;
        let waiver = self.waivers.entry(disclosure).or_default();
        if waiver.covers(kind) {
            return Ok(());
        }
        waiver.grant(kind);
        tracing::info!(%disclosure, %kind, "fee waived");
        self.push_event(ArbitrationEvent::FeeWaived { disclosure, kind });
        Ok(())
    }

    pub fn set_base_submission_fee(
        &mut self,
        caller: &ActorId,
        fee: Amount,
    ) -> Result<(), ArbitrationError> {
        self.require_owner(caller)?;
        let from = self.queue.base_submission_fee;
        self.queue.base_submission_fee = fee;
        tracing::info!(%from, to = %fee, "base submission fee changed");
        self.push_event(ArbitrationEvent::BaseSubmissionFeeChanged { from, to: fee });
        Ok(())
    }

    pub fn set_eligibility_fee_bps(
        &mut self,
        caller: &ActorId,
        bps: u32,
    ) -> Result<(), ArbitrationError> {
        self.require_owner(caller)?;
        fees::validate_bps(bps)?;
        let from = self.eligibility_fee_bps;
        self.eligibility_fee_bps = bps;
        tracing::info!(from, to = bps, "eligibility fee rate changed");
        self.push_event(ArbitrationEvent::EligibilityFeeRateChanged { from, to: bps });
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Full case detail. Disclosures never admitted report state `None`.
    pub fn case(&self, disclosure: &ActorId) -> Case {
        self.cases
            .get(disclosure)
            .cloned()
            .unwrap_or_else(|| Case::unadmitted(*disclosure))
    }

    /// The fee the next `submit_case` would charge.
    pub fn current_submission_fee(&self) -> Result<Amount, ArbitrationError> {
        Ok(fees::submission_fee(
            self.queue.base_submission_fee,
            self.queue.pending_review_count,
        )?)
    }

    /// The eligibility fee `make_eligible` would charge for this disclosure,
    /// ignoring waivers.
    pub fn eligibility_fee_for(
        &self,
        disclosure: &dyn DisclosureStatus,
    ) -> Result<Amount, ArbitrationError> {
        Ok(fees::eligibility_fee(
            disclosure.requested_reward(),
            self.eligibility_fee_bps,
        )?)
    }

    pub fn queue_info(&self) -> QueueInfo {
        self.queue
    }

    /// Disclosures in review order.
    pub fn review_queue(&self) -> &[ActorId] {
        self.review_queue.as_slice()
    }

    /// Every disclosure ever accepted for trial, in acceptance order.
    pub fn trial_queue(&self) -> &[ActorId] {
        &self.trial_queue
    }

    pub fn waiver(&self, disclosure: &ActorId) -> FeeWaiver {
        self.waivers.get(disclosure).copied().unwrap_or_default()
    }

    pub fn is_arbiter(&self, who: &ActorId) -> bool {
        self.authority().permits(who)
    }

    /// The arbiter check currently in force.
    pub fn authority(&self) -> Box<dyn ArbiterAuthority + '_> {
        if self.multi_arbiter_enabled {
            Box::new(AllowList {
                owner: &self.owner,
                arbiters: &self.arbiters,
            })
        } else {
            Box::new(SinglePrincipal { owner: &self.owner })
        }
    }

    pub fn multi_arbiter_enabled(&self) -> bool {
        self.multi_arbiter_enabled
    }

    pub fn arbiters(&self) -> &BTreeSet<ActorId> {
        &self.arbiters
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn address(&self) -> ActorId {
        self.address
    }

    pub fn treasury(&self) -> ActorId {
        self.treasury
    }

    pub fn fee_asset(&self) -> &AssetId {
        &self.fee_asset
    }

    pub fn eligibility_fee_bps(&self) -> u32 {
        self.eligibility_fee_bps
    }

    pub fn events(&self) -> &[ArbitrationEventRecord] {
        &self.events
    }

    /// Check the queue bookkeeping against the case records.
    ///
    /// Occupied review slots must be exactly `0..pending_review_count`,
    /// every occupant must be `PendingReview` with a matching recorded
    /// position, and no other case may carry a position.
    pub fn verify_queue_invariants(&self) -> Result<(), ArbitrationError> {
        let q = &self.queue;
        if self.review_queue.len() != q.pending_review_count
            || q.next_position != q.pending_review_count
        {
            return Err(ArbitrationError::QueueCorrupted(format!(
                "{} slots, pending {}, next position {}",
                self.review_queue.len(),
                q.pending_review_count,
                q.next_position
            )));
        }
        for (i, id) in self.review_queue.as_slice().iter().enumerate() {
            let case = self.cases.get(id).ok_or_else(|| {
                ArbitrationError::QueueCorrupted(format!("slot {i} holds unknown {id}"))
            })?;
            if case.state != CaseState::PendingReview || case.queue_position != Some(i) {
                return Err(ArbitrationError::QueueCorrupted(format!(
                    "slot {i} holds {id} in state {} at recorded position {:?}",
                    case.state, case.queue_position
                )));
            }
        }
        let pending_cases = self
            .cases
            .values()
            .filter(|c| c.state == CaseState::PendingReview)
            .count();
        let positioned = self
            .cases
            .values()
            .filter(|c| c.queue_position.is_some())
            .count();
        if pending_cases != q.pending_review_count || positioned != q.pending_review_count {
            return Err(ArbitrationError::QueueCorrupted(format!(
                "{pending_cases} pending cases, {positioned} positioned, counter {}",
                q.pending_review_count
            )));
        }
        let awaiting = self
            .cases
            .values()
            .filter(|c| c.state == CaseState::AwaitingTrial)
            .count();
        if awaiting != q.awaiting_trial_count {
            return Err(ArbitrationError::QueueCorrupted(format!(
                "{awaiting} cases awaiting trial, counter {}",
                q.awaiting_trial_count
            )));
        }
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn collect_fee(
        &self,
        payer: &ActorId,
        disclosure: &ActorId,
        kind: FeeKind,
        amount: Amount,
        ledger: &mut dyn ValueLedger,
    ) -> Result<(), ArbitrationError> {
        ledger
            .transfer_from(&self.address, payer, &self.treasury, amount)
            .map_err(|source| {
                tracing::warn!(%disclosure, %payer, %kind, %amount, error = %source, "fee collection failed");
                ArbitrationError::Transfer {
                    disclosure: *disclosure,
                    kind,
                    source,
                }
            })
    }

    fn require_fee_asset(&self, ledger: &dyn ValueLedger) -> Result<(), ArbitrationError> {
        if ledger.asset() != &self.fee_asset {
            return Err(ArbitrationError::WrongAsset {
                expected: self.fee_asset.clone(),
                actual: ledger.asset().clone(),
            });
        }
        Ok(())
    }

    fn require_owner(&self, caller: &ActorId) -> Result<(), ArbitrationError> {
        if caller != &self.owner {
            return Err(ArbitrationError::Unauthorized {
                caller: *caller,
                required: Privilege::Owner,
            });
        }
        Ok(())
    }

    fn require_arbiter(&self, caller: &ActorId) -> Result<(), ArbitrationError> {
        let authority = self.authority();
        if !authority.permits(caller) {
            tracing::warn!(%caller, mode = authority.mode(), "arbiter check failed");
            return Err(ArbitrationError::Unauthorized {
                caller: *caller,
                required: Privilege::Arbiter,
            });
        }
        Ok(())
    }

    fn require_case_state(
        &self,
        disclosure: &ActorId,
        expected: CaseState,
    ) -> Result<(), ArbitrationError> {
        let actual = self
            .cases
            .get(disclosure)
            .map(|c| c.state)
            .unwrap_or_default();
        if actual != expected {
            return Err(ArbitrationError::InvalidState {
                disclosure: *disclosure,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn case_mut(&mut self, disclosure: &ActorId) -> Result<&mut Case, ArbitrationError> {
        self.cases.get_mut(disclosure).ok_or_else(|| {
            ArbitrationError::QueueCorrupted(format!("no case record for {disclosure}"))
        })
    }

    fn push_event(&mut self, event: ArbitrationEvent) {
        self.events.push(ArbitrationEventRecord {
            at: Timestamp::now(),
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dax_core::{ErrorCategory, InMemoryLedger};

    struct StubDisclosure {
        id: ActorId,
        status: NegotiationStatus,
        reward: Amount,
    }

    impl DisclosureStatus for StubDisclosure {
        fn disclosure_id(&self) -> ActorId {
            self.id
        }
        fn status(&self) -> NegotiationStatus {
            self.status
        }
        fn requested_reward(&self) -> Amount {
            self.reward
        }
    }

    fn actor(n: u64) -> ActorId {
        ActorId::derive(b"engine-test", n)
    }

    fn owner() -> ActorId {
        actor(0)
    }

    fn filer() -> ActorId {
        actor(1)
    }

    fn treasury() -> ActorId {
        actor(2)
    }

    fn engine_address() -> ActorId {
        actor(3)
    }

    fn signed(n: u64, reward: u128) -> StubDisclosure {
        StubDisclosure {
            id: actor(1000 + n),
            status: NegotiationStatus::Signed,
            reward: Amount::new(reward),
        }
    }

    fn setup() -> (ArbitrationEngine, InMemoryLedger) {
        let asset = AssetId::new("USDC").unwrap();
        let engine = ArbitrationEngine::new(EngineConfig {
            address: engine_address(),
            owner: owner(),
            treasury: treasury(),
            fee_asset: asset.clone(),
            fees: FeeSchedule::default(),
        })
        .unwrap();
        let mut ledger = InMemoryLedger::new(asset);
        ledger.mint(&filer(), Amount::new(1_000_000)).unwrap();
        ledger.approve(&filer(), &engine_address(), Amount::new(1_000_000));
        (engine, ledger)
    }

    fn submitted(engine: &mut ArbitrationEngine, ledger: &mut InMemoryLedger, n: u64) -> ActorId {
        let d = signed(n, 1000);
        engine.make_eligible(&filer(), &d, ledger).unwrap();
        engine.submit_case(&filer(), &d.id, ledger).unwrap();
        d.id
    }

    #[test]
    fn make_eligible_charges_one_percent() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 1000);
        engine.make_eligible(&filer(), &d, &mut ledger).unwrap();
        let case = engine.case(&d.id);
        assert_eq!(case.state, CaseState::Eligible);
        assert!(case.eligibility_fee_paid);
        assert_eq!(ledger.balance_of(&treasury()), Amount::new(10));
    }

    #[test]
    fn make_eligible_requires_signed() {
        let (mut engine, mut ledger) = setup();
        let mut d = signed(1, 1000);
        d.status = NegotiationStatus::Created;
        let err = engine.make_eligible(&filer(), &d, &mut ledger).unwrap_err();
        assert!(matches!(err, ArbitrationError::NotSigned { .. }));
        assert_eq!(engine.case(&d.id).state, CaseState::None);
    }

    #[test]
    fn make_eligible_twice_fails_without_charging() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 1000);
        engine.make_eligible(&filer(), &d, &mut ledger).unwrap();
        let before = ledger.clone();
        let err = engine.make_eligible(&filer(), &d, &mut ledger).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::StatePrecondition);
        assert_eq!(ledger, before);
    }

    #[test]
    fn make_eligible_transfer_failure_leaves_case_none() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 1000);
        let poor = actor(77);
        let err = engine.make_eligible(&poor, &d, &mut ledger).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transfer);
        assert_eq!(engine.case(&d.id).state, CaseState::None);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn eligibility_waiver_skips_fee_and_leaves_flag_false() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 1000);
        engine.waive_fee(&owner(), d.id, FeeKind::Eligibility).unwrap();
        engine.make_eligible(&filer(), &d, &mut ledger).unwrap();
        let case = engine.case(&d.id);
        assert_eq!(case.state, CaseState::Eligible);
        assert!(!case.eligibility_fee_paid);
        assert_eq!(ledger.balance_of(&treasury()), Amount::ZERO);
    }

    #[test]
    fn submit_charges_dynamic_fee() {
        let (mut engine, mut ledger) = setup();
        let x = signed(1, 0);
        let y = signed(2, 0);
        engine.make_eligible(&filer(), &x, &mut ledger).unwrap();
        engine.make_eligible(&filer(), &y, &mut ledger).unwrap();

        assert_eq!(engine.current_submission_fee().unwrap(), Amount::new(100));
        engine.submit_case(&filer(), &x.id, &mut ledger).unwrap();
        assert_eq!(ledger.balance_of(&treasury()), Amount::new(100));

        assert_eq!(engine.current_submission_fee().unwrap(), Amount::new(200));
        engine.submit_case(&filer(), &y.id, &mut ledger).unwrap();
        assert_eq!(ledger.balance_of(&treasury()), Amount::new(300));

        let case = engine.case(&y.id);
        assert_eq!(case.state, CaseState::PendingReview);
        assert_eq!(case.queue_position, Some(1));
        assert_eq!(case.filer, Some(filer()));
        assert!(case.filing_time.is_some());
        assert!(case.submission_fee_paid);
    }

    #[test]
    fn submit_requires_eligible() {
        let (mut engine, mut ledger) = setup();
        let err = engine
            .submit_case(&filer(), &actor(5000), &mut ledger)
            .unwrap_err();
        assert!(matches!(
            err,
            ArbitrationError::InvalidState {
                expected: CaseState::Eligible,
                actual: CaseState::None,
                ..
            }
        ));
    }

    #[test]
    fn submit_transfer_failure_leaves_case_eligible() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 1000);
        engine.make_eligible(&filer(), &d, &mut ledger).unwrap();
        ledger.approve(&filer(), &engine_address(), Amount::ZERO);
        let err = engine.submit_case(&filer(), &d.id, &mut ledger).unwrap_err();
        assert!(matches!(
            err,
            ArbitrationError::Transfer {
                kind: FeeKind::Submission,
                ..
            }
        ));
        assert_eq!(engine.case(&d.id).state, CaseState::Eligible);
        assert_eq!(engine.queue_info().pending_review_count, 0);
        assert_eq!(engine.queue_info().next_position, 0);
    }

    #[test]
    fn submit_on_inconsistent_queue_fails_before_charging() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 0);
        engine.make_eligible(&filer(), &d, &mut ledger).unwrap();
        engine.queue.next_position = 4;
        let before = ledger.clone();

        let err = engine.submit_case(&filer(), &d.id, &mut ledger).unwrap_err();
        assert!(matches!(err, ArbitrationError::QueueCorrupted(_)));
        assert_eq!(ledger, before);
        assert_eq!(engine.case(&d.id).state, CaseState::Eligible);
        assert_eq!(engine.queue_info().pending_review_count, 0);
        assert!(engine.review_queue().is_empty());
    }

    #[test]
    fn submission_waiver_skips_fee() {
        let (mut engine, mut ledger) = setup();
        let d = signed(1, 0);
        engine.make_eligible(&filer(), &d, &mut ledger).unwrap();
        engine.waive_fee(&owner(), d.id, FeeKind::Submission).unwrap();
        engine.submit_case(&filer(), &d.id, &mut ledger).unwrap();
        assert!(!engine.case(&d.id).submission_fee_paid);
        assert_eq!(ledger.balance_of(&treasury()), Amount::ZERO);
    }

    #[test]
    fn decline_compacts_queue_and_updates_positions() {
        let (mut engine, mut ledger) = setup();
        let a = submitted(&mut engine, &mut ledger, 1);
        let b = submitted(&mut engine, &mut ledger, 2);
        let c = submitted(&mut engine, &mut ledger, 3);

        engine.review_case(&owner(), &b, false).unwrap();

        assert_eq!(engine.review_queue(), &[a, c]);
        assert_eq!(engine.case(&c).queue_position, Some(1));
        assert_eq!(engine.case(&b).state, CaseState::Declined);
        assert_eq!(engine.case(&b).queue_position, None);
        assert_eq!(engine.queue_info().pending_review_count, 2);
        assert_eq!(engine.queue_info().next_position, 2);
        engine.verify_queue_invariants().unwrap();
    }

    #[test]
    fn accept_moves_case_to_trial() {
        let (mut engine, mut ledger) = setup();
        let a = submitted(&mut engine, &mut ledger, 1);
        engine.review_case(&owner(), &a, true).unwrap();
        assert_eq!(engine.case(&a).state, CaseState::AwaitingTrial);
        assert_eq!(engine.trial_queue(), &[a]);
        assert_eq!(engine.queue_info().awaiting_trial_count, 1);
        assert!(engine.review_queue().is_empty());
    }

    #[test]
    fn verdicts_are_terminal() {
        let (mut engine, mut ledger) = setup();
        let a = submitted(&mut engine, &mut ledger, 1);
        let b = submitted(&mut engine, &mut ledger, 2);
        engine.review_case(&owner(), &a, true).unwrap();
        engine.review_case(&owner(), &b, true).unwrap();
        engine.make_verdict(&owner(), &a, true).unwrap();
        engine.make_verdict(&owner(), &b, false).unwrap();

        assert_eq!(engine.case(&a).state, CaseState::Accepted);
        assert_eq!(engine.case(&b).state, CaseState::Rejected);
        assert_eq!(engine.queue_info().awaiting_trial_count, 0);
        assert_eq!(engine.trial_queue().len(), 2);
        assert!(engine.make_verdict(&owner(), &a, false).is_err());
    }

    #[test]
    fn verdict_requires_awaiting_trial() {
        let (mut engine, mut ledger) = setup();
        let a = submitted(&mut engine, &mut ledger, 1);
        let err = engine.make_verdict(&owner(), &a, true).unwrap_err();
        assert!(matches!(err, ArbitrationError::InvalidState { .. }));
    }

    #[test]
    fn non_arbiter_cannot_review() {
        let (mut engine, mut ledger) = setup();
        let a = submitted(&mut engine, &mut ledger, 1);
        let err = engine.review_case(&filer(), &a, true).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(engine.case(&a).state, CaseState::PendingReview);
    }

    #[test]
    fn allow_list_ignored_until_enabled() {
        let (mut engine, mut ledger) = setup();
        let a = submitted(&mut engine, &mut ledger, 1);
        let arbiter = actor(9);
        engine.add_arbiter(&owner(), arbiter).unwrap();
        assert!(!engine.is_arbiter(&arbiter));
        assert!(engine.review_case(&arbiter, &a, true).is_err());

        engine.enable_multi_arbiter(&owner()).unwrap();
        assert!(engine.is_arbiter(&arbiter));
        engine.review_case(&arbiter, &a, true).unwrap();
        engine.make_verdict(&arbiter, &a, true).unwrap();
    }

    #[test]
    fn multi_arbiter_switch_is_one_way_and_owner_only() {
        let (mut engine, _) = setup();
        assert!(engine.enable_multi_arbiter(&filer()).is_err());
        engine.enable_multi_arbiter(&owner()).unwrap();
        assert!(matches!(
            engine.enable_multi_arbiter(&owner()),
            Err(ArbitrationError::MultiArbiterAlreadyEnabled)
        ));
        assert!(engine.multi_arbiter_enabled());
    }

    #[test]
    fn owner_cannot_be_removed_from_allow_list() {
        let (mut engine, _) = setup();
        engine.enable_multi_arbiter(&owner()).unwrap();
        let err = engine.remove_arbiter(&owner(), &owner()).unwrap_err();
        assert!(matches!(err, ArbitrationError::OwnerIsPermanentArbiter));
        assert!(engine.is_arbiter(&owner()));
    }

    #[test]
    fn removed_arbiter_loses_authority() {
        let (mut engine, _) = setup();
        engine.enable_multi_arbiter(&owner()).unwrap();
        engine.add_arbiter(&owner(), actor(9)).unwrap();
        assert!(engine.is_arbiter(&actor(9)));
        engine.remove_arbiter(&owner(), &actor(9)).unwrap();
        assert!(!engine.is_arbiter(&actor(9)));
        assert!(matches!(
            engine.remove_arbiter(&owner(), &actor(9)),
            Err(ArbitrationError::NotAnArbiter(_))
        ));
    }

    #[test]
    fn only_owner_administers() {
        let (mut engine, _) = setup();
        assert!(engine.add_arbiter(&filer(), actor(9)).is_err());
        assert!(engine.waive_fee(&filer(), actor(9), FeeKind::Submission).is_err());
        assert!(engine.set_base_submission_fee(&filer(), Amount::new(1)).is_err());
        assert!(engine.set_eligibility_fee_bps(&filer(), 1).is_err());
    }

    #[test]
    fn fee_policy_is_configurable() {
        let (mut engine, _) = setup();
        engine
            .set_base_submission_fee(&owner(), Amount::new(7))
            .unwrap();
        assert_eq!(engine.current_submission_fee().unwrap(), Amount::new(7));
        engine.set_eligibility_fee_bps(&owner(), 250).unwrap();
        assert_eq!(
            engine.eligibility_fee_for(&signed(1, 1000)).unwrap(),
            Amount::new(25)
        );
        assert!(matches!(
            engine.set_eligibility_fee_bps(&owner(), 20_000),
            Err(ArbitrationError::InvalidFeeRate(20_000))
        ));
    }

    #[test]
    fn wrong_fee_asset_rejected() {
        let (mut engine, _) = setup();
        let mut dai = InMemoryLedger::new(AssetId::new("DAI").unwrap());
        let err = engine
            .make_eligible(&filer(), &signed(1, 1000), &mut dai)
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::WrongAsset { .. }));
    }

    #[test]
    fn engine_serializes() {
        let (mut engine, mut ledger) = setup();
        submitted(&mut engine, &mut ledger, 1);
        let json = serde_json::to_string(&engine).unwrap();
        let back: ArbitrationEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, engine);
        back.verify_queue_invariants().unwrap();
    }
}
