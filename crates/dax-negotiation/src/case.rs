//! # Disclosure Negotiation State Machine
//!
//! A researcher (the owner) opens a disclosure against a protocol (the
//! participant) with a proposed severity and reward. The participant
//! accepts the initial terms, the owner may revise them any number of
//! times, and the participant's final acceptance signs the negotiation.
//!
//! ## States
//!
//! ```text
//! Created ──accept_initial_terms()──▶ InitiallyAccepted ──accept_final_terms()──▶ FinallyAccepted
//!                                       │        ▲
//!                                       └────────┘
//!                                      update_terms()
//! ```
//!
//! `FinallyAccepted` is terminal. Final acceptance fires the bound
//! [`AcceptanceNotifier`] exactly once.
//!
//! ## Funds
//!
//! The negotiation has its own ledger account (its [`id`](NegotiationCase::id)).
//! Payment-asset funds sent there can be withdrawn by the owner only after
//! final acceptance, in one whole-balance [`claim_reward`](NegotiationCase::claim_reward).
//! Any other asset can be swept by the owner at any time with
//! [`recover_foreign_asset`](NegotiationCase::recover_foreign_asset).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dax_core::{
    ActorId, Amount, AssetId, Commitment, DisclosureStatus, NegotiationStatus, Timestamp,
    ValueLedger,
};

use crate::error::{NegotiationError, Role};
use crate::notifier::AcceptanceNotifier;

// ─── Negotiation State ───────────────────────────────────────────────

/// The lifecycle state of a negotiation. Never moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NegotiationState {
    /// Opened by the owner, awaiting the participant's first acceptance.
    Created,
    /// Participant accepted the initial terms; owner may revise.
    InitiallyAccepted,
    /// Participant accepted the final terms (terminal).
    FinallyAccepted,
}

impl NegotiationState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FinallyAccepted)
    }
}

impl std::fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::InitiallyAccepted => "INITIALLY_ACCEPTED",
            Self::FinallyAccepted => "FINALLY_ACCEPTED",
        };
        f.write_str(s)
    }
}

/// Severity classification of the disclosed vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown severity {other:?}")),
        }
    }
}

/// A severity/reward pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    pub severity: Severity,
    pub reward: Amount,
}

// ─── Events ──────────────────────────────────────────────────────────

/// Something observable that happened to a negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationEvent {
    /// Participant accepted the opening terms.
    InitialTermsAccepted { terms: Terms },
    /// Owner revised the final terms.
    TermsUpdated { terms: Terms },
    /// Participant accepted the final terms.
    FinalTermsAccepted { terms: Terms },
    /// Owner withdrew the payment-asset balance.
    RewardClaimed { to: ActorId, amount: Amount },
    /// Owner swept a non-payment asset.
    ForeignAssetRecovered {
        asset: AssetId,
        to: ActorId,
        amount: Amount,
    },
}

/// An event with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationEventRecord {
    pub at: Timestamp,
    pub event: NegotiationEvent,
}

// ─── Persistent Record ───────────────────────────────────────────────

/// Inputs for opening a negotiation.
#[derive(Debug, Clone)]
pub struct NegotiationParams {
    /// Ledger identity of the negotiation itself.
    pub id: ActorId,
    pub owner: ActorId,
    pub participant: ActorId,
    pub commitment: Commitment,
    pub severity: Severity,
    pub reward: Amount,
    /// Asset the reward is paid in.
    pub payment_asset: AssetId,
}

/// The serializable state of a negotiation.
///
/// Turned back into a live [`NegotiationCase`] with
/// [`NegotiationCase::restore`], which re-checks the notifier binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationRecord {
    pub id: ActorId,
    pub owner: ActorId,
    pub participant: ActorId,
    pub commitment: Commitment,
    pub payment_asset: AssetId,
    /// Identity of the bound acceptance notifier.
    pub binding: ActorId,
    pub state: NegotiationState,
    pub initial_terms: Terms,
    pub final_terms: Terms,
    pub created_at: Timestamp,
    pub events: Vec<NegotiationEventRecord>,
}

// ─── Negotiation Case ────────────────────────────────────────────────

/// A live disclosure negotiation bound to its acceptance notifier.
pub struct NegotiationCase {
    record: NegotiationRecord,
    notifier: Arc<dyn AcceptanceNotifier>,
}

impl std::fmt::Debug for NegotiationCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegotiationCase")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl NegotiationCase {
    /// Open a negotiation in [`Created`](NegotiationState::Created) state.
    ///
    /// Owner/participant distinctness is the deploying collaborator's
    /// responsibility (see [`DisclosureRegistry::deploy`](crate::registry::DisclosureRegistry::deploy)).
    pub fn open(params: NegotiationParams, notifier: Arc<dyn AcceptanceNotifier>) -> Self {
        let terms = Terms {
            severity: params.severity,
            reward: params.reward,
        };
        Self {
            record: NegotiationRecord {
                id: params.id,
                owner: params.owner,
                participant: params.participant,
                commitment: params.commitment,
                payment_asset: params.payment_asset,
                binding: notifier.binding_id(),
                state: NegotiationState::Created,
                initial_terms: terms,
                final_terms: terms,
                created_at: Timestamp::now(),
                events: Vec::new(),
            },
            notifier,
        }
    }

    /// Rebuild a negotiation from its persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::BindingMismatch`] if `notifier` is not
    /// the collaborator the negotiation was deployed with.
    pub fn restore(
        record: NegotiationRecord,
        notifier: Arc<dyn AcceptanceNotifier>,
    ) -> Result<Self, NegotiationError> {
        let offered = notifier.binding_id();
        if offered != record.binding {
            return Err(NegotiationError::BindingMismatch {
                expected: record.binding,
                actual: offered,
            });
        }
        Ok(Self { record, notifier })
    }

    /// Snapshot for persistence.
    pub fn record(&self) -> &NegotiationRecord {
        &self.record
    }

    pub fn id(&self) -> ActorId {
        self.record.id
    }

    pub fn owner(&self) -> ActorId {
        self.record.owner
    }

    pub fn participant(&self) -> ActorId {
        self.record.participant
    }

    pub fn commitment(&self) -> &Commitment {
        &self.record.commitment
    }

    pub fn state(&self) -> NegotiationState {
        self.record.state
    }

    pub fn initial_terms(&self) -> Terms {
        self.record.initial_terms
    }

    pub fn final_terms(&self) -> Terms {
        self.record.final_terms
    }

    pub fn events(&self) -> &[NegotiationEventRecord] {
        &self.record.events
    }

    /// Participant accepts the opening terms (Created → InitiallyAccepted).
    pub fn accept_initial_terms(&mut self, caller: &ActorId) -> Result<(), NegotiationError> {
        self.require_role(caller, Role::Participant)?;
        self.require_state(NegotiationState::Created)?;
        self.record.state = NegotiationState::InitiallyAccepted;
        let terms = self.record.final_terms;
        tracing::info!(disclosure = %self.record.id, severity = %terms.severity, reward = %terms.reward, "initial terms accepted");
        self.push_event(NegotiationEvent::InitialTermsAccepted { terms });
        Ok(())
    }

    /// Owner revises the final terms. Repeatable while InitiallyAccepted.
    pub fn update_terms(
        &mut self,
        caller: &ActorId,
        severity: Severity,
        reward: Amount,
    ) -> Result<(), NegotiationError> {
        self.require_role(caller, Role::Owner)?;
        if self.record.state != NegotiationState::InitiallyAccepted {
            return Err(NegotiationError::OnlyDuringNegotiation {
                state: self.record.state,
            });
        }
        let terms = Terms { severity, reward };
        self.record.final_terms = terms;
        tracing::info!(disclosure = %self.record.id, %severity, %reward, "terms updated");
        self.push_event(NegotiationEvent::TermsUpdated { terms });
        Ok(())
    }

    /// Participant accepts the final terms (InitiallyAccepted → FinallyAccepted)
    /// and the bound notifier is told. Irreversible.
    pub fn accept_final_terms(&mut self, caller: &ActorId) -> Result<(), NegotiationError> {
        self.require_role(caller, Role::Participant)?;
        self.require_state(NegotiationState::InitiallyAccepted)?;
        self.record.state = NegotiationState::FinallyAccepted;
        let terms = self.record.final_terms;
        self.push_event(NegotiationEvent::FinalTermsAccepted { terms });
        tracing::info!(disclosure = %self.record.id, severity = %terms.severity, reward = %terms.reward, "final terms accepted");
        self.notifier
            .on_final_acceptance(self.record.id, self.record.owner, terms.reward);
        Ok(())
    }

    /// Withdraw the entire payment-asset balance to the owner.
    ///
    /// Only after final acceptance. A zero balance is an error, not a no-op.
    pub fn claim_reward(
        &mut self,
        caller: &ActorId,
        ledger: &mut dyn ValueLedger,
    ) -> Result<Amount, NegotiationError> {
        self.require_role(caller, Role::Owner)?;
        self.require_state(NegotiationState::FinallyAccepted)?;
        if ledger.asset() != &self.record.payment_asset {
            return Err(NegotiationError::WrongAsset {
                expected: self.record.payment_asset.clone(),
                actual: ledger.asset().clone(),
            });
        }
        let amount = self.sweep(ledger)?;
        tracing::info!(disclosure = %self.record.id, %amount, "reward claimed");
        self.push_event(NegotiationEvent::RewardClaimed {
            to: self.record.owner,
            amount,
        });
        Ok(amount)
    }

    /// Sweep an accidentally-sent asset to the owner. No state precondition.
    pub fn recover_foreign_asset(
        &mut self,
        caller: &ActorId,
        ledger: &mut dyn ValueLedger,
    ) -> Result<Amount, NegotiationError> {
        self.require_role(caller, Role::Owner)?;
        if ledger.asset() == &self.record.payment_asset {
            return Err(NegotiationError::ProtectedAsset {
                asset: ledger.asset().clone(),
            });
        }
        let amount = self.sweep(ledger)?;
        let asset = ledger.asset().clone();
        tracing::info!(disclosure = %self.record.id, %asset, %amount, "foreign asset recovered");
        self.push_event(NegotiationEvent::ForeignAssetRecovered {
            asset,
            to: self.record.owner,
            amount,
        });
        Ok(amount)
    }

    /// Move the disclosure's whole balance on `ledger` to the owner.
    fn sweep(&self, ledger: &mut dyn ValueLedger) -> Result<Amount, NegotiationError> {
        let balance = ledger.balance_of(&self.record.id);
        if balance.is_zero() {
            return Err(NegotiationError::NothingToClaim {
                disclosure: self.record.id,
                asset: ledger.asset().clone(),
            });
        }
        ledger.transfer(&self.record.id, &self.record.owner, balance)?;
        Ok(balance)
    }

    fn require_role(&self, caller: &ActorId, role: Role) -> Result<(), NegotiationError> {
        let holder = match role {
            Role::Owner => &self.record.owner,
            Role::Participant => &self.record.participant,
        };
        if caller != holder {
            return Err(NegotiationError::Unauthorized {
                caller: *caller,
                role,
            });
        }
        Ok(())
    }

    fn require_state(&self, expected: NegotiationState) -> Result<(), NegotiationError> {
        if self.record.state != expected {
            return Err(NegotiationError::InvalidState {
                expected,
                actual: self.record.state,
            });
        }
        Ok(())
    }

    fn push_event(&mut self, event: NegotiationEvent) {
        self.record.events.push(NegotiationEventRecord {
            at: Timestamp::now(),
            event,
        });
    }
}

impl DisclosureStatus for NegotiationCase {
    fn disclosure_id(&self) -> ActorId {
        self.record.id
    }

    fn status(&self) -> NegotiationStatus {
        match self.record.state {
            NegotiationState::FinallyAccepted => NegotiationStatus::Signed,
            NegotiationState::Created | NegotiationState::InitiallyAccepted => {
                NegotiationStatus::Created
            }
        }
    }

    fn requested_reward(&self) -> Amount {
        self.record.final_terms.reward
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dax_core::{ErrorCategory, InMemoryLedger};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<(ActorId, ActorId, Amount)>>,
    }

    impl AcceptanceNotifier for RecordingNotifier {
        fn binding_id(&self) -> ActorId {
            ActorId::derive(b"recording-notifier", 0)
        }

        fn on_final_acceptance(&self, disclosure: ActorId, owner: ActorId, final_reward: Amount) {
            self.calls.lock().push((disclosure, owner, final_reward));
        }
    }

    fn actor(n: u64) -> ActorId {
        ActorId::derive(b"negotiation-test", n)
    }

    fn owner() -> ActorId {
        actor(1)
    }

    fn participant() -> ActorId {
        actor(2)
    }

    fn usdc() -> AssetId {
        AssetId::new("USDC").unwrap()
    }

    fn open_case() -> (NegotiationCase, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        let case = NegotiationCase::open(
            NegotiationParams {
                id: actor(100),
                owner: owner(),
                participant: participant(),
                commitment: Commitment::new(bytes).unwrap(),
                severity: Severity::High,
                reward: Amount::new(1000),
                payment_asset: usdc(),
            },
            notifier.clone(),
        );
        (case, notifier)
    }

    fn signed_case() -> (NegotiationCase, Arc<RecordingNotifier>) {
        let (mut case, notifier) = open_case();
        case.accept_initial_terms(&participant()).unwrap();
        case.accept_final_terms(&participant()).unwrap();
        (case, notifier)
    }

    // ── Happy path ───────────────────────────────────────────────────

    #[test]
    fn open_starts_in_created_with_equal_terms() {
        let (case, _) = open_case();
        assert_eq!(case.state(), NegotiationState::Created);
        assert_eq!(case.initial_terms(), case.final_terms());
        assert_eq!(case.status(), NegotiationStatus::Created);
        assert!(case.events().is_empty());
    }

    #[test]
    fn full_negotiation_signs_and_notifies_once() {
        let (mut case, notifier) = open_case();
        case.accept_initial_terms(&participant()).unwrap();
        case.update_terms(&owner(), Severity::Critical, Amount::new(5000))
            .unwrap();
        case.accept_final_terms(&participant()).unwrap();

        assert_eq!(case.state(), NegotiationState::FinallyAccepted);
        assert_eq!(case.status(), NegotiationStatus::Signed);
        assert_eq!(case.requested_reward(), Amount::new(5000));
        assert_eq!(case.initial_terms().reward, Amount::new(1000));

        let calls = notifier.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (case.id(), owner(), Amount::new(5000)));
    }

    #[test]
    fn final_terms_reflect_most_recent_update() {
        let (mut case, _) = open_case();
        case.accept_initial_terms(&participant()).unwrap();
        for reward in [1500u128, 700, 2200] {
            case.update_terms(&owner(), Severity::Medium, Amount::new(reward))
                .unwrap();
        }
        case.accept_final_terms(&participant()).unwrap();
        assert_eq!(
            case.final_terms(),
            Terms {
                severity: Severity::Medium,
                reward: Amount::new(2200)
            }
        );
    }

    #[test]
    fn final_terms_default_to_initial_without_updates() {
        let (case, _) = signed_case();
        assert_eq!(case.final_terms(), case.initial_terms());
        assert_eq!(case.requested_reward(), Amount::new(1000));
    }

    // ── Authorization ────────────────────────────────────────────────

    #[test]
    fn owner_cannot_accept_terms() {
        let (mut case, _) = open_case();
        let err = case.accept_initial_terms(&owner()).unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::Unauthorized {
                role: Role::Participant,
                ..
            }
        ));
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(case.state(), NegotiationState::Created);
    }

    #[test]
    fn participant_cannot_update_terms() {
        let (mut case, _) = open_case();
        case.accept_initial_terms(&participant()).unwrap();
        let err = case
            .update_terms(&participant(), Severity::Critical, Amount::new(1))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::Unauthorized { caller, .. } if caller == participant()));
        assert_eq!(case.final_terms().reward, Amount::new(1000));
    }

    // ── State preconditions ──────────────────────────────────────────

    #[test]
    fn update_terms_before_initial_acceptance_rejected() {
        let (mut case, _) = open_case();
        let err = case
            .update_terms(&owner(), Severity::Critical, Amount::new(9))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::OnlyDuringNegotiation { .. }));
    }

    #[test]
    fn update_terms_after_signing_rejected() {
        let (mut case, _) = signed_case();
        let err = case
            .update_terms(&owner(), Severity::Critical, Amount::new(9))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::OnlyDuringNegotiation { .. }));
        assert_eq!(case.requested_reward(), Amount::new(1000));
    }

    #[test]
    fn accept_final_before_initial_rejected() {
        let (mut case, notifier) = open_case();
        let err = case.accept_final_terms(&participant()).unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::InvalidState {
                expected: NegotiationState::InitiallyAccepted,
                actual: NegotiationState::Created,
            }
        ));
        assert!(notifier.calls.lock().is_empty());
    }

    #[test]
    fn accept_final_twice_fires_callback_once() {
        let (mut case, notifier) = signed_case();
        let err = case.accept_final_terms(&participant()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::StatePrecondition);
        assert_eq!(notifier.calls.lock().len(), 1);
    }

    #[test]
    fn accept_initial_twice_rejected() {
        let (mut case, _) = open_case();
        case.accept_initial_terms(&participant()).unwrap();
        assert!(case.accept_initial_terms(&participant()).is_err());
        assert_eq!(case.state(), NegotiationState::InitiallyAccepted);
    }

    // ── Funds ────────────────────────────────────────────────────────

    #[test]
    fn claim_reward_requires_final_acceptance() {
        let (mut case, _) = open_case();
        let mut ledger = InMemoryLedger::new(usdc());
        ledger.mint(&case.id(), Amount::new(1000)).unwrap();
        let err = case.claim_reward(&owner(), &mut ledger).unwrap_err();
        assert!(matches!(err, NegotiationError::InvalidState { .. }));
        assert_eq!(ledger.balance_of(&case.id()), Amount::new(1000));
    }

    #[test]
    fn claim_reward_withdraws_entire_balance() {
        let (mut case, _) = signed_case();
        let mut ledger = InMemoryLedger::new(usdc());
        ledger.mint(&case.id(), Amount::new(1234)).unwrap();
        let claimed = case.claim_reward(&owner(), &mut ledger).unwrap();
        assert_eq!(claimed, Amount::new(1234));
        assert_eq!(ledger.balance_of(&owner()), Amount::new(1234));
        assert_eq!(ledger.balance_of(&case.id()), Amount::ZERO);
    }

    #[test]
    fn claim_with_zero_balance_fails() {
        let (mut case, _) = signed_case();
        let mut ledger = InMemoryLedger::new(usdc());
        let err = case.claim_reward(&owner(), &mut ledger).unwrap_err();
        assert!(matches!(err, NegotiationError::NothingToClaim { .. }));
    }

    #[test]
    fn claim_by_participant_rejected() {
        let (mut case, _) = signed_case();
        let mut ledger = InMemoryLedger::new(usdc());
        ledger.mint(&case.id(), Amount::new(10)).unwrap();
        assert!(case.claim_reward(&participant(), &mut ledger).is_err());
    }

    #[test]
    fn claim_against_wrong_ledger_rejected() {
        let (mut case, _) = signed_case();
        let mut other = InMemoryLedger::new(AssetId::new("DAI").unwrap());
        other.mint(&case.id(), Amount::new(10)).unwrap();
        let err = case.claim_reward(&owner(), &mut other).unwrap_err();
        assert!(matches!(err, NegotiationError::WrongAsset { .. }));
    }

    #[test]
    fn foreign_asset_recoverable_in_any_state() {
        let (mut case, _) = open_case();
        let mut dai = InMemoryLedger::new(AssetId::new("DAI").unwrap());
        dai.mint(&case.id(), Amount::new(77)).unwrap();
        let recovered = case.recover_foreign_asset(&owner(), &mut dai).unwrap();
        assert_eq!(recovered, Amount::new(77));
        assert_eq!(dai.balance_of(&owner()), Amount::new(77));
        assert_eq!(case.state(), NegotiationState::Created);
    }

    #[test]
    fn payment_asset_not_recoverable_as_foreign() {
        let (mut case, _) = open_case();
        let mut ledger = InMemoryLedger::new(usdc());
        ledger.mint(&case.id(), Amount::new(5)).unwrap();
        let err = case.recover_foreign_asset(&owner(), &mut ledger).unwrap_err();
        assert!(matches!(err, NegotiationError::ProtectedAsset { .. }));
        assert_eq!(ledger.balance_of(&case.id()), Amount::new(5));
    }

    // ── Persistence ──────────────────────────────────────────────────

    #[test]
    fn restore_with_matching_notifier() {
        let (case, notifier) = signed_case();
        let record = case.record().clone();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: NegotiationRecord = serde_json::from_str(&json).unwrap();
        let restored = NegotiationCase::restore(parsed, notifier).unwrap();
        assert_eq!(restored.record(), case.record());
    }

    #[test]
    fn restore_with_foreign_notifier_rejected() {
        struct Other;
        impl AcceptanceNotifier for Other {
            fn binding_id(&self) -> ActorId {
                ActorId::derive(b"someone-else", 0)
            }
            fn on_final_acceptance(&self, _: ActorId, _: ActorId, _: Amount) {}
        }
        let (case, _) = open_case();
        let err = NegotiationCase::restore(case.record().clone(), Arc::new(Other)).unwrap_err();
        assert!(matches!(err, NegotiationError::BindingMismatch { .. }));
    }

    #[test]
    fn events_track_transitions() {
        let (mut case, _) = open_case();
        case.accept_initial_terms(&participant()).unwrap();
        case.update_terms(&owner(), Severity::Critical, Amount::new(3))
            .unwrap();
        case.accept_final_terms(&participant()).unwrap();
        let kinds: Vec<_> = case.events().iter().map(|e| &e.event).collect();
        assert!(matches!(kinds[0], NegotiationEvent::InitialTermsAccepted { .. }));
        assert!(matches!(kinds[1], NegotiationEvent::TermsUpdated { .. }));
        assert!(matches!(kinds[2], NegotiationEvent::FinalTermsAccepted { .. }));
    }

    #[test]
    fn severity_parse_and_display() {
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("low".parse::<Severity>().is_err());
        assert_eq!(NegotiationState::InitiallyAccepted.to_string(), "INITIALLY_ACCEPTED");
    }
}
