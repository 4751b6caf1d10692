//! # Disclosure Registry
//!
//! The deploying collaborator for negotiations. It enforces the
//! owner/participant distinctness the negotiation itself does not check,
//! assigns each disclosure its ledger identity, binds itself as the
//! acceptance notifier, and keeps success analytics from the
//! notifications it receives.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use dax_core::{ActorId, Amount, AssetId, Commitment, Timestamp};

use crate::case::{NegotiationCase, NegotiationParams, NegotiationRecord, Severity};
use crate::error::NegotiationError;
use crate::notifier::AcceptanceNotifier;

/// A final acceptance as reported to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceRecord {
    pub owner: ActorId,
    pub final_reward: Amount,
    pub at: Timestamp,
}

/// Everything the registry knows, in serializable form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryBook {
    /// Deployment counter; feeds identity derivation.
    pub nonce: u64,
    pub deployed: BTreeSet<ActorId>,
    pub accepted: BTreeMap<ActorId, AcceptanceRecord>,
    pub accepted_by_owner: BTreeMap<ActorId, u64>,
    pub total_final_rewards: Amount,
}

/// Aggregate counters over a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub deployed: usize,
    pub accepted: usize,
    pub total_final_rewards: Amount,
}

/// Deploys negotiations and receives their final-acceptance notifications.
#[derive(Debug)]
pub struct DisclosureRegistry {
    address: ActorId,
    book: Mutex<RegistryBook>,
}

impl DisclosureRegistry {
    /// Create an empty registry with ledger identity `address`.
    pub fn new(address: ActorId) -> Arc<Self> {
        Self::restore(address, RegistryBook::default())
    }

    /// Rebuild a registry from a persisted book.
    pub fn restore(address: ActorId, book: RegistryBook) -> Arc<Self> {
        Arc::new(Self {
            address,
            book: Mutex::new(book),
        })
    }

    pub fn address(&self) -> ActorId {
        self.address
    }

    /// Deploy a new negotiation bound to this registry.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::SameParty`] when `participant == owner`.
    pub fn deploy(
        self: &Arc<Self>,
        owner: ActorId,
        participant: ActorId,
        commitment: Commitment,
        severity: Severity,
        reward: Amount,
        payment_asset: AssetId,
    ) -> Result<NegotiationCase, NegotiationError> {
        if participant == owner {
            return Err(NegotiationError::SameParty(owner));
        }
        let id = {
            let mut book = self.book.lock();
            let id = ActorId::derive(self.address.as_bytes(), book.nonce);
            book.nonce += 1;
            book.deployed.insert(id);
            id
        };
        tracing::info!(disclosure = %id, %owner, %participant, %severity, %reward, "disclosure deployed");
        let notifier: Arc<dyn AcceptanceNotifier> = self.clone();
        Ok(NegotiationCase::open(
            NegotiationParams {
                id,
                owner,
                participant,
                commitment,
                severity,
                reward,
                payment_asset,
            },
            notifier,
        ))
    }

    /// Rebind a persisted negotiation to this registry.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::UnknownDisclosure`] if this registry did
    /// not deploy it, or [`NegotiationError::BindingMismatch`] if it was
    /// bound elsewhere.
    pub fn attach(
        self: &Arc<Self>,
        record: NegotiationRecord,
    ) -> Result<NegotiationCase, NegotiationError> {
        if !self.is_deployed(&record.id) {
            return Err(NegotiationError::UnknownDisclosure(record.id));
        }
        let notifier: Arc<dyn AcceptanceNotifier> = self.clone();
        NegotiationCase::restore(record, notifier)
    }

    /// Whether `disclosure` was deployed by this registry.
    pub fn is_deployed(&self, disclosure: &ActorId) -> bool {
        self.book.lock().deployed.contains(disclosure)
    }

    /// Final acceptance recorded for `disclosure`, if any.
    pub fn acceptance(&self, disclosure: &ActorId) -> Option<AcceptanceRecord> {
        self.book.lock().accepted.get(disclosure).cloned()
    }

    /// Number of accepted disclosures filed by `owner`.
    pub fn accepted_count_for(&self, owner: &ActorId) -> u64 {
        self.book
            .lock()
            .accepted_by_owner
            .get(owner)
            .copied()
            .unwrap_or(0)
    }

    pub fn stats(&self) -> RegistryStats {
        let book = self.book.lock();
        RegistryStats {
            deployed: book.deployed.len(),
            accepted: book.accepted.len(),
            total_final_rewards: book.total_final_rewards,
        }
    }

    /// Snapshot for persistence.
    pub fn book(&self) -> RegistryBook {
        self.book.lock().clone()
    }
}

impl AcceptanceNotifier for DisclosureRegistry {
    fn binding_id(&self) -> ActorId {
        self.address
    }

    fn on_final_acceptance(&self, disclosure: ActorId, owner: ActorId, final_reward: Amount) {
        let mut book = self.book.lock();
        if !book.deployed.contains(&disclosure) {
            tracing::warn!(%disclosure, "acceptance notification from undeployed disclosure ignored");
            return;
        }
        if book.accepted.contains_key(&disclosure) {
            tracing::warn!(%disclosure, "duplicate acceptance notification ignored");
            return;
        }
        // Analytics only; an overflow here saturates rather than failing the
        // acceptance that already happened.
        book.total_final_rewards = book
            .total_final_rewards
            .checked_add(final_reward)
            .unwrap_or(Amount::new(u128::MAX));
        *book.accepted_by_owner.entry(owner).or_insert(0) += 1;
        book.accepted.insert(
            disclosure,
            AcceptanceRecord {
                owner,
                final_reward,
                at: Timestamp::now(),
            },
        );
        tracing::info!(%disclosure, %owner, %final_reward, "acceptance recorded");
    }
}
