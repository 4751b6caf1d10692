//! # Final-Acceptance Notification
//!
//! A negotiation tells whoever deployed it when its final terms are
//! accepted. The negotiation holds this capability from construction and
//! knows nothing else about the collaborator behind it.

use dax_core::{ActorId, Amount};

/// Receives exactly one notification per negotiation, at final acceptance.
///
/// Implementations use interior mutability; the negotiation holds the
/// capability behind a shared pointer.
pub trait AcceptanceNotifier: Send + Sync {
    /// Identity of the collaborator. Recorded in the negotiation at
    /// construction and checked when a persisted negotiation is restored.
    fn binding_id(&self) -> ActorId;

    /// Called once, at the `InitiallyAccepted -> FinallyAccepted` transition.
    fn on_final_acceptance(&self, disclosure: ActorId, owner: ActorId, final_reward: Amount);
}
