//! # dax-negotiation — Disclosure Negotiation
//!
//! The two-party half of the stack:
//!
//! - **Case** ([`case`]): the `Created → InitiallyAccepted → FinallyAccepted`
//!   state machine over severity and reward, with reward claim and
//!   foreign-asset recovery.
//!
//! - **Notifier** ([`notifier`]): the narrow capability a negotiation uses
//!   to report final acceptance to whoever deployed it.
//!
//! - **Registry** ([`registry`]): the deploying collaborator. Enforces
//!   distinct parties, assigns identities, records acceptance analytics.
//!
//! - **Error** ([`error`]): structured errors with role and state context.

pub mod case;
pub mod error;
pub mod notifier;
pub mod registry;

pub use case::{
    NegotiationCase, NegotiationEvent, NegotiationEventRecord, NegotiationParams,
    NegotiationRecord, NegotiationState, Severity, Terms,
};
pub use error::{NegotiationError, Role};
pub use notifier::AcceptanceNotifier;
pub use registry::{AcceptanceRecord, DisclosureRegistry, RegistryBook, RegistryStats};
