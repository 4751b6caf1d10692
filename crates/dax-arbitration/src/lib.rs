//! # dax-arbitration — Disclosure Dispute Arbitration
//!
//! Admits finally-accepted disclosures into arbitration and carries them
//! through review and trial:
//!
//! - **Engine** ([`engine`]): eligibility, submission, review, verdict, and
//!   owner administration. All-or-nothing: a failed call changes nothing.
//!
//! - **Case** ([`case`]): the per-disclosure state machine.
//!
//! - **Queue** ([`queue`]): the dense review queue and its counters.
//!
//! - **Fees** ([`fees`]): percentage eligibility fee, congestion-priced
//!   submission fee, per-disclosure waivers.
//!
//! - **Authority** ([`authority`]): owner-only or allow-list arbiter checks.
//!
//! - **Shared** ([`shared`]): a thread-safe handle that refuses re-entrant
//!   calls from ledger callouts.
//!
//! ## Crate Policy
//!
//! - Depends on `dax-core` only. Negotiations are read through
//!   [`dax_core::DisclosureStatus`]; funds move through
//!   [`dax_core::ValueLedger`].

pub mod authority;
pub mod case;
pub mod engine;
pub mod error;
pub mod events;
pub mod fees;
pub mod queue;
pub mod shared;

pub use authority::{AllowList, ArbiterAuthority, SinglePrincipal};
pub use case::{Case, CaseState};
pub use engine::{ArbitrationEngine, EngineConfig};
pub use error::{ArbitrationError, Privilege};
pub use events::{ArbitrationEvent, ArbitrationEventRecord};
pub use fees::{FeeKind, FeeSchedule, FeeWaiver, DEFAULT_ELIGIBILITY_FEE_BPS};
pub use queue::{QueueInfo, ReviewQueue};
pub use shared::SharedEngine;
