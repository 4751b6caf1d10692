//! # dax-core — Foundational Types for the Disclosure Arbitration Stack
//!
//! Every other crate in the workspace depends on `dax-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ActorId`, `AssetId`,
//!    `Commitment`, `Amount` all have validated constructors. No bare
//!    strings or integers cross crate boundaries.
//!
//! 2. **Checked arithmetic only.** `Amount` never wraps. Overflow surfaces
//!    as [`DaxError::AmountOverflow`].
//!
//! 3. **Collaborators behind traits.** Token movement goes through
//!    [`ValueLedger`]; the arbitration engine reads negotiations through
//!    [`DisclosureStatus`]. Neither side knows the other's concrete type.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] is seconds precision with a
//!    `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dax-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod commitment;
pub mod disclosure;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::{Amount, BPS_DENOMINATOR};
pub use commitment::Commitment;
pub use disclosure::{DisclosureStatus, NegotiationStatus};
pub use error::{DaxError, ErrorCategory, LedgerError};
pub use identity::{ActorId, AssetId};
pub use ledger::{InMemoryLedger, ValueLedger};
pub use temporal::Timestamp;
