//! # Arbiter Authority
//!
//! Who may review cases and render verdicts. Two implementations, chosen
//! by the engine's one-way multi-arbiter switch:
//!
//! - [`SinglePrincipal`]: only the owner. Active until the switch is set.
//! - [`AllowList`]: the owner or any approved arbiter. Active afterwards.
//!
//! The allow-list may be edited before the switch is set, but it is not
//! consulted until then.

use std::collections::BTreeSet;

use dax_core::ActorId;

/// A check over arbiter privilege.
pub trait ArbiterAuthority {
    /// Whether `caller` may act as an arbiter.
    fn permits(&self, caller: &ActorId) -> bool;

    /// Short name for logs.
    fn mode(&self) -> &'static str;
}

/// Only the owner holds arbiter authority.
#[derive(Debug, Clone, Copy)]
pub struct SinglePrincipal<'a> {
    pub owner: &'a ActorId,
}

impl ArbiterAuthority for SinglePrincipal<'_> {
    fn permits(&self, caller: &ActorId) -> bool {
        caller == self.owner
    }

    fn mode(&self) -> &'static str {
        "single-principal"
    }
}

/// The owner plus an approved set of arbiters.
#[derive(Debug, Clone, Copy)]
pub struct AllowList<'a> {
    pub owner: &'a ActorId,
    pub arbiters: &'a BTreeSet<ActorId>,
}

impl ArbiterAuthority for AllowList<'_> {
    fn permits(&self, caller: &ActorId) -> bool {
        caller == self.owner || self.arbiters.contains(caller)
    }

    fn mode(&self) -> &'static str {
        "allow-list"
    }
}
