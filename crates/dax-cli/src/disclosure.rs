//! # Disclosure Subcommand
//!
//! Negotiation lifecycle commands. Every negotiation is deployed through
//! the registry stored in the state file, so final acceptances land in the
//! registry's analytics.
//!
//! - `open` — Deploy a negotiation with opening terms.
//! - `accept-initial` — Participant accepts the opening terms.
//! - `update-terms` — Owner revises severity and reward.
//! - `accept-final` — Participant accepts the final terms.
//! - `claim` — Owner withdraws the payment-asset balance.
//! - `recover` — Owner sweeps a non-payment asset.
//! - `status` — Show a negotiation and its acceptance record.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use dax_core::{ActorId, Amount, AssetId, Commitment, DisclosureStatus, NegotiationStatus};
use dax_negotiation::{AcceptanceRecord, NegotiationCase, NegotiationRecord, Severity};

use crate::state::WorldState;
use crate::{print_json, Session};

/// Arguments for the `dax disclosure` subcommand.
#[derive(Args, Debug)]
pub struct DisclosureArgs {
    #[command(subcommand)]
    pub command: DisclosureCommand,
}

/// Disclosure subcommands.
#[derive(Subcommand, Debug)]
pub enum DisclosureCommand {
    /// Deploy a new negotiation (state CREATED).
    Open {
        /// The protocol owning the bounty.
        #[arg(long)]
        owner: ActorId,
        /// The researcher making the disclosure.
        #[arg(long)]
        participant: ActorId,
        /// 32-byte hex commitment to the disclosed report.
        #[arg(long)]
        commitment: Commitment,
        #[arg(long)]
        severity: Severity,
        #[arg(long)]
        reward: Amount,
    },

    /// Participant accepts the opening terms (CREATED → INITIALLY_ACCEPTED).
    AcceptInitial {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
    },

    /// Owner revises the final terms while INITIALLY_ACCEPTED.
    UpdateTerms {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
        #[arg(long)]
        severity: Severity,
        #[arg(long)]
        reward: Amount,
    },

    /// Participant accepts the final terms (→ FINALLY_ACCEPTED).
    AcceptFinal {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
    },

    /// Owner withdraws the disclosure's payment-asset balance.
    Claim {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
    },

    /// Owner sweeps an asset other than the payment asset.
    Recover {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
        #[arg(long)]
        asset: AssetId,
    },

    /// Show a negotiation.
    Status {
        #[arg(long)]
        id: ActorId,
    },
}

#[derive(Debug, Serialize)]
struct DisclosureView<'a> {
    status: NegotiationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceptance: Option<AcceptanceRecord>,
    record: &'a NegotiationRecord,
}

#[derive(Debug, Serialize)]
struct SweepView<'a> {
    disclosure: ActorId,
    asset: &'a AssetId,
    to: ActorId,
    amount: Amount,
}

/// Execute the disclosure subcommand.
pub fn run_disclosure(args: &DisclosureArgs, session: &Session) -> Result<u8> {
    match &args.command {
        DisclosureCommand::Open {
            owner,
            participant,
            commitment,
            severity,
            reward,
        } => {
            let payment_asset = session.config.payment_asset()?;
            let case = session.mutate(|world| {
                let registry = world.registry();
                let case = registry.deploy(
                    *owner,
                    *participant,
                    *commitment,
                    *severity,
                    *reward,
                    payment_asset,
                )?;
                world.store(&registry, &case);
                Ok(case)
            })?;
            show(&case, None)?;
        }

        DisclosureCommand::AcceptInitial { id, caller } => {
            let case = with_case(session, id, |case, _| Ok(case.accept_initial_terms(caller)?))?;
            show(&case, None)?;
        }

        DisclosureCommand::UpdateTerms {
            id,
            caller,
            severity,
            reward,
        } => {
            let case = with_case(session, id, |case, _| {
                Ok(case.update_terms(caller, *severity, *reward)?)
            })?;
            show(&case, None)?;
        }

        DisclosureCommand::AcceptFinal { id, caller } => {
            let case = with_case(session, id, |case, _| Ok(case.accept_final_terms(caller)?))?;
            let acceptance = session.load()?.registry().acceptance(id);
            show(&case, acceptance)?;
        }

        DisclosureCommand::Claim { id, caller } => {
            let mut amount = Amount::ZERO;
            let case = with_case(session, id, |case, world| {
                let asset = case.record().payment_asset.clone();
                amount = case.claim_reward(caller, world.ledger_mut(&asset))?;
                Ok(())
            })?;
            print_json(&SweepView {
                disclosure: case.id(),
                asset: &case.record().payment_asset,
                to: case.owner(),
                amount,
            })?;
        }

        DisclosureCommand::Recover { id, caller, asset } => {
            let mut amount = Amount::ZERO;
            let case = with_case(session, id, |case, world| {
                amount = case.recover_foreign_asset(caller, world.ledger_mut(asset))?;
                Ok(())
            })?;
            print_json(&SweepView {
                disclosure: case.id(),
                asset,
                to: case.owner(),
                amount,
            })?;
        }

        DisclosureCommand::Status { id } => {
            let world = session.load()?;
            let registry = world.registry();
            let case = world.negotiation(&registry, id)?;
            show(&case, registry.acceptance(id))?;
        }
    }
    Ok(0)
}

/// Apply `op` to a stored negotiation and persist the result.
fn with_case(
    session: &Session,
    id: &ActorId,
    op: impl FnOnce(&mut NegotiationCase, &mut WorldState) -> Result<()>,
) -> Result<NegotiationCase> {
    session.mutate(|world| {
        let registry = world.registry();
        let mut case = world.negotiation(&registry, id)?;
        op(&mut case, world)?;
        world.store(&registry, &case);
        Ok(case)
    })
}

fn show(case: &NegotiationCase, acceptance: Option<AcceptanceRecord>) -> Result<()> {
    print_json(&DisclosureView {
        status: case.status(),
        acceptance,
        record: case.record(),
    })
}
