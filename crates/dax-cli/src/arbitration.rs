//! # Arbitration Subcommand
//!
//! Drives the arbitration engine stored in the state file. Fees are
//! pulled from the caller on the engine's fee-asset ledger, so a payer
//! must first `dax ledger approve` the engine address as spender.
//!
//! ## Case lifecycle
//!
//! - `eligible` — Admit a signed disclosure (pays the eligibility fee).
//! - `submit` — Enter the review queue (pays the submission fee).
//! - `review` — Arbiter accepts for trial or declines.
//! - `verdict` — Arbiter renders the final verdict.
//!
//! ## Inspection
//!
//! - `case` — Show one case.
//! - `fee` — Show the current submission fee and both queues.
//! - `audit` — Check queue consistency; exits 1 on failure.
//!
//! ## Owner administration
//!
//! - `waive`, `set-fees`, `enable-multi-arbiter`, `add-arbiter`,
//!   `remove-arbiter`.

use anyhow::{bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use dax_arbitration::{Case, FeeKind, FeeWaiver, QueueInfo};
use dax_core::{ActorId, Amount};

use crate::state::WorldState;
use crate::{print_json, Session};

/// Arguments for the `dax arbitration` subcommand.
#[derive(Args, Debug)]
pub struct ArbitrationArgs {
    #[command(subcommand)]
    pub command: ArbitrationCommand,
}

/// Arbitration subcommands.
#[derive(Subcommand, Debug)]
pub enum ArbitrationCommand {
    /// Admit a signed disclosure into arbitration (NONE → ELIGIBLE).
    Eligible {
        #[arg(long)]
        id: ActorId,
        /// Pays the eligibility fee.
        #[arg(long)]
        caller: ActorId,
    },

    /// File an eligible case into the review queue (ELIGIBLE → PENDING_REVIEW).
    Submit {
        #[arg(long)]
        id: ActorId,
        /// Pays the submission fee and is recorded as filer.
        #[arg(long)]
        caller: ActorId,
    },

    /// Review a queued case (PENDING_REVIEW → AWAITING_TRIAL | DECLINED).
    Review {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
        #[arg(long, value_enum)]
        decision: ReviewDecision,
    },

    /// Render a verdict (AWAITING_TRIAL → ACCEPTED | REJECTED).
    Verdict {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
        #[arg(long, value_enum)]
        decision: VerdictDecision,
    },

    /// Show one case.
    Case {
        #[arg(long)]
        id: ActorId,
    },

    /// Show the current submission fee and queue state.
    Fee,

    /// Permanently waive one fee for one disclosure.
    Waive {
        #[arg(long)]
        id: ActorId,
        #[arg(long)]
        caller: ActorId,
        #[arg(long, value_enum)]
        kind: FeeKindArg,
    },

    /// Change the base submission fee and/or the eligibility rate.
    SetFees {
        #[arg(long)]
        caller: ActorId,
        #[arg(long)]
        base: Option<Amount>,
        /// Eligibility fee in basis points of the final reward.
        #[arg(long)]
        bps: Option<u32>,
    },

    /// Switch to allow-list arbitration. Cannot be undone.
    EnableMultiArbiter {
        #[arg(long)]
        caller: ActorId,
    },

    /// Approve an arbiter.
    AddArbiter {
        #[arg(long)]
        caller: ActorId,
        #[arg(long)]
        arbiter: ActorId,
    },

    /// Withdraw an arbiter's approval.
    RemoveArbiter {
        #[arg(long)]
        caller: ActorId,
        #[arg(long)]
        arbiter: ActorId,
    },

    /// Verify review-queue contiguity and position consistency.
    Audit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReviewDecision {
    /// Send the case to trial.
    Accept,
    Decline,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VerdictDecision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FeeKindArg {
    Eligibility,
    Submission,
}

impl From<FeeKindArg> for FeeKind {
    fn from(kind: FeeKindArg) -> Self {
        match kind {
            FeeKindArg::Eligibility => FeeKind::Eligibility,
            FeeKindArg::Submission => FeeKind::Submission,
        }
    }
}

#[derive(Debug, Serialize)]
struct CaseView {
    #[serde(flatten)]
    case: Case,
    waiver: FeeWaiver,
}

#[derive(Debug, Serialize)]
struct QueueView<'a> {
    current_submission_fee: Amount,
    eligibility_fee_bps: u32,
    queue: QueueInfo,
    review_queue: &'a [ActorId],
    trial_queue: &'a [ActorId],
    multi_arbiter_enabled: bool,
}

/// Execute the arbitration subcommand.
pub fn run_arbitration(args: &ArbitrationArgs, session: &Session) -> Result<u8> {
    match &args.command {
        ArbitrationCommand::Eligible { id, caller } => {
            let view = session.mutate(|world| {
                let registry = world.registry();
                let negotiation = world.negotiation(&registry, id)?;
                let (engine, ledger) = world.engine_and_fee_ledger();
                engine.make_eligible(caller, &negotiation, ledger)?;
                Ok(case_view(world, id))
            })?;
            print_json(&view)?;
        }

        ArbitrationCommand::Submit { id, caller } => {
            let view = session.mutate(|world| {
                let (engine, ledger) = world.engine_and_fee_ledger();
                engine.submit_case(caller, id, ledger)?;
                Ok(case_view(world, id))
            })?;
            print_json(&view)?;
        }

        ArbitrationCommand::Review {
            id,
            caller,
            decision,
        } => {
            let accept = matches!(decision, ReviewDecision::Accept);
            let view = session.mutate(|world| {
                world.engine.review_case(caller, id, accept)?;
                Ok(case_view(world, id))
            })?;
            print_json(&view)?;
        }

        ArbitrationCommand::Verdict {
            id,
            caller,
            decision,
        } => {
            let accept = matches!(decision, VerdictDecision::Accept);
            let view = session.mutate(|world| {
                world.engine.make_verdict(caller, id, accept)?;
                Ok(case_view(world, id))
            })?;
            print_json(&view)?;
        }

        ArbitrationCommand::Case { id } => {
            let world = session.load()?;
            print_json(&case_view(&world, id))?;
        }

        ArbitrationCommand::Fee => {
            let world = session.load()?;
            let engine = &world.engine;
            print_json(&QueueView {
                current_submission_fee: engine.current_submission_fee()?,
                eligibility_fee_bps: engine.eligibility_fee_bps(),
                queue: engine.queue_info(),
                review_queue: engine.review_queue(),
                trial_queue: engine.trial_queue(),
                multi_arbiter_enabled: engine.multi_arbiter_enabled(),
            })?;
        }

        ArbitrationCommand::Waive { id, caller, kind } => {
            let view = session.mutate(|world| {
                world.engine.waive_fee(caller, *id, (*kind).into())?;
                Ok(case_view(world, id))
            })?;
            print_json(&view)?;
        }

        ArbitrationCommand::SetFees { caller, base, bps } => {
            if base.is_none() && bps.is_none() {
                bail!("nothing to change: pass --base and/or --bps");
            }
            session.mutate(|world| {
                if let Some(base) = base {
                    world.engine.set_base_submission_fee(caller, *base)?;
                }
                if let Some(bps) = bps {
                    world.engine.set_eligibility_fee_bps(caller, *bps)?;
                }
                Ok(())
            })?;
            tracing::info!(base = ?base, bps = ?bps, "fee policy updated");
        }

        ArbitrationCommand::EnableMultiArbiter { caller } => {
            session.mutate(|world| Ok(world.engine.enable_multi_arbiter(caller)?))?;
            println!("multi-arbiter mode enabled");
        }

        ArbitrationCommand::AddArbiter { caller, arbiter } => {
            let added = session.mutate(|world| Ok(world.engine.add_arbiter(caller, *arbiter)?))?;
            if !added {
                tracing::warn!(%arbiter, "already an approved arbiter");
            }
        }

        ArbitrationCommand::RemoveArbiter { caller, arbiter } => {
            session.mutate(|world| Ok(world.engine.remove_arbiter(caller, arbiter)?))?;
        }

        ArbitrationCommand::Audit => {
            let world = session.load_unchecked()?;
            let engine = &world.engine;
            let info = engine.queue_info();
            match engine.verify_queue_invariants() {
                Ok(()) => {
                    println!(
                        "OK: {} pending review, {} awaiting trial, {} accepted for trial in total",
                        info.pending_review_count,
                        info.awaiting_trial_count,
                        engine.trial_queue().len()
                    );
                }
                Err(e) => {
                    tracing::error!("{e}");
                    println!("FAIL: {e}");
                    return Ok(1);
                }
            }
        }
    }
    Ok(0)
}

fn case_view(world: &WorldState, id: &ActorId) -> CaseView {
    CaseView {
        case: world.engine.case(id),
        waiver: world.engine.waiver(id),
    }
}
