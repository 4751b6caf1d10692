//! # Ledger Subcommand
//!
//! Test-harness access to the in-process value ledgers: one per asset,
//! defaulting to the configured payment asset.
//!
//! - `mint` — Credit an account.
//! - `approve` — Set a spender's allowance (payers approve the engine).
//! - `balance` — Show an account's balance and, optionally, an allowance.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use dax_core::{ActorId, Amount, AssetId, ValueLedger};

use crate::{print_json, Session};

/// Arguments for the `dax ledger` subcommand.
#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// Asset symbol. Defaults to the configured payment asset.
    #[arg(long, global = true)]
    pub asset: Option<AssetId>,

    #[command(subcommand)]
    pub command: LedgerCommand,
}

/// Ledger subcommands.
#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// Credit `amount` to an account.
    Mint {
        #[arg(long)]
        to: ActorId,
        #[arg(long)]
        amount: Amount,
    },

    /// Set `spender`'s allowance over `owner` to exactly `amount`.
    Approve {
        #[arg(long)]
        owner: ActorId,
        #[arg(long)]
        spender: ActorId,
        #[arg(long)]
        amount: Amount,
    },

    /// Show an account's balance.
    Balance {
        #[arg(long)]
        of: ActorId,
        /// Also show the allowance granted to this spender.
        #[arg(long)]
        spender: Option<ActorId>,
    },
}

/// One account's position on one ledger.
#[derive(Debug, Serialize)]
struct AccountView<'a> {
    asset: &'a AssetId,
    account: &'a ActorId,
    balance: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    spender: Option<&'a ActorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowance: Option<Amount>,
}

/// Execute the ledger subcommand.
pub fn run_ledger(args: &LedgerArgs, session: &Session) -> Result<u8> {
    let asset = match &args.asset {
        Some(asset) => asset.clone(),
        None => session.config.payment_asset()?,
    };

    match &args.command {
        LedgerCommand::Mint { to, amount } => {
            let balance = session.mutate(|world| {
                let ledger = world.ledger_mut(&asset);
                ledger.mint(to, *amount)?;
                Ok(ledger.balance_of(to))
            })?;
            tracing::info!(%asset, %to, %amount, "minted");
            print_json(&AccountView {
                asset: &asset,
                account: to,
                balance,
                spender: None,
                allowance: None,
            })?;
        }

        LedgerCommand::Approve {
            owner,
            spender,
            amount,
        } => {
            let balance = session.mutate(|world| {
                let ledger = world.ledger_mut(&asset);
                ledger.approve(owner, spender, *amount);
                Ok(ledger.balance_of(owner))
            })?;
            print_json(&AccountView {
                asset: &asset,
                account: owner,
                balance,
                spender: Some(spender),
                allowance: Some(*amount),
            })?;
        }

        LedgerCommand::Balance { of, spender } => {
            let mut world = session.load()?;
            let ledger = world.ledger_mut(&asset);
            print_json(&AccountView {
                asset: &asset,
                account: of,
                balance: ledger.balance_of(of),
                spender: spender.as_ref(),
                allowance: spender.as_ref().map(|s| ledger.allowance(of, s)),
            })?;
        }
    }
    Ok(0)
}
