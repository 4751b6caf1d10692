//! # dax-cli — Command-Line Driver for the Disclosure Arbitration Stack
//!
//! Provides the `dax` binary. All commands operate on a local JSON state
//! file (see [`state`]), seeded from an optional YAML configuration (see
//! [`config`]).
//!
//! ## Subcommands
//!
//! - `dax ledger` — Mint, approve, and query balances per asset.
//! - `dax disclosure` — Open negotiations and drive them to final acceptance.
//! - `dax arbitration` — Eligibility, submission, review, verdicts, and
//!   owner administration.
//!
//! ```bash
//! dax ledger mint --to 0x… --amount 1000
//! dax disclosure open --owner 0x… --participant 0x… --commitment 0x… --severity high --reward 500
//! dax arbitration eligible --id 0x… --caller 0x…
//! dax arbitration audit
//! ```

pub mod arbitration;
pub mod config;
pub mod disclosure;
pub mod ledger;
pub mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::DaxConfig;
use crate::state::WorldState;

/// Where a command reads and writes its world.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: DaxConfig,
    pub state_path: PathBuf,
}

impl Session {
    pub fn new(config: DaxConfig, state_path: PathBuf) -> Self {
        Self { config, state_path }
    }

    /// Load the world for a read-only command.
    pub fn load(&self) -> Result<WorldState> {
        WorldState::load_or_init(&self.state_path, &self.config)
    }

    /// Load the world without checking queue consistency.
    pub fn load_unchecked(&self) -> Result<WorldState> {
        WorldState::read_or_init(&self.state_path, &self.config)
    }

    /// Load the world, apply `op`, and persist only if `op` succeeds.
    pub fn mutate<R>(&self, op: impl FnOnce(&mut WorldState) -> Result<R>) -> Result<R> {
        let mut world = self.load()?;
        let out = op(&mut world)?;
        world.save(&self.state_path)?;
        Ok(out)
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{text}");
    Ok(())
}
