//! # State File
//!
//! Everything `dax` knows lives in one JSON document: the per-asset
//! ledgers, the registry book, every negotiation record, and the
//! arbitration engine. Each command loads it, applies one operation to an
//! in-memory copy, and writes it back only if the operation succeeded.
//! Writes go to a sibling temporary file that is then renamed over the
//! original, so an interrupted write never leaves a truncated state file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use dax_arbitration::{ArbitrationEngine, EngineConfig};
use dax_core::{ActorId, AssetId, InMemoryLedger};
use dax_negotiation::{DisclosureRegistry, NegotiationCase, NegotiationRecord, RegistryBook};

use crate::config::DaxConfig;

/// Default state file name, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "dax-state.json";

/// Serialized world state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub ledgers: BTreeMap<AssetId, InMemoryLedger>,
    pub registry_address: ActorId,
    pub registry: RegistryBook,
    pub negotiations: BTreeMap<ActorId, NegotiationRecord>,
    pub engine: ArbitrationEngine,
}

impl WorldState {
    /// A fresh world seeded from `config`.
    pub fn initial(config: &DaxConfig) -> Result<Self> {
        let engine = ArbitrationEngine::new(EngineConfig {
            address: config.engine_address,
            owner: config.owner,
            treasury: config.treasury,
            fee_asset: config.payment_asset()?,
            fees: config.fee_schedule(),
        })?;
        Ok(Self {
            ledgers: BTreeMap::new(),
            registry_address: config.registry_address,
            registry: RegistryBook::default(),
            negotiations: BTreeMap::new(),
            engine,
        })
    }

    /// Load `path`, or start fresh from `config` if it does not exist.
    ///
    /// Refuses a state file whose review queue is inconsistent.
    pub fn load_or_init(path: &Path, config: &DaxConfig) -> Result<Self> {
        let state = Self::read_or_init(path, config)?;
        state
            .engine
            .verify_queue_invariants()
            .with_context(|| format!("state {} has an inconsistent review queue", path.display()))?;
        Ok(state)
    }

    /// Like [`load_or_init`](Self::load_or_init) without the queue check.
    pub fn read_or_init(path: &Path, config: &DaxConfig) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "state file not found; starting fresh");
            return Self::initial(config);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse state {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize state")?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }

    /// The ledger for `asset`, created empty on first use.
    pub fn ledger_mut(&mut self, asset: &AssetId) -> &mut InMemoryLedger {
        self.ledgers
            .entry(asset.clone())
            .or_insert_with(|| InMemoryLedger::new(asset.clone()))
    }

    /// The ledger for the engine's fee asset alongside the engine itself.
    pub fn engine_and_fee_ledger(&mut self) -> (&mut ArbitrationEngine, &mut InMemoryLedger) {
        let asset = self.engine.fee_asset().clone();
        let ledger = self
            .ledgers
            .entry(asset.clone())
            .or_insert_with(|| InMemoryLedger::new(asset));
        (&mut self.engine, ledger)
    }

    /// A live registry rebuilt from the stored book.
    pub fn registry(&self) -> Arc<DisclosureRegistry> {
        DisclosureRegistry::restore(self.registry_address, self.registry.clone())
    }

    /// Rebind a stored negotiation to `registry`.
    pub fn negotiation(
        &self,
        registry: &Arc<DisclosureRegistry>,
        id: &ActorId,
    ) -> Result<NegotiationCase> {
        let Some(record) = self.negotiations.get(id) else {
            bail!("no disclosure {id} in state");
        };
        Ok(registry.attach(record.clone())?)
    }

    /// Write a live negotiation and the registry back into the world.
    pub fn store(&mut self, registry: &DisclosureRegistry, case: &NegotiationCase) {
        self.negotiations.insert(case.id(), case.record().clone());
        self.registry = registry.book();
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
