//! # Configuration
//!
//! `dax` reads an optional YAML file naming the fixed identities and the
//! fee policy a fresh state file is initialised with. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! ```yaml
//! owner: "0x…"
//! treasury: "0x…"
//! payment_asset: USDC
//! base_submission_fee: 100
//! eligibility_fee_bps: 100
//! ```
//!
//! Fee values only seed a new state file. Once the engine exists its owner
//! changes them with `dax arbitration set-fees`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dax_arbitration::{FeeSchedule, DEFAULT_ELIGIBILITY_FEE_BPS};
use dax_core::{ActorId, Amount, AssetId};

/// Namespace the default identities are derived under.
const DEFAULT_NAMESPACE: &[u8] = b"dax-default";

const DEFAULT_PAYMENT_ASSET: &str = "USDC";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaxConfig {
    /// Arbitration owner and permanent arbiter.
    pub owner: ActorId,
    /// Fee sink.
    pub treasury: ActorId,
    /// The engine's ledger identity; payers approve it as spender.
    pub engine_address: ActorId,
    /// The registry's identity; negotiations are bound to it.
    pub registry_address: ActorId,
    /// Symbol of the reward and fee asset.
    pub payment_asset: String,
    pub base_submission_fee: u64,
    pub eligibility_fee_bps: u32,
}

impl Default for DaxConfig {
    fn default() -> Self {
        Self {
            owner: ActorId::derive(DEFAULT_NAMESPACE, 0),
            treasury: ActorId::derive(DEFAULT_NAMESPACE, 1),
            engine_address: ActorId::derive(DEFAULT_NAMESPACE, 2),
            registry_address: ActorId::derive(DEFAULT_NAMESPACE, 3),
            payment_asset: DEFAULT_PAYMENT_ASSET.to_string(),
            base_submission_fee: 100,
            eligibility_fee_bps: DEFAULT_ELIGIBILITY_FEE_BPS,
        }
    }
}

impl DaxConfig {
    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given; using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse from YAML text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).context("failed to parse YAML")?;
        config.payment_asset()?;
        config.fee_schedule().validate()?;
        Ok(config)
    }

    pub fn payment_asset(&self) -> Result<AssetId> {
        AssetId::new(self.payment_asset.as_str())
            .with_context(|| format!("invalid payment_asset {:?}", self.payment_asset))
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            base_submission_fee: Amount::new(u128::from(self.base_submission_fee)),
            eligibility_fee_bps: self.eligibility_fee_bps,
        }
    }
}
