//! # Value Ledger
//!
//! The account-balance and transfer service the negotiation and
//! arbitration components move funds through. The stack treats it as an
//! external collaborator: only the [`ValueLedger`] trait is consumed.
//!
//! A ledger tracks a single asset. Foreign-asset recovery is handed the
//! ledger of the asset being swept and checks its asset against the
//! payment asset before moving anything.
//!
//! ## Atomicity
//!
//! A failing ledger call must leave every balance and allowance exactly as
//! it was. Callers rely on this to keep their own operations all-or-nothing:
//! they call the ledger first and only mutate their own state afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::{DaxError, LedgerError};
use crate::identity::{ActorId, AssetId};

/// Balance and transfer operations over one asset.
pub trait ValueLedger {
    /// The asset this ledger tracks.
    fn asset(&self) -> &AssetId;

    /// Current balance of `actor`.
    fn balance_of(&self, actor: &ActorId) -> Amount;

    /// Move `amount` from `from` to `to`, consuming `spender`'s allowance
    /// over `from`.
    fn transfer_from(
        &mut self,
        spender: &ActorId,
        from: &ActorId,
        to: &ActorId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Move `amount` out of `from`'s own balance into `to`.
    fn transfer(&mut self, from: &ActorId, to: &ActorId, amount: Amount)
        -> Result<(), LedgerError>;
}

/// A serializable in-process ledger.
///
/// Backs the CLI state file and the test suites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    asset: AssetId,
    balances: BTreeMap<ActorId, Amount>,
    /// owner -> spender -> approved amount
    allowances: BTreeMap<ActorId, BTreeMap<ActorId, Amount>>,
}

impl InMemoryLedger {
    /// Create an empty ledger for `asset`.
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    /// Credit `amount` to `to` out of thin air.
    pub fn mint(&mut self, to: &ActorId, amount: Amount) -> Result<(), DaxError> {
        let current = self.balance_of(to);
        let updated = current.checked_add(amount)?;
        self.balances.insert(*to, updated);
        tracing::debug!(asset = %self.asset, %to, %amount, "minted");
        Ok(())
    }

    /// Set `spender`'s allowance over `owner` to exactly `amount`.
    pub fn approve(&mut self, owner: &ActorId, spender: &ActorId, amount: Amount) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    /// Current allowance of `spender` over `owner`.
    pub fn allowance(&self, owner: &ActorId, spender: &ActorId) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Total supply across all holders.
    pub fn total_supply(&self) -> Amount {
        Amount::new(
            self.balances
                .values()
                .fold(0u128, |acc, a| acc.saturating_add(a.value())),
        )
    }

    /// Validate and apply a balance move. Nothing is written unless both
    /// sides of the move are computable.
    fn move_balance(
        &mut self,
        from: &ActorId,
        to: &ActorId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .map_err(|_| LedgerError::InsufficientBalance {
                account: *from,
                requested: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;
        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

impl ValueLedger for InMemoryLedger {
    fn asset(&self) -> &AssetId {
        &self.asset
    }

    fn balance_of(&self, actor: &ActorId) -> Amount {
        self.balances.get(actor).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer_from(
        &mut self,
        spender: &ActorId,
        from: &ActorId,
        to: &ActorId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(from, spender);
        let remaining =
            approved
                .checked_sub(amount)
                .map_err(|_| LedgerError::InsufficientAllowance {
                    owner: *from,
                    spender: *spender,
                    requested: amount,
                    approved,
                })?;
        self.move_balance(from, to, amount)?;
        self.approve(from, spender, remaining);
        tracing::debug!(asset = %self.asset, %spender, %from, %to, %amount, "transfer_from");
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &ActorId,
        to: &ActorId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.move_balance(from, to, amount)?;
        tracing::debug!(asset = %self.asset, %from, %to, %amount, "transfer");
        Ok(())
    }
}
