//! # Amounts
//!
//! Non-negative token amounts with checked arithmetic. Rewards, fees, and
//! balances all use [`Amount`]; nothing in the stack does raw integer math
//! on money.
//!
//! ## Security Invariant
//!
//! Arithmetic never wraps. The congestion fee grows as `base * 2^n`, so an
//! unchecked multiply could silently reset a huge fee to a tiny one.

use serde::{Deserialize, Serialize};

use crate::error::DaxError;

/// Denominator for basis-point rates (`100` bps = 1%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// A non-negative integer amount in the smallest unit of an asset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw integer amount.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Access the raw integer.
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Result<Amount, DaxError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| DaxError::AmountOverflow(format!("{self} + {other}")))
    }

    /// Checked subtraction. Going below zero is reported as an overflow.
    pub fn checked_sub(self, other: Amount) -> Result<Amount, DaxError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| DaxError::AmountOverflow(format!("{self} - {other}")))
    }

    /// `floor(self * bps / 10_000)`.
    ///
    /// # Errors
    ///
    /// Returns [`DaxError::AmountOverflow`] if the intermediate product
    /// does not fit.
    pub fn basis_points(self, bps: u32) -> Result<Amount, DaxError> {
        self.0
            .checked_mul(u128::from(bps))
            .map(|p| Amount(p / u128::from(BPS_DENOMINATOR)))
            .ok_or_else(|| DaxError::AmountOverflow(format!("{self} * {bps} bps")))
    }

    /// `self * 2^n`, checked.
    pub fn doubled_n_times(self, n: u64) -> Result<Amount, DaxError> {
        let overflow = || DaxError::AmountOverflow(format!("{self} * 2^{n}"));
        let exp = u32::try_from(n).map_err(|_| overflow())?;
        let factor = 2u128.checked_pow(exp).ok_or_else(overflow)?;
        self.0.checked_mul(factor).map(Amount).ok_or_else(overflow)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for Amount {
    type Err = DaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>()
            .map(Amount)
            .map_err(|e| DaxError::Serialization(format!("invalid amount {s:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_percent_of_thousand_is_ten() {
        assert_eq!(Amount::new(1000).basis_points(100).unwrap(), Amount::new(10));
    }

    #[test]
    fn basis_points_rounds_down() {
        assert_eq!(Amount::new(99).basis_points(100).unwrap(), Amount::ZERO);
        assert_eq!(Amount::new(150).basis_points(100).unwrap(), Amount::new(1));
    }

    #[test]
    fn doubling() {
        assert_eq!(Amount::new(100).doubled_n_times(0).unwrap(), Amount::new(100));
        assert_eq!(Amount::new(100).doubled_n_times(1).unwrap(), Amount::new(200));
        assert_eq!(Amount::new(100).doubled_n_times(3).unwrap(), Amount::new(800));
    }

    #[test]
    fn doubling_overflow_is_an_error() {
        assert!(Amount::new(1).doubled_n_times(128).is_err());
        assert!(Amount::new(u128::MAX).doubled_n_times(1).is_err());
        assert!(Amount::new(1).doubled_n_times(u64::MAX).is_err());
    }

    #[test]
    fn subtraction_below_zero_is_an_error() {
        assert!(Amount::new(1).checked_sub(Amount::new(2)).is_err());
        assert_eq!(
            Amount::new(5).checked_sub(Amount::new(2)).unwrap(),
            Amount::new(3)
        );
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("42".parse::<Amount>().unwrap(), Amount::new(42));
        assert!("-1".parse::<Amount>().is_err());
        assert!("1.5".parse::<Amount>().is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&Amount::new(1000)).unwrap();
        assert_eq!(json, "1000");
    }
}
