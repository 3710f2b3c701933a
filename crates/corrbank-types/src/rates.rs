//! Directional exchange-rate lookup.
//!
//! A rate `(from, to) = r` means one unit of the hop amount expressed in
//! `to` costs `r` units of `from`. Rates are not symmetric: defining
//! KZT→RMB says nothing about RMB→KZT.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{CorrbankError, Currency, Result, constants};

/// One configured conversion direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfig {
    pub from: Currency,
    pub to: Currency,
    pub rate: Decimal,
}

/// Pure (from, to) → multiplier table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRateTable {
    rates: BTreeMap<(Currency, Currency), Decimal>,
}

impl ExchangeRateTable {
    /// An empty table: every lookup fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rates: BTreeMap::new(),
        }
    }

    /// Build a table from configured rates. Later entries for the same
    /// direction replace earlier ones.
    #[must_use]
    pub fn from_configs(configs: &[RateConfig]) -> Self {
        let rates = configs
            .iter()
            .map(|c| ((c.from, c.to), c.rate))
            .collect();
        Self { rates }
    }

    /// Define or replace the rate for one direction.
    #[must_use]
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    /// Look up the multiplier for converting `from` → `to`.
    ///
    /// # Errors
    /// Returns [`CorrbankError::UnsupportedExchangeRate`] if the direction is
    /// not defined.
    pub fn rate(&self, from: Currency, to: Currency) -> Result<Decimal> {
        self.rates
            .get(&(from, to))
            .copied()
            .ok_or(CorrbankError::UnsupportedExchangeRate { from, to })
    }

    /// Convert `amount` at `rate(from, to)`, truncating toward zero.
    ///
    /// # Errors
    /// `UnsupportedExchangeRate` if no rate exists; `InvalidArgument` if the
    /// product does not fit in a `u64`.
    pub fn convert(&self, amount: u64, from: Currency, to: Currency) -> Result<u64> {
        let rate = self.rate(from, to)?;
        Decimal::from(amount)
            .checked_mul(rate)
            .and_then(|v| v.trunc().to_u64())
            .ok_or_else(|| {
                CorrbankError::invalid_argument(
                    "convert",
                    format!("{amount}{to} at rate {rate} overflows"),
                )
            })
    }

    /// Number of defined directions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for ExchangeRateTable {
    /// The demo table: KZT→RMB at 30.
    fn default() -> Self {
        Self::empty().with_rate(
            Currency::Kzt,
            Currency::Rmb,
            Decimal::from(constants::DEFAULT_KZT_PER_RMB),
        )
    }
}
