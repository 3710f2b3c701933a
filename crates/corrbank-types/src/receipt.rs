//! Hop records: what a single hop did to the ledger.
//!
//! Every hop, applied or skipped, produces a [`HopReceipt`]. A relay returns
//! the receipts of the hops it completed, in route order.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Currency, HopRule, constants};

/// Sign of a balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    #[must_use]
    pub fn sign(self) -> char {
        match self {
            Self::Debit => '-',
            Self::Credit => '+',
        }
    }
}

/// One signed adjustment of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub account: AccountId,
    pub direction: Direction,
    pub amount: u64,
    /// Currency of `account`, i.e. the unit `amount` is written in.
    pub currency: Currency,
}

impl fmt::Display for Delta {
    /// Signed amount with currency, e.g. `-3000KZT`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.direction.sign(), self.amount, self.currency)
    }
}

/// A pair of accounts the relay walks in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayHop {
    pub from: AccountId,
    pub to: AccountId,
}

impl RelayHop {
    #[must_use]
    pub fn new(from: impl Into<AccountId>, to: impl Into<AccountId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// The fixed five-hop remittance route between bank A's client and
    /// bank B's client.
    #[must_use]
    pub fn default_route() -> Vec<Self> {
        constants::DEFAULT_RELAY_ROUTE
            .iter()
            .map(|&(from, to)| Self::new(from, to))
            .collect()
    }
}

impl fmt::Display for RelayHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Outcome of one hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopReceipt {
    pub from: AccountId,
    pub to: AccountId,
    /// `None` when the role pair has no rule and the hop was skipped.
    pub rule: Option<HopRule>,
    /// Writes applied, in the order they were made.
    pub deltas: Vec<Delta>,
    /// Beneficiary contact carried with the request.
    pub contact_info: String,
    pub executed_at: DateTime<Utc>,
}

impl HopReceipt {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.rule.is_some()
    }
}
