//! The account record stored in the ledger table.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Currency};

/// A single row of the ownership table: one account, one currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    /// Contact of the owner. Stored in clear.
    pub contact_info: String,
    /// Balance in minor units of `currency`. Never negative.
    pub balance: u64,
    pub currency: Currency,
}

impl Account {
    #[must_use]
    pub fn new(
        id: impl Into<AccountId>,
        contact_info: impl Into<String>,
        balance: u64,
        currency: Currency,
    ) -> Self {
        Self {
            id: id.into(),
            contact_info: contact_info.into(),
            balance,
            currency,
        }
    }

    /// Balance formatted the way `getBalance` reports it, e.g. `1000000KZT`.
    #[must_use]
    pub fn balance_display(&self) -> String {
        format!("{}{}", self.balance, self.currency)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Account {
    pub fn dummy(id: &str, balance: u64, currency: Currency) -> Self {
        Self::new(id, format!("{id}@example.test"), balance, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_display_concatenates_amount_and_code() {
        let acct = Account::dummy("11111-00001", 1_000_000, Currency::Kzt);
        assert_eq!(acct.balance_display(), "1000000KZT");
    }

    #[test]
    fn account_serde_roundtrip() {
        let acct = Account::new("22222-00004", "bob@gmail.com", 1000, Currency::Rmb);
        let json = serde_json::to_string(&acct).unwrap();
        assert!(json.contains("\"currency\":\"RMB\""), "{json}");
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(acct, back);
    }
}
