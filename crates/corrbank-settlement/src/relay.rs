//! Request shapes for the engine and the declared relay route.

use corrbank_types::{AccountId, CorrbankError, Currency, RelayHop, Result};

/// A single hop: move `amount` (denominated in `currency`) from one account
/// to another under whatever rule their roles select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopRequest {
    pub from: AccountId,
    pub to: AccountId,
    /// Beneficiary contact carried with the hop; recorded on the receipt,
    /// never written to the ledger.
    pub contact_info: String,
    pub amount: u64,
    pub currency: Currency,
}

/// Allocation of a fresh balance to a client account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRequest {
    /// Client the account is assigned to (e.g. `alice`).
    pub identity: String,
    pub account: AccountId,
    pub contact_info: String,
    pub amount: u64,
    pub currency: Currency,
}

/// Ordered, non-empty list of hops walked by every remittance.
///
/// The route is data: lengthening the chain means adding entries, not code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRoute {
    hops: Vec<RelayHop>,
}

impl RelayRoute {
    /// # Errors
    /// Returns `Configuration` if `hops` is empty.
    pub fn new(hops: Vec<RelayHop>) -> Result<Self> {
        if hops.is_empty() {
            return Err(CorrbankError::Configuration("relay route has no hops".into()));
        }
        Ok(Self { hops })
    }

    #[must_use]
    pub fn hops(&self) -> &[RelayHop] {
        &self.hops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Expand the route into concrete hop requests for one remittance.
    pub fn requests(
        &self,
        amount: u64,
        currency: Currency,
        contact_info: &str,
    ) -> impl Iterator<Item = HopRequest> + '_ {
        let contact_info = contact_info.to_string();
        self.hops.iter().map(move |hop| HopRequest {
            from: hop.from.clone(),
            to: hop.to.clone(),
            contact_info: contact_info.clone(),
            amount,
            currency,
        })
    }
}

impl Default for RelayRoute {
    fn default() -> Self {
        Self {
            hops: RelayHop::default_route(),
        }
    }
}
