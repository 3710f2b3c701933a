//! Configuration for a corrbank ledger instance.
//!
//! [`LedgerConfig::default`] is the fixed demo network. A JSON file may
//! override any top-level field; omitted fields keep their defaults.

use std::collections::BTreeSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Account, AccountId, CorrbankError, Currency, RateConfig, RelayHop, Result, constants};

/// An account that may be created through `assignOwnership`, with the named
/// capability the issuer must hold and the only currency it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTarget {
    pub account: AccountId,
    pub capability: String,
    pub currency: Currency,
}

/// Named capability required to read an account's balance or contact.
/// `fallback` is checked only when `capability` is denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGrant {
    pub account: AccountId,
    pub capability: String,
    #[serde(default)]
    pub fallback: Option<String>,
}

/// Roles and names a principal holds, for the in-process authorizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalConfig {
    pub principal: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

impl PrincipalConfig {
    fn new(principal: &str, roles: &[&str], names: &[&str]) -> Self {
        Self {
            principal: principal.to_string(),
            roles: roles.iter().map(ToString::to_string).collect(),
            names: names.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Everything a ledger instance needs besides its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Accounts created at bootstrap, in insertion order.
    pub seed_accounts: Vec<Account>,
    pub exchange_rates: Vec<RateConfig>,
    /// Hops walked, in order, by every `transferOwnership`.
    pub relay_route: Vec<RelayHop>,
    pub assign_targets: Vec<AssignTarget>,
    /// Identities `assignOwnership` accepts as the owning client.
    pub client_identities: Vec<String>,
    pub query_grants: Vec<QueryGrant>,
    /// Role required to call `assignOwnership` at all.
    pub issuer_role: String,
    /// Named capability required to call `transferOwnership`.
    pub remitter: String,
    pub assign_contact_info: String,
    pub transfer_contact_info: String,
    /// Principals known to the in-process authorizer.
    pub principals: Vec<PrincipalConfig>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        use constants::*;

        let grant = |account: &str, capability: &str, fallback: Option<&str>| QueryGrant {
            account: AccountId::from(account),
            capability: capability.to_string(),
            fallback: fallback.map(ToString::to_string),
        };

        Self {
            seed_accounts: SEED_ACCOUNTS
                .iter()
                .map(|&(id, contact, balance, currency)| Account::new(id, contact, balance, currency))
                .collect(),
            exchange_rates: vec![RateConfig {
                from: Currency::Kzt,
                to: Currency::Rmb,
                rate: Decimal::from(DEFAULT_KZT_PER_RMB),
            }],
            relay_route: RelayHop::default_route(),
            assign_targets: vec![
                AssignTarget {
                    account: AccountId::from(BANK_A_CLIENT),
                    capability: BANK_A_GATEWAY_LEVEL_2.to_string(),
                    currency: Currency::Kzt,
                },
                AssignTarget {
                    account: AccountId::from(BANK_B_CLIENT),
                    capability: BANK_B_GATEWAY_LEVEL_2.to_string(),
                    currency: Currency::Rmb,
                },
            ],
            client_identities: vec![CLIENT_ALICE.to_string(), CLIENT_BOB.to_string()],
            query_grants: vec![
                grant(BANK_A_L1_KZT, BANK_A_GATEWAY_LEVEL_1, None),
                grant(BANK_A_L1_RMB, BANK_A_GATEWAY_LEVEL_1, None),
                grant(BANK_A_L2, BANK_A_GATEWAY_LEVEL_2, None),
                grant(BANK_A_CLIENT, BANK_A_GATEWAY_LEVEL_2, Some(CLIENT_ALICE)),
                grant(BANK_B_L1_KZT, BANK_B_GATEWAY_LEVEL_1, None),
                grant(BANK_B_L1_RMB, BANK_B_GATEWAY_LEVEL_1, None),
                grant(BANK_B_L2, BANK_B_GATEWAY_LEVEL_2, None),
                grant(BANK_B_CLIENT, BANK_B_GATEWAY_LEVEL_2, Some(CLIENT_BOB)),
            ],
            issuer_role: ISSUER_ROLE.to_string(),
            remitter: DEFAULT_REMITTER.to_string(),
            assign_contact_info: DEFAULT_ASSIGN_CONTACT.to_string(),
            transfer_contact_info: DEFAULT_TRANSFER_CONTACT.to_string(),
            principals: vec![
                PrincipalConfig::new("bank_a_issuer", &[ISSUER_ROLE], &[BANK_A_GATEWAY_LEVEL_2]),
                PrincipalConfig::new("bank_b_issuer", &[ISSUER_ROLE], &[BANK_B_GATEWAY_LEVEL_2]),
                PrincipalConfig::new("bank_a_settlement", &[], &[BANK_A_GATEWAY_LEVEL_1]),
                PrincipalConfig::new("bank_b_settlement", &[], &[BANK_B_GATEWAY_LEVEL_1]),
                PrincipalConfig::new(CLIENT_ALICE, &[], &[CLIENT_ALICE]),
                PrincipalConfig::new(CLIENT_BOB, &[], &[CLIENT_BOB]),
            ],
        }
    }
}

impl LedgerConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CorrbankError::Configuration(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.relay_route.is_empty() {
            return Err(CorrbankError::Configuration("relay_route is empty".into()));
        }
        if self.issuer_role.is_empty() {
            return Err(CorrbankError::Configuration("issuer_role is empty".into()));
        }
        if let Some(bad) = self.exchange_rates.iter().find(|r| r.rate <= Decimal::ZERO) {
            return Err(CorrbankError::Configuration(format!(
                "exchange rate {}->{} must be positive, got {}",
                bad.from, bad.to, bad.rate
            )));
        }
        let mut seen = BTreeSet::new();
        for account in &self.seed_accounts {
            if !seen.insert(&account.id) {
                return Err(CorrbankError::Configuration(format!(
                    "seed account {} listed twice",
                    account.id
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for target in &self.assign_targets {
            if !seen.insert(&target.account) {
                return Err(CorrbankError::Configuration(format!(
                    "assign target {} listed twice",
                    target.account
                )));
            }
        }
        Ok(())
    }
}
