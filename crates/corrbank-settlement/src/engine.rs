//! Transfer engine: assignment, single hops, the relay walk and queries.
//!
//! ## Hop rules
//!
//! | from   | to     | writes                                        |
//! |--------|--------|-----------------------------------------------|
//! | Client | Tier2  | debit from (converted), debit to (converted)  |
//! | Tier2  | Tier1  | credit to (converted)                         |
//! | Tier1  | Tier1  | debit from, credit to (raw amount)            |
//! | Tier1  | Tier2  | debit from, credit to (raw amount)            |
//! | Tier2  | Client | credit to (raw amount)                        |
//!
//! "Converted" means `amount` multiplied by the rate from the source
//! account's currency to the requested currency. A hop with no rate for
//! that pair moves the amount unconverted. Every other role pair is a
//! no-op. Each write is computed from the balance read at the start of the
//! hop and applied with its own `replace`; nothing is rolled back.

use chrono::Utc;
use corrbank_ledger::{AccountLedger, TableStore};
use corrbank_types::{
    Account, AccountId, CorrbankError, Currency, Delta, Direction, ExchangeRateTable, HopReceipt,
    HopRule, LedgerConfig, Principal, Result, Role,
};

use crate::access::AccessPolicy;
use crate::auth::AuthorizationGate;
use crate::relay::{AssignRequest, HopRequest, RelayRoute};

/// A balance adjustment computed from a snapshot, not yet written.
struct PendingWrite {
    account: Account,
    direction: Direction,
    amount: u64,
}

impl PendingWrite {
    fn debit(account: Account, amount: u64) -> Self {
        Self {
            account,
            direction: Direction::Debit,
            amount,
        }
    }

    fn credit(account: Account, amount: u64) -> Self {
        Self {
            account,
            direction: Direction::Credit,
            amount,
        }
    }

    fn delta(&self) -> Delta {
        Delta {
            account: self.account.id.clone(),
            direction: self.direction,
            amount: self.amount,
            currency: self.account.currency,
        }
    }

    /// The account as it should be stored after this write.
    fn settled(mut self) -> Result<Account> {
        let balance = self.account.balance;
        self.account.balance = match self.direction {
            Direction::Debit => balance.checked_sub(self.amount).ok_or_else(|| {
                CorrbankError::InsufficientBalance {
                    account: self.account.id.clone(),
                    needed: self.amount,
                    available: balance,
                }
            })?,
            Direction::Credit => balance.checked_add(self.amount).ok_or_else(|| {
                CorrbankError::invalid_argument(
                    "transfer",
                    format!("crediting {} to {} overflows", self.amount, self.account.id),
                )
            })?,
        };
        Ok(self.account)
    }
}

/// Owns the ledger and every collaborator the operations consult.
pub struct TransferEngine<S, G> {
    ledger: AccountLedger<S>,
    gate: G,
    rates: ExchangeRateTable,
    policy: AccessPolicy,
    route: RelayRoute,
    transfer_contact_info: String,
}

impl<S: TableStore, G: AuthorizationGate> TransferEngine<S, G> {
    pub fn new(
        ledger: AccountLedger<S>,
        gate: G,
        rates: ExchangeRateTable,
        policy: AccessPolicy,
        route: RelayRoute,
        transfer_contact_info: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            gate,
            rates,
            policy,
            route,
            transfer_contact_info: transfer_contact_info.into(),
        }
    }

    /// Wire an engine from configuration. The ledger table is not created;
    /// call [`bootstrap`](Self::bootstrap) first.
    ///
    /// # Errors
    /// `Configuration` if the config fails validation.
    pub fn from_config(config: &LedgerConfig, store: S, gate: G) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            AccountLedger::new(store),
            gate,
            ExchangeRateTable::from_configs(&config.exchange_rates),
            AccessPolicy::from_config(config),
            RelayRoute::new(config.relay_route.clone())?,
            config.transfer_contact_info.clone(),
        ))
    }

    /// Create the ownership table and insert the seed accounts in order.
    pub fn bootstrap(&mut self, seeds: &[Account]) -> Result<()> {
        self.ledger.create_table()?;
        for account in seeds {
            self.ledger.create(account)?;
        }
        tracing::info!(accounts = seeds.len(), "ledger bootstrapped");
        Ok(())
    }

    /// Allocate a fresh balance to a whitelisted client account.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidArgument` or `InvalidCurrency` from the
    /// access policy; `AlreadyExists` if the account was assigned before.
    pub fn assign(&mut self, caller: &Principal, request: &AssignRequest) -> Result<Account> {
        self.policy.authorize_assign(
            &self.gate,
            caller,
            &request.identity,
            &request.account,
            request.currency,
        )?;
        let account = Account::new(
            request.account.clone(),
            request.contact_info.clone(),
            request.amount,
            request.currency,
        );
        self.ledger.create(&account)?;
        tracing::info!(
            caller = %caller,
            identity = %request.identity,
            account = %account.id,
            balance = %account.balance_display(),
            "asset assigned"
        );
        Ok(account)
    }

    /// Apply one hop under the rule its role pair selects.
    ///
    /// # Errors
    /// `UnknownRole` or `AccountNotFound` before any write; `HopWriteFailed`
    /// if a write fails, with earlier writes of the same hop left applied.
    pub fn transfer(&mut self, hop: &HopRequest) -> Result<HopReceipt> {
        let from_role = Role::resolve(&hop.from)?;
        let to_role = Role::resolve(&hop.to)?;
        let Some(rule) = HopRule::for_roles(from_role, to_role) else {
            tracing::debug!(from = %hop.from, to = %hop.to, %from_role, %to_role, "no rule for role pair, hop skipped");
            return Ok(receipt(hop, None, Vec::new()));
        };

        let writes = match rule {
            HopRule::ClientToTier2 => {
                let from = self.ledger.read(&hop.from)?;
                let to = self.ledger.read(&hop.to)?;
                let converted = self.hop_convert(hop.amount, from.currency, hop.currency)?;
                vec![
                    PendingWrite::debit(from, converted),
                    PendingWrite::debit(to, converted),
                ]
            }
            HopRule::Tier2ToTier1 => {
                let from = self.ledger.read(&hop.from)?;
                let to = self.ledger.read(&hop.to)?;
                let converted = self.hop_convert(hop.amount, from.currency, hop.currency)?;
                vec![PendingWrite::credit(to, converted)]
            }
            HopRule::Tier1ToTier1 | HopRule::Tier1ToTier2 => {
                let from = self.ledger.read(&hop.from)?;
                let to = self.ledger.read(&hop.to)?;
                vec![
                    PendingWrite::debit(from, hop.amount),
                    PendingWrite::credit(to, hop.amount),
                ]
            }
            HopRule::Tier2ToClient => {
                let to = self.ledger.read(&hop.to)?;
                vec![PendingWrite::credit(to, hop.amount)]
            }
        };

        let deltas = self.apply(writes)?;
        let shown: Vec<String> = deltas.iter().map(ToString::to_string).collect();
        tracing::debug!(from = %hop.from, to = %hop.to, %rule, deltas = ?shown, "hop applied");
        Ok(receipt(hop, Some(rule), deltas))
    }

    /// Conversion inside a hop: a missing rate counts as 1.
    fn hop_convert(&self, amount: u64, from: Currency, to: Currency) -> Result<u64> {
        match self.rates.convert(amount, from, to) {
            Err(CorrbankError::UnsupportedExchangeRate { .. }) => {
                tracing::debug!(%from, %to, amount, "no exchange rate, hop amount unconverted");
                Ok(amount)
            }
            other => other,
        }
    }

    fn apply(&mut self, writes: Vec<PendingWrite>) -> Result<Vec<Delta>> {
        let mut applied = Vec::with_capacity(writes.len());
        for write in writes {
            let delta = write.delta();
            let result = write
                .settled()
                .and_then(|account| self.ledger.replace(&account));
            if let Err(source) = result {
                tracing::warn!(account = %delta.account, %delta, error = %source, "hop write failed");
                return Err(CorrbankError::HopWriteFailed {
                    delta,
                    source: Box::new(source),
                });
            }
            applied.push(delta);
        }
        Ok(applied)
    }

    /// Walk the configured route, one hop at a time.
    ///
    /// Stops at the first failing hop; hops before it stay applied.
    pub fn relay(
        &mut self,
        amount: u64,
        currency: Currency,
        contact_info: &str,
    ) -> Result<Vec<HopReceipt>> {
        let route = self.route.clone();
        let mut receipts = Vec::with_capacity(route.len());
        for (index, hop) in route.requests(amount, currency, contact_info).enumerate() {
            match self.transfer(&hop) {
                Ok(receipt) => receipts.push(receipt),
                Err(e) => {
                    tracing::warn!(hop = index, from = %hop.from, to = %hop.to, error = %e, "relay stopped");
                    return Err(e);
                }
            }
        }
        Ok(receipts)
    }

    /// Read-only pre-check of a remittance between two accounts.
    ///
    /// # Errors
    /// In order: `AccountNotFound` for either account, `CurrencyMismatch` if
    /// `to` does not hold `currency`, `UnsupportedExchangeRate`, and
    /// `InsufficientBalance` if `from` cannot cover the converted amount.
    pub fn validate_role_and_account(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
        currency: Currency,
    ) -> Result<()> {
        let from = self.ledger.read(from)?;
        let to = self.ledger.read(to)?;
        if to.currency != currency {
            return Err(CorrbankError::CurrencyMismatch {
                account: to.id,
                expected: currency,
                actual: to.currency,
            });
        }
        let converted = self.rates.convert(amount, from.currency, to.currency)?;
        if from.balance < converted {
            return Err(CorrbankError::InsufficientBalance {
                account: from.id,
                needed: converted,
                available: from.balance,
            });
        }
        Ok(())
    }

    /// Full remittance: authorize, validate the named accounts, then relay
    /// over the configured route.
    ///
    /// The named accounts are only validated; the hops always walk the route.
    pub fn transfer_ownership(
        &mut self,
        caller: &Principal,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
        currency: Currency,
    ) -> Result<Vec<HopReceipt>> {
        self.policy.authorize_transfer(&self.gate, caller)?;
        self.validate_role_and_account(from, to, amount, currency)?;
        let contact_info = self.transfer_contact_info.clone();
        let receipts = self.relay(amount, currency, &contact_info)?;
        tracing::info!(
            caller = %caller,
            from = %from,
            to = %to,
            amount,
            %currency,
            hops = receipts.len(),
            "ownership transferred"
        );
        Ok(receipts)
    }

    /// Balance and currency of `id`.
    ///
    /// # Errors
    /// `Unauthorized` if the caller fails the account's grant,
    /// `AccountNotFound` if absent.
    pub fn query_balance(&self, caller: &Principal, id: &AccountId) -> Result<(u64, Currency)> {
        self.policy.authorize_query(&self.gate, caller, id)?;
        let account = self.ledger.read(id)?;
        tracing::debug!(caller = %caller, account = %id, "balance queried");
        Ok((account.balance, account.currency))
    }

    /// Contact info stored on `id`. Gated like [`query_balance`](Self::query_balance).
    pub fn query_contact_info(&self, caller: &Principal, id: &AccountId) -> Result<String> {
        self.policy.authorize_query(&self.gate, caller, id)?;
        let account = self.ledger.read(id)?;
        tracing::debug!(caller = %caller, account = %id, "contact info queried");
        Ok(account.contact_info)
    }

    #[must_use]
    pub fn ledger(&self) -> &AccountLedger<S> {
        &self.ledger
    }

    /// Direct ledger access for administration and fixtures. Bypasses every
    /// authorization check.
    pub fn ledger_mut(&mut self) -> &mut AccountLedger<S> {
        &mut self.ledger
    }

    #[must_use]
    pub fn route(&self) -> &RelayRoute {
        &self.route
    }
}

fn receipt(hop: &HopRequest, rule: Option<HopRule>, deltas: Vec<Delta>) -> HopReceipt {
    HopReceipt {
        from: hop.from.clone(),
        to: hop.to.clone(),
        rule,
        deltas,
        contact_info: hop.contact_info.clone(),
        executed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticAuthorizer;
    use corrbank_ledger::MemoryTableStore;
    use corrbank_types::ErrorKind;

    type Engine = TransferEngine<MemoryTableStore, StaticAuthorizer>;

    fn engine() -> Engine {
        let config = LedgerConfig::default();
        let gate = StaticAuthorizer::from_configs(&config.principals);
        let mut engine = TransferEngine::from_config(&config, MemoryTableStore::new(), gate).unwrap();
        engine.bootstrap(&config.seed_accounts).unwrap();
        engine
    }

    fn engine_with_alice(balance: u64) -> Engine {
        let mut e = engine();
        e.assign(
            &Principal::from("bank_a_issuer"),
            &AssignRequest {
                identity: "alice".into(),
                account: AccountId::from("11111-00004"),
                contact_info: "alice@gmail.com".into(),
                amount: balance,
                currency: Currency::Kzt,
            },
        )
        .unwrap();
        e
    }

    fn balance(e: &Engine, id: &str) -> u64 {
        e.ledger().read(&AccountId::from(id)).unwrap().balance
    }

    fn hop(from: &str, to: &str, amount: u64, currency: Currency) -> HopRequest {
        HopRequest {
            from: AccountId::from(from),
            to: AccountId::from(to),
            contact_info: "bob@gmail.com".into(),
            amount,
            currency,
        }
    }

    #[test]
    fn bootstrap_seeds_seven_accounts() {
        let e = engine();
        assert_eq!(e.ledger().accounts().unwrap().len(), 7);
        assert_eq!(balance(&e, "11111-00001"), 1_000_000);
        assert_eq!(balance(&e, "22222-00004"), 1_000);
    }

    #[test]
    fn assign_creates_once() {
        let mut e = engine_with_alice(10_000);
        let alice = e.ledger().read(&AccountId::from("11111-00004")).unwrap();
        assert_eq!(alice.balance_display(), "10000KZT");

        let again = AssignRequest {
            identity: "alice".into(),
            account: AccountId::from("11111-00004"),
            contact_info: "other@gmail.com".into(),
            amount: 1,
            currency: Currency::Kzt,
        };
        let err = e.assign(&Principal::from("bank_a_issuer"), &again).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(balance(&e, "11111-00004"), 10_000);
    }

    #[test]
    fn assign_to_seeded_account_is_already_exists() {
        let mut e = engine();
        let req = AssignRequest {
            identity: "bob".into(),
            account: AccountId::from("22222-00004"),
            contact_info: "bob@gmail.com".into(),
            amount: 50,
            currency: Currency::Rmb,
        };
        let err = e.assign(&Principal::from("bank_b_issuer"), &req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(balance(&e, "22222-00004"), 1_000);
    }

    #[test]
    fn client_to_tier2_debits_both_converted() {
        let mut e = engine_with_alice(10_000);
        let r = e.transfer(&hop("11111-00004", "11111-00003", 100, Currency::Rmb)).unwrap();
        assert_eq!(r.rule, Some(HopRule::ClientToTier2));
        assert_eq!(balance(&e, "11111-00004"), 7_000);
        assert_eq!(balance(&e, "11111-00003"), 97_000);
        let shown: Vec<_> = r.deltas.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["-3000KZT", "-3000KZT"]);
    }

    #[test]
    fn tier2_to_tier1_credits_only() {
        let mut e = engine();
        let r = e.transfer(&hop("11111-00003", "11111-00001", 100, Currency::Rmb)).unwrap();
        assert_eq!(r.rule, Some(HopRule::Tier2ToTier1));
        assert_eq!(balance(&e, "11111-00003"), 100_000);
        assert_eq!(balance(&e, "11111-00001"), 1_003_000);
    }

    #[test]
    fn tier1_to_tier1_moves_raw_amount() {
        let mut e = engine();
        e.transfer(&hop("11111-00002", "22222-00002", 100, Currency::Rmb)).unwrap();
        assert_eq!(balance(&e, "11111-00002"), 99_900);
        assert_eq!(balance(&e, "22222-00002"), 100_100);
    }

    #[test]
    fn tier2_to_client_credits_only() {
        let mut e = engine();
        e.transfer(&hop("22222-00003", "22222-00004", 100, Currency::Rmb)).unwrap();
        assert_eq!(balance(&e, "22222-00003"), 10_000);
        assert_eq!(balance(&e, "22222-00004"), 1_100);
    }

    #[test]
    fn undefined_role_pair_is_skipped() {
        let mut e = engine();
        let before = e.ledger().state_digest().unwrap();
        // Tier-1 to client has no rule; the client account need not exist.
        let r = e.transfer(&hop("11111-00001", "11111-00004", 100, Currency::Kzt)).unwrap();
        assert!(!r.is_applied());
        assert!(r.deltas.is_empty());
        assert_eq!(e.ledger().state_digest().unwrap(), before);
    }

    #[test]
    fn unknown_suffix_is_unknown_role() {
        let mut e = engine();
        let err = e.transfer(&hop("11111-00009", "11111-00001", 1, Currency::Kzt)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownRole);
    }

    #[test]
    fn missing_rate_moves_amount_unconverted() {
        let mut e = engine();
        // No KZT->KZT rate: tier-2 to tier-1 credits the raw amount.
        let r = e.transfer(&hop("11111-00003", "11111-00001", 100, Currency::Kzt)).unwrap();
        assert_eq!(r.rule, Some(HopRule::Tier2ToTier1));
        assert_eq!(balance(&e, "11111-00001"), 1_000_100);
        assert_eq!(balance(&e, "11111-00003"), 100_000);
    }

    #[test]
    fn client_to_tier2_in_own_currency_is_unconverted() {
        let mut e = engine();
        let r = e.transfer(&hop("22222-00004", "22222-00003", 100, Currency::Rmb)).unwrap();
        let shown: Vec<_> = r.deltas.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["-100RMB", "-100RMB"]);
        assert_eq!(balance(&e, "22222-00004"), 900);
        assert_eq!(balance(&e, "22222-00003"), 9_900);
    }

    #[test]
    fn client_to_tier2_debits_each_in_its_own_currency() {
        let mut e = engine_with_alice(10_000);
        let r = e.transfer(&hop("11111-00004", "22222-00003", 100, Currency::Rmb)).unwrap();
        assert_eq!(r.rule, Some(HopRule::ClientToTier2));
        let shown: Vec<_> = r.deltas.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["-3000KZT", "-3000RMB"]);
        assert_eq!(e.ledger().read(&AccountId::from("11111-00004")).unwrap().balance_display(), "7000KZT");
        assert_eq!(e.ledger().read(&AccountId::from("22222-00003")).unwrap().balance_display(), "7000RMB");
    }

    #[test]
    fn failed_second_write_keeps_first() {
        let mut e = engine_with_alice(10_000);
        e.ledger_mut()
            .replace(&Account::new("11111-00003", "x@example.test", 1_000, Currency::Kzt))
            .unwrap();

        let err = e.transfer(&hop("11111-00004", "11111-00003", 100, Currency::Rmb)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        let CorrbankError::HopWriteFailed { delta, .. } = &err else {
            panic!("expected HopWriteFailed, got {err:?}");
        };
        assert_eq!(delta.account.as_str(), "11111-00003");
        assert!(err.to_string().contains("-3000KZT"), "{err}");

        assert_eq!(balance(&e, "11111-00004"), 7_000);
        assert_eq!(balance(&e, "11111-00003"), 1_000);
    }

    #[test]
    fn credit_overflow_is_invalid_argument() {
        let mut e = engine();
        e.ledger_mut()
            .replace(&Account::new("22222-00004", "bob@gmail.com", u64::MAX, Currency::Rmb))
            .unwrap();
        let err = e.transfer(&hop("22222-00003", "22222-00004", 1, Currency::Rmb)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(matches!(err, CorrbankError::HopWriteFailed { .. }));
    }

    #[test]
    fn relay_walks_full_route() {
        let mut e = engine_with_alice(10_000);
        let receipts = e.relay(100, Currency::Rmb, "bob@gmail.com").unwrap();
        assert_eq!(receipts.len(), 5);
        assert!(receipts.iter().all(HopReceipt::is_applied));

        assert_eq!(balance(&e, "11111-00004"), 7_000);
        assert_eq!(balance(&e, "11111-00003"), 97_000);
        assert_eq!(balance(&e, "11111-00001"), 1_003_000);
        assert_eq!(balance(&e, "11111-00002"), 99_900);
        assert_eq!(balance(&e, "22222-00002"), 100_000);
        assert_eq!(balance(&e, "22222-00003"), 10_100);
        assert_eq!(balance(&e, "22222-00004"), 1_100);
        assert_eq!(balance(&e, "22222-00001"), 1_000_000);
    }

    #[test]
    fn relay_stops_at_first_failure() {
        // Alice's account was never assigned, so hop 1 cannot read it.
        let mut e = engine();
        let before = e.ledger().state_digest().unwrap();
        let err = e.relay(100, Currency::Rmb, "bob@gmail.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountNotFound);
        assert_eq!(e.ledger().state_digest().unwrap(), before);
    }

    #[test]
    fn transfer_ownership_requires_remitter() {
        let mut e = engine_with_alice(10_000);
        let err = e
            .transfer_ownership(
                &Principal::from("bob"),
                &AccountId::from("11111-00004"),
                &AccountId::from("22222-00004"),
                100,
                Currency::Rmb,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(balance(&e, "11111-00004"), 10_000);
    }

    #[test]
    fn validation_order() {
        let e = engine_with_alice(10_000);
        let a = AccountId::from("11111-00004");
        let b = AccountId::from("22222-00004");

        let err = e
            .validate_role_and_account(&AccountId::from("11111-00008"), &b, 1, Currency::Rmb)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountNotFound);

        let err = e.validate_role_and_account(&a, &b, 1, Currency::Kzt).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CurrencyMismatch);

        let err = e
            .validate_role_and_account(&b, &b, 1, Currency::Rmb)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedExchangeRate);

        let err = e.validate_role_and_account(&a, &b, 334, Currency::Rmb).unwrap_err();
        assert!(
            matches!(err, CorrbankError::InsufficientBalance { needed: 10_020, available: 10_000, .. }),
            "Got: {err:?}"
        );

        e.validate_role_and_account(&a, &b, 333, Currency::Rmb).unwrap();
    }

    #[test]
    fn queries_are_gated_and_read_only() {
        let e = engine();
        let before = e.ledger().state_digest().unwrap();
        let id = AccountId::from("22222-00004");

        assert_eq!(
            e.query_balance(&Principal::from("bob"), &id).unwrap(),
            (1_000, Currency::Rmb)
        );
        assert_eq!(
            e.query_contact_info(&Principal::from("bank_b_issuer"), &id).unwrap(),
            "bob@gmail.com"
        );
        let err = e.query_balance(&Principal::from("alice"), &id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = e
            .query_contact_info(&Principal::from("alice"), &AccountId::from("11111-00004"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountNotFound);

        assert_eq!(e.ledger().state_digest().unwrap(), before);
    }
}
