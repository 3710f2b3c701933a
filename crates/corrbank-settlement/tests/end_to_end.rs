//! End-to-end integration tests for the settlement plane.
//!
//! These tests drive a `TransferEngine` over an in-memory ledger through
//! whole remittances: assignment, authorization, validation, the relay walk,
//! and the balances each hop leaves behind. They also swap in a custom
//! authorization gate and a custom configuration to exercise the seams.

use corrbank_ledger::MemoryTableStore;
use corrbank_settlement::{AssignRequest, AuthorizationGate, StaticAuthorizer, TransferEngine};
use corrbank_types::*;
use rust_decimal::Decimal;

/// Helper: a bootstrapped network with alice's account funded.
struct Network<G> {
    engine: TransferEngine<MemoryTableStore, G>,
}

impl Network<StaticAuthorizer> {
    fn demo() -> Self {
        let config = LedgerConfig::default();
        let gate = StaticAuthorizer::from_configs(&config.principals);
        Self::with(&config, gate)
    }
}

impl<G: AuthorizationGate> Network<G> {
    fn with(config: &LedgerConfig, gate: G) -> Self {
        let mut engine = TransferEngine::from_config(config, MemoryTableStore::new(), gate).unwrap();
        engine.bootstrap(&config.seed_accounts).unwrap();
        Self { engine }
    }

    fn fund_alice(&mut self, issuer: &str, amount: u64) -> Result<Account> {
        self.engine.assign(
            &Principal::from(issuer),
            &AssignRequest {
                identity: "alice".into(),
                account: AccountId::from("11111-00004"),
                contact_info: "alice@gmail.com".into(),
                amount,
                currency: Currency::Kzt,
            },
        )
    }

    fn remit(&mut self, caller: &str, amount: u64) -> Result<Vec<HopReceipt>> {
        self.engine.transfer_ownership(
            &Principal::from(caller),
            &AccountId::from("11111-00004"),
            &AccountId::from("22222-00004"),
            amount,
            Currency::Rmb,
        )
    }

    fn balance(&self, id: &str) -> u64 {
        self.engine.ledger().read(&AccountId::from(id)).unwrap().balance
    }

    fn total(&self, currency: Currency) -> u64 {
        self.engine
            .ledger()
            .accounts()
            .unwrap()
            .iter()
            .filter(|a| a.currency == currency)
            .map(|a| a.balance)
            .sum()
    }
}

// =========================================================================
// Full remittance
// =========================================================================

#[test]
fn full_remittance_moves_expected_amounts() {
    let mut net = Network::demo();
    net.fund_alice("bank_a_issuer", 10_000).unwrap();

    let receipts = net.remit("alice", 100).unwrap();
    assert_eq!(receipts.len(), 5);
    let rules: Vec<_> = receipts.iter().map(|r| r.rule).collect();
    assert_eq!(
        rules,
        vec![
            Some(HopRule::ClientToTier2),
            Some(HopRule::Tier2ToTier1),
            Some(HopRule::Tier1ToTier1),
            Some(HopRule::Tier1ToTier2),
            Some(HopRule::Tier2ToClient),
        ]
    );
    assert!(receipts.iter().all(|r| r.contact_info == "bob@gmail.com"));

    assert_eq!(net.balance("11111-00004"), 7_000);
    assert_eq!(net.balance("11111-00003"), 97_000);
    assert_eq!(net.balance("11111-00001"), 1_003_000);
    assert_eq!(net.balance("11111-00002"), 99_900);
    assert_eq!(net.balance("22222-00002"), 100_000);
    assert_eq!(net.balance("22222-00003"), 10_100);
    assert_eq!(net.balance("22222-00004"), 1_100);
}

#[test]
fn remittance_nets_across_the_chain() {
    let mut net = Network::demo();
    net.fund_alice("bank_a_issuer", 10_000).unwrap();
    let kzt_before = net.total(Currency::Kzt);
    let rmb_before = net.total(Currency::Rmb);

    net.remit("alice", 50).unwrap();

    // KZT: client -1500, tier-2 -1500, tier-1 +1500.
    assert_eq!(net.total(Currency::Kzt), kzt_before - 1_500);
    // RMB: bank A tier-1 -50, bank B tier-2 +50, bob +50.
    assert_eq!(net.total(Currency::Rmb), rmb_before + 50);
}

#[test]
fn repeated_remittances_until_validation_refuses() {
    let mut net = Network::demo();
    net.fund_alice("bank_a_issuer", 10_000).unwrap();

    for _ in 0..3 {
        net.remit("alice", 100).unwrap();
    }
    assert_eq!(net.balance("11111-00004"), 1_000);
    assert_eq!(net.balance("22222-00004"), 1_300);

    let before = net.engine.ledger().state_digest().unwrap();
    let err = net.remit("alice", 100).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert_eq!(net.engine.ledger().state_digest().unwrap(), before);
}

#[test]
fn remittance_without_assignment_fails_validation() {
    let mut net = Network::demo();
    let before = net.engine.ledger().state_digest().unwrap();
    let err = net.remit("alice", 100).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccountNotFound);
    assert_eq!(net.engine.ledger().state_digest().unwrap(), before);
}

#[test]
fn mid_route_failure_leaves_earlier_hops_applied() {
    let mut net = Network::demo();
    net.fund_alice("bank_a_issuer", 10_000).unwrap();
    // Drain bank A's RMB settlement account so hop 3 underflows.
    net.engine
        .ledger_mut()
        .replace(&Account::new("11111-00002", "bank_a_getway_level_1@gmail.com", 10, Currency::Rmb))
        .unwrap();

    let err = net.remit("alice", 100).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);

    // Hops 1 and 2 stayed; hops 3 to 5 never ran.
    assert_eq!(net.balance("11111-00004"), 7_000);
    assert_eq!(net.balance("11111-00003"), 97_000);
    assert_eq!(net.balance("11111-00001"), 1_003_000);
    assert_eq!(net.balance("11111-00002"), 10);
    assert_eq!(net.balance("22222-00002"), 100_000);
    assert_eq!(net.balance("22222-00004"), 1_000);
}

// =========================================================================
// Authorization
// =========================================================================

#[test]
fn issuers_only_fund_their_own_bank() {
    let mut net = Network::demo();
    let err = net.fund_alice("bank_b_issuer", 10_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let err = net.fund_alice("alice", 10_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    net.fund_alice("bank_a_issuer", 10_000).unwrap();
}

/// Gate that grants every role and name to one principal and nothing to
/// anyone else.
struct Superuser(Principal);

impl AuthorizationGate for Superuser {
    fn is_authorized_by_role(&self, caller: &Principal, _role: &str) -> bool {
        caller == &self.0
    }

    fn is_authorized_by_name(&self, caller: &Principal, _name: &str) -> bool {
        caller == &self.0
    }
}

#[test]
fn engine_consults_the_injected_gate() {
    let mut net = Network::with(&LedgerConfig::default(), Superuser(Principal::from("root")));
    net.fund_alice("root", 10_000).unwrap();
    net.remit("root", 10).unwrap();
    assert_eq!(net.balance("22222-00004"), 1_010);

    let err = net.remit("alice", 10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

// =========================================================================
// Configuration seams
// =========================================================================

#[test]
fn configured_rate_drives_conversion() {
    let mut config = LedgerConfig::default();
    config.exchange_rates = vec![RateConfig {
        from: Currency::Kzt,
        to: Currency::Rmb,
        rate: Decimal::new(655, 1), // 65.5
    }];
    let gate = StaticAuthorizer::from_configs(&config.principals);
    let mut net = Network::with(&config, gate);
    net.fund_alice("bank_a_issuer", 10_000).unwrap();

    net.remit("alice", 3).unwrap();
    // 3 * 65.5 = 196.5, truncated.
    assert_eq!(net.balance("11111-00004"), 10_000 - 196);
    assert_eq!(net.balance("11111-00001"), 1_000_000 + 196);
}

#[test]
fn configured_route_is_walked_as_declared() {
    let mut config = LedgerConfig::default();
    config.relay_route = vec![RelayHop::new("22222-00003", "22222-00004")];
    let gate = StaticAuthorizer::from_configs(&config.principals);
    let mut net = Network::with(&config, gate);
    net.fund_alice("bank_a_issuer", 10_000).unwrap();

    let receipts = net.remit("alice", 25).unwrap();
    assert_eq!(receipts.len(), 1);
    // Alice's account was validated but the route never touches it.
    assert_eq!(net.balance("11111-00004"), 10_000);
    assert_eq!(net.balance("22222-00004"), 1_025);
}

#[test]
fn invalid_config_is_rejected_before_wiring() {
    let mut config = LedgerConfig::default();
    config.relay_route.clear();
    let result = TransferEngine::from_config(&config, MemoryTableStore::new(), StaticAuthorizer::new());
    assert!(matches!(result, Err(CorrbankError::Configuration(_))));
}
