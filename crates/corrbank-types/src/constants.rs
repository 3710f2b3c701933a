//! System-wide constants for the corrbank ledger.
//!
//! The capability names, account identifiers and seed balances below are
//! the demo network's fixed data. [`LedgerConfig::default`](crate::LedgerConfig)
//! is built from them.

use crate::Currency;

// ---------------------------------------------------------------------------
// Ledger table layout
// ---------------------------------------------------------------------------

/// Name of the ownership table.
pub const TABLE_NAME: &str = "AssetsOwnership";

pub const COLUMN_ACCOUNT_ID: &str = "Account";
pub const COLUMN_CONTACT_INFO: &str = "ContactInfo";
pub const COLUMN_AMOUNT: &str = "Amount";
pub const COLUMN_CURRENCY: &str = "Currency";

// ---------------------------------------------------------------------------
// Role derivation
// ---------------------------------------------------------------------------

/// Identifier suffixes of tier-1 (interbank) gateways.
pub const TIER1_SUFFIXES: [&str; 2] = ["00001", "00002"];

/// Identifier suffix of tier-2 (customer-facing) gateways.
pub const TIER2_SUFFIX: &str = "00003";

/// Identifier suffix of client accounts.
pub const CLIENT_SUFFIX: &str = "00004";

// ---------------------------------------------------------------------------
// Exchange rates
// ---------------------------------------------------------------------------

/// Tenge per renminbi.
pub const DEFAULT_KZT_PER_RMB: i64 = 30;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Role required to assign balances to new accounts.
pub const ISSUER_ROLE: &str = "gateway_level_2";

pub const BANK_A_GATEWAY_LEVEL_1: &str = "bank_a_gateway_level_1";
pub const BANK_A_GATEWAY_LEVEL_2: &str = "bank_a_gateway_level_2";
pub const BANK_B_GATEWAY_LEVEL_1: &str = "bank_b_gateway_level_1";
pub const BANK_B_GATEWAY_LEVEL_2: &str = "bank_b_gateway_level_2";

/// Named individuals. `alice` is also the only principal allowed to
/// remit.
pub const CLIENT_ALICE: &str = "alice";
pub const CLIENT_BOB: &str = "bob";

pub const DEFAULT_REMITTER: &str = CLIENT_ALICE;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub const BANK_A_L1_KZT: &str = "11111-00001";
pub const BANK_A_L1_RMB: &str = "11111-00002";
pub const BANK_A_L2: &str = "11111-00003";
pub const BANK_A_CLIENT: &str = "11111-00004";
pub const BANK_B_L1_KZT: &str = "22222-00001";
pub const BANK_B_L1_RMB: &str = "22222-00002";
pub const BANK_B_L2: &str = "22222-00003";
pub const BANK_B_CLIENT: &str = "22222-00004";

/// Contact stored on accounts created by `assignOwnership`.
pub const DEFAULT_ASSIGN_CONTACT: &str = "alice@gmail.com";

/// Beneficiary contact carried through every relay hop.
pub const DEFAULT_TRANSFER_CONTACT: &str = "bob@gmail.com";

/// Accounts created at bootstrap: (id, contact, balance, currency).
pub const SEED_ACCOUNTS: [(&str, &str, u64, Currency); 7] = [
    (BANK_A_L1_KZT, "bank_a_getway_level_1@gmail.com", 1_000_000, Currency::Kzt),
    (BANK_A_L1_RMB, "bank_a_getway_level_1@gmail.com", 100_000, Currency::Rmb),
    (BANK_A_L2, "bank_a_getway_level_2@gmail.com", 100_000, Currency::Kzt),
    (BANK_B_L1_KZT, "bank_b_getway_level_1@gmail.com", 1_000_000, Currency::Kzt),
    (BANK_B_L1_RMB, "bank_b_getway_level_1@gmail.com", 100_000, Currency::Rmb),
    (BANK_B_L2, "bank_b_getway_level_2@gmail.com", 10_000, Currency::Rmb),
    (BANK_B_CLIENT, "bob@gmail.com", 1_000, Currency::Rmb),
];

/// The remittance route: client A → L2 A → L1 A, L1 A (RMB) → L1 B (RMB)
/// → L2 B → client B. Note the route crosses from `11111-00001` to
/// `11111-00002` between the second and third hop without a movement.
pub const DEFAULT_RELAY_ROUTE: [(&str, &str); 5] = [
    (BANK_A_CLIENT, BANK_A_L2),
    (BANK_A_L2, BANK_A_L1_KZT),
    (BANK_A_L1_RMB, BANK_B_L1_RMB),
    (BANK_B_L1_RMB, BANK_B_L2),
    (BANK_B_L2, BANK_B_CLIENT),
];

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "corrbank";
