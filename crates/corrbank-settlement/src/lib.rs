//! # corrbank-settlement
//!
//! **Settlement plane**: who may move value, and how a remittance walks the
//! correspondent chain.
//!
//! ## Architecture
//!
//! 1. **AuthorizationGate**: answers "does this caller hold role / name X"
//! 2. **AccessPolicy**: maps each operation and account to the capability it needs
//! 3. **TransferEngine**: assign, single hop, relay walk, validation, queries
//!
//! ## Remittance Flow
//!
//! ```text
//! transfer_ownership ─▶ remitter check ─▶ validate_role_and_account
//!     ─▶ relay: hop 1 ─▶ hop 2 ─▶ ... ─▶ hop N   (route from config)
//! ```
//!
//! Hops are independent, sequential ledger writes. A failure stops the walk
//! and leaves every earlier write in place.

pub mod access;
pub mod auth;
pub mod engine;
pub mod relay;

pub use access::AccessPolicy;
pub use auth::{AuthorizationGate, StaticAuthorizer};
pub use engine::TransferEngine;
pub use relay::{AssignRequest, HopRequest, RelayRoute};
