//! # corrbank-types
//!
//! Shared types, errors, and configuration for the **corrbank** remittance
//! ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`Principal`], [`RequestId`]
//! - **Account model**: [`Account`], [`Currency`]
//! - **Settlement tiers**: [`Role`] (derived from the account identifier), [`HopRule`]
//! - **Exchange rates**: [`ExchangeRateTable`]
//! - **Hop records**: [`HopReceipt`], [`Delta`], [`Direction`], [`RelayHop`]
//! - **Configuration**: [`LedgerConfig`], [`AssignTarget`], [`QueryGrant`], [`PrincipalConfig`]
//! - **Errors**: [`CorrbankError`] with `CB_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: table layout, demo capability names, seed data

pub mod account;
pub mod config;
pub mod constants;
pub mod currency;
pub mod error;
pub mod ids;
pub mod rates;
pub mod receipt;
pub mod role;

pub use account::*;
pub use config::*;
pub use currency::*;
pub use error::*;
pub use ids::*;
pub use rates::*;
pub use receipt::*;
pub use role::*;

// Constants are accessed via `corrbank_types::constants::FOO`
// (not re-exported to avoid name collisions).
