//! # corrbank-ledger
//!
//! **Ledger plane**: the account table and the store it lives in.
//!
//! ## Architecture
//!
//! 1. **TableStore**: the row store contract (create-table, insert, replace,
//!    get, delete). Single-row operations only; no transactions.
//! 2. **MemoryTableStore**: in-process reference store, first writer wins.
//! 3. **AccountLedger**: typed CRUD over the `AssetsOwnership` table. It is
//!    the only component that writes account rows.
//!
//! ```text
//! TransferEngine → AccountLedger.{create,read,replace} → TableStore row ops
//! ```
//!
//! Every ledger call is exactly one row read or one row write. Anything
//! spanning several accounts is a sequence of independent writes.

pub mod ledger;
pub mod memory;
pub mod store;

pub use ledger::AccountLedger;
pub use memory::MemoryTableStore;
pub use store::{Column, ColumnDefinition, ColumnType, Row, TableSchema, TableStore};
