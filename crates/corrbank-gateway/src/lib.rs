//! # corrbank-gateway
//!
//! **Request plane**: turns named operations with string arguments into
//! engine calls.
//!
//! ```text
//! caller, "transferOwnership", [args] ─▶ RequestRouter ─▶ TransferEngine
//! ```
//!
//! - [`RequestRouter`] parses arguments, dispatches invoke and query
//!   operations, and renders results as strings
//! - [`bootstrap`] wires an in-memory network from a [`LedgerConfig`]
//! - [`script`] replays a JSON list of calls against one ledger
//!
//! [`LedgerConfig`]: corrbank_types::LedgerConfig

pub mod bootstrap;
pub mod router;
pub mod script;

pub use bootstrap::{DemoRouter, bootstrap};
pub use router::{CallKind, RequestRouter};
pub use script::{ScriptStep, StepOutcome, run_script};
