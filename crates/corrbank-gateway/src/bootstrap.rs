//! In-process network wiring.

use corrbank_ledger::MemoryTableStore;
use corrbank_settlement::StaticAuthorizer;
use corrbank_types::{LedgerConfig, Result, constants};

use crate::router::RequestRouter;

/// Router over the in-memory store and the static principal table.
pub type DemoRouter = RequestRouter<MemoryTableStore, StaticAuthorizer>;

/// Build a router from `config` and run `init`.
pub fn bootstrap(config: &LedgerConfig) -> Result<DemoRouter> {
    let gate = StaticAuthorizer::from_configs(&config.principals);
    let mut router = RequestRouter::from_config(config, MemoryTableStore::new(), gate)?;
    router.init(&[])?;
    tracing::info!(
        engine = constants::ENGINE_NAME,
        version = constants::VERSION,
        accounts = config.seed_accounts.len(),
        principals = config.principals.len(),
        hops = config.relay_route.len(),
        "network ready"
    );
    Ok(router)
}
