//! Access policy: which capability each operation and account requires.
//!
//! ## Checks
//!
//! - **assign**: issuer role, known client identity, configured target,
//!   target's named capability, target's currency whitelist (in that order)
//! - **transfer**: the remitter name capability
//! - **query**: the account's grant, falling back to a named individual for
//!   client accounts; accounts without a grant are not gated
//!
//! Every denial is logged at `warn` and returned as `Unauthorized`.

use std::collections::BTreeSet;

use corrbank_types::{
    AccountId, AssignTarget, CorrbankError, Currency, LedgerConfig, Principal, QueryGrant, Result,
};

use crate::auth::AuthorizationGate;

/// Capability requirements, resolved from [`LedgerConfig`].
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    issuer_role: String,
    remitter: String,
    client_identities: BTreeSet<String>,
    assign_targets: Vec<AssignTarget>,
    query_grants: Vec<QueryGrant>,
}

impl AccessPolicy {
    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            issuer_role: config.issuer_role.clone(),
            remitter: config.remitter.clone(),
            client_identities: config.client_identities.iter().cloned().collect(),
            assign_targets: config.assign_targets.clone(),
            query_grants: config.query_grants.clone(),
        }
    }

    /// Authorize an assignment and return the target it resolved to.
    pub fn authorize_assign<G: AuthorizationGate + ?Sized>(
        &self,
        gate: &G,
        caller: &Principal,
        identity: &str,
        account: &AccountId,
        currency: Currency,
    ) -> Result<&AssignTarget> {
        if !gate.is_authorized_by_role(caller, &self.issuer_role) {
            return Err(deny(caller, "assign assets", &self.issuer_role));
        }
        if !self.client_identities.contains(identity) {
            return Err(CorrbankError::invalid_argument(
                "assignOwnership",
                format!("not a valid client: {identity}"),
            ));
        }
        let target = self
            .assign_targets
            .iter()
            .find(|t| &t.account == account)
            .ok_or_else(|| {
                CorrbankError::invalid_argument(
                    "assignOwnership",
                    format!("account is not {identity}'s {account}"),
                )
            })?;
        if !gate.is_authorized_by_name(caller, &target.capability) {
            return Err(deny(
                caller,
                &format!("assign assets to {identity}"),
                &target.capability,
            ));
        }
        if currency != target.currency {
            return Err(CorrbankError::InvalidCurrency(format!(
                "{currency} is not supported on {identity}'s account {account}"
            )));
        }
        Ok(target)
    }

    /// Authorize initiating a remittance.
    pub fn authorize_transfer<G: AuthorizationGate + ?Sized>(
        &self,
        gate: &G,
        caller: &Principal,
    ) -> Result<()> {
        if gate.is_authorized_by_name(caller, &self.remitter) {
            Ok(())
        } else {
            Err(deny(caller, "transfer assets", &self.remitter))
        }
    }

    /// Authorize reading `account`.
    pub fn authorize_query<G: AuthorizationGate + ?Sized>(
        &self,
        gate: &G,
        caller: &Principal,
        account: &AccountId,
    ) -> Result<()> {
        let Some(grant) = self.query_grants.iter().find(|g| &g.account == account) else {
            return Ok(());
        };
        if gate.is_authorized_by_name(caller, &grant.capability) {
            return Ok(());
        }
        if let Some(fallback) = &grant.fallback {
            if gate.is_authorized_by_name(caller, fallback) {
                return Ok(());
            }
            return Err(deny(
                caller,
                &format!("query assets in {account}"),
                &format!("{} or {fallback}", grant.capability),
            ));
        }
        Err(deny(caller, &format!("query assets in {account}"), &grant.capability))
    }
}

fn deny(caller: &Principal, operation: &str, capability: &str) -> CorrbankError {
    tracing::warn!(caller = %caller, operation, capability, "authorization denied");
    CorrbankError::Unauthorized {
        principal: caller.to_string(),
        operation: operation.to_string(),
        capability: capability.to_string(),
    }
}
