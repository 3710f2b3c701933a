//! Authorization gate: the identity service seen from the engine.
//!
//! The engine only ever asks two questions: does the caller hold a role,
//! and does the caller carry a given name attribute. How that is decided
//! (certificates, a directory, a static table) is the gate's business.

use std::collections::{HashMap, HashSet};

use corrbank_types::{Principal, PrincipalConfig};

/// Capability oracle consulted before every gated operation.
pub trait AuthorizationGate {
    /// Whether `caller` holds the role `role`.
    fn is_authorized_by_role(&self, caller: &Principal, role: &str) -> bool;

    /// Whether `caller` carries the name attribute `name`.
    fn is_authorized_by_name(&self, caller: &Principal, name: &str) -> bool;
}

#[derive(Debug, Default, Clone)]
struct Grants {
    roles: HashSet<String>,
    names: HashSet<String>,
}

/// In-process gate backed by a fixed principal → capabilities table.
/// Unknown principals hold nothing.
#[derive(Debug, Default, Clone)]
pub struct StaticAuthorizer {
    principals: HashMap<Principal, Grants>,
}

impl StaticAuthorizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the configured principal table.
    #[must_use]
    pub fn from_configs(configs: &[PrincipalConfig]) -> Self {
        let mut gate = Self::new();
        for cfg in configs {
            let principal = Principal::new(cfg.principal.clone());
            for role in &cfg.roles {
                gate.grant_role(&principal, role);
            }
            for name in &cfg.names {
                gate.grant_name(&principal, name);
            }
        }
        gate
    }

    pub fn grant_role(&mut self, principal: &Principal, role: &str) {
        self.principals
            .entry(principal.clone())
            .or_default()
            .roles
            .insert(role.to_string());
    }

    pub fn grant_name(&mut self, principal: &Principal, name: &str) {
        self.principals
            .entry(principal.clone())
            .or_default()
            .names
            .insert(name.to_string());
    }

    /// Builder form of [`grant_role`](Self::grant_role).
    #[must_use]
    pub fn with_role(mut self, principal: &str, role: &str) -> Self {
        self.grant_role(&Principal::from(principal), role);
        self
    }

    /// Builder form of [`grant_name`](Self::grant_name).
    #[must_use]
    pub fn with_name(mut self, principal: &str, name: &str) -> Self {
        self.grant_name(&Principal::from(principal), name);
        self
    }

    /// Whether the principal is known at all.
    #[must_use]
    pub fn knows(&self, principal: &Principal) -> bool {
        self.principals.contains_key(principal)
    }
}

impl AuthorizationGate for StaticAuthorizer {
    fn is_authorized_by_role(&self, caller: &Principal, role: &str) -> bool {
        self.principals
            .get(caller)
            .is_some_and(|g| g.roles.contains(role))
    }

    fn is_authorized_by_name(&self, caller: &Principal, name: &str) -> bool {
        self.principals
            .get(caller)
            .is_some_and(|g| g.names.contains(name))
    }
}
