//! Settlement tiers and the hop rules between them.
//!
//! The tier of an account is never stored; it is derived from the suffix of
//! the account identifier every time it is needed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AccountId, CorrbankError, Result, constants};

/// Position of an account in the correspondent-banking chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Bank's settlement gateway on the interbank leg (`*-00001`, `*-00002`).
    Tier1Gateway,
    /// Bank's customer-facing gateway (`*-00003`).
    Tier2Gateway,
    /// End investor account (`*-00004`).
    Client,
}

impl Role {
    /// Classify an account by its identifier suffix.
    ///
    /// # Errors
    /// Returns [`CorrbankError::UnknownRole`] if no known suffix matches.
    pub fn resolve(id: &AccountId) -> Result<Self> {
        let raw = id.as_str();
        if constants::TIER1_SUFFIXES.iter().any(|s| raw.ends_with(s)) {
            Ok(Self::Tier1Gateway)
        } else if raw.ends_with(constants::TIER2_SUFFIX) {
            Ok(Self::Tier2Gateway)
        } else if raw.ends_with(constants::CLIENT_SUFFIX) {
            Ok(Self::Client)
        } else {
            Err(CorrbankError::UnknownRole(id.clone()))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier1Gateway => write!(f, "GATEWAY_LEVEL_1"),
            Self::Tier2Gateway => write!(f, "GATEWAY_LEVEL_2"),
            Self::Client => write!(f, "CLIENT"),
        }
    }
}

/// One of the five defined (from-tier, to-tier) movements.
///
/// Any pair not listed here is not a hop: the engine leaves the ledger
/// untouched and reports the hop as skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HopRule {
    /// Converted amount debited from the client *and* from the tier-2 gateway.
    ClientToTier2,
    /// Converted amount credited to the tier-1 gateway only.
    Tier2ToTier1,
    /// Raw amount moved between two tier-1 gateways.
    Tier1ToTier1,
    /// Raw amount moved from a tier-1 to a tier-2 gateway.
    Tier1ToTier2,
    /// Raw amount credited to the client only.
    Tier2ToClient,
}

impl HopRule {
    /// Look up the rule for a (from, to) role pair.
    #[must_use]
    pub fn for_roles(from: Role, to: Role) -> Option<Self> {
        match (from, to) {
            (Role::Client, Role::Tier2Gateway) => Some(Self::ClientToTier2),
            (Role::Tier2Gateway, Role::Tier1Gateway) => Some(Self::Tier2ToTier1),
            (Role::Tier1Gateway, Role::Tier1Gateway) => Some(Self::Tier1ToTier1),
            (Role::Tier1Gateway, Role::Tier2Gateway) => Some(Self::Tier1ToTier2),
            (Role::Tier2Gateway, Role::Client) => Some(Self::Tier2ToClient),
            _ => None,
        }
    }

    /// Whether the hop amount is converted from the source account's
    /// currency before it is applied.
    #[must_use]
    pub fn converts(self) -> bool {
        matches!(self, Self::ClientToTier2 | Self::Tier2ToTier1)
    }
}

impl fmt::Display for HopRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientToTier2 => write!(f, "CLIENT->L2"),
            Self::Tier2ToTier1 => write!(f, "L2->L1"),
            Self::Tier1ToTier1 => write!(f, "L1->L1"),
            Self::Tier1ToTier2 => write!(f, "L1->L2"),
            Self::Tier2ToClient => write!(f, "L2->CLIENT"),
        }
    }
}
