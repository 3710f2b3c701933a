//! The closed set of currencies an account may hold.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::CorrbankError;

/// Settlement currency of an account. Parsed once at the boundary; nothing
/// past the router handles currency strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Chinese renminbi.
    Rmb,
    /// Kazakhstani tenge.
    Kzt,
}

impl Currency {
    /// Every supported currency, in declaration order.
    pub const ALL: [Currency; 2] = [Currency::Rmb, Currency::Kzt];

    /// The code as stored in the ledger table.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Rmb => "RMB",
            Self::Kzt => "KZT",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CorrbankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RMB" => Ok(Self::Rmb),
            "KZT" => Ok(Self::Kzt),
            other => Err(CorrbankError::InvalidCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_codes() {
        assert_eq!("RMB".parse::<Currency>().unwrap(), Currency::Rmb);
        assert_eq!("KZT".parse::<Currency>().unwrap(), Currency::Kzt);
    }

    #[test]
    fn rejects_unknown_and_lowercase_codes() {
        for bad in ["USD", "rmb", "", "KZT "] {
            let err = bad.parse::<Currency>().unwrap_err();
            assert!(
                matches!(err, CorrbankError::InvalidCurrency(ref c) if c == bad),
                "Got: {err:?}"
            );
        }
    }

    #[test]
    fn display_matches_code() {
        for c in Currency::ALL {
            assert_eq!(c.to_string(), c.code());
            assert_eq!(c.code().parse::<Currency>().unwrap(), c);
        }
    }

    #[test]
    fn serde_uses_upper_case_code() {
        assert_eq!(serde_json::to_string(&Currency::Kzt).unwrap(), "\"KZT\"");
        let back: Currency = serde_json::from_str("\"RMB\"").unwrap();
        assert_eq!(back, Currency::Rmb);
    }
}
