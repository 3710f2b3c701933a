//! Error types for the corrbank ledger.
//!
//! All errors use the `CB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Argument errors
//! - 3xx: Ledger errors
//! - 4xx: Settlement errors
//! - 5xx: Routing errors
//! - 9xx: Storage / configuration / internal errors
//!
//! Callers that need to branch on the failure class should use
//! [`CorrbankError::kind`] rather than matching on message text.

use std::fmt;

use thiserror::Error;

use crate::{AccountId, Currency, Delta};

/// Coarse failure class. Stable across message wording changes; integration
/// tests and the router's callers match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    InvalidArgument,
    AccountNotFound,
    AlreadyExists,
    CurrencyMismatch,
    InsufficientBalance,
    UnsupportedExchangeRate,
    UnknownRole,
    UnknownOperation,
    Storage,
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::CurrencyMismatch => "CURRENCY_MISMATCH",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::UnsupportedExchangeRate => "UNSUPPORTED_EXCHANGE_RATE",
            Self::UnknownRole => "UNKNOWN_ROLE",
            Self::UnknownOperation => "UNKNOWN_OPERATION",
            Self::Storage => "STORAGE",
            Self::Configuration => "CONFIGURATION",
        };
        f.write_str(name)
    }
}

/// Central error enum for all corrbank operations.
#[derive(Debug, Error)]
pub enum CorrbankError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The caller does not hold the capability the operation requires.
    #[error("CB_ERR_100: {principal} is not authorized to {operation}: requires {capability}")]
    Unauthorized {
        principal: String,
        operation: String,
        capability: String,
    },

    // =================================================================
    // Argument Errors (2xx)
    // =================================================================
    /// An argument failed to parse or is outside what the operation accepts.
    #[error("CB_ERR_200: Invalid argument for {operation}: {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// Currency code is unknown, or not accepted for the target account.
    #[error("CB_ERR_201: Not a valid currency: {0}")]
    InvalidCurrency(String),

    // =================================================================
    // Ledger Errors (3xx)
    // =================================================================
    /// No row exists for this account.
    #[error("CB_ERR_300: Account not found: {0}")]
    AccountNotFound(AccountId),

    /// A row already exists for this account; balances can only be
    /// assigned to new accounts.
    #[error("CB_ERR_301: Asset was already assigned to account {0}")]
    AlreadyExists(AccountId),

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// The destination account does not hold the requested currency.
    #[error("CB_ERR_400: Account {account} holds {actual}, not {expected}")]
    CurrencyMismatch {
        account: AccountId,
        expected: Currency,
        actual: Currency,
    },

    /// The balance cannot cover the amount (pre-check or debit underflow).
    #[error("CB_ERR_401: Insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u64,
        available: u64,
    },

    /// No rate is defined for this direction of conversion.
    #[error("CB_ERR_402: Exchange rate {from}->{to} is not supported")]
    UnsupportedExchangeRate { from: Currency, to: Currency },

    /// The identifier suffix does not map to a settlement tier.
    #[error("CB_ERR_403: Role is not expected for account {0}")]
    UnknownRole(AccountId),

    /// A balance write inside a hop failed. Writes made earlier in the same
    /// hop are left in place.
    #[error("CB_ERR_404: Update account {account} ({delta}) failed: {source}", account = .delta.account)]
    HopWriteFailed {
        delta: Delta,
        #[source]
        source: Box<CorrbankError>,
    },

    // =================================================================
    // Routing Errors (5xx)
    // =================================================================
    /// The router has no handler for this function name.
    #[error("CB_ERR_500: Received unknown function {kind} invocation: {function}")]
    UnknownOperation { kind: &'static str, function: String },

    // =================================================================
    // Storage / Configuration / Internal (9xx)
    // =================================================================
    /// The table store rejected or could not serve a request.
    #[error("CB_ERR_900: Storage error: {0}")]
    Storage(String),

    /// Configuration error (invalid config file, inconsistent tables, etc.).
    #[error("CB_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("CB_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (config file, script file).
    #[error("CB_ERR_903: I/O error: {0}")]
    Io(String),
}

impl CorrbankError {
    /// The failure class of this error. A [`HopWriteFailed`] reports the
    /// class of the write that failed underneath it.
    ///
    /// [`HopWriteFailed`]: CorrbankError::HopWriteFailed
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidArgument { .. } | Self::InvalidCurrency(_) => ErrorKind::InvalidArgument,
            Self::AccountNotFound(_) => ErrorKind::AccountNotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::CurrencyMismatch { .. } => ErrorKind::CurrencyMismatch,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::UnsupportedExchangeRate { .. } => ErrorKind::UnsupportedExchangeRate,
            Self::UnknownRole(_) => ErrorKind::UnknownRole,
            Self::HopWriteFailed { source, .. } => source.kind(),
            Self::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Self::Storage(_) | Self::Serialization(_) | Self::Io(_) => ErrorKind::Storage,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Shorthand for [`CorrbankError::InvalidArgument`].
    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CorrbankError>;

// Conversion from std::io::Error
impl From<std::io::Error> for CorrbankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CorrbankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[test]
    fn error_display_contains_prefix() {
        let err = CorrbankError::AccountNotFound(AccountId::from("11111-00009"));
        let msg = format!("{err}");
        assert!(msg.starts_with("CB_ERR_300"), "Got: {msg}");
        assert!(msg.contains("11111-00009"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = CorrbankError::InsufficientBalance {
            account: AccountId::from("11111-00004"),
            needed: 3000,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("CB_ERR_401"));
        assert!(msg.contains("3000"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn hop_write_failure_names_account_and_signed_delta() {
        let err = CorrbankError::HopWriteFailed {
            delta: Delta {
                account: AccountId::from("11111-00003"),
                direction: Direction::Debit,
                amount: 3000,
                currency: Currency::Kzt,
            },
            source: Box::new(CorrbankError::AccountNotFound(AccountId::from("11111-00003"))),
        };
        let msg = format!("{err}");
        assert!(msg.contains("CB_ERR_404"), "Got: {msg}");
        assert!(msg.contains("Update account 11111-00003 (-3000KZT)"), "Got: {msg}");
        assert_eq!(err.kind(), ErrorKind::AccountNotFound);
    }

    #[test]
    fn kinds_are_distinguishable() {
        let cases = [
            (
                CorrbankError::Unauthorized {
                    principal: "mallory".into(),
                    operation: "assign".into(),
                    capability: "gateway_level_2".into(),
                },
                ErrorKind::Unauthorized,
            ),
            (CorrbankError::InvalidCurrency("USD".into()), ErrorKind::InvalidArgument),
            (CorrbankError::AlreadyExists(AccountId::from("x")), ErrorKind::AlreadyExists),
            (
                CorrbankError::UnsupportedExchangeRate {
                    from: Currency::Rmb,
                    to: Currency::Kzt,
                },
                ErrorKind::UnsupportedExchangeRate,
            ),
            (CorrbankError::UnknownRole(AccountId::from("x")), ErrorKind::UnknownRole),
            (
                CorrbankError::UnknownOperation {
                    kind: "query",
                    function: "drain".into(),
                },
                ErrorKind::UnknownOperation,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn all_errors_have_cb_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(CorrbankError::Storage("table missing".into())),
            Box::new(CorrbankError::Configuration("empty route".into())),
            Box::new(CorrbankError::invalid_argument("getBalance", "expecting 1")),
            Box::new(CorrbankError::CurrencyMismatch {
                account: AccountId::from("22222-00004"),
                expected: Currency::Kzt,
                actual: Currency::Rmb,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CB_ERR_"),
                "Error missing CB_ERR_ prefix: {msg}"
            );
        }
    }
}
