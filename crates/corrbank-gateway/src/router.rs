//! Named-operation router.
//!
//! Operations are split into two kinds: *invoke* operations may write, and
//! *query* operations never do. Sending a name to the wrong kind is an
//! unknown operation. Every call runs inside a span carrying a fresh
//! [`RequestId`].

use corrbank_ledger::TableStore;
use corrbank_settlement::{AssignRequest, AuthorizationGate, TransferEngine};
use corrbank_types::{
    Account, AccountId, CorrbankError, Currency, LedgerConfig, Principal, RequestId, Result,
};
use serde::{Deserialize, Serialize};

pub const INIT: &str = "init";
pub const ASSIGN_OWNERSHIP: &str = "assignOwnership";
pub const TRANSFER_OWNERSHIP: &str = "transferOwnership";
pub const GET_OWNER_CONTACT_INFORMATION: &str = "getOwnerContactInformation";
pub const GET_BALANCE: &str = "getBalance";

/// Whether a call may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Invoke,
    Query,
}

impl CallKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoke => "invoke",
            Self::Query => "query",
        }
    }
}

/// Dispatches named operations to a [`TransferEngine`].
pub struct RequestRouter<S, G> {
    engine: TransferEngine<S, G>,
    seed_accounts: Vec<Account>,
    assign_contact_info: String,
}

impl<S: TableStore, G: AuthorizationGate> RequestRouter<S, G> {
    pub fn new(
        engine: TransferEngine<S, G>,
        seed_accounts: Vec<Account>,
        assign_contact_info: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            seed_accounts,
            assign_contact_info: assign_contact_info.into(),
        }
    }

    pub fn from_config(config: &LedgerConfig, store: S, gate: G) -> Result<Self> {
        let engine = TransferEngine::from_config(config, store, gate)?;
        Ok(Self::new(
            engine,
            config.seed_accounts.clone(),
            config.assign_contact_info.clone(),
        ))
    }

    /// Create the ownership table and insert the seed accounts. Takes no
    /// arguments.
    pub fn init(&mut self, args: &[String]) -> Result<String> {
        let span = tracing::info_span!("init", request_id = %RequestId::new());
        let _enter = span.enter();
        let result = match args {
            [] => self.engine.bootstrap(&self.seed_accounts).map(|()| String::new()),
            _ => Err(arg_count(INIT, 0)),
        };
        log_rejection(&result);
        result
    }

    /// Dispatch by kind.
    pub fn call(
        &mut self,
        kind: CallKind,
        caller: &Principal,
        function: &str,
        args: &[String],
    ) -> Result<String> {
        match kind {
            CallKind::Invoke => self.invoke(caller, function, args),
            CallKind::Query => self.query(caller, function, args),
        }
    }

    /// Run a writing operation.
    pub fn invoke(&mut self, caller: &Principal, function: &str, args: &[String]) -> Result<String> {
        let span = tracing::info_span!("invoke", request_id = %RequestId::new(), caller = %caller, function);
        let _enter = span.enter();
        let result = match function {
            ASSIGN_OWNERSHIP => self.assign_ownership(caller, args),
            TRANSFER_OWNERSHIP => self.transfer_ownership(caller, args),
            _ => Err(unknown(CallKind::Invoke, function)),
        };
        log_rejection(&result);
        result
    }

    /// Run a read-only operation.
    pub fn query(&self, caller: &Principal, function: &str, args: &[String]) -> Result<String> {
        let span = tracing::info_span!("query", request_id = %RequestId::new(), caller = %caller, function);
        let _enter = span.enter();
        let result = match function {
            GET_OWNER_CONTACT_INFORMATION => single_account(function, args)
                .and_then(|account| self.engine.query_contact_info(caller, &account)),
            GET_BALANCE => single_account(function, args)
                .and_then(|account| self.engine.query_balance(caller, &account))
                .map(|(balance, currency)| format!("{balance}{currency}")),
            _ => Err(unknown(CallKind::Query, function)),
        };
        log_rejection(&result);
        result
    }

    /// `[targetIdentity, account, amount, currency]`
    fn assign_ownership(&mut self, caller: &Principal, args: &[String]) -> Result<String> {
        let [identity, account, amount, currency] = args else {
            return Err(arg_count(ASSIGN_OWNERSHIP, 4));
        };
        let amount = parse_amount(ASSIGN_OWNERSHIP, amount)?;
        let currency: Currency = currency.parse()?;
        let account = self.engine.assign(
            caller,
            &AssignRequest {
                identity: identity.clone(),
                account: AccountId::from(account.as_str()),
                contact_info: self.assign_contact_info.clone(),
                amount,
                currency,
            },
        )?;
        Ok(format!(
            "Successfully assigned {} to {identity}'s {} account",
            account.balance_display(),
            account.id
        ))
    }

    /// `[fromIdentity, fromAccount, toIdentity, toAccount, amount, currency]`
    fn transfer_ownership(&mut self, caller: &Principal, args: &[String]) -> Result<String> {
        let [from_identity, from_account, to_identity, to_account, amount, currency] = args else {
            return Err(arg_count(TRANSFER_OWNERSHIP, 6));
        };
        let amount = parse_amount(TRANSFER_OWNERSHIP, amount)?;
        let currency: Currency = currency.parse()?;
        tracing::debug!(%from_identity, %to_identity, "remittance requested");
        self.engine.transfer_ownership(
            caller,
            &AccountId::from(from_account.as_str()),
            &AccountId::from(to_account.as_str()),
            amount,
            currency,
        )?;
        Ok(String::new())
    }

    #[must_use]
    pub fn engine(&self) -> &TransferEngine<S, G> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TransferEngine<S, G> {
        &mut self.engine
    }
}

fn parse_amount(operation: &str, raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| {
        CorrbankError::invalid_argument(
            operation,
            format!("expecting an unsigned integer amount, got {raw:?}"),
        )
    })
}

/// The lone account id of a query.
fn single_account(operation: &str, args: &[String]) -> Result<AccountId> {
    match args {
        [account] => Ok(AccountId::from(account.as_str())),
        _ => Err(arg_count(operation, 1)),
    }
}

fn arg_count(operation: &str, expected: usize) -> CorrbankError {
    CorrbankError::invalid_argument(
        operation,
        format!("incorrect number of arguments, expecting {expected}"),
    )
}

fn unknown(kind: CallKind, function: &str) -> CorrbankError {
    CorrbankError::UnknownOperation {
        kind: kind.as_str(),
        function: function.to_string(),
    }
}

fn log_rejection(result: &Result<String>) {
    if let Err(e) = result {
        tracing::debug!(kind = %e.kind(), error = %e, "request rejected");
    }
}
