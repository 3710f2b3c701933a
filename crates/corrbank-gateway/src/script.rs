//! Scripted calls: a JSON array of steps replayed against one ledger.
//!
//! ```json
//! [
//!   { "caller": "bank_a_issuer", "kind": "invoke", "function": "assignOwnership",
//!     "args": ["alice", "11111-00004", "10000", "KZT"] },
//!   { "caller": "bob", "kind": "query", "function": "getBalance", "args": ["22222-00004"] }
//! ]
//! ```
//!
//! A failing step is recorded and the script moves on.

use corrbank_ledger::TableStore;
use corrbank_settlement::AuthorizationGate;
use corrbank_types::{Principal, Result};
use serde::{Deserialize, Serialize};

use crate::router::{CallKind, RequestRouter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub caller: String,
    pub kind: CallKind,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Result of one step, shaped for printing as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl StepOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse a script document.
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

/// Run every step in order.
pub fn run_script<S: TableStore, G: AuthorizationGate>(
    router: &mut RequestRouter<S, G>,
    steps: &[ScriptStep],
) -> Vec<StepOutcome> {
    steps
        .iter()
        .enumerate()
        .map(|(step, s)| {
            let caller = Principal::new(s.caller.clone());
            match router.call(s.kind, &caller, &s.function, &s.args) {
                Ok(result) => StepOutcome {
                    step,
                    function: s.function.clone(),
                    result: Some(result),
                    error: None,
                    error_kind: None,
                },
                Err(e) => StepOutcome {
                    step,
                    function: s.function.clone(),
                    result: None,
                    error: Some(e.to_string()),
                    error_kind: Some(e.kind().to_string()),
                },
            }
        })
        .collect()
}
