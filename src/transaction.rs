//! Update requests and the transaction records they leave behind.

use crate::calculator::Operation;
use crate::error::{Result, WalletError};
use serde::{Deserialize, Serialize};

/// A single balance update, as received from the host.
///
/// The amount is kept as the literal the caller sent; it is only parsed by
/// the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub operation: Operation,
    pub user: String,
    pub currency: String,
    pub amount: String,
}

impl UpdateRequest {
    /// Number of positional arguments an update needs.
    pub const ARG_COUNT: usize = 4;

    /// Builds a request from `[operation, user, currency, amount]`.
    ///
    /// Arguments past the fourth are ignored. Fields are trimmed.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() < Self::ARG_COUNT {
            return Err(WalletError::ArgumentCount {
                expected: Self::ARG_COUNT,
                got: args.len(),
            });
        }

        Ok(UpdateRequest {
            operation: args[0].as_ref().parse()?,
            user: args[1].as_ref().trim().to_string(),
            currency: args[2].as_ref().trim().to_string(),
            amount: args[3].as_ref().trim().to_string(),
        })
    }
}

/// Immutable audit entry for one successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub operation: String,
    pub user: String,
    pub currency: String,
    pub amount: String,
}

impl From<&UpdateRequest> for TransactionRecord {
    fn from(request: &UpdateRequest) -> Self {
        TransactionRecord {
            operation: request.operation.as_str().to_string(),
            user: request.user.clone(),
            currency: request.currency.clone(),
            amount: request.amount.clone(),
        }
    }
}

/// A transaction record together with the sequence id the log assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedTransaction {
    pub tx_id: u64,

    #[serde(flatten)]
    pub record: TransactionRecord,
}

impl RecordedTransaction {
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
