//! Error types for wallet updates and the ledger collaborators.

use thiserror::Error;

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Failure reported by a ledger capability (state store or transaction log).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store refused or failed the request
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record could not be encoded for the log
    #[error("record encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Why an amount literal or stored balance was refused.
#[derive(Error, Debug)]
pub enum AmountError {
    /// Not a decimal literal at all
    #[error("{0}")]
    Malformed(#[from] rust_decimal::Error),

    /// More fractional digits than an amount can hold
    #[error("more than {max} decimal places")]
    TooPrecise { max: u32 },

    #[error("magnitude exceeds the maximum amount {max}")]
    OutOfRange { max: String },
}

/// Failure while applying a [`crate::ledger::Staged`] write set.
///
/// State writes are applied before records, so a `Record` failure means the
/// inner ledger already holds the new state.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("state write failed: {0}")]
    State(#[source] StoreError),

    #[error("transaction record failed: {0}")]
    Record(#[source] StoreError),
}

impl CommitError {
    /// Maps to the pipeline error for the stage that failed.
    pub fn into_wallet_error(self, user: &str) -> WalletError {
        match self {
            CommitError::State(source) => WalletError::StateWrite {
                user: user.to_string(),
                source,
            },
            CommitError::Record(source) => WalletError::TransactionRecord {
                user: user.to_string(),
                source,
            },
        }
    }
}

/// Errors that abort a wallet update.
///
/// Every variant is terminal for the invocation that produced it.
#[derive(Error, Debug)]
pub enum WalletError {
    /// Fewer than `[operation, user, currency, amount]` were supplied
    #[error("Not enough arguments: expected {expected}, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    /// Operation keyword is neither deposit nor withdrawal
    #[error("Unknown operation '{0}': expected 'deposit' or 'withdrawal'")]
    UnknownOperation(String),

    #[error("Get current balance error for '{user}': {source}")]
    StateRead {
        user: String,
        #[source]
        source: StoreError,
    },

    /// Persisted wallet state is not a valid currency to balance mapping
    #[error("Parse current balance error for '{user}': {message}")]
    Decode { user: String, message: String },

    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    /// Sign is carried by the operation, never by the literal
    #[error("Negative amount '{0}' is not allowed")]
    NegativeAmount(String),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: String, requested: String },

    #[error("Encode wallet state error for '{user}': {source}")]
    Encode {
        user: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Save balance error for '{user}': {source}")]
    StateWrite {
        user: String,
        #[source]
        source: StoreError,
    },

    #[error("Save transaction error for '{user}': {source}")]
    TransactionRecord {
        user: String,
        #[source]
        source: StoreError,
    },

    /// A transaction log entry could not be encoded for output
    #[error("Encode transaction log error: {0}")]
    LogEncode(#[source] serde_json::Error),

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: wallet-ledger <updates.csv> [transactions.jsonl]")]
    MissingArgument,
}

impl WalletError {
    /// Returns `true` for rejections caused by the request itself rather
    /// than by the store or the host.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            WalletError::UnknownOperation(_)
                | WalletError::InvalidAmount { .. }
                | WalletError::NegativeAmount(_)
                | WalletError::InsufficientFunds { .. }
        )
    }
}
