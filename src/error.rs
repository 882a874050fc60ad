use std::fmt;
use thiserror::Error;

/// Which side of an instruction an account plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    /// The account being debited (the signer).
    Debtor,
    /// The account being credited by a transfer.
    Creditor,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Debtor => f.write_str("debtor"),
            AccountRole::Creditor => f.write_str("creditor"),
        }
    }
}

/// Reasons an instruction is rejected. Every variant is terminal: the
/// instruction is dropped and nothing has been written to ledger state.
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("payload is not valid UTF-8")]
    MalformedPayload,
    #[error("signer public key is missing")]
    MissingSigner,
    #[error(
        "payload has {found} field(s); deposit and withdraw take 2, transfer takes 3"
    )]
    InvalidArgumentCount { found: usize },
    #[error("amount {0:?} is not a positive integer")]
    MalformedAmount(String),
    #[error("unsupported operation {0:?}")]
    UnsupportedOperation(String),
    #[error("transfer counterparty key is empty")]
    EmptyCounterparty,
    #[error("cannot transfer to the signer's own account")]
    SelfTransfer,
    #[error("{role} account {address} does not exist")]
    AccountNotFound { role: AccountRole, address: String },
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { available: u64, requested: u64 },
    #[error("balance of account {address} would overflow")]
    BalanceOverflow { address: String },
    #[error("stored balance at {address} is not a decimal integer")]
    CorruptBalance { address: String },
    #[error("state access error: {0}")]
    StateAccess(#[from] std::io::Error),
}

/// Errors raised while driving the handler from the outside: reading
/// instruction files or writing reports.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = OperationError> = std::result::Result<T, E>;
