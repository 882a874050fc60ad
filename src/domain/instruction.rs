use super::account::Amount;
use super::address::derive_address;
use crate::error::{OperationError, Result};
use std::fmt;
use std::str::FromStr;

/// Separator between payload fields.
pub const FIELD_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Withdraw,
    Transfer,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
            Operation::Transfer => "transfer",
        }
    }

    /// Number of payload fields, operation name included.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Deposit | Operation::Withdraw => 2,
            Operation::Transfer => 3,
        }
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deposit" => Ok(Operation::Deposit),
            "withdraw" => Ok(Operation::Withdraw),
            "transfer" => Ok(Operation::Transfer),
            other => Err(OperationError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed instruction.
///
/// The debtor is never part of the instruction: it is always the signer
/// supplied by the runtime alongside the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Deposit { amount: Amount },
    Withdraw { amount: Amount },
    Transfer { amount: Amount, to: String },
}

impl Instruction {
    /// Parses a `operation,amount[,counterparty]` payload.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload).map_err(|_| OperationError::MalformedPayload)?;
        let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();

        if !(2..=3).contains(&fields.len()) {
            return Err(OperationError::InvalidArgumentCount {
                found: fields.len(),
            });
        }

        let operation: Operation = fields[0].parse()?;
        if fields.len() != operation.arity() {
            return Err(OperationError::InvalidArgumentCount {
                found: fields.len(),
            });
        }

        let amount = Amount::parse(fields[1])?;

        Ok(match operation {
            Operation::Deposit => Instruction::Deposit { amount },
            Operation::Withdraw => Instruction::Withdraw { amount },
            Operation::Transfer => {
                let to = fields[2];
                if to.is_empty() {
                    return Err(OperationError::EmptyCounterparty);
                }
                Instruction::Transfer {
                    amount,
                    to: to.to_string(),
                }
            }
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            Instruction::Deposit { .. } => Operation::Deposit,
            Instruction::Withdraw { .. } => Operation::Withdraw,
            Instruction::Transfer { .. } => Operation::Transfer,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Instruction::Deposit { amount }
            | Instruction::Withdraw { amount }
            | Instruction::Transfer { amount, .. } => *amount,
        }
    }

    /// Key credited by a transfer; `None` for single-account operations.
    pub fn counterparty(&self) -> Option<&str> {
        match self {
            Instruction::Transfer { to, .. } => Some(to),
            Instruction::Deposit { .. } | Instruction::Withdraw { .. } => None,
        }
    }

    /// Serializes the instruction into the payload `parse` accepts.
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = format!("{}{}{}", self.operation(), FIELD_DELIMITER, self.amount());
        if let Instruction::Transfer { to, .. } = self {
            payload.push(FIELD_DELIMITER);
            payload.push_str(to);
        }
        payload.into_bytes()
    }

    /// Addresses this instruction reads and writes when signed by `signer`.
    ///
    /// Clients declare these to the runtime so it can schedule conflicting
    /// instructions and restrict state access.
    pub fn addresses(&self, signer: &str, namespace: &str) -> Vec<String> {
        let mut addresses = vec![derive_address(signer, namespace)];
        if let Instruction::Transfer { to, .. } = self {
            let to_address = derive_address(to, namespace);
            if to_address != addresses[0] {
                addresses.push(to_address);
            }
        }
        addresses
    }
}

/// A raw payload together with the public key of its signer, as handed to
/// a handler by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub signer: String,
    pub payload: Vec<u8>,
}

impl Submission {
    pub fn new(signer: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            signer: signer.into(),
            payload: payload.into(),
        }
    }
}
