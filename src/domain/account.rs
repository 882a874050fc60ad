use crate::error::OperationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The balance held by an account.
///
/// Stored in ledger state as a UTF-8 decimal string. Arithmetic is checked
/// so that a balance can never go negative or wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(pub u64);

/// A strictly positive amount carried by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self, OperationError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(OperationError::MalformedAmount(value.to_string()))
        }
    }

    /// Parses the amount field of a payload. Only plain ASCII digits are
    /// accepted, so a parsed amount always encodes back to the same text
    /// (leading zeros aside).
    pub fn parse(field: &str) -> Result<Self, OperationError> {
        let malformed = || OperationError::MalformedAmount(field.to_string());
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let value = field.parse::<u64>().map_err(|_| malformed())?;
        Self::new(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn checked_credit(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.0).map(Self)
    }

    pub fn checked_debit(self, amount: Amount) -> Option<Self> {
        self.0.checked_sub(amount.0).map(Self)
    }

    /// Serialized form written to ledger state.
    pub fn encode(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }

    /// Decodes a value read from ledger state at `address`.
    pub fn decode(address: &str, bytes: &[u8]) -> Result<Self, OperationError> {
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| OperationError::CorruptBalance {
                address: address.to_string(),
            })
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Current state of one account, as reported back to callers.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct AccountBalance {
    /// Public key that owns the account.
    pub key: String,
    /// Ledger address derived from `key`.
    pub address: String,
    pub balance: Balance,
}
