//! Identity types for the ledger
//!
//! All identifiers are strongly typed wrappers to prevent accidental mixing.
//! `AccountId` derives `Ord`: the engine sorts account ids to fix its lock
//! acquisition order, so the ordering is part of the contract.

use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix carried by every account number
pub const ACCOUNT_ID_PREFIX: &str = "SBI";

/// Digits in the numeric suffix of an account number
pub const ACCOUNT_ID_DIGITS: usize = 6;

/// Unique identifier for an account: `"SBI"` followed by six decimal digits
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Validate and wrap an account number
    pub fn parse(s: &str) -> Result<Self> {
        let suffix = s
            .strip_prefix(ACCOUNT_ID_PREFIX)
            .ok_or_else(|| LedgerError::invalid_input("account_id", "missing SBI prefix"))?;
        if suffix.len() != ACCOUNT_ID_DIGITS || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::invalid_input(
                "account_id",
                "suffix must be exactly six digits",
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Build an account id from a numeric suffix (caller guarantees range)
    pub fn from_suffix(suffix: u32) -> Self {
        Self(format!(
            "{ACCOUNT_ID_PREFIX}{suffix:0width$}",
            width = ACCOUNT_ID_DIGITS
        ))
    }

    /// The account number as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for logs and user-facing messages, e.g. `****3421`
    pub fn masked(&self) -> String {
        let tail: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{tail}")
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Unique, monotonically increasing identifier for a transaction entry
///
/// Assigned from a single global sequence, so comparing two ids gives their
/// commit order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn_{}", self.0)
    }
}

/// Correlation identifier shared by the two entries of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(pub Uuid);

impl TransferId {
    /// Create a new random transfer id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xfer_{}", self.0)
    }
}
