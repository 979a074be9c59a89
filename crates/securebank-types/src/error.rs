//! Error types for the ledger
//!
//! All failures are explicit values returned to the caller. The engine never
//! leaves the store violating the balance invariant: errors occur strictly
//! before or after the atomic section of an operation.

use crate::Amount;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger error taxonomy
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Malformed or missing required field
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Referenced account does not exist
    #[error("Account {account} not found")]
    AccountNotFound { account: String },

    /// Transfer source and destination are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount { account: String },

    /// Amount is zero, exceeds the configured maximum, or is malformed
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Sender balance below the requested amount at commit time
    #[error("Insufficient funds in {account}: requested {requested}, available {available}")]
    InsufficientFunds {
        account: String,
        requested: Amount,
        available: Amount,
    },

    /// Mutation attempted on a closed account
    #[error("Account {account} is closed")]
    AccountClosed { account: String },

    /// Could not generate a unique account id within the retry bound
    #[error("Account id generation exhausted after {attempts} attempts")]
    IdGenerationExhausted { attempts: u32 },

    /// Could not acquire the required locks within the bound; retriable
    #[error("Ledger busy: could not lock accounts for {operation} in time")]
    LockTimeout { operation: String },

    /// Amount overflow during arithmetic
    #[error("Amount overflow during arithmetic operation")]
    AmountOverflow,

    /// Amount underflow during arithmetic
    #[error("Amount underflow during arithmetic operation")]
    AmountUnderflow,

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LedgerError {
    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    /// Create an account-not-found error
    pub fn not_found(account: impl ToString) -> Self {
        Self::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if the caller may simply retry this operation
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::LockTimeout { .. } | Self::Internal { .. })
    }

    /// Stable machine-readable code for API responses and audit events
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::SameAccount { .. } => "SAME_ACCOUNT",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::AccountClosed { .. } => "ACCOUNT_CLOSED",
            Self::IdGenerationExhausted { .. } => "ID_GENERATION_EXHAUSTED",
            Self::LockTimeout { .. } => "LOCK_TIMEOUT",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::AmountUnderflow => "AMOUNT_UNDERFLOW",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = LedgerError::InsufficientFunds {
            account: "SBI000001".to_string(),
            requested: Amount::from_minor(200),
            available: Amount::from_minor(100),
        };
        assert_eq!(err.error_code(), "INSUFFICIENT_FUNDS");
    }

    #[test]
    fn test_retriable_errors() {
        let busy = LedgerError::LockTimeout {
            operation: "transfer".to_string(),
        };
        assert!(busy.is_retriable());

        let not_found = LedgerError::not_found("SBI000001");
        assert!(!not_found.is_retriable());
    }

    #[test]
    fn test_display_includes_amounts() {
        let err = LedgerError::InsufficientFunds {
            account: "SBI000001".to_string(),
            requested: Amount::from_minor(2000),
            available: Amount::from_minor(1500),
        };
        let msg = err.to_string();
        assert!(msg.contains("$20.00"));
        assert!(msg.contains("$15.00"));
    }
}
