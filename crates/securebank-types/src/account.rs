//! Account records and lifecycle status

use crate::{AccountId, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an account
///
/// `Active -> Closed` is the only transition and it is terminal. Closed
/// accounts reject every mutation but keep their history for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Open for all operations
    Active,
    /// Permanently closed; history preserved, mutations rejected
    Closed,
}

impl AccountStatus {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Check if mutations are allowed
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// The full account record as the engine stores it
///
/// Holds the credential hash; never hand this across the engine boundary,
/// use [`AccountSummary`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique, immutable account number
    pub id: AccountId,
    /// Owner's display name
    pub owner_name: String,
    /// Salted Argon2id hash of the account password (PHC string format)
    pub credential_hash: String,
    /// Current balance in minor units
    pub balance: Amount,
    /// When the account was opened
    pub created_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: AccountStatus,
}

impl Account {
    /// The externally visible view of this account
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            owner_name: self.owner_name.clone(),
            balance: self.balance,
            created_at: self.created_at,
            status: self.status,
        }
    }
}

/// Externally visible account state (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Unique account number
    pub id: AccountId,
    /// Owner's display name
    pub owner_name: String,
    /// Current balance in minor units
    pub balance: Amount,
    /// When the account was opened
    pub created_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(AccountStatus::Active.is_active());
        assert!(!AccountStatus::Active.is_terminal());
        assert!(AccountStatus::Closed.is_terminal());
        assert!(!AccountStatus::Closed.is_active());
    }

    #[test]
    fn test_summary_drops_credentials() {
        let account = Account {
            id: AccountId::from_suffix(1),
            owner_name: "Asha".to_string(),
            credential_hash: "$argon2id$...".to_string(),
            balance: Amount::from_major(50),
            created_at: Utc::now(),
            status: AccountStatus::Active,
        };
        let summary = account.summary();
        assert_eq!(summary.id, account.id);
        assert_eq!(summary.balance, account.balance);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
