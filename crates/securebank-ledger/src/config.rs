//! Ledger configuration
//!
//! Plain serde structs with secure defaults. Password-hashing parameters
//! follow the OWASP Argon2id recommendations.

use securebank_types::Amount;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Balance granted when an account is opened (promotional funding)
    pub opening_balance: Amount,
    /// Largest amount a single deposit, withdrawal, or transfer may move
    pub max_amount: Amount,
    /// Bound on waiting for account locks before failing with `LockTimeout`
    #[serde(with = "humantime_serde")]
    pub lock_timeout: Duration,
    /// Attempts at generating a fresh account number before giving up
    pub id_retry_limit: u32,
    /// Entries per history page
    pub page_size: usize,
    /// Password hashing and strength policy
    pub password: PasswordConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            // The original promotional opening balance: $5000.00
            opening_balance: Amount::from_major(5000),
            max_amount: Amount::from_major(1_000_000),
            lock_timeout: Duration::from_secs(2),
            id_retry_limit: 16,
            page_size: 20,
            password: PasswordConfig::default(),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of iterations
    pub time_cost: u32,
    /// Degree of parallelism
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
    /// Optional application-wide pepper appended before hashing
    pub pepper: Option<String>,
    /// Minimum accepted password length
    pub min_password_length: usize,
    /// Maximum accepted password length
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            // OWASP recommended minimums for Argon2id
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            min_password_length: 8,
            max_password_length: 128,
        }
    }
}

impl PasswordConfig {
    /// Deliberately cheap parameters so tests and demos stay fast
    ///
    /// Never use in production.
    pub fn fast_insecure() -> Self {
        Self {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            min_password_length: 8,
            max_password_length: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.opening_balance, Amount::from_minor(500_000));
        assert_eq!(config.password.min_password_length, 8);
        assert!(config.id_retry_limit > 0);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = LedgerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lock_timeout, config.lock_timeout);
        assert_eq!(back.max_amount, config.max_amount);
    }
}
