//! SecureBank Ledger - concurrency-safe ledger engine
//!
//! The ledger is:
//! - Account-keyed by `AccountId` ("SBI" plus six digits)
//! - Integer-only (amounts are minor units, never floating point)
//! - Append-only (per-account logs are never mutated or reordered)
//! - Audited (every mutating operation emits one event to an injected sink)
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. A transfer applies to both accounts or to neither
//! 3. Total money is conserved by every transfer
//! 4. Multi-account locks are acquired in canonical id order, with bounded waits

pub mod config;
pub mod engine;
pub mod password;
pub mod store;

pub use config::{LedgerConfig, PasswordConfig};
pub use engine::Ledger;
pub use password::PasswordService;
pub use store::{AccountRecord, AccountStore};

pub use securebank_types as types;
