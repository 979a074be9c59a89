//! SecureBank Types - Canonical domain types for the ledger engine
//!
//! This crate contains all foundational types for the SecureBank ledger with
//! zero dependencies on other securebank crates:
//!
//! - Identity types (AccountId, TransactionId, TransferId)
//! - Fixed-point amounts in integer minor units
//! - Account records and their lifecycle status
//! - Transaction entries, history pages, and transfer receipts
//! - The ledger error taxonomy
//!
//! # Architectural Invariants
//!
//! These types support the core ledger invariants:
//!
//! 1. Balances are integer minor units, never floating point
//! 2. An account's balance equals its opening balance plus credits minus debits
//! 3. Transaction logs are append-only and never reordered
//! 4. A transfer is two entries (one debit, one credit) sharing a TransferId

pub mod account;
pub mod amount;
pub mod error;
pub mod id;
pub mod transaction;

pub use account::*;
pub use amount::*;
pub use error::*;
pub use id::*;
pub use transaction::*;
