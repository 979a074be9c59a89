//! Transaction entries, history pages, and transfer receipts
//!
//! Every balance change is recorded as one entry; a transfer is exactly two
//! entries (a debit on the sender, a credit on the recipient) sharing a
//! [`TransferId`]. Per-account logs are append-only.

use crate::{AccountId, Amount, TransactionId, TransferId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a ledger entry relative to its owning account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Balance decrease
    Debit,
    /// Balance increase
    Credit,
}

/// A single, immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// Globally unique, monotonically increasing id
    pub id: TransactionId,
    /// The account this entry belongs to
    pub account_id: AccountId,
    /// Debit or credit
    pub kind: TransactionKind,
    /// Positive amount moved
    pub amount: Amount,
    /// The other side of a transfer; `None` for deposits and withdrawals
    pub counterparty: Option<AccountId>,
    /// Shared by both legs of a transfer; `None` for single-account entries
    pub transfer_id: Option<TransferId>,
    /// When the entry was committed
    pub timestamp: DateTime<Utc>,
    /// The owning account's balance immediately after this entry
    pub balance_after: Amount,
}

/// One page of an account's transaction history, newest first
///
/// Pagination is pure offset arithmetic over the append-only log, so any page
/// can be re-queried without server-side cursor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Entries on this page, newest first
    pub entries: Vec<TransactionEntry>,
    /// Zero-based page index that was requested
    pub page: usize,
    /// Page size used for the query
    pub page_size: usize,
    /// Total entries in the account's log
    pub total: usize,
}

impl HistoryPage {
    /// Whether a later page exists
    pub fn has_next(&self) -> bool {
        (self.page + 1) * self.page_size < self.total
    }
}

/// The result of a successful transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Correlation id shared by both entries
    pub transfer_id: TransferId,
    /// The sender's debit entry
    pub debit: TransactionEntry,
    /// The recipient's credit entry
    pub credit: TransactionEntry,
    /// Sender balance after the transfer
    pub from_balance: Amount,
    /// Recipient balance after the transfer
    pub to_balance: Amount,
}
