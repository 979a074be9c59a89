//! SecureBank Audit - audit events for ledger mutations
//!
//! Every mutating ledger operation produces exactly one audit event, success
//! or failure. The sink is an injected collaborator: the engine emits events,
//! it never owns where they go.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use securebank_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The mutating operation an audit event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOperation {
    /// Account opened
    AccountOpened,
    /// Account closed (terminal)
    AccountClosed,
    /// Single-account credit
    Deposit,
    /// Single-account debit
    Withdrawal,
    /// Two-account atomic transfer
    Transfer,
}

impl AuditOperation {
    /// Short name used in structured log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountOpened => "account_opened",
            Self::AccountClosed => "account_closed",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }
}

/// Outcome of the audited operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    /// Operation committed
    Success,
    /// Operation rejected; carries the stable error code
    Failure { code: String },
}

impl AuditOutcome {
    /// Check whether this records a committed operation
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
    /// Which operation ran
    pub operation: AuditOperation,
    /// Primary account (sender, for transfers); `None` when account creation
    /// failed before an id existed
    pub account_id: Option<AccountId>,
    /// Recipient account for transfers
    pub counterparty: Option<AccountId>,
    /// Amount involved, where the operation carries one
    pub amount: Option<Amount>,
    /// Success or the failure code
    pub outcome: AuditOutcome,
}

impl AuditEvent {
    /// Build an event for an operation that just completed
    pub fn new(
        operation: AuditOperation,
        account_id: Option<AccountId>,
        counterparty: Option<AccountId>,
        amount: Option<Amount>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            account_id,
            counterparty,
            amount,
            outcome,
        }
    }
}

/// Destination for audit events
///
/// Implementations must not fail the ledger operation they describe; a sink
/// that cannot record an event handles that condition itself.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event
    async fn record(&self, event: AuditEvent);
}

/// Sink that emits one structured `tracing` event per audit record
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingSink {
    async fn record(&self, event: AuditEvent) {
        let amount = event.amount.map(|a| a.to_string());
        let account = event.account_id.as_ref().map(|a| a.masked());
        let counterparty = event.counterparty.as_ref().map(|c| c.masked());
        match &event.outcome {
            AuditOutcome::Success => {
                tracing::info!(
                    operation = event.operation.as_str(),
                    account = account.as_deref(),
                    counterparty = counterparty.as_deref(),
                    amount = amount.as_deref(),
                    "ledger operation committed"
                );
            }
            AuditOutcome::Failure { code } => {
                tracing::warn!(
                    operation = event.operation.as_str(),
                    account = account.as_deref(),
                    counterparty = counterparty.as_deref(),
                    amount = amount.as_deref(),
                    error_code = %code,
                    "ledger operation rejected"
                );
            }
        }
    }
}

/// In-memory sink for tests and reconciliation
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in emission order
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }

    /// Events touching the given account, as primary or counterparty
    pub async fn for_account(&self, account_id: &AccountId) -> Vec<AuditEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| {
                e.account_id.as_ref() == Some(account_id)
                    || e.counterparty.as_ref() == Some(account_id)
            })
            .cloned()
            .collect()
    }

    /// Number of recorded events
    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    /// Whether no events were recorded
    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn record(&self, event: AuditEvent) {
        self.events.lock().await.push(event);
    }
}
