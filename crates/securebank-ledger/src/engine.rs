//! The ledger engine
//!
//! Owns nothing but synchronized access: callers (HTTP handlers, CLI menus,
//! agent tool shims) invoke these operations and map the error taxonomy to
//! their own response formats. Every mutating operation emits exactly one
//! audit event, success or failure, to the injected sink.

use chrono::Utc;
use rand::Rng;
use securebank_audit::{AuditEvent, AuditOperation, AuditOutcome, AuditSink, TracingSink};
use securebank_types::{
    Account, AccountId, AccountStatus, AccountSummary, Amount, HistoryPage, LedgerError, Result,
    TransactionEntry, TransactionKind, TransferId, TransferReceipt,
};
use std::sync::Arc;
use tokio::time::timeout;

use crate::config::LedgerConfig;
use crate::password::PasswordService;
use crate::store::{AccountRecord, AccountStore};

/// Range of the numeric account-number suffix (six digits)
const ID_SUFFIX_SPACE: u32 = 1_000_000;

fn outcome_of<T>(result: &Result<T>) -> AuditOutcome {
    match result {
        Ok(_) => AuditOutcome::Success,
        Err(e) => AuditOutcome::Failure {
            code: e.error_code().to_string(),
        },
    }
}

/// The SecureBank ledger engine
///
/// Cheap to clone; clones share the same store, configuration, and audit
/// sink. Safe under arbitrary concurrent invocation: single-account
/// operations hold that account's lock, transfers hold both locks acquired
/// in canonical id order, and every wait is bounded.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<AccountStore>,
    config: Arc<LedgerConfig>,
    passwords: Arc<PasswordService>,
    audit: Arc<dyn AuditSink>,
}

impl Ledger {
    /// Create an engine over a fresh store, with an injected audit sink
    pub fn new(config: LedgerConfig, audit: Arc<dyn AuditSink>) -> Result<Self> {
        Self::with_store(Arc::new(AccountStore::new()), config, audit)
    }

    /// Create an engine over an injected store
    ///
    /// The store is the only shared state; separate stores give fully
    /// isolated ledgers within one process.
    pub fn with_store(
        store: Arc<AccountStore>,
        config: LedgerConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        let passwords = PasswordService::new(config.password.clone())?;
        Ok(Self {
            store,
            config: Arc::new(config),
            passwords: Arc::new(passwords),
            audit,
        })
    }

    /// Create an engine that audits through structured tracing events
    pub fn with_tracing_audit(config: LedgerConfig) -> Result<Self> {
        Self::new(config, Arc::new(TracingSink::new()))
    }

    /// The engine's configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Account lifecycle
    // ------------------------------------------------------------------

    /// Open a new account with the configured opening balance
    ///
    /// Opening creates no transaction entries; history replay starts from
    /// the opening balance.
    pub async fn create_account(
        &self,
        owner_name: &str,
        password: &str,
    ) -> Result<AccountSummary> {
        let result = self.create_account_inner(owner_name, password).await;
        self.audit
            .record(AuditEvent::new(
                AuditOperation::AccountOpened,
                result.as_ref().ok().map(|s| s.id.clone()),
                None,
                Some(self.config.opening_balance),
                outcome_of(&result),
            ))
            .await;
        result
    }

    async fn create_account_inner(
        &self,
        owner_name: &str,
        password: &str,
    ) -> Result<AccountSummary> {
        if owner_name.trim().is_empty() {
            return Err(LedgerError::invalid_input("owner_name", "must not be empty"));
        }
        let credential_hash = self.passwords.hash_password(password)?;

        for _ in 0..self.config.id_retry_limit {
            let suffix = rand::thread_rng().gen_range(0..ID_SUFFIX_SPACE);
            let account = Account {
                id: AccountId::from_suffix(suffix),
                owner_name: owner_name.trim().to_string(),
                credential_hash: credential_hash.clone(),
                balance: self.config.opening_balance,
                created_at: Utc::now(),
                status: AccountStatus::Active,
            };
            let summary = account.summary();
            if self.store.try_insert(account).await {
                return Ok(summary);
            }
        }
        Err(LedgerError::IdGenerationExhausted {
            attempts: self.config.id_retry_limit,
        })
    }

    /// Close an account permanently; history is preserved
    pub async fn close_account(&self, account_id: &AccountId) -> Result<AccountSummary> {
        let result = self.close_account_inner(account_id).await;
        self.audit
            .record(AuditEvent::new(
                AuditOperation::AccountClosed,
                Some(account_id.clone()),
                None,
                None,
                outcome_of(&result),
            ))
            .await;
        result
    }

    async fn close_account_inner(&self, account_id: &AccountId) -> Result<AccountSummary> {
        let mut record = self
            .store
            .lock_one(account_id, self.config.lock_timeout, "close_account")
            .await?;
        ensure_active(&record.account)?;
        record.account.status = AccountStatus::Closed;
        Ok(record.account.summary())
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Check a password against the account's stored credential hash
    ///
    /// Never errors: an unknown account burns a verification against a dummy
    /// hash and returns `false`, indistinguishable from a wrong password.
    pub async fn authenticate(&self, account_id: &AccountId, password: &str) -> bool {
        let stored = match self.store.slot(account_id).await {
            Ok(slot) => match timeout(self.config.lock_timeout, slot.lock_owned()).await {
                Ok(record) => Some(record.account.credential_hash.clone()),
                Err(_) => None,
            },
            Err(_) => None,
        };
        self.passwords.verify_or_burn(password, stored.as_deref())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Current balance of an account
    pub async fn get_balance(&self, account_id: &AccountId) -> Result<Amount> {
        let record = self
            .store
            .lock_one(account_id, self.config.lock_timeout, "get_balance")
            .await?;
        Ok(record.account.balance)
    }

    /// Externally visible account state
    pub async fn get_account(&self, account_id: &AccountId) -> Result<AccountSummary> {
        let record = self
            .store
            .lock_one(account_id, self.config.lock_timeout, "get_account")
            .await?;
        Ok(record.account.summary())
    }

    /// One page of transaction history, newest first
    ///
    /// Pure offset pagination: any page can be re-queried without cursor
    /// state. Taken under the account lock, so a page never shows a
    /// half-applied transfer.
    pub async fn get_history(&self, account_id: &AccountId, page: usize) -> Result<HistoryPage> {
        let record = self
            .store
            .lock_one(account_id, self.config.lock_timeout, "get_history")
            .await?;
        let page_size = self.config.page_size;
        let entries: Vec<TransactionEntry> = record
            .log
            .iter()
            .rev()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();
        Ok(HistoryPage {
            entries,
            page,
            page_size,
            total: record.log.len(),
        })
    }

    /// Sum of all account balances
    ///
    /// Locks accounts one at a time; meaningful as an invariant check when
    /// the ledger is otherwise quiescent.
    pub async fn total_balance(&self) -> Result<Amount> {
        let mut total = Amount::zero();
        for id in self.store.account_ids().await {
            total = total.checked_add(self.get_balance(&id).await?)?;
        }
        Ok(total)
    }

    // ------------------------------------------------------------------
    // Single-account mutations
    // ------------------------------------------------------------------

    /// Credit an account
    pub async fn deposit(
        &self,
        account_id: &AccountId,
        amount: Amount,
    ) -> Result<TransactionEntry> {
        let result = self
            .single_entry(account_id, amount, TransactionKind::Credit, "deposit")
            .await;
        self.audit
            .record(AuditEvent::new(
                AuditOperation::Deposit,
                Some(account_id.clone()),
                None,
                Some(amount),
                outcome_of(&result),
            ))
            .await;
        result
    }

    /// Debit an account; fails rather than overdraw
    pub async fn withdraw(
        &self,
        account_id: &AccountId,
        amount: Amount,
    ) -> Result<TransactionEntry> {
        let result = self
            .single_entry(account_id, amount, TransactionKind::Debit, "withdraw")
            .await;
        self.audit
            .record(AuditEvent::new(
                AuditOperation::Withdrawal,
                Some(account_id.clone()),
                None,
                Some(amount),
                outcome_of(&result),
            ))
            .await;
        result
    }

    async fn single_entry(
        &self,
        account_id: &AccountId,
        amount: Amount,
        kind: TransactionKind,
        operation: &str,
    ) -> Result<TransactionEntry> {
        self.validate_amount(amount)?;
        let mut record = self
            .store
            .lock_one(account_id, self.config.lock_timeout, operation)
            .await?;
        ensure_active(&record.account)?;

        let balance_after = match kind {
            TransactionKind::Credit => record.account.balance.checked_add(amount)?,
            TransactionKind::Debit => {
                if record.account.balance < amount {
                    return Err(LedgerError::InsufficientFunds {
                        account: account_id.to_string(),
                        requested: amount,
                        available: record.account.balance,
                    });
                }
                record.account.balance.checked_sub(amount)?
            }
        };

        let entry = TransactionEntry {
            id: self.store.next_transaction_id(),
            account_id: account_id.clone(),
            kind,
            amount,
            counterparty: None,
            transfer_id: None,
            timestamp: Utc::now(),
            balance_after,
        };
        record.account.balance = balance_after;
        record.log.push(entry.clone());
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Transfers
    // ------------------------------------------------------------------

    /// Atomically move funds between two accounts
    ///
    /// Both accounts are locked in canonical id order with bounded waits;
    /// the sender's balance is re-checked after the locks are held. Either
    /// both entries commit or neither does, and no reader ever observes a
    /// half-applied transfer.
    pub async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        let result = self.transfer_inner(from, to, amount).await;
        self.audit
            .record(AuditEvent::new(
                AuditOperation::Transfer,
                Some(from.clone()),
                Some(to.clone()),
                Some(amount),
                outcome_of(&result),
            ))
            .await;
        result
    }

    async fn transfer_inner(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        self.validate_amount(amount)?;
        if from == to {
            return Err(LedgerError::SameAccount {
                account: from.to_string(),
            });
        }

        let (mut from_record, mut to_record) = self
            .store
            .lock_pair(from, to, self.config.lock_timeout, "transfer")
            .await?;
        ensure_active(&from_record.account)?;
        ensure_active(&to_record.account)?;

        // Commit-time funds check; an earlier advisory balance read may be stale.
        if from_record.account.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.to_string(),
                requested: amount,
                available: from_record.account.balance,
            });
        }

        // Compute both new balances before touching either record, so an
        // overflow on the credit side leaves the store untouched.
        let from_balance = from_record.account.balance.checked_sub(amount)?;
        let to_balance = to_record.account.balance.checked_add(amount)?;

        let transfer_id = TransferId::new();
        let now = Utc::now();
        let debit = TransactionEntry {
            id: self.store.next_transaction_id(),
            account_id: from.clone(),
            kind: TransactionKind::Debit,
            amount,
            counterparty: Some(to.clone()),
            transfer_id: Some(transfer_id.clone()),
            timestamp: now,
            balance_after: from_balance,
        };
        let credit = TransactionEntry {
            id: self.store.next_transaction_id(),
            account_id: to.clone(),
            kind: TransactionKind::Credit,
            amount,
            counterparty: Some(from.clone()),
            transfer_id: Some(transfer_id.clone()),
            timestamp: now,
            balance_after: to_balance,
        };

        apply_entry(&mut from_record, from_balance, debit.clone());
        apply_entry(&mut to_record, to_balance, credit.clone());

        Ok(TransferReceipt {
            transfer_id,
            debit,
            credit,
            from_balance,
            to_balance,
        })
    }

    fn validate_amount(&self, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(LedgerError::invalid_amount("amount must be greater than zero"));
        }
        if amount > self.config.max_amount {
            return Err(LedgerError::invalid_amount(format!(
                "amount exceeds the configured maximum of {}",
                self.config.max_amount
            )));
        }
        Ok(())
    }
}

fn ensure_active(account: &Account) -> Result<()> {
    if !account.status.is_active() {
        return Err(LedgerError::AccountClosed {
            account: account.id.to_string(),
        });
    }
    Ok(())
}

fn apply_entry(record: &mut AccountRecord, balance_after: Amount, entry: TransactionEntry) {
    record.account.balance = balance_after;
    record.log.push(entry);
}
