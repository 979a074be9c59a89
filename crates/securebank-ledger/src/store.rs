//! The account store
//!
//! An explicit store object owning all shared state behind a synchronization
//! boundary; it is injected into the engine, never ambient. The outer
//! registry maps account ids to per-account records, each behind its own
//! mutex. One lock per account covers the balance and the append-only log
//! together, so a history read and the balance it implies can never disagree.
//!
//! Two-account operations must acquire locks through [`AccountStore::lock_pair`],
//! which always locks in ascending account-id order regardless of argument
//! order. All acquisitions are bounded; a wait past the deadline surfaces as
//! `LedgerError::LockTimeout` instead of hanging the caller.

use securebank_types::{Account, AccountId, LedgerError, Result, TransactionEntry, TransactionId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::timeout;

/// An account together with its append-only transaction log
#[derive(Debug)]
pub struct AccountRecord {
    /// The account state
    pub account: Account,
    /// Append-only log, oldest first
    pub log: Vec<TransactionEntry>,
}

impl AccountRecord {
    fn new(account: Account) -> Self {
        Self {
            account,
            log: Vec::new(),
        }
    }
}

/// Shared, synchronized account storage
pub struct AccountStore {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<AccountRecord>>>>,
    next_transaction: AtomicU64,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_transaction: AtomicU64::new(1),
        }
    }

    /// Draw the next id from the global transaction sequence
    pub fn next_transaction_id(&self) -> TransactionId {
        TransactionId(self.next_transaction.fetch_add(1, Ordering::Relaxed))
    }

    /// Insert a new account; returns `false` if the id is already taken
    pub async fn try_insert(&self, account: Account) -> bool {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return false;
        }
        let id = account.id.clone();
        accounts.insert(id, Arc::new(Mutex::new(AccountRecord::new(account))));
        true
    }

    /// Look up the slot for an account
    pub async fn slot(&self, id: &AccountId) -> Result<Arc<Mutex<AccountRecord>>> {
        self.accounts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found(id))
    }

    /// Lock a single account record, waiting at most `wait`
    pub async fn lock_one(
        &self,
        id: &AccountId,
        wait: Duration,
        operation: &str,
    ) -> Result<OwnedMutexGuard<AccountRecord>> {
        let slot = self.slot(id).await?;
        timeout(wait, slot.lock_owned())
            .await
            .map_err(|_| LedgerError::LockTimeout {
                operation: operation.to_string(),
            })
    }

    /// Lock two distinct account records, waiting at most `wait` per lock
    ///
    /// Acquisition is always in ascending id order, whatever order the
    /// arguments arrive in, so concurrent opposite-direction pairs cannot
    /// form a circular wait. Guards are returned in argument order.
    pub async fn lock_pair(
        &self,
        a: &AccountId,
        b: &AccountId,
        wait: Duration,
        operation: &str,
    ) -> Result<(OwnedMutexGuard<AccountRecord>, OwnedMutexGuard<AccountRecord>)> {
        debug_assert_ne!(a, b, "lock_pair requires distinct accounts");

        // Resolve both slots before locking either; a missing account fails
        // the whole operation up front.
        let (slot_a, slot_b) = {
            let accounts = self.accounts.read().await;
            let slot_a = accounts
                .get(a)
                .cloned()
                .ok_or_else(|| LedgerError::not_found(a))?;
            let slot_b = accounts
                .get(b)
                .cloned()
                .ok_or_else(|| LedgerError::not_found(b))?;
            (slot_a, slot_b)
        };

        let a_first = a < b;
        let (first, second) = if a_first {
            (slot_a, slot_b)
        } else {
            (slot_b, slot_a)
        };

        let busy = || LedgerError::LockTimeout {
            operation: operation.to_string(),
        };
        let first_guard = timeout(wait, first.lock_owned()).await.map_err(|_| busy())?;
        // If this times out, dropping first_guard releases the held lock.
        let second_guard = timeout(wait, second.lock_owned())
            .await
            .map_err(|_| busy())?;

        if a_first {
            Ok((first_guard, second_guard))
        } else {
            Ok((second_guard, first_guard))
        }
    }

    /// All account ids currently in the store
    pub async fn account_ids(&self) -> Vec<AccountId> {
        self.accounts.read().await.keys().cloned().collect()
    }

    /// Number of accounts in the store
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether the store holds no accounts
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use securebank_types::{AccountStatus, Amount};

    fn test_account(suffix: u32) -> Account {
        Account {
            id: AccountId::from_suffix(suffix),
            owner_name: "Test".to_string(),
            credential_hash: String::new(),
            balance: Amount::from_major(100),
            created_at: Utc::now(),
            status: AccountStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_insert_detects_collision() {
        let store = AccountStore::new();
        assert!(store.try_insert(test_account(1)).await);
        assert!(!store.try_insert(test_account(1)).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let store = AccountStore::new();
        let err = store.slot(&AccountId::from_suffix(42)).await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { .. }));
    }

    #[tokio::test]
    async fn test_transaction_ids_are_monotonic() {
        let store = AccountStore::new();
        let a = store.next_transaction_id();
        let b = store.next_transaction_id();
        assert!(a < b);
    }

    #[tokio::test]
    async fn test_lock_pair_returns_argument_order() {
        let store = AccountStore::new();
        store.try_insert(test_account(1)).await;
        store.try_insert(test_account(2)).await;

        let lo = AccountId::from_suffix(1);
        let hi = AccountId::from_suffix(2);

        let (g_hi, g_lo) = store
            .lock_pair(&hi, &lo, Duration::from_secs(1), "test")
            .await
            .unwrap();
        assert_eq!(g_hi.account.id, hi);
        assert_eq!(g_lo.account.id, lo);
    }

    #[tokio::test]
    async fn test_lock_one_times_out_instead_of_hanging() {
        let store = AccountStore::new();
        store.try_insert(test_account(1)).await;
        let id = AccountId::from_suffix(1);

        let held = store
            .lock_one(&id, Duration::from_secs(1), "holder")
            .await
            .unwrap();

        let err = store
            .lock_one(&id, Duration::from_millis(50), "waiter")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::LockTimeout { .. }));
        assert!(err.is_retriable());

        drop(held);
        assert!(store.lock_one(&id, Duration::from_secs(1), "retry").await.is_ok());
    }
}
