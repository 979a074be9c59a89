//! End-to-end scenarios over the public engine surface

use securebank_audit::MemorySink;
use securebank_ledger::types::{
    Amount, LedgerError, TransactionKind,
};
use securebank_ledger::{Ledger, LedgerConfig, PasswordConfig};
use std::sync::Arc;

fn ledger_with_opening(opening: Amount) -> Ledger {
    let config = LedgerConfig {
        opening_balance: opening,
        password: PasswordConfig::fast_insecure(),
        ..LedgerConfig::default()
    };
    Ledger::new(config, Arc::new(MemorySink::new())).unwrap()
}

#[tokio::test]
async fn funded_transfer_updates_both_sides() {
    // Accounts start empty; A is funded with 5000 minor units, then sends 1500 to B.
    let ledger = ledger_with_opening(Amount::zero());
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();
    let b = ledger.create_account("Birgit", "a strong password").await.unwrap();

    ledger.deposit(&a.id, Amount::from_minor(5000)).await.unwrap();

    let receipt = ledger
        .transfer(&a.id, &b.id, Amount::from_minor(1500))
        .await
        .unwrap();

    assert_eq!(receipt.from_balance, Amount::from_minor(3500));
    assert_eq!(receipt.to_balance, Amount::from_minor(1500));
    assert_eq!(ledger.get_balance(&a.id).await.unwrap(), Amount::from_minor(3500));
    assert_eq!(ledger.get_balance(&b.id).await.unwrap(), Amount::from_minor(1500));

    // Two entries sharing one transfer id, with correct balance_after snapshots
    assert_eq!(receipt.debit.transfer_id, receipt.credit.transfer_id);
    assert_eq!(receipt.debit.kind, TransactionKind::Debit);
    assert_eq!(receipt.credit.kind, TransactionKind::Credit);
    assert_eq!(receipt.debit.balance_after, Amount::from_minor(3500));
    assert_eq!(receipt.credit.balance_after, Amount::from_minor(1500));
    assert_eq!(receipt.debit.counterparty.as_ref(), Some(&b.id));
    assert_eq!(receipt.credit.counterparty.as_ref(), Some(&a.id));

    // Each account sees exactly its own leg
    let a_history = ledger.get_history(&a.id, 0).await.unwrap();
    assert_eq!(a_history.entries[0].id, receipt.debit.id);
    let b_history = ledger.get_history(&b.id, 0).await.unwrap();
    assert_eq!(b_history.entries[0].id, receipt.credit.id);
}

#[tokio::test]
async fn zero_amount_transfer_is_rejected() {
    let ledger = ledger_with_opening(Amount::from_major(100));
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();
    let b = ledger.create_account("Birgit", "a strong password").await.unwrap();

    let err = ledger.transfer(&a.id, &b.id, Amount::zero()).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount { .. }));

    assert_eq!(ledger.get_balance(&a.id).await.unwrap(), Amount::from_major(100));
    assert_eq!(ledger.get_balance(&b.id).await.unwrap(), Amount::from_major(100));
}

#[tokio::test]
async fn self_transfer_is_rejected() {
    let ledger = ledger_with_opening(Amount::from_major(100));
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();

    let err = ledger
        .transfer(&a.id, &a.id, Amount::from_major(10))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SameAccount { .. }));
    assert_eq!(ledger.get_balance(&a.id).await.unwrap(), Amount::from_major(100));
}

#[tokio::test]
async fn overdraft_transfer_leaves_no_trace() {
    let ledger = ledger_with_opening(Amount::from_major(100));
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();
    let b = ledger.create_account("Birgit", "a strong password").await.unwrap();

    let err = ledger
        .transfer(&a.id, &b.id, Amount::from_major(101))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

    // No entries were created and balances are untouched
    assert_eq!(ledger.get_history(&a.id, 0).await.unwrap().total, 0);
    assert_eq!(ledger.get_history(&b.id, 0).await.unwrap().total, 0);
    assert_eq!(ledger.get_balance(&a.id).await.unwrap(), Amount::from_major(100));
    assert_eq!(ledger.get_balance(&b.id).await.unwrap(), Amount::from_major(100));
}

#[tokio::test]
async fn transfer_to_closed_account_is_rejected() {
    let ledger = ledger_with_opening(Amount::from_major(100));
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();
    let b = ledger.create_account("Birgit", "a strong password").await.unwrap();

    ledger.close_account(&b.id).await.unwrap();

    let err = ledger
        .transfer(&a.id, &b.id, Amount::from_major(10))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountClosed { .. }));
    assert_eq!(ledger.get_balance(&a.id).await.unwrap(), Amount::from_major(100));
}

#[tokio::test]
async fn transfer_to_missing_account_is_rejected() {
    let ledger = ledger_with_opening(Amount::from_major(100));
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();

    let ghost = "SBI000000".parse().unwrap();
    let err = ledger.transfer(&a.id, &ghost, Amount::from_major(10)).await;
    match err {
        Err(LedgerError::AccountNotFound { .. }) => {}
        other => panic!("expected AccountNotFound, got {other:?}"),
    }
    assert_eq!(ledger.get_balance(&a.id).await.unwrap(), Amount::from_major(100));
}

#[tokio::test]
async fn transfers_conserve_total_money() {
    let ledger = ledger_with_opening(Amount::from_major(1000));
    let mut ids = Vec::new();
    for name in ["Asha", "Birgit", "Chidi", "Dara"] {
        ids.push(ledger.create_account(name, "a strong password").await.unwrap().id);
    }

    let before = ledger.total_balance().await.unwrap();

    // A ring of transfers of varying sizes
    for (i, window) in ids.windows(2).enumerate() {
        ledger
            .transfer(&window[0], &window[1], Amount::from_major(10 + i as u64 * 7))
            .await
            .unwrap();
    }
    ledger
        .transfer(&ids[3], &ids[0], Amount::from_major(33))
        .await
        .unwrap();

    assert_eq!(ledger.total_balance().await.unwrap(), before);
}

#[tokio::test]
async fn history_replay_reconstructs_balance() {
    let ledger = ledger_with_opening(Amount::from_major(5000));
    let a = ledger.create_account("Asha", "a strong password").await.unwrap();
    let b = ledger.create_account("Birgit", "a strong password").await.unwrap();

    ledger.deposit(&a.id, Amount::from_minor(123_45)).await.unwrap();
    ledger.withdraw(&a.id, Amount::from_minor(67_89)).await.unwrap();
    ledger.transfer(&a.id, &b.id, Amount::from_minor(1500_00)).await.unwrap();
    ledger.transfer(&b.id, &a.id, Amount::from_minor(250_00)).await.unwrap();

    // Replay the full log (oldest first) from the opening balance
    let mut pages = Vec::new();
    let mut page = 0;
    loop {
        let p = ledger.get_history(&a.id, page).await.unwrap();
        let done = !p.has_next();
        pages.push(p);
        if done {
            break;
        }
        page += 1;
    }
    let mut replayed = Amount::from_major(5000);
    for entry in pages.iter().flat_map(|p| p.entries.iter()).rev() {
        replayed = match entry.kind {
            TransactionKind::Credit => replayed.checked_add(entry.amount).unwrap(),
            TransactionKind::Debit => replayed.checked_sub(entry.amount).unwrap(),
        };
    }
    assert_eq!(replayed, ledger.get_balance(&a.id).await.unwrap());

    // Every entry's balance_after matches the running balance at that point
    let mut running = Amount::from_major(5000);
    for entry in pages.iter().flat_map(|p| p.entries.iter()).rev() {
        running = match entry.kind {
            TransactionKind::Credit => running.checked_add(entry.amount).unwrap(),
            TransactionKind::Debit => running.checked_sub(entry.amount).unwrap(),
        };
        assert_eq!(entry.balance_after, running);
    }
}
