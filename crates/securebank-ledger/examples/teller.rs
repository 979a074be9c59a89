//! Minimal walkthrough of the ledger engine: open two accounts, move money,
//! and print the audited result.
//!
//! Run with: `cargo run -p securebank-ledger --example teller`

use securebank_ledger::types::Amount;
use securebank_ledger::{Ledger, LedgerConfig, PasswordConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = LedgerConfig {
        password: PasswordConfig::fast_insecure(),
        ..LedgerConfig::default()
    };
    let ledger = Ledger::with_tracing_audit(config)?;

    let asha = ledger.create_account("Asha Verma", "a strong password").await?;
    let birgit = ledger.create_account("Birgit Holm", "another password").await?;
    println!("opened {} and {}", asha.id, birgit.id);

    let receipt = ledger
        .transfer(&asha.id, &birgit.id, "1500.00".parse::<Amount>()?)
        .await?;
    println!(
        "transfer {}: {} -> {}, sender now {}, recipient now {}",
        receipt.transfer_id,
        receipt.debit.account_id,
        receipt.credit.account_id,
        receipt.from_balance,
        receipt.to_balance
    );

    let history = ledger.get_history(&asha.id, 0).await?;
    for entry in &history.entries {
        println!(
            "{} {:?} {} (balance {})",
            entry.id, entry.kind, entry.amount, entry.balance_after
        );
    }

    Ok(())
}
