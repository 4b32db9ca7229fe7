//! `heirloom register` - submit a register transaction and await finality.

use anyhow::Result;
use colored::Colorize;

use heirloom_core::{LedgerState, ServiceConfig};

use super::build_session;

pub async fn run(config: ServiceConfig, parent: &str, child: &str) -> Result<()> {
    let session = build_session(config);
    session.connect().await?;

    println!("Submitting register transaction...");
    let tx_id = session.register(parent, child).await?;
    println!("{} register finalized in {}", "ok".green().bold(), tx_id);

    if let Some(ledger) = session.ledger() {
        print_ledger(&ledger);
    }
    Ok(())
}

/// Print the four ledger fields, shared by the mutating commands and status.
pub fn print_ledger(ledger: &LedgerState) {
    let flag = |set: bool| if set { "yes".green() } else { "no".dimmed() };
    let addr = |hex: String, registered: bool| {
        if registered {
            hex.normal()
        } else {
            "not set".dimmed()
        }
    };
    println!("{} {}", "Registered".bold(), flag(ledger.is_registered));
    println!("{}   {}", "Executed".bold(), flag(ledger.is_executed));
    println!("{}     {}", "Parent".bold(), addr(ledger.parent.to_hex(), ledger.is_registered));
    println!("{}      {}", "Child".bold(), addr(ledger.child.to_hex(), ledger.is_registered));
}
