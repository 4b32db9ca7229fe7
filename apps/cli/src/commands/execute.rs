//! `heirloom execute` - submit the execute transaction and await finality.

use anyhow::Result;
use colored::Colorize;

use heirloom_core::ServiceConfig;

use super::build_session;
use crate::commands::register::print_ledger;

pub async fn run(config: ServiceConfig) -> Result<()> {
    let session = build_session(config);
    session.connect().await?;

    println!("Submitting execute transaction...");
    let tx_id = session.execute().await?;
    println!("{} execute finalized in {}", "ok".green().bold(), tx_id);

    if let Some(ledger) = session.ledger() {
        print_ledger(&ledger);
    }
    Ok(())
}
