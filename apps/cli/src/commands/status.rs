//! `heirloom status` - fetch and print the ledger snapshot.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use heirloom_core::{LedgerState, ServiceConfig, SessionStatus};

use super::build_session;
use crate::commands::register::print_ledger;

/// JSON shape of the status report.
#[derive(Debug, Serialize)]
struct StatusReport {
    contract_address: String,
    status: SessionStatus,
    ledger: LedgerState,
}

pub async fn run(config: ServiceConfig, json: bool) -> Result<()> {
    let session = build_session(config);
    session.connect().await?;

    let ledger = session.ledger().unwrap_or_else(LedgerState::unregistered);

    if json {
        let report = StatusReport {
            contract_address: session.contract_address().to_string(),
            status: session.status(),
            ledger,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}  {}", "Contract".bold(), session.contract_address());
    println!("{}    {}", "Status".bold(), session.status().to_string().green());
    print_ledger(&ledger);
    Ok(())
}
