//! Heirloom CLI - command-line interface for the inheritance contract.
//!
//! Provides a `heirloom` command for inspecting the contract's ledger and
//! submitting register/execute transactions from scripts and terminals.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use heirloom_core::ServiceConfig;

/// Heirloom CLI - dead-man-switch inheritance contract client
#[derive(Parser, Debug)]
#[command(
    name = "heirloom",
    author,
    version,
    about = "Client for the dead-man-switch inheritance contract",
    long_about = "Heirloom talks to the chain indexer and your wallet service to inspect the\ninheritance contract's ledger and to submit register/execute transactions."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Path to a TOML service configuration file
    #[arg(short = 'C', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the contract's current ledger state
    ///
    /// Connects to the indexer, fetches and decodes the ledger, and prints
    /// the registration and execution status plus both wallet addresses.
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register an inheritance pair
    ///
    /// Builds the register circuit call, has the wallet balance, prove, and
    /// submit it, then waits for on-chain finality.
    Register {
        /// Parent wallet address (64 hex characters)
        #[arg(long)]
        parent: String,

        /// Child wallet address (64 hex characters)
        #[arg(long)]
        child: String,
    },

    /// Execute the inheritance
    ///
    /// Only valid once registered and not yet executed; the contract itself
    /// rejects anything else.
    Execute,

    /// Print the resolved service configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber =
        FmtSubscriber::builder().with_max_level(level).without_time().with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServiceConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Status { json } => commands::status::run(config, json).await,
        Command::Register { parent, child } => commands::register::run(config, &parent, &child).await,
        Command::Execute => commands::execute::run(config).await,
        Command::Config => commands::config::run(&config),
    }
}
