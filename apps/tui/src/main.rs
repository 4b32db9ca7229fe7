//! Heirloom TUI - terminal dashboard for the inheritance contract.
//!
//! Renders the contract's ledger state, drives the auto-execute countdown,
//! and offers manual register/execute/refresh actions.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heirloom_core::{ContractSession, HttpIndexerClient, RpcWalletProvider, ServiceConfig};
use heirloom_tui::app::{App, InputMode};
use heirloom_tui::session_task::{spawn_session_worker, SessionCommand};
use heirloom_tui::views::{
    render_dashboard, render_register_form, render_status_bar, DashboardData,
};

/// Heirloom terminal dashboard.
#[derive(Parser, Debug)]
#[command(name = "heirloom-tui", version, about = "Dashboard for the inheritance contract")]
struct Args {
    /// Path to a TOML service configuration file
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,
}

/// Cadence of countdown ticks.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    // Logging stays off unless explicitly requested; the alternate screen
    // must not be interleaved with log lines.
    if std::env::var("HEIRLOOM_LOG_TUI").is_ok() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "heirloom=warn,error".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "off".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
            .init();
    }

    let config = ServiceConfig::load(args_config().as_deref())?;
    let wallet = RpcWalletProvider::from_config(&config);
    let indexer = HttpIndexerClient::from_config(&config);
    let session = Arc::new(ContractSession::new(config, wallet, indexer));

    let (commands, events) = spawn_session_worker(session.clone());
    let mut app = App::new(session, commands.clone(), events);

    // Connect immediately; the dashboard renders progress while it runs.
    let _ = commands.send(SessionCommand::Connect);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut app).await;

    // Restore terminal
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    result
}

fn args_config() -> Option<PathBuf> {
    Args::parse().config
}

async fn run<W, I>(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App<W, I>) -> Result<()>
where
    W: heirloom_abstraction::WalletProvider,
    I: heirloom_abstraction::IndexerClient,
{
    let mut last_tick = Instant::now();

    loop {
        app.drain_events();
        app.observe_session();

        if last_tick.elapsed() >= TICK_INTERVAL {
            app.on_tick();
            last_tick = Instant::now();
        }

        terminal.draw(|frame| {
            let area = frame.area();
            let [main_area, status_area] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(10), Constraint::Length(2)])
                .areas(area);

            let data = DashboardData::collect(app);
            render_dashboard(frame, main_area, &data);
            render_status_bar(frame, status_area, app.pending, app.notices.last().map(String::as_str));

            if let InputMode::Register(form) = &app.mode {
                render_register_form(frame, area, form);
            }
        })?;

        // Handle events with timeout so ticks keep flowing.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
