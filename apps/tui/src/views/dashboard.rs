//! Main dashboard view: contract identity, ledger fields, countdown.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use heirloom_abstraction::{IndexerClient, WalletProvider};
use heirloom_core::{LedgerState, SessionStatus, AUTO_EXECUTE_TICKS};

use crate::app::App;
use crate::views::truncate_addr;

/// Everything the dashboard renders, collected once per frame.
pub struct DashboardData {
    pub contract_address: String,
    pub status: SessionStatus,
    pub ledger: Option<LedgerState>,
    pub last_error: Option<String>,
    pub countdown_remaining: Option<u32>,
}

impl DashboardData {
    pub fn collect<W: WalletProvider, I: IndexerClient>(app: &App<W, I>) -> Self {
        Self {
            contract_address: app.session.contract_address().to_string(),
            status: app.session.status(),
            ledger: app.session.ledger(),
            last_error: app.session.last_error(),
            countdown_remaining: app.countdown.remaining(),
        }
    }

    fn headline(&self) -> &'static str {
        match &self.ledger {
            Some(l) if l.is_executed => "Inheritance executed - assets transferred",
            Some(l) if l.is_registered => "Ready to execute inheritance",
            _ => "Register parent and child wallets",
        }
    }
}

fn status_style(status: SessionStatus) -> Style {
    let color = match status {
        SessionStatus::Connected => Color::Green,
        SessionStatus::Connecting | SessionStatus::Registering | SessionStatus::Executing => {
            Color::Yellow
        }
        SessionStatus::Error => Color::Red,
        SessionStatus::Disconnected => Color::DarkGray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Render the dashboard view.
pub fn render_dashboard(frame: &mut Frame, area: Rect, data: &DashboardData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + status
            Constraint::Length(3), // Contract address
            Constraint::Length(5), // Parent / child wallets
            Constraint::Length(5), // Registered / executed flags
            Constraint::Length(3), // Countdown
            Constraint::Min(1),    // Error line
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled("Heirloom", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  |  "),
        Span::raw(data.headline()),
        Span::raw("  |  "),
        Span::styled(data.status.to_string(), status_style(data.status)),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let contract = Paragraph::new(truncate_addr(&data.contract_address))
        .block(Block::default().borders(Borders::ALL).title(" Contract "));
    frame.render_widget(contract, chunks[1]);

    render_wallet_cards(frame, chunks[2], data);
    render_flag_cards(frame, chunks[3], data);
    render_countdown(frame, chunks[4], data);

    if let Some(error) = &data.last_error {
        let line = Paragraph::new(Line::from(Span::styled(
            format!("Last error: {}", error),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(line, chunks[5]);
    }
}

fn render_wallet_cards(frame: &mut Frame, area: Rect, data: &DashboardData) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let field = |addr: Option<&str>| match addr {
        Some(hex) => Paragraph::new(truncate_addr(hex)),
        None => Paragraph::new(Span::styled("Not set", Style::default().fg(Color::DarkGray))),
    };

    let (parent, child) = match &data.ledger {
        Some(l) if l.is_registered => (Some(l.parent.to_hex()), Some(l.child.to_hex())),
        _ => (None, None),
    };

    frame.render_widget(
        field(parent.as_deref())
            .block(Block::default().borders(Borders::ALL).title(" Parent Wallet ")),
        halves[0],
    );
    frame.render_widget(
        field(child.as_deref())
            .block(Block::default().borders(Borders::ALL).title(" Child Wallet ")),
        halves[1],
    );
}

fn render_flag_cards(frame: &mut Frame, area: Rect, data: &DashboardData) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let flag = |set: bool| {
        let (text, color) = if set { ("Yes", Color::Green) } else { ("No", Color::DarkGray) };
        Paragraph::new(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center)
    };

    let registered = data.ledger.as_ref().is_some_and(|l| l.is_registered);
    let executed = data.ledger.as_ref().is_some_and(|l| l.is_executed);

    frame.render_widget(
        flag(registered).block(Block::default().borders(Borders::ALL).title(" Registered ")),
        halves[0],
    );
    frame.render_widget(
        flag(executed).block(Block::default().borders(Borders::ALL).title(" Executed ")),
        halves[1],
    );
}

fn render_countdown(frame: &mut Frame, area: Rect, data: &DashboardData) {
    let block = Block::default().borders(Borders::ALL).title(" Auto-execute ");
    match data.countdown_remaining {
        Some(remaining) => {
            let ratio = f64::from(remaining) / f64::from(AUTO_EXECUTE_TICKS);
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(Style::default().fg(Color::Yellow))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(format!("executing in {}s  (x to cancel)", remaining));
            frame.render_widget(gauge, area);
        }
        None => {
            frame.render_widget(
                Paragraph::new(Span::styled("idle", Style::default().fg(Color::DarkGray)))
                    .block(block),
                area,
            );
        }
    }
}
