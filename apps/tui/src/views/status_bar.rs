//! Bottom status bar: pending operation, latest notice, key hints.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Render the status bar.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    pending: Option<&str>,
    notice: Option<&str>,
) {
    let mut parts: Vec<Span> = Vec::new();

    if let Some(operation) = pending {
        parts.push(Span::styled(
            format!("{}... ", operation),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(notice) = notice {
        parts.push(Span::raw(notice.to_string()));
        parts.push(Span::raw("  "));
    }
    parts.push(Span::styled(
        "q quit · c connect · f refresh · r register · e execute · x cancel countdown",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(parts)).block(Block::default().borders(Borders::TOP)),
        area,
    );
}
