//! Register dialog: parent and child address entry.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{FormFocus, RegisterForm};

/// Center a fixed-size dialog inside `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect { x, y, width: width.min(area.width), height: height.min(area.height) }
}

/// Render the register dialog on top of the dashboard.
pub fn render_register_form(frame: &mut Frame, area: Rect, form: &RegisterForm) {
    let dialog = centered_rect(72, 10, area);
    frame.render_widget(Clear, dialog);
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(" Register Inheritance "),
        dialog,
    );

    let inner = dialog.inner(Margin { horizontal: 2, vertical: 1 });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Length(1)])
        .split(inner);

    render_field(
        frame,
        rows[0],
        "Parent Wallet Address",
        form.parent.value(),
        form.focus == Some(FormFocus::Parent),
    );
    render_field(
        frame,
        rows[1],
        "Child Wallet Address",
        form.child.value(),
        form.focus == Some(FormFocus::Child),
    );

    let hint = Paragraph::new(Span::styled(
        "tab switch field · enter register · esc cancel",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(hint, rows[2]);

    // Place the cursor in the focused field.
    let (row, value) = match form.focus {
        Some(FormFocus::Child) => (rows[1], form.child.value()),
        _ => (rows[0], form.parent.value()),
    };
    let cursor_x = row.x + 1 + u16::try_from(value.len()).unwrap_or(u16::MAX - 1);
    frame.set_cursor_position((cursor_x.min(row.right().saturating_sub(2)), row.y + 1));
}

fn render_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let field = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", title)),
    );
    frame.render_widget(field, area);
}
