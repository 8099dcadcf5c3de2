//! Status bar: net worth, plan, status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::money_color;
use crate::tui::app::App;

const HINTS: &str = " 1-5/Tab:Switch  j/k:Scroll  r:Reload  q:Quit ";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let summary = &app.snapshot.summary;

    let mut spans = vec![
        Span::styled(" Net worth: ", Style::default().fg(Color::White)),
        Span::styled(
            summary.net_worth.to_string(),
            Style::default()
                .fg(money_color(summary.net_worth))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(summary.month.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(" │ "),
        Span::styled(
            format!("plan: {}", app.snapshot.plan.status),
            Style::default().fg(if app.snapshot.plan.status.is_premium() {
                Color::Magenta
            } else {
                Color::Gray
            }),
        ),
    ];

    if let Some(message) = &app.status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize)
        .saturating_sub(left_len + HINTS.len())
        .max(1);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(HINTS, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
