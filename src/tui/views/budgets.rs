//! Budgets tab: one gauge per category budget of the current month

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::panel;
use crate::reports::BudgetHealth;
use crate::tui::app::App;

const GAUGE_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let report = &app.snapshot.budgets;
    let title = format!(
        "Budgets {} (spent {} of {})",
        report.period, report.total_spent, report.total_available
    );

    if report.rows.is_empty() {
        let text = Paragraph::new("No budgets for this month. Set one with 'fintrack budget set'.")
            .block(panel(&title));
        frame.render_widget(text, area);
        return;
    }

    let outer = panel(&title);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let visible = (inner.height / GAUGE_HEIGHT).max(1) as usize;
    let selected = app.selected();
    // Keep the selected gauge on screen
    let first = selected.saturating_sub(visible - 1);

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(GAUGE_HEIGHT); visible])
        .split(inner);

    for (slot, (index, (status, health))) in slots
        .iter()
        .zip(report.rows.iter().enumerate().skip(first))
    {
        let color = match health {
            BudgetHealth::OnTrack => Color::Green,
            BudgetHealth::Warning => Color::Yellow,
            BudgetHealth::Over => Color::Red,
        };
        let border = if index == selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {} {} ", status.category_name, health.label())),
            )
            .gauge_style(Style::default().fg(color))
            .ratio((status.percent_used() / 100.0).clamp(0.0, 1.0))
            .label(format!(
                "{} / {} ({:.0}%)",
                status.spent,
                status.available(),
                status.percent_used()
            ));

        frame.render_widget(gauge, *slot);
    }
}
