//! Dashboard views

pub mod budgets;
pub mod investments;
pub mod overview;
pub mod planning;
pub mod status_bar;
pub mod transactions;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

use super::app::{App, Tab};
use super::layout::AppLayout;
use crate::models::Money;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_tabs(frame, app, layout.tabs);

    match app.active_tab {
        Tab::Overview => overview::render(frame, app, layout.main),
        Tab::Transactions => transactions::render(frame, app, layout.main),
        Tab::Budgets => budgets::render(frame, app, layout.main),
        Tab::GoalsDebts => planning::render(frame, app, layout.main),
        Tab::Investments => investments::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);
}

fn render_tabs(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" fintrack "))
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    frame.render_widget(tabs, area);
}

/// Green for positive, red for negative
pub(crate) fn money_color(amount: Money) -> Color {
    if amount.is_negative() {
        Color::Red
    } else if amount.is_zero() {
        Color::Gray
    } else {
        Color::Green
    }
}

pub(crate) fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::DarkGray))
}

pub(crate) fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}
