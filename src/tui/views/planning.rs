//! Goals & Debts tab
//!
//! Selection runs through the goals first, then the debts.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Row, Table, TableState},
    Frame,
};

use super::{highlight_style, panel};
use crate::display::truncate;
use crate::tui::app::App;
use crate::tui::layout::split_columns;

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.to_vec()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (left, right) = split_columns(area);
    let snapshot = &app.snapshot;
    let today = snapshot.today;
    let selected = app.selected();
    let goal_count = snapshot.goals.len();

    let goal_rows: Vec<Row> = snapshot
        .goals
        .iter()
        .map(|goal| {
            let style = if goal.is_completed() {
                Style::default().fg(Color::Green)
            } else if goal.is_overdue(today) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(truncate(&goal.name, 20)),
                Cell::from(format!("{} / {}", goal.saved_amount, goal.target_amount)),
                Cell::from(format!("{:.0}%", goal.progress_percent())),
                Cell::from(
                    goal.deadline
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ])
            .style(style)
        })
        .collect();

    let goals = Table::new(
        goal_rows,
        [
            Constraint::Min(12),
            Constraint::Length(22),
            Constraint::Length(5),
            Constraint::Length(10),
        ],
    )
    .header(header(&["Goal", "Saved", "%", "Deadline"]))
    .block(panel("Goals"))
    .highlight_style(highlight_style());

    let mut goal_state = TableState::default();
    if selected < goal_count {
        goal_state.select(Some(selected));
    }
    frame.render_stateful_widget(goals, left, &mut goal_state);

    let debt_rows: Vec<Row> = snapshot
        .debts
        .iter()
        .map(|debt| {
            Row::new(vec![
                Cell::from(truncate(&debt.name, 18)),
                Cell::from(debt.balance.to_string()).style(Style::default().fg(Color::Red)),
                Cell::from(format!("{:.2}%", debt.interest_rate_bps as f64 / 100.0)),
                Cell::from(debt.minimum_payment.to_string()),
                Cell::from(
                    debt.next_due_date(today)
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ])
        })
        .collect();

    let total: crate::models::Money = snapshot.debts.iter().map(|d| d.balance).sum();
    let debts = Table::new(
        debt_rows,
        [
            Constraint::Min(10),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header(&["Debt", "Balance", "APR", "Minimum", "Next due"]))
    .block(panel(&format!("Debts (total {})", total)))
    .highlight_style(highlight_style());

    let mut debt_state = TableState::default();
    if selected >= goal_count {
        debt_state.select(Some(selected - goal_count));
    }
    frame.render_stateful_widget(debts, right, &mut debt_state);
}
