//! Transactions tab

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{highlight_style, money_color, panel};
use crate::display::truncate;
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;

    if snapshot.transactions.is_empty() {
        let text = Paragraph::new("No transactions yet. Add one with 'fintrack txn add'.")
            .block(panel("Transactions"));
        frame.render_widget(text, area);
        return;
    }

    let header = Row::new(["Date", "Account", "Description", "Category", "Amount"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = snapshot
        .transactions
        .iter()
        .map(|txn| {
            Row::new(vec![
                Cell::from(txn.date.to_string()),
                Cell::from(truncate(&snapshot.names.account(&txn.account_id), 16)),
                Cell::from(truncate(&txn.description, 32)),
                Cell::from(truncate(
                    &snapshot.names.category(txn.category_id.as_ref()),
                    18,
                )),
                Cell::from(txn.amount.to_string())
                    .style(Style::default().fg(money_color(txn.amount))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&format!(
            "Transactions ({})",
            snapshot.transactions.len()
        )))
        .highlight_style(highlight_style())
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected()));
    frame.render_stateful_widget(table, area, &mut state);
}
