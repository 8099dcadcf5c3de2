//! Investments tab: totals and allocation above the holdings table

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{highlight_style, money_color, panel};
use crate::display::{format_bar, truncate};
use crate::tui::app::App;
use crate::tui::layout::split_header;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let portfolio = &app.snapshot.portfolio;
    let header_height = 3 + portfolio.allocation.len() as u16;
    let (top, bottom) = split_header(area, header_height);

    let gain = portfolio.gain();
    let mut lines = vec![Line::from(vec![
        Span::raw(format!("Value {}  Cost {}  ", portfolio.total_value, portfolio.total_cost)),
        Span::styled(
            format!("Gain {} ({:+.1}%)", gain, portfolio.return_percent()),
            Style::default().fg(money_color(gain)),
        ),
    ])];
    for slice in &portfolio.allocation {
        lines.push(Line::from(format!(
            "{:<12} {} {:>5.1}%  {}",
            slice.kind.to_string(),
            format_bar(slice.percent, 100.0, 20),
            slice.percent,
            slice.value
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("Portfolio")), top);

    let rows: Vec<Row> = portfolio
        .holdings
        .iter()
        .map(|holding| {
            let gain = holding.gain();
            Row::new(vec![
                Cell::from(truncate(&holding.name, 20)),
                Cell::from(holding.symbol.clone().unwrap_or_default()),
                Cell::from(holding.kind.to_string()),
                Cell::from(format!("{}", holding.quantity)),
                Cell::from(holding.current_price.to_string()),
                Cell::from(holding.market_value().to_string()),
                Cell::from(format!("{} ({:+.1}%)", gain, holding.return_percent()))
                    .style(Style::default().fg(money_color(gain))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(20),
        ],
    )
    .header(
        Row::new(["Holding", "Symbol", "Kind", "Units", "Price", "Value", "Gain"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(panel(&format!("Holdings ({})", portfolio.holdings.len())))
    .highlight_style(highlight_style());

    let mut state = TableState::default();
    state.select(Some(app.selected()));
    frame.render_stateful_widget(table, bottom, &mut state);
}
